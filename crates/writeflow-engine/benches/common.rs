// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use writeflow_engine::{Span, Suggestion};

#[allow(dead_code)]
pub fn generate_prose(sentences: usize) -> String {
    "Teh quick brown fox jumps over the lazy dog. ".repeat(sentences)
}

/// One positioned fix per sentence, for the misspelled leading word.
#[allow(dead_code)]
pub fn spelling_fixes(sentences: usize) -> Vec<Suggestion> {
    let stride = generate_prose(1).chars().count();
    (0..sentences)
        .map(|i| {
            let start = i * stride;
            Suggestion::positioned(format!("s{i}"), Span::new(start, start + 3), "Teh", "The")
        })
        .collect()
}
