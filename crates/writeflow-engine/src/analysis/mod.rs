pub mod stats;

pub use stats::{DocumentStats, Tone};
