use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use writeflow_engine::EditSession;
mod common;

fn bench_apply_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_all");
    group.sample_size(10);

    for sentences in [10, 100, 1000] {
        let content = common::generate_prose(sentences);
        let fixes = common::spelling_fixes(sentences);

        group.bench_with_input(BenchmarkId::from_parameter(sentences), &sentences, |b, _| {
            b.iter(|| {
                let mut session = EditSession::new(content.as_str());
                session.set_suggestions(fixes.clone());
                std::hint::black_box(session.apply_all());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_all);
criterion_main!(benches);
