use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nugget_core::{Diagnostics, FactEntry, Requirement, resolve_cover};
use std::time::Duration;

fn generate_topic(questions: usize, facts_per_question: usize, documents: usize) -> Vec<Requirement> {
    (0..questions)
        .map(|q| {
            let entries = (0..facts_per_question)
                .map(|f| {
                    let docs = (0..(1 + (q + f) % 6)).map(|d| format!("doc{:05}", (q * 31 + f * 7 + d * 13) % documents));
                    FactEntry::new(format!("q{q}_f{f}"), docs)
                })
                .collect();
            if q % 4 == 0 {
                Requirement::or(format!("question {q}"), entries)
            } else {
                Requirement::and(format!("question {q}"), entries)
            }
        })
        .collect()
}

fn bench_greedy_cover(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_cover");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for questions in [10, 100, 1_000].iter() {
        let requirements = generate_topic(*questions, 5, questions * 3);
        group.bench_with_input(BenchmarkId::new("resolve_cover", questions), &requirements, |b, requirements| {
            b.iter(|| black_box(resolve_cover(requirements, &mut Diagnostics::new())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_greedy_cover);
criterion_main!(benches);
