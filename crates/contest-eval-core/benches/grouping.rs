use criterion::{black_box, criterion_group, criterion_main, Criterion};

use contest_eval_core::grouping::{group_submissions, CompositeTable};
use contest_eval_core::model::IoiSubmission;

fn make_submissions(count: usize) -> Vec<IoiSubmission> {
    (0..count)
        .map(|i| {
            let (title, date, index) = if i % 3 == 0 {
                ("Crayfish scrivener", "IOI 2012 day 1", format!("A{}", i % 5 + 1))
            } else {
                ("Odometer", "IOI 2012 day 2", "B".to_string())
            };
            IoiSubmission {
                problem_title: title.into(),
                date: date.into(),
                problem_index: index,
                points: Some((i % 21) as f64 * 5.0),
                original_record_id: Some((count - i) as f64),
            }
        })
        .collect()
}

fn bench_group_submissions(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_submissions");
    let table = CompositeTable::builtin();

    for size in [100usize, 10_000] {
        let submissions = make_submissions(size);
        group.bench_function(format!("{size} submissions"), |b| {
            b.iter(|| group_submissions(black_box(&submissions), black_box(&table)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_group_submissions);
criterion_main!(benches);
