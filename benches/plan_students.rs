//! This bench plans curricula for a large generated student table against a
//! thirteen-domain ordering.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use curriculum::{CurriculumBuilder, DomainMapper, DomainRanks, Planner, StudentTable};

const STANDARDS: [&str; 6] = ["RF", "RL", "RI", "L", "W", "SL"];

fn domain(grade: usize) -> String {
    if grade == 0 {
        "K".to_string()
    } else {
        grade.to_string()
    }
}

fn domain_order() -> Vec<Vec<String>> {
    (0..=12)
        .rev()
        .map(|grade| {
            std::iter::once(domain(grade))
                .chain(STANDARDS.iter().map(ToString::to_string))
                .collect()
        })
        .collect()
}

fn students(count: usize) -> Vec<Vec<String>> {
    let header = std::iter::once("Student".to_string())
        .chain(STANDARDS.iter().map(ToString::to_string))
        .collect();

    std::iter::once(header)
        .chain((0..count).map(|student| {
            std::iter::once(format!("student-{student}"))
                .chain((0..STANDARDS.len()).map(|column| domain((student * 7 + column * 3) % 13)))
                .collect()
        }))
        .collect()
}

fn plan_students(c: &mut Criterion) {
    let ranks = DomainRanks::default();
    let rows = domain_order();

    c.bench_function("infer domain order", |b| {
        b.iter(|| DomainMapper::new(&rows, &ranks).unwrap());
    });

    let mapper = DomainMapper::new(&rows, &ranks).unwrap();
    let planner = Planner::new(CurriculumBuilder::new(&mapper, &ranks));

    c.bench_function("plan 10k students", |b| {
        b.iter_batched(
            || StudentTable::from_rows(&students(10_000)).unwrap(),
            |table| planner.plan(&table),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, plan_students);
criterion_main!(benches);
