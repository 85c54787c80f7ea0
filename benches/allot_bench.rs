//! Criterion benchmarks for u-allot model building and solving.
//!
//! Uses seeded synthetic rosters so numbers are comparable between runs.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_allot::assign::{build_model, AssignmentConfig, AssignmentProblem, AssignmentRunner, WeightConfig};
use u_allot::roster::{Gender, GroupDefinition, PersonRecord};

// ===========================================================================
// Synthetic rosters
// ===========================================================================

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).expect("valid date")
}

/// `free` unplaced children plus `fixed` already in groups, spread over
/// three overlapping age-bounded groups, each large enough for everyone.
fn synthetic_problem(free: usize, fixed: usize, seed: u64) -> AssignmentProblem {
    let mut rng = StdRng::seed_from_u64(seed);
    let names = ["Igel", "Mäuse", "Bären"];
    let seats = (free + fixed) as u32;
    let groups = vec![
        GroupDefinition::new(names[0], seats).with_age_range(-2, 2),
        GroupDefinition::new(names[1], seats).with_age_range(1, 4),
        GroupDefinition::new(names[2], seats).with_age_range(3, 6),
    ];

    let roster = (0..free + fixed)
        .map(|id| {
            let gender = if rng.random_bool(0.5) { Gender::Male } else { Gender::Female };
            let record = PersonRecord::new(id, format!("Kind{id}"), "Bench")
                .with_age(rng.random_range(-2..=6))
                .with_gender(gender)
                .with_points(f64::from(rng.random_range(0u32..10)));
            if id < fixed {
                let age = record.age.unwrap_or(0);
                let home = groups.iter().find(|g| g.admits_age(age)).map(|g| g.name.clone());
                PersonRecord { group: home, ..record }
            } else {
                record
            }
        })
        .collect();

    AssignmentProblem::new(roster, groups)
}

fn balanced_weights() -> WeightConfig {
    WeightConfig::default()
        .with_gender_balance_weight(5.0)
        .with_age_balance_weight(5.0)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_build_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_model");
    group.sample_size(20);

    for &free in &[10usize, 50, 200] {
        let problem = synthetic_problem(free, free / 2, 42);
        let weights = balanced_weights();
        group.bench_with_input(BenchmarkId::from_parameter(free), &(problem, weights), |b, (p, w)| {
            b.iter(|| {
                let model = build_model(black_box(&p.roster), black_box(&p.groups), w, reference_date());
                black_box(model)
            })
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);

    for (free, label, weights) in [
        (12usize, "points", WeightConfig::default()),
        (12, "balanced", balanced_weights()),
        (24, "points", WeightConfig::default()),
        (24, "balanced", balanced_weights()),
    ] {
        let problem = synthetic_problem(free, 6, 7);
        let config = AssignmentConfig::default()
            .with_weights(weights)
            .with_reference_date(reference_date());
        group.bench_with_input(
            BenchmarkId::new(label, free),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = AssignmentRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_model, bench_solve);
criterion_main!(benches);
