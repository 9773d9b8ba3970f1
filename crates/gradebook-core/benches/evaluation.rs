use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gradebook_core::model::{Component, CourseGradingConfig, Item, MarkingScheme};
use gradebook_core::results::Selection;
use gradebook_core::scheme::evaluate;
use gradebook_core::selector::select_best;
use gradebook_core::statistics::{aggregate, AggregateOptions, CourseStanding};
use gradebook_core::traits::CutoffScale;

fn make_items(per_category: usize) -> Vec<Item> {
    let mut items = Vec::new();
    for category in ["Assignments", "Quizzes", "Midterm", "Final"] {
        for i in 0..per_category {
            items.push(Item {
                id: format!("{category}-{i}"),
                course_id: "bench".into(),
                name: format!("{category} {i}"),
                category: category.into(),
                grade: Some((i * 7 % 40 + 60) as f64),
                max_grade: Some(100.0),
                is_placeholder: false,
            });
        }
    }
    items
}

fn schemes() -> Vec<MarkingScheme> {
    vec![
        vec![
            Component::new("Assignments", 20.0),
            Component::new("Quizzes", 10.0),
            Component::new("Midterm", 30.0),
            Component::new("Final", 40.0),
        ],
        vec![
            Component::new("Assignments", 20.0),
            Component::new("Quizzes", 10.0),
            Component::new("Final", 70.0),
        ],
    ]
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let scheme = &schemes()[0];
    let drops: HashMap<String, u32> = [("Quizzes".to_string(), 2)].into();
    let placeholders = HashMap::new();

    for n in [5, 50, 500] {
        let items = make_items(n);
        group.bench_function(format!("items_per_category={n}"), |b| {
            b.iter(|| {
                evaluate(
                    black_box(scheme),
                    black_box(&items),
                    black_box(&drops),
                    black_box(&placeholders),
                )
            })
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_best");
    let schemes = schemes();
    let items = make_items(20);
    let drops = HashMap::new();
    let placeholders = HashMap::new();

    group.bench_function("two_schemes", |b| {
        let config = CourseGradingConfig::default();
        b.iter(|| select_best(black_box(&schemes), &items, &drops, &placeholders, &config))
    });

    group.bench_function("preferred", |b| {
        let config = CourseGradingConfig {
            preferred_scheme: Some(1),
            ..Default::default()
        };
        b.iter(|| select_best(black_box(&schemes), &items, &drops, &placeholders, &config))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let schemes = schemes();
    let items = make_items(10);
    let selection: Selection = select_best(
        &schemes,
        &items,
        &HashMap::new(),
        &HashMap::new(),
        &CourseGradingConfig::default(),
    );
    let standings: Vec<CourseStanding> = (0..6)
        .map(|i| CourseStanding {
            course_id: format!("c{i}"),
            code: format!("C {i}"),
            credits: 0.5,
            bonus_percent: 0.0,
            selection: selection.clone(),
            pending: None,
        })
        .collect();
    let scale = CutoffScale::default();
    let options = AggregateOptions {
        target: Some(85.0),
        ..Default::default()
    };

    c.bench_function("aggregate_term", |b| {
        b.iter(|| aggregate(black_box(&standings), &scale, &options))
    });
}

criterion_group!(benches, bench_evaluate, bench_select, bench_aggregate);
criterion_main!(benches);
