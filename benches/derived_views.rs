//! Benchmarks for the derived task views.
//!
//! These benchmarks measure sorting by due date and filtering on a page-sized
//! and a large collection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fake::{Fake, Faker};
use taskboard::store::views::{filter_by_priority, filter_by_status, sort_by_due_date};
use taskboard::{Task, TaskPriority, TaskStatus};

fn tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| {
            let mut task: Task = Faker.fake();
            task.id = Some(i as i64 + 1);
            task.due_date = match i % 4 {
                0 => format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                1 => format!("{:02}/{:02}/2025", i % 12 + 1, i % 28 + 1),
                2 => format!("2024-11-{:02}T09:30:00.000Z", i % 28 + 1),
                _ => String::from("not a date"),
            };
            task
        })
        .collect()
}

fn bench_sort_by_due_date(c: &mut Criterion) {
    let page = tasks(10);
    let large = tasks(5_000);

    c.bench_function("sort_by_due_date_page", |b| {
        b.iter(|| sort_by_due_date(black_box(&page)))
    });
    c.bench_function("sort_by_due_date_large", |b| {
        b.iter(|| sort_by_due_date(black_box(&large)))
    });
}

fn bench_filters(c: &mut Criterion) {
    let large = tasks(5_000);

    c.bench_function("filter_by_status_large", |b| {
        b.iter(|| filter_by_status(black_box(&large), TaskStatus::InProgress))
    });
    c.bench_function("filter_by_priority_large", |b| {
        b.iter(|| filter_by_priority(black_box(&large), TaskPriority::High))
    });
}

criterion_group!(benches, bench_sort_by_due_date, bench_filters);
criterion_main!(benches);
