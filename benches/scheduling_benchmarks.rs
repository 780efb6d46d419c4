//! Performance benchmarks for business-day scheduling.
//!
//! These benchmarks measure the pure scheduling functions:
//! - Milestone computation against calendars of growing size
//! - Reminder selection over a day's worth of due contacts

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use crm_followup_server::models::Contact;
use crm_followup_server::scheduling::{
    add_business_days, compute_milestones, select_due_reminders, HolidayRange, HolidayTable,
    MilestoneDates,
};
use std::collections::HashSet;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// One year-long range per year, each with `per_year` holidays on Mondays.
fn calendar(years: i32, per_year: usize) -> HolidayTable {
    let ranges = (0..years)
        .map(|offset| {
            let from = NaiveDate::from_ymd_opt(2024 + offset, 1, 1).unwrap();
            let to = NaiveDate::from_ymd_opt(2024 + offset, 12, 31).unwrap();
            let dates = (0..per_year).map(move |week| from + Duration::weeks(week as i64));
            HolidayRange::new(format!("{}", 2024 + offset), from, to, dates)
        })
        .collect();
    HolidayTable::new(ranges)
}

fn bench_compute_milestones(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_milestones");

    for years in [1, 5, 20] {
        let cal = calendar(years, 12);
        group.bench_with_input(BenchmarkId::from_parameter(years), &cal, |b, cal| {
            b.iter(|| {
                compute_milestones(
                    cal,
                    black_box(start() + Duration::days(years as i64 * 180)),
                    MilestoneDates::default(),
                    None,
                )
            })
        });
    }

    group.finish();
}

fn bench_add_business_days(c: &mut Criterion) {
    let cal = calendar(3, 20);
    c.bench_function("add_business_days_250", |b| {
        b.iter(|| add_business_days(&cal, black_box(start()), black_box(250)))
    });
}

fn bench_select_due_reminders(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_due_reminders");
    let today = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();

    for size in [100, 1000, 5000] {
        let contacts: Vec<Contact> = (0..size)
            .map(|i| {
                let mut contact = Contact::new(format!("contact-{}", i), "Bench");
                contact.creation_date = Some(today - Duration::days((i % 3) as i64 * 4));
                contact.first_follow_up_date = Some(today);
                contact.second_follow_up_date = Some(today + Duration::days(6));
                contact
            })
            .collect();
        let called: HashSet<String> = (0..size)
            .step_by(7)
            .map(|i| format!("contact-{}", i))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &contacts, |b, contacts| {
            b.iter(|| select_due_reminders(today, contacts, &called))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_milestones,
    bench_add_business_days,
    bench_select_due_reminders
);
criterion_main!(benches);
