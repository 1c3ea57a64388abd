//! Performance benchmarks for the Payroll & Leave Ledger Engine.
//!
//! This benchmark suite covers the two loops that scale with input size:
//! - Leave day counting over ranges of increasing length
//! - Payroll generation for 100 and 1000 employees
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_ledger::PayrollEngine;
use payroll_ledger::clock::FixedClock;
use payroll_ledger::config::ConfigLoader;
use payroll_ledger::leave::count_leave_days;
use payroll_ledger::models::{HolidayCalendar, NewEmployee, SalaryComponents};
use payroll_ledger::store::MemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates an engine with `employees` published, salaried employees.
fn create_populated_engine(employees: usize) -> PayrollEngine<MemoryStore, FixedClock> {
    let config = ConfigLoader::load("./config/standard")
        .expect("Failed to load config")
        .into_config();
    let engine = PayrollEngine::new(
        MemoryStore::new(),
        config,
        FixedClock::at_date(date(2026, 3, 31)),
    );
    engine.seed_reference_data().unwrap();
    let template = engine.leave_template("Standard").unwrap();

    let components = SalaryComponents {
        basic: Some(Decimal::from(30000)),
        hra: Some(Decimal::from(12000)),
        special_allowance: Some(Decimal::from(3000)),
        provident_fund: Some(Decimal::from(1800)),
        professional_tax: Some(Decimal::from(200)),
        ..Default::default()
    };

    for i in 0..employees {
        let employee = engine
            .create_employee(NewEmployee {
                first_name: "Bench".to_string(),
                last_name: format!("Employee {}", i),
                date_of_joining: date(2025, 1, 1),
                leave_template_id: Some(template.id),
            })
            .unwrap();
        engine.publish_employee(employee.id).unwrap();
        engine
            .assign_salary(employee.id, components.clone(), date(2025, 1, 1))
            .unwrap();
    }
    engine
}

/// Benchmark: counting chargeable days over ranges of 1 day to a full year.
fn bench_leave_day_count(c: &mut Criterion) {
    let config = ConfigLoader::load("./config/standard").expect("Failed to load config");
    let calendar = HolidayCalendar::from_holidays(config.holidays_in(2026));
    let half_day = Decimal::new(5, 1);
    let from = date(2026, 1, 1);

    let mut group = c.benchmark_group("leave_day_count");
    for days in [1u64, 7, 31, 365] {
        let to = from + chrono::Days::new(days - 1);
        group.throughput(Throughput::Elements(days));
        group.bench_with_input(BenchmarkId::new("days", days), &to, |b, to| {
            b.iter(|| {
                black_box(count_leave_days(
                    black_box(from),
                    black_box(*to),
                    false,
                    true,
                    &calendar,
                    half_day,
                ))
            })
        });
    }
    group.finish();
}

/// Benchmark: generating a month of payroll for a fresh store.
fn bench_payroll_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("payroll_generation");
    group.sample_size(10);

    for employees in [100usize, 1000] {
        group.throughput(Throughput::Elements(employees as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employees),
            &employees,
            |b, &employees| {
                b.iter_batched(
                    || create_populated_engine(employees),
                    |engine| black_box(engine.generate_payroll(3, 2026).unwrap()),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_leave_day_count, bench_payroll_generation);
criterion_main!(benches);
