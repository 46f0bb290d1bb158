use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_instruments::{
    Dividend, DividendVanillaOptionArguments, Exercise, OptionType, PlainVanillaPayoff, PricingEngine,
    VanillaOptionArguments,
};
use ql_pricingengines::{
    AnalyticEuropeanEngine, FdAmericanEngine, FdBermudanEngine, FdDividendEngine, FdEuropeanEngine, FdSettings,
};
use ql_processes::{BlackScholesProcess, FlatBlackScholesProcess};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid benchmark date")
}

fn process() -> Arc<dyn BlackScholesProcess> {
    Arc::new(
        FlatBlackScholesProcess::new(date(2025, 1, 2), 100.0, 0.05, 0.01, 0.2)
            .expect("benchmark process should be valid"),
    )
}

fn put(exercise: Exercise) -> VanillaOptionArguments {
    VanillaOptionArguments {
        payoff: Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0)),
        exercise,
    }
}

fn bench_european(c: &mut Criterion) {
    let args = put(Exercise::european(date(2026, 1, 2)));
    let analytic = AnalyticEuropeanEngine::new(process());
    c.bench_function("analytic_european_put", |b| {
        b.iter(|| black_box(analytic.calculate(black_box(&args)).expect("pricing should succeed").value))
    });

    let mut group = c.benchmark_group("fd_european_put");
    for points in [101_usize, 201, 401] {
        let engine = FdEuropeanEngine::new(process(), FdSettings::new(100, points));
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| black_box(engine.calculate(black_box(&args)).expect("pricing should succeed").value))
        });
    }
    group.finish();
}

fn bench_american(c: &mut Criterion) {
    let args = put(Exercise::american(date(2025, 1, 2), date(2026, 1, 2)).expect("valid exercise"));
    let mut group = c.benchmark_group("fd_american_put");
    for points in [101_usize, 201, 401] {
        let engine = FdAmericanEngine::new(process(), FdSettings::new(100, points));
        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| black_box(engine.calculate(black_box(&args)).expect("pricing should succeed").value))
        });
    }
    group.finish();
}

fn bench_multi_period(c: &mut Criterion) {
    let quarterly = vec![date(2025, 4, 2), date(2025, 7, 2), date(2025, 10, 2), date(2026, 1, 2)];
    let bermudan = put(Exercise::bermudan(quarterly).expect("valid exercise"));
    let engine = FdBermudanEngine::new(process(), FdSettings::new(50, 201));
    c.bench_function("fd_bermudan_put_quarterly", |b| {
        b.iter(|| black_box(engine.calculate(black_box(&bermudan)).expect("pricing should succeed").value))
    });

    let dividends = DividendVanillaOptionArguments::new(
        Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0)),
        Exercise::american(date(2025, 1, 2), date(2026, 1, 2)).expect("valid exercise"),
        vec![Dividend::new(date(2025, 4, 2), 1.0), Dividend::new(date(2025, 10, 2), 1.0)],
    );
    let engine = FdDividendEngine::new(process(), FdSettings::new(50, 201));
    c.bench_function("fd_dividend_american_call", |b| {
        b.iter(|| black_box(engine.calculate(black_box(&dividends)).expect("pricing should succeed").value))
    });
}

criterion_group!(benches, bench_european, bench_american, bench_multi_period);
criterion_main!(benches);
