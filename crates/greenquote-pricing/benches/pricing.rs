//! GreenQuote pricing benchmarks
//!
//! - Amortization with and without the payment cache
//! - Full pricing pipeline per risk band

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use greenquote_pricing::{monthly_payment, PricingConfig, QuotePricer};
use rust_decimal::Decimal;

fn bench_amortization(c: &mut Criterion) {
    let mut group = c.benchmark_group("amortization");
    let principal = Decimal::new(500_000, 2);
    let rate = Decimal::new(119, 1);

    for term in [5u32, 10, 15] {
        group.bench_with_input(BenchmarkId::new("monthly_payment", term), &term, |b, &term| {
            b.iter(|| monthly_payment(black_box(principal), black_box(rate), black_box(term)))
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let cached = QuotePricer::default();
    let uncached = QuotePricer::new(PricingConfig {
        payment_cache_capacity: 0,
        ..PricingConfig::default()
    });

    // (consumption kWh, size kW) landing in bands A, B and C
    let inputs = [
        ("band_a", Decimal::from(450), Decimal::from(5)),
        ("band_b", Decimal::from(300), Decimal::from(9)),
        ("band_c", Decimal::from(120), Decimal::from(4)),
    ];

    for (name, consumption, size) in inputs {
        group.bench_function(BenchmarkId::new("cached", name), |b| {
            b.iter(|| cached.price(black_box(size), black_box(consumption), Decimal::ZERO))
        });
        group.bench_function(BenchmarkId::new("uncached", name), |b| {
            b.iter(|| uncached.price(black_box(size), black_box(consumption), Decimal::ZERO))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_amortization, bench_pipeline);
criterion_main!(benches);
