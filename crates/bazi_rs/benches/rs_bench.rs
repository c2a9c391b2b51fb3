use bazi_rs::{BirthInfo, ChartEngine, ChartQuery, EngineConfig, ScenarioKind, Sex};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn engine_bench(c: &mut Criterion) {
    let Ok(birth) = BirthInfo::builder()
        .sex(Sex::Male)
        .solar_date(1990, 3, 15)
        .time(10, 30)
        .build()
    else {
        return;
    };
    let Ok(engine) = ChartEngine::new(EngineConfig::default()) else {
        return;
    };
    let q = ChartQuery::for_year(2026).scenario(ScenarioKind::Career);

    let mut group = c.benchmark_group("engine");
    group.bench_function("chart_cold", |b| {
        b.iter(|| {
            engine.clear_cache();
            engine.chart(black_box(&birth))
        })
    });
    group.bench_function("chart_cached", |b| {
        b.iter(|| engine.chart(black_box(&birth)))
    });
    group.bench_function("query_cached", |b| {
        b.iter(|| engine.query(black_box(&birth), &q))
    });
    group.finish();
}

criterion_group!(benches, engine_bench);
criterion_main!(benches);
