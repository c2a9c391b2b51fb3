use bazi_base::{
    BirthInfo, ChartQuery, ScenarioKind, Sex, TenGodProfile, compute_chart, detect_static,
    day_master_strength, query, resolve_pillars,
};
use bazi_config::EngineConfig;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn birth() -> Option<BirthInfo> {
    BirthInfo::builder()
        .sex(Sex::Female)
        .solar_date(2025, 6, 20)
        .time(8, 0)
        .build()
        .ok()
}

fn pillars_bench(c: &mut Criterion) {
    let Some(birth) = birth() else { return };
    let Ok((pillars, _)) = resolve_pillars(&birth) else { return };
    let cfg = EngineConfig::default();

    let mut group = c.benchmark_group("pillars");
    group.bench_function("resolve", |b| b.iter(|| resolve_pillars(black_box(&birth))));
    group.bench_function("ten_god_profile", |b| {
        b.iter(|| TenGodProfile::compute(black_box(&pillars)))
    });
    group.bench_function("strength", |b| {
        let profile = TenGodProfile::compute(&pillars);
        b.iter(|| day_master_strength(black_box(&pillars), &profile, &cfg.strength))
    });
    group.bench_function("shensha_static", |b| b.iter(|| detect_static(black_box(&pillars))));
    group.finish();
}

fn chart_bench(c: &mut Criterion) {
    let Some(birth) = birth() else { return };
    let cfg = EngineConfig::default();
    let Ok(chart) = compute_chart(&birth, &cfg) else { return };
    let q = ChartQuery::for_year(2026)
        .scenario(ScenarioKind::Marriage)
        .scenario(ScenarioKind::Career)
        .flow_months(true);

    let mut group = c.benchmark_group("chart");
    group.bench_function("compute_chart", |b| {
        b.iter(|| compute_chart(black_box(&birth), &cfg))
    });
    group.bench_function("query_with_windows", |b| {
        b.iter(|| query(black_box(&chart), &q, &cfg))
    });
    group.finish();
}

criterion_group!(benches, pillars_bench, chart_bench);
criterion_main!(benches);
