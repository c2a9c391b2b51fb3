use bazi_time::{
    SolarTerm, apparent_longitude_deg, equation_of_time_minutes, lunar_to_solar, prev_jie,
    solar_to_lunar, term_in_year, LunarDate,
};
use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sun_bench(c: &mut Criterion) {
    let jd = 2_460_846.5;

    let mut group = c.benchmark_group("sun");
    group.bench_function("apparent_longitude", |b| {
        b.iter(|| apparent_longitude_deg(black_box(jd)))
    });
    group.bench_function("equation_of_time", |b| {
        b.iter(|| equation_of_time_minutes(black_box(jd)))
    });
    group.finish();
}

fn solar_term_bench(c: &mut Criterion) {
    let jd = 2_460_846.5;

    let mut group = c.benchmark_group("solar_term");
    group.bench_function("term_in_year_lichun", |b| {
        b.iter(|| term_in_year(black_box(2025), SolarTerm::LiChun))
    });
    group.bench_function("prev_jie", |b| b.iter(|| prev_jie(black_box(jd))));
    group.finish();
}

fn lunar_bench(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2080, 9, 17).unwrap_or_default();
    let lunar = LunarDate {
        year: 2080,
        month: 8,
        day: 15,
        is_leap: false,
    };

    let mut group = c.benchmark_group("lunar");
    group.bench_function("solar_to_lunar", |b| b.iter(|| solar_to_lunar(black_box(date))));
    group.bench_function("lunar_to_solar", |b| b.iter(|| lunar_to_solar(black_box(&lunar))));
    group.finish();
}

criterion_group!(benches, sun_bench, solar_term_bench, lunar_bench);
criterion_main!(benches);
