//! End-to-end chart computation against hand-checked values.

use bazi_base::{
    BirthInfo, ChartError, Climate, Element, LifeStage, Position, Season, ShenshaCode, Sex,
    StrengthBand, compute_chart,
};
use bazi_config::EngineConfig;

fn birth(sex: Sex, y: i32, m: u8, d: u8, h: u8, min: u8) -> BirthInfo {
    BirthInfo::builder()
        .sex(sex)
        .solar_date(y, m, d)
        .time(h, min)
        .build()
        .unwrap()
}

#[test]
fn female_2025_06_20_0800() {
    let chart = compute_chart(&birth(Sex::Female, 2025, 6, 20, 8, 0), &EngineConfig::default())
        .unwrap();
    let p = &chart.pillars;
    assert_eq!(p.year.name(), "乙巳");
    assert_eq!(p.month.name(), "壬午");
    assert_eq!(p.day.name(), "庚申");
    assert_eq!(p.hour.name(), "庚辰");
    assert_eq!(chart.day_master.name(), "庚");

    // 五月廿五
    assert_eq!((chart.lunar.month, chart.lunar.day), (5, 25));
    assert!(!chart.lunar.is_leap);

    let total: f64 = chart.elements.percent.values().sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert!((0.0..=1.0).contains(&chart.strength.score));
    assert!(matches!(
        chart.strength.band,
        StrengthBand::CongRuo
            | StrengthBand::ShenRuo
            | StrengthBand::PingHeng
            | StrengthBand::ShenQiang
            | StrengthBand::CongQiang
    ));

    assert_eq!(chart.palaces.ming_gong.ganzhi.name(), "戊寅");
    assert_eq!(chart.palaces.tai_yuan.name(), "癸酉");
    assert_eq!(chart.details[1].nayin, "杨柳木");
    assert_eq!(chart.luck.cycles.len(), 8);
    assert_eq!(chart.luck.cycles[0].ganzhi.name(), "癸未");
}

#[test]
fn life_stages_and_climate_of_2025_06_20() {
    let chart = compute_chart(&birth(Sex::Female, 2025, 6, 20, 8, 0), &EngineConfig::default())
        .unwrap();
    // 乙巳 壬午 庚申 庚辰
    let xingyun: Vec<LifeStage> = chart.details.iter().map(|d| d.xingyun).collect();
    assert_eq!(
        xingyun,
        [LifeStage::ChangSheng, LifeStage::MuYu, LifeStage::LinGuan, LifeStage::Yang]
    );
    let zizuo: Vec<&str> = chart.details.iter().map(|d| d.zizuo.name()).collect();
    assert_eq!(zizuo, ["沐浴", "胎", "临官", "养"]);

    // 午 month: hot 5.7, dry 4.6, cold 3.1, wet 1.7
    let t = &chart.tiaohou;
    assert_eq!(t.season, Season::Summer);
    assert_eq!(t.climate.dominant, Climate::Hot);
    assert_eq!(t.climate.second, Some(Climate::Dry));
    assert_eq!(t.need, [Element::Water, Element::Metal, Element::Earth]);
    assert_eq!(t.avoid, [Element::Fire]);
    assert_eq!(t.label, "热重喜水");
}

#[test]
fn lunar_input_matches_solar() {
    let solar = compute_chart(&birth(Sex::Female, 2025, 6, 20, 8, 0), &EngineConfig::default())
        .unwrap();
    let lunar = BirthInfo::builder()
        .sex(Sex::Female)
        .lunar_date(2025, 5, 25, false)
        .time(8, 0)
        .build()
        .unwrap();
    let from_lunar = compute_chart(&lunar, &EngineConfig::default()).unwrap();
    assert_eq!(from_lunar.pillars, solar.pillars);
    assert_eq!(from_lunar.luck, solar.luck);
}

#[test]
fn static_output_is_idempotent() {
    let b = birth(Sex::Male, 1990, 3, 15, 10, 30);
    let a = compute_chart(&b, &EngineConfig::default()).unwrap();
    let c = compute_chart(&b, &EngineConfig::default()).unwrap();
    assert_eq!(a, c);
    let ja = serde_json::to_string(&a).unwrap();
    let jc = serde_json::to_string(&c).unwrap();
    assert_eq!(ja, jc);
    assert_eq!(a.pillars.day.name(), "己卯");
}

#[test]
fn late_zi_hour_rolls_the_day() {
    let before = compute_chart(&birth(Sex::Male, 2000, 1, 1, 22, 30), &EngineConfig::default())
        .unwrap();
    let late = compute_chart(&birth(Sex::Male, 2000, 1, 1, 23, 30), &EngineConfig::default())
        .unwrap();
    assert_eq!(before.pillars.day.name(), "戊午");
    assert_eq!(late.pillars.day.name(), "己未");
    // 己 day opens on 甲子
    assert_eq!(late.pillars.hour.name(), "甲子");
}

#[test]
fn chart_serializes_codes() {
    let chart = compute_chart(&birth(Sex::Female, 2025, 6, 20, 8, 0), &EngineConfig::default())
        .unwrap();
    let v = serde_json::to_value(&chart).unwrap();
    assert_eq!(v["pillars"]["day"], "庚申");
    assert!(v["shensha"].is_object());
    for (code, positions) in &chart.shensha {
        assert!(!positions.is_empty(), "{code} has no positions");
        assert!(v["shensha"][code.id()].is_array());
    }
    // 乙 year stem: 天乙 on 子/申, found on the 申 day branch
    assert!(chart.shensha[&ShenshaCode::TianYi].contains(&Position::Day));
    assert!(chart.details.iter().any(|d| d.position == Position::Day && d.stem_ten_god.is_none()));
}

#[test]
fn input_errors() {
    let cfg = EngineConfig::default();
    let feb30 = birth(Sex::Male, 2023, 2, 30, 8, 0);
    assert!(matches!(compute_chart(&feb30, &cfg), Err(ChartError::InvalidBirthDate(_))));

    let far = birth(Sex::Male, 2150, 6, 1, 8, 0);
    assert!(matches!(
        compute_chart(&far, &cfg),
        Err(ChartError::UnsupportedDateRange { .. })
    ));

    // 2024 has no leap month
    let leap = BirthInfo::builder()
        .sex(Sex::Female)
        .lunar_date(2024, 3, 1, true)
        .time(8, 0)
        .build()
        .unwrap();
    assert!(matches!(compute_chart(&leap, &cfg), Err(ChartError::InvalidBirthDate(_))));

    let missing = BirthInfo::builder().solar_date(2025, 1, 1).time(0, 0).build();
    assert_eq!(missing, Err(ChartError::MissingRequiredField("sex")));
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = EngineConfig::default();
    cfg.luck.span_years = 0;
    let err = compute_chart(&birth(Sex::Male, 1990, 3, 15, 10, 30), &cfg).unwrap_err();
    assert!(matches!(err, ChartError::Config(_)));
}
