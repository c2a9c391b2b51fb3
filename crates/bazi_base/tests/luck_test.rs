//! Luck timeline, views and queries through a computed chart.

use bazi_base::{
    BirthInfo, ChartError, ChartQuery, Direction, ReferenceYear, ScenarioKind, Sex, WindowLevel,
    compute_chart, query,
};
use bazi_config::EngineConfig;

fn male_1990() -> bazi_base::Chart {
    let birth = BirthInfo::builder()
        .sex(Sex::Male)
        .solar_date(1990, 3, 15)
        .time(10, 30)
        .build()
        .unwrap();
    compute_chart(&birth, &EngineConfig::default()).unwrap()
}

#[test]
fn yang_year_male_runs_forward_from_the_month() {
    let chart = male_1990();
    assert_eq!(chart.pillars.year.name(), "庚午");
    assert_eq!(chart.pillars.month.name(), "己卯");

    let luck = &chart.luck;
    assert_eq!(luck.start.direction, Direction::Forward);
    // 清明 falls about 21 days after birth
    assert_eq!(luck.start.years, 7);
    assert!(!luck.start.on_jie);
    assert_eq!(luck.cycles[0].ganzhi.name(), "庚辰");
    assert_eq!(luck.cycles[1].ganzhi.name(), "辛巳");
    assert_eq!(luck.cycles[0].start_age, 7);
    assert_eq!(luck.cycles[0].start_year, 1997);
}

#[test]
fn timeline_is_contiguous() {
    let chart = male_1990();
    for w in chart.luck.cycles.windows(2) {
        assert_eq!(w[0].end_age, w[1].start_age);
        assert_eq!(w[0].end_year, w[1].start_year);
        assert_eq!(w[1].index, w[0].index + 1);
    }
    assert_eq!(chart.luck.cycle_at_age(36).unwrap().ganzhi.name(), "壬午");
    assert!(chart.luck.cycle_at_age(3).is_none());
}

#[test]
fn query_marks_the_current_cycle() {
    let chart = male_1990();
    let cfg = EngineConfig::default();
    let res = query(&chart, &ChartQuery::for_year(2026), &cfg).unwrap();

    assert_eq!(res.current_age, Some(36));
    let current = res.current_cycle.as_ref().unwrap();
    assert_eq!(current.stem_branch, "壬午");
    assert_eq!(current.id, format!("壬午-{}", current.start_age));
    assert_eq!(res.luck_views.iter().filter(|v| v.is_current).count(), 1);

    let flow = res.flow_year.as_ref().unwrap();
    assert_eq!(flow.ganzhi.name(), "丙午");
    assert!(res.flow_months.is_empty());
    assert!(res.windows.is_empty());
}

#[test]
fn explicit_age_overrides_the_reference() {
    let chart = male_1990();
    let res = query(&chart, &ChartQuery::for_year(2026).age(20), &EngineConfig::default()).unwrap();
    assert_eq!(res.current_age, Some(20));
    assert_eq!(res.current_cycle.unwrap().stem_branch, "辛巳");
}

#[test]
fn windows_cover_the_default_range() {
    let chart = male_1990();
    let q = ChartQuery::for_year(2026)
        .scenario(ScenarioKind::Career)
        .scenario(ScenarioKind::Marriage)
        .flow_months(true);
    let cfg = EngineConfig::default();
    let res = query(&chart, &q, &cfg).unwrap();

    assert_eq!(res.flow_months.len(), 12);
    let career = &res.windows[&ScenarioKind::Career];
    let years: Vec<i32> = career.iter().map(|w| w.year).collect();
    assert_eq!(years, (2025..=2031).collect::<Vec<_>>());
    for w in career {
        assert!(w.score.abs() <= cfg.window.clamp);
        assert_eq!(w.level, WindowLevel::from_score(w.score, &cfg.window));
        assert!(!w.reason.summary.is_empty());
    }
    assert_eq!(res.windows[&ScenarioKind::Marriage].len(), 7);
}

#[test]
fn branch_reference_has_no_windows() {
    let chart = male_1990();
    let branch_only = ChartQuery::new(ReferenceYear::Branch(bazi_base::Branch::Wu));

    let res = query(&chart, &branch_only, &EngineConfig::default()).unwrap();
    assert!(res.current_age.is_none());
    assert!(res.luck_views.is_empty());
    assert!(res.flow_year.is_none());

    let with_scenario = branch_only.scenario(ScenarioKind::Exam);
    assert!(matches!(
        query(&chart, &with_scenario, &EngineConfig::default()),
        Err(ChartError::UnknownReferenceYear(_))
    ));
}

#[test]
fn explicit_window_years_work_without_a_calendar_year() {
    let chart = male_1990();
    let q = ChartQuery::new(ReferenceYear::Branch(bazi_base::Branch::Wu))
        .age(36)
        .scenario(ScenarioKind::Invest)
        .years(2030, 2028);
    let res = query(&chart, &q, &EngineConfig::default()).unwrap();
    let years: Vec<i32> = res.windows[&ScenarioKind::Invest].iter().map(|w| w.year).collect();
    assert_eq!(years, vec![2028, 2029, 2030]);
}
