//! Luck-cycle generation (大运).
//!
//! Direction: forward for a yang-year man or a yin-year woman, reverse
//! otherwise. The start age counts the days to the next jie (forward) or
//! from the previous jie (reverse): three days make one year, one day four
//! months, two hours ten days.

use bazi_config::LuckConfig;
use chrono::{Datelike, NaiveDateTime, TimeDelta};

use crate::birth::Sex;
use crate::element::{Element, Polarity};
use crate::error::ChartError;
use crate::ganzhi::GanZhi;
use crate::luck::types::{
    Direction, LuckCycle, LuckStart, LuckTimeline, NatalRelation, RawFavour,
};
use crate::pillars::{FourPillars, ResolvedMoment};
use crate::relations::{BranchRelation, relations_between};
use crate::ten_god::ten_god;
use crate::yongshen::YongshenProfile;

const DAYS_PER_LUCK_YEAR: f64 = 3.0;
const MONTHS_PER_DAY: f64 = 4.0;
/// Two clock hours stand for ten days.
const DAYS_PER_HOUR: f64 = 5.0;
const TROPICAL_YEAR_DAYS: f64 = 365.2425;
const SECONDS_PER_DAY: f64 = 86_400.0;

const STEM_FAVOUR: f64 = 1.0;
const BRANCH_FAVOUR: f64 = 0.5;
const CLASH_PENALTY_NEGATIVE: f64 = 0.5;
const CLASH_PENALTY_POSITIVE: f64 = 0.3;
const FAVOUR_CLAMP: f64 = 2.0;

/// Stepping direction for a sex and year stem.
pub const fn direction(sex: Sex, year: GanZhi) -> Direction {
    match (sex, year.stem.polarity()) {
        (Sex::Male, Polarity::Yang) | (Sex::Female, Polarity::Yin) => Direction::Forward,
        _ => Direction::Reverse,
    }
}

fn add_days(at: NaiveDateTime, days: f64) -> NaiveDateTime {
    let secs = (days * SECONDS_PER_DAY).round() as i64;
    at.checked_add_signed(TimeDelta::seconds(secs)).unwrap_or(at)
}

/// Compute the 起运 instant.
pub fn luck_start(moment: &ResolvedMoment, direction: Direction) -> LuckStart {
    let days = match direction {
        Direction::Forward => moment.next_jie.jd_ut - moment.jd_ut,
        Direction::Reverse => moment.jd_ut - moment.prev_jie.jd_ut,
    }
    .max(0.0);

    let years = (days / DAYS_PER_LUCK_YEAR).floor();
    let rest = days - years * DAYS_PER_LUCK_YEAR;
    let months = (rest * MONTHS_PER_DAY).floor();
    let rest = rest - months / MONTHS_PER_DAY;
    let extra_days = (rest * 24.0 * DAYS_PER_HOUR).floor();

    let instant = add_days(moment.local, days / DAYS_PER_LUCK_YEAR * TROPICAL_YEAR_DAYS);
    tracing::debug!(
        direction = direction.name(),
        days,
        years,
        months,
        %instant,
        "luck start"
    );
    LuckStart {
        direction,
        days,
        years: years as u32,
        months: months as u32,
        extra_days: extra_days as u32,
        on_jie: years == 0.0 && months == 0.0,
        instant,
    }
}

/// Favour of an element against the yongshen lists.
pub fn raw_favour(e: Element, yongshen: &YongshenProfile) -> RawFavour {
    if yongshen.likes(e) {
        RawFavour::Yong
    } else if yongshen.dislikes(e) {
        RawFavour::Ji
    } else {
        RawFavour::Neutral
    }
}

/// Relations of a period branch to every natal branch that has any.
pub fn natal_relations(gz: GanZhi, pillars: &FourPillars) -> Vec<NatalRelation> {
    pillars
        .iter()
        .filter_map(|(position, p)| {
            let relations = relations_between(gz.branch, p.branch);
            (!relations.is_empty()).then_some(NatalRelation {
                position,
                relations,
            })
        })
        .collect()
}

fn is_conflict(r: BranchRelation) -> bool {
    matches!(
        r,
        BranchRelation::Chong | BranchRelation::Xing | BranchRelation::ZiXing | BranchRelation::Hai
    )
}

/// Favour score in [−2, 2] of a period pillar.
pub fn favour_score(gz: GanZhi, yongshen: &YongshenProfile, natal: &[NatalRelation]) -> f64 {
    let mut score = STEM_FAVOUR * raw_favour(gz.stem.element(), yongshen).sign()
        + BRANCH_FAVOUR * raw_favour(gz.branch.element(), yongshen).sign();
    let conflicted = natal
        .iter()
        .any(|n| n.relations.iter().copied().any(is_conflict));
    if conflicted {
        if score < 0.0 {
            score -= CLASH_PENALTY_NEGATIVE;
        } else if score > 0.0 {
            score -= CLASH_PENALTY_POSITIVE;
        }
    }
    score.clamp(-FAVOUR_CLAMP, FAVOUR_CLAMP)
}

/// Generate the luck timeline.
pub fn luck_cycles(
    pillars: &FourPillars,
    moment: &ResolvedMoment,
    sex: Sex,
    yongshen: &YongshenProfile,
    cfg: &LuckConfig,
) -> Result<LuckTimeline, ChartError> {
    cfg.validate().map_err(ChartError::Config)?;
    let dir = direction(sex, pillars.year);
    let start = luck_start(moment, dir);
    let first = if start.on_jie { 0 } else { 1 };
    let span = u32::from(cfg.span_years);
    let dm = pillars.day_master();

    let cycles = (0..cfg.cycle_count)
        .map(|i| {
            let ganzhi = pillars.month.offset(dir.step() * (i32::from(i) + first));
            let start_age = start.years + span * u32::from(i);
            let begin = add_days(
                start.instant,
                f64::from(span * u32::from(i)) * TROPICAL_YEAR_DAYS,
            );
            let end = add_days(begin, f64::from(span) * TROPICAL_YEAR_DAYS);
            let natal = natal_relations(ganzhi, pillars);
            LuckCycle {
                index: i,
                ganzhi,
                ten_god: ten_god(dm, ganzhi.stem),
                start_age,
                end_age: start_age + span,
                start_year: begin.year(),
                end_year: end.year(),
                raw_favour: raw_favour(ganzhi.stem.element(), yongshen),
                favour_score: favour_score(ganzhi, yongshen, &natal),
                natal_relations: natal,
            }
        })
        .collect();

    Ok(LuckTimeline { start, cycles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birth::BirthInfo;
    use crate::pillars::resolve_pillars;
    use crate::strength::day_master_strength;
    use crate::structure::determine_structure;
    use crate::ten_god::TenGodProfile;
    use crate::wuxing::ElementDistribution;
    use crate::yongshen::determine_yongshen;
    use bazi_config::StrengthConfig;

    fn timeline(sex: Sex, y: i32, m: u8, d: u8, h: u8) -> (FourPillars, LuckTimeline) {
        let birth = BirthInfo::builder()
            .sex(sex)
            .solar_date(y, m, d)
            .time(h, 0)
            .build()
            .unwrap();
        let (p, moment) = resolve_pillars(&birth).unwrap();
        let tg = TenGodProfile::compute(&p);
        let s = day_master_strength(&p, &tg, &StrengthConfig::default());
        let dist = ElementDistribution::compute(&p);
        let st = determine_structure(&p, &tg);
        let ys = determine_yongshen(&p, &s, &dist, &st);
        let t = luck_cycles(&p, &moment, sex, &ys, &LuckConfig::default()).unwrap();
        (p, t)
    }

    #[test]
    fn direction_rule() {
        let jia_zi = GanZhi::from_index(0);
        let yi_chou = GanZhi::from_index(1);
        assert_eq!(direction(Sex::Male, jia_zi), Direction::Forward);
        assert_eq!(direction(Sex::Female, jia_zi), Direction::Reverse);
        assert_eq!(direction(Sex::Male, yi_chou), Direction::Reverse);
        assert_eq!(direction(Sex::Female, yi_chou), Direction::Forward);
    }

    #[test]
    fn female_yin_year_steps_forward_from_month() {
        // 乙巳 year, female: forward from 壬午
        let (p, t) = timeline(Sex::Female, 2025, 6, 20, 8);
        assert_eq!(t.start.direction, Direction::Forward);
        assert_eq!(t.cycles.len(), 8);
        assert_eq!(t.cycles[0].ganzhi, p.month.offset(1));
        assert_eq!(t.cycles[0].ganzhi.name(), "癸未");
        // next jie 小暑 2025-07-07, about 17 days away: 5 years
        assert_eq!(t.start.years, 5);
        assert_eq!(t.cycles[0].start_age, 5);
    }

    #[test]
    fn male_yin_year_steps_backward() {
        let (p, t) = timeline(Sex::Male, 2025, 6, 20, 8);
        assert_eq!(t.start.direction, Direction::Reverse);
        assert_eq!(t.cycles[0].ganzhi, p.month.offset(-1));
        // 芒种 2025-06-05 16:56 is about 14.6 days back
        assert_eq!(t.start.years, 4);
        assert_eq!(t.start.months, 10);
    }

    #[test]
    fn cycles_are_contiguous_and_increasing() {
        let (_, t) = timeline(Sex::Male, 1990, 3, 15, 10);
        for w in t.cycles.windows(2) {
            assert_eq!(w[0].end_age, w[1].start_age);
            assert_eq!(w[1].start_age - w[0].start_age, 10);
            assert!(w[0].start_year < w[1].start_year);
            assert_eq!(w[0].end_year, w[1].start_year);
        }
        for c in &t.cycles {
            assert!((-2.0..=2.0).contains(&c.favour_score));
            assert_eq!(c.end_age - c.start_age, 10);
        }
        assert_eq!(t.cycle_at_age(t.cycles[2].start_age), Some(&t.cycles[2]));
    }
}
