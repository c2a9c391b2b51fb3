//! The 24 solar terms (节气) and their instants.
//!
//! Term k sits at apparent solar longitude 15k°, k = 0 being 春分 (the March
//! equinox). The twelve odd-numbered terms are the "jie" that open the
//! months of the stem-branch calendar; 立春 (315°) opens the year.
//!
//! Instants are found by refining a mean-motion guess, bracketing it, and
//! bisecting the wrapped longitude difference. With the low-precision solar
//! theory the instants agree with published tables to within ~10 minutes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::julian::date_to_jd;
use crate::sun::{MEAN_SOLAR_MOTION_DEG_PER_DAY, apparent_longitude_deg};

/// Half width of the bisection bracket in days.
const BRACKET_HALF_WIDTH_DAYS: f64 = 2.0;

/// Mean-motion refinement steps applied to the initial guess.
const REFINE_STEPS: u32 = 3;

/// Maximum bisection iterations.
const MAX_ITERATIONS: u32 = 60;

/// Convergence threshold in days (~0.1 s).
const CONVERGENCE_DAYS: f64 = 1e-6;

/// Days per tropical year.
const TROPICAL_YEAR_DAYS: f64 = 365.242_19;

/// The 24 solar terms, ordered by longitude from 春分 (0°).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum SolarTerm {
    ChunFen,
    QingMing,
    GuYu,
    LiXia,
    XiaoMan,
    MangZhong,
    XiaZhi,
    XiaoShu,
    DaShu,
    LiQiu,
    ChuShu,
    BaiLu,
    QiuFen,
    HanLu,
    ShuangJiang,
    LiDong,
    XiaoXue,
    DaXue,
    DongZhi,
    XiaoHan,
    DaHan,
    LiChun,
    YuShui,
    JingZhe,
}

/// All 24 terms in longitude order (index 0 = 春分).
pub const ALL_SOLAR_TERMS: [SolarTerm; 24] = [
    SolarTerm::ChunFen,
    SolarTerm::QingMing,
    SolarTerm::GuYu,
    SolarTerm::LiXia,
    SolarTerm::XiaoMan,
    SolarTerm::MangZhong,
    SolarTerm::XiaZhi,
    SolarTerm::XiaoShu,
    SolarTerm::DaShu,
    SolarTerm::LiQiu,
    SolarTerm::ChuShu,
    SolarTerm::BaiLu,
    SolarTerm::QiuFen,
    SolarTerm::HanLu,
    SolarTerm::ShuangJiang,
    SolarTerm::LiDong,
    SolarTerm::XiaoXue,
    SolarTerm::DaXue,
    SolarTerm::DongZhi,
    SolarTerm::XiaoHan,
    SolarTerm::DaHan,
    SolarTerm::LiChun,
    SolarTerm::YuShui,
    SolarTerm::JingZhe,
];

const SOLAR_TERM_NAMES: [&str; 24] = [
    "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑", "立秋", "处暑", "白露",
    "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒", "立春", "雨水", "惊蛰",
];

impl SolarTerm {
    /// 0-based index in longitude order (春分=0 .. 惊蛰=23).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Term at a 0-based longitude index, wrapping modulo 24.
    pub const fn from_index(index: u8) -> Self {
        ALL_SOLAR_TERMS[(index % 24) as usize]
    }

    /// Chinese name.
    pub fn name(self) -> &'static str {
        SOLAR_TERM_NAMES[self.index() as usize]
    }

    /// Apparent solar longitude of the term in degrees.
    pub fn longitude_deg(self) -> f64 {
        f64::from(self.index()) * 15.0
    }

    /// Whether the term opens a stem-branch month (节, as opposed to 中气).
    pub const fn is_jie(self) -> bool {
        self.index() % 2 == 1
    }

    /// Branch index (子=0 .. 亥=11) of the month a jie opens; for a 中气 the
    /// month it falls in.
    pub const fn month_branch_index(self) -> u8 {
        let from_lichun = (self.index() + 24 - 21) % 24;
        (from_lichun / 2 + 2) % 12
    }
}

/// A solar term together with its UT instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermInstant {
    pub term: SolarTerm,
    pub jd_ut: f64,
}

/// Longitude difference wrapped to (-180, 180].
fn wrapped_diff(jd: f64, target_deg: f64) -> f64 {
    let d = (apparent_longitude_deg(jd) - target_deg).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Solve for the instant the Sun reaches `target_deg`, starting near `guess_jd`.
pub fn solve_longitude(guess_jd: f64, target_deg: f64) -> Result<f64, CalendarError> {
    // Mean-motion refinement brings the guess within hours of the root.
    let mut guess = guess_jd;
    for _ in 0..REFINE_STEPS {
        guess -= wrapped_diff(guess, target_deg) / MEAN_SOLAR_MOTION_DEG_PER_DAY;
    }

    let mut t_a = guess - BRACKET_HALF_WIDTH_DAYS;
    let mut t_b = guess + BRACKET_HALF_WIDTH_DAYS;
    let mut f_a = wrapped_diff(t_a, target_deg);
    if f_a * wrapped_diff(t_b, target_deg) > 0.0 {
        return Err(CalendarError::NoConvergence("solar term not bracketed"));
    }

    for _ in 0..MAX_ITERATIONS {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = wrapped_diff(t_mid, target_deg);
        if f_a * f_mid <= 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
        if (t_b - t_a).abs() < CONVERGENCE_DAYS {
            break;
        }
    }
    let jd = 0.5 * (t_a + t_b);
    tracing::trace!(target_deg, jd, "solar longitude solved");
    Ok(jd)
}

/// Instant of `term` within Gregorian `year` (UT).
pub fn term_in_year(year: i32, term: SolarTerm) -> Result<TermInstant, CalendarError> {
    let equinox = NaiveDate::from_ymd_opt(year, 3, 20)
        .ok_or_else(|| CalendarError::InvalidDate(format!("year {year}")))?;
    // Terms from 小寒 onwards fall in January-March of the same civil year.
    let mut offset = f64::from(term.index()) * TROPICAL_YEAR_DAYS / 24.0;
    if term.index() >= SolarTerm::XiaoHan.index() {
        offset -= TROPICAL_YEAR_DAYS;
    }
    let guess = date_to_jd(equinox) + 0.5 + offset;
    let jd_ut = solve_longitude(guess, term.longitude_deg())?;
    Ok(TermInstant { term, jd_ut })
}

/// 立春 of Gregorian `year`.
pub fn lichun(year: i32) -> Result<TermInstant, CalendarError> {
    term_in_year(year, SolarTerm::LiChun)
}

fn term_near(jd_ut: f64, index: i32) -> Result<TermInstant, CalendarError> {
    let term = SolarTerm::from_index(index.rem_euclid(24) as u8);
    let lon = apparent_longitude_deg(jd_ut);
    let mut delta = term.longitude_deg() - lon;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    let guess = jd_ut + delta / MEAN_SOLAR_MOTION_DEG_PER_DAY;
    Ok(TermInstant {
        term,
        jd_ut: solve_longitude(guess, term.longitude_deg())?,
    })
}

fn current_term_index(jd_ut: f64) -> i32 {
    (apparent_longitude_deg(jd_ut) / 15.0).floor() as i32
}

/// Most recent term at or before `jd_ut`.
pub fn prev_term(jd_ut: f64) -> Result<TermInstant, CalendarError> {
    let k = current_term_index(jd_ut);
    let found = term_near(jd_ut, k)?;
    // Guard against the solver landing a hair after jd_ut at a boundary.
    if found.jd_ut > jd_ut {
        return term_near(jd_ut - 1.0, k - 1);
    }
    Ok(found)
}

/// First term strictly after `jd_ut`.
pub fn next_term(jd_ut: f64) -> Result<TermInstant, CalendarError> {
    let k = current_term_index(jd_ut);
    let found = term_near(jd_ut, k + 1)?;
    if found.jd_ut <= jd_ut {
        return term_near(jd_ut + 1.0, k + 2);
    }
    Ok(found)
}

/// Most recent jie at or before `jd_ut`; it fixes the month branch.
pub fn prev_jie(jd_ut: f64) -> Result<TermInstant, CalendarError> {
    let term = prev_term(jd_ut)?;
    if term.term.is_jie() {
        Ok(term)
    } else {
        prev_term(term.jd_ut - 1.0)
    }
}

/// First jie strictly after `jd_ut`.
pub fn next_jie(jd_ut: f64) -> Result<TermInstant, CalendarError> {
    let term = next_term(jd_ut)?;
    if term.term.is_jie() {
        Ok(term)
    } else {
        next_term(term.jd_ut + 1.0)
    }
}

/// All 24 terms whose instants fall in Gregorian `year`, in date order.
pub fn terms_of_year(year: i32) -> Result<Vec<TermInstant>, CalendarError> {
    let order = (19..24).chain(0..19);
    order
        .map(|i| term_in_year(year, SolarTerm::from_index(i)))
        .collect()
}
