//! Favourable and unfavourable elements (喜用 / 忌).
//!
//! Each of the five relations to the day master gets an arrow per strength
//! band. The 从 bands follow their camp: 从强 likes support like 身弱 does,
//! 从弱 likes outflow like 身强 does.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::element::{ALL_RELATIONS, Element, ElementRelation};
use crate::pillars::FourPillars;
use crate::relations::{di_wang_branch, lu_branch};
use crate::strength::{DayMasterStrength, StrengthBand};
use crate::structure::StructurePattern;
use crate::ten_god::Bucket;
use crate::wuxing::ElementDistribution;

/// 克我 share at or above which the chart is kill-heavy.
const KILL_HEAVY_PCT: f64 = 30.0;
/// 生我 share at or above which 印 props the chart up.
const PRODUCER_STRONG_PCT: f64 = 22.0;
/// 同我 + 生我 share at or below which the self side is weak.
const SELF_SIDE_MAX_PCT: f64 = 65.0;
/// Elements above this share sort last.
const EXCESS_PCT: f64 = 35.0;

/// Preference of one relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrow {
    Up,
    Down,
    None,
}

impl Arrow {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::None => "none",
        }
    }
}

impl Serialize for Arrow {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Arrow of `rel` under `band`.
pub const fn arrow(band: StrengthBand, rel: ElementRelation) -> Arrow {
    use ElementRelation::*;
    match band {
        StrengthBand::ShenQiang | StrengthBand::CongRuo => match rel {
            Generates | Overcomes | OvercomeBy => Arrow::Up,
            GeneratedBy | Same => Arrow::Down,
        },
        StrengthBand::ShenRuo | StrengthBand::CongQiang => match rel {
            Generates | Overcomes | OvercomeBy => Arrow::Down,
            GeneratedBy | Same => Arrow::Up,
        },
        StrengthBand::PingHeng => match rel {
            Generates | Overcomes => Arrow::Up,
            OvercomeBy => Arrow::Down,
            GeneratedBy | Same => Arrow::None,
        },
    }
}

/// Favourable / unfavourable element profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YongshenProfile {
    /// Favourable elements, scarcest first.
    pub like: Vec<Element>,
    /// Unfavourable elements, scarcest first.
    pub dislike: Vec<Element>,
    /// Band the arrows were read from.
    pub effective_band: StrengthBand,
    /// The kill-heavy adjustment moved the band.
    pub adjusted: bool,
    pub arrows: BTreeMap<ElementRelation, Arrow>,
    /// Ten-god buckets of the favourable relations.
    pub favourable_buckets: Vec<Bucket>,
    pub summary: String,
}

impl YongshenProfile {
    pub fn likes(&self, e: Element) -> bool {
        self.like.contains(&e)
    }

    pub fn dislikes(&self, e: Element) -> bool {
        self.dislike.contains(&e)
    }
}

/// The day master stands on its 临官/帝旺 branch or an own-element branch.
fn has_strong_root(pillars: &FourPillars) -> bool {
    let dm = pillars.day_master();
    let strong = [lu_branch(dm), di_wang_branch(dm)];
    pillars
        .branches()
        .iter()
        .any(|b| strong.contains(b) || b.element() == dm.element())
}

/// Heavy 克我 propped up only by 印.
pub fn is_kill_heavy_weak(pillars: &FourPillars, dist: &ElementDistribution) -> bool {
    let dm = pillars.day_master().element();
    let controller = dist.relation_percent(dm, ElementRelation::OvercomeBy);
    let producer = dist.relation_percent(dm, ElementRelation::GeneratedBy);
    let own = dist.relation_percent(dm, ElementRelation::Same);
    controller >= KILL_HEAVY_PCT
        && producer >= PRODUCER_STRONG_PCT
        && !has_strong_root(pillars)
        && own + producer <= SELF_SIDE_MAX_PCT
}

/// Scarcest first; elements above 35 % go last.
fn sort_by_scarcity(elements: &mut [Element], dist: &ElementDistribution) {
    elements.sort_by(|a, b| {
        let pa = dist.percent_of(*a);
        let pb = dist.percent_of(*b);
        (pa > EXCESS_PCT)
            .cmp(&(pb > EXCESS_PCT))
            .then(pa.total_cmp(&pb))
    });
}

fn hint(band: StrengthBand) -> &'static str {
    match band {
        StrengthBand::CongQiang => "从强格：用印、比劫",
        StrengthBand::CongRuo => "从弱格：用财、官、食伤",
        StrengthBand::ShenQiang => "用食伤、财、官",
        StrengthBand::ShenRuo => "用印、比劫",
        StrengthBand::PingHeng => "平衡为贵，可顺势而为",
    }
}

fn join(elements: &[Element]) -> String {
    elements.iter().map(|e| e.name()).collect::<Vec<_>>().join("、")
}

/// Derive the favourable profile from strength, distribution and structure.
///
/// A balanced chart that is kill-heavy and propped up only by 印 reads as
/// 身弱; every other band is taken as scored.
pub fn determine_yongshen(
    pillars: &FourPillars,
    strength: &DayMasterStrength,
    dist: &ElementDistribution,
    structure: &StructurePattern,
) -> YongshenProfile {
    let dm = pillars.day_master().element();
    let adjusted = strength.band == StrengthBand::PingHeng && is_kill_heavy_weak(pillars, dist);
    let effective_band = if adjusted { StrengthBand::ShenRuo } else { strength.band };

    let arrows: BTreeMap<ElementRelation, Arrow> = ALL_RELATIONS
        .iter()
        .map(|r| (*r, arrow(effective_band, *r)))
        .collect();

    let protected = if effective_band == StrengthBand::PingHeng {
        structure.element(pillars)
    } else {
        None
    };

    let mut like = Vec::new();
    let mut dislike = Vec::new();
    let mut favourable_buckets = Vec::new();
    for rel in ALL_RELATIONS {
        let e = rel.element_for(dm);
        match arrows[&rel] {
            Arrow::Up => {
                like.push(e);
                favourable_buckets.push(Bucket::of_relation(rel));
            }
            Arrow::Down if Some(e) != protected => dislike.push(e),
            Arrow::Down | Arrow::None => {}
        }
    }
    sort_by_scarcity(&mut like, dist);
    sort_by_scarcity(&mut dislike, dist);

    let summary = format!(
        "{}：喜{}，忌{}。{}",
        effective_band.name(),
        if like.is_empty() { "无".to_string() } else { join(&like) },
        if dislike.is_empty() { "无".to_string() } else { join(&dislike) },
        hint(effective_band),
    );
    tracing::debug!(band = effective_band.name(), adjusted, %summary, "yongshen");

    YongshenProfile {
        like,
        dislike,
        effective_band,
        adjusted,
        arrows,
        favourable_buckets,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::day_master_strength;
    use crate::structure::determine_structure;
    use crate::ten_god::TenGodProfile;
    use bazi_config::StrengthConfig;

    fn pillars(names: [&str; 4]) -> FourPillars {
        FourPillars {
            year: names[0].parse().unwrap(),
            month: names[1].parse().unwrap(),
            day: names[2].parse().unwrap(),
            hour: names[3].parse().unwrap(),
        }
    }

    fn profile(names: [&str; 4]) -> (DayMasterStrength, YongshenProfile) {
        let p = pillars(names);
        let tg = TenGodProfile::compute(&p);
        let s = day_master_strength(&p, &tg, &StrengthConfig::default());
        let d = ElementDistribution::compute(&p);
        let st = determine_structure(&p, &tg);
        let y = determine_yongshen(&p, &s, &d, &st);
        (s, y)
    }

    #[test]
    fn tail_bands_follow_their_camp() {
        use ElementRelation::*;
        for rel in ALL_RELATIONS {
            assert_eq!(
                arrow(StrengthBand::CongQiang, rel),
                arrow(StrengthBand::ShenRuo, rel)
            );
            assert_eq!(
                arrow(StrengthBand::CongRuo, rel),
                arrow(StrengthBand::ShenQiang, rel)
            );
            if rel != Same && rel != GeneratedBy {
                assert_ne!(
                    arrow(StrengthBand::CongQiang, rel),
                    arrow(StrengthBand::ShenQiang, rel)
                );
            }
        }
        assert_eq!(arrow(StrengthBand::PingHeng, Same), Arrow::None);
        assert_eq!(arrow(StrengthBand::PingHeng, OvercomeBy), Arrow::Down);
    }

    #[test]
    fn strong_wood_likes_outflow() {
        let (s, y) = profile(["甲寅", "丙寅", "甲寅", "乙卯"]);
        assert!(s.band >= StrengthBand::ShenQiang);
        if s.band == StrengthBand::ShenQiang {
            assert!(y.likes(Element::Fire));
            assert!(y.likes(Element::Earth));
            assert!(y.likes(Element::Metal));
            assert!(y.dislikes(Element::Wood));
            assert!(y.dislikes(Element::Water));
        } else {
            assert!(y.likes(Element::Wood));
            assert!(y.dislikes(Element::Metal));
        }
        assert!(y.summary.starts_with(s.band.name()));
    }

    #[test]
    fn lists_are_disjoint_and_scarcity_sorted() {
        let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
        let d = ElementDistribution::compute(&p);
        let (_, y) = profile(["乙巳", "壬午", "庚申", "庚辰"]);
        assert!(y.like.iter().all(|e| !y.dislike.contains(e)));
        for list in [&y.like, &y.dislike] {
            for pair in list.windows(2) {
                let (a, b) = (d.percent_of(pair[0]), d.percent_of(pair[1]));
                assert!(a <= b || a <= EXCESS_PCT && b > EXCESS_PCT);
            }
        }
    }

    #[test]
    fn scarcity_puts_excess_last() {
        let p = pillars(["甲寅", "丙寅", "甲寅", "乙卯"]);
        let d = ElementDistribution::compute(&p);
        let mut v = vec![Element::Wood, Element::Metal, Element::Fire];
        sort_by_scarcity(&mut v, &d);
        assert_eq!(v.last(), Some(&Element::Wood));
    }

    #[test]
    fn kill_heavy_adjustment_only_moves_balanced_charts() {
        // 甲 among metal and water: 47 % 克我, 41 % 生我, no wood branch
        let p = pillars(["壬申", "庚子", "甲申", "癸酉"]);
        let tg = TenGodProfile::compute(&p);
        let d = ElementDistribution::compute(&p);
        let st = determine_structure(&p, &tg);
        assert!(is_kill_heavy_weak(&p, &d));

        let mut s = day_master_strength(&p, &tg, &StrengthConfig::default());
        s.band = StrengthBand::PingHeng;
        let y = determine_yongshen(&p, &s, &d, &st);
        assert!(y.adjusted);
        assert_eq!(y.effective_band, StrengthBand::ShenRuo);

        for band in [StrengthBand::ShenQiang, StrengthBand::ShenRuo, StrengthBand::CongRuo] {
            s.band = band;
            let y = determine_yongshen(&p, &s, &d, &st);
            assert!(!y.adjusted, "{}", band.name());
            assert_eq!(y.effective_band, band);
        }
    }

    #[test]
    fn balanced_chart_never_dislikes_its_structure() {
        let p = pillars(["乙巳", "壬午", "庚申", "庚辰"]);
        let tg = TenGodProfile::compute(&p);
        let d = ElementDistribution::compute(&p);
        let st = determine_structure(&p, &tg);
        let mut s = day_master_strength(&p, &tg, &StrengthConfig::default());
        s.band = StrengthBand::PingHeng;
        let y = determine_yongshen(&p, &s, &d, &st);
        if !y.adjusted {
            if let Some(e) = st.element(&p) {
                assert!(!y.dislikes(e));
            }
        }
    }
}
