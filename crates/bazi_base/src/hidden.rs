//! Hidden stems (藏干) of the twelve branches.
//!
//! Each branch carries one to three stems ordered main → middle → residual qi
//! with strictly decreasing dominance: single 1.0, pair 0.7/0.3, triple
//! 0.6/0.3/0.1.

use serde::{Serialize, Serializer};

use crate::ganzhi::{Branch, Stem};

/// Which layer of a branch's qi a hidden stem represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qi {
    /// 本气
    Main,
    /// 中气
    Middle,
    /// 余气
    Residual,
}

impl Qi {
    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "本气",
            Self::Middle => "中气",
            Self::Residual => "余气",
        }
    }
}

impl Serialize for Qi {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// One hidden stem with its relative dominance within the branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiddenStem {
    pub stem: Stem,
    pub dominance: f64,
    pub qi: Qi,
}

const fn one(a: Stem) -> [HiddenStem; 1] {
    [HiddenStem { stem: a, dominance: 1.0, qi: Qi::Main }]
}

const fn two(a: Stem, b: Stem) -> [HiddenStem; 2] {
    [
        HiddenStem { stem: a, dominance: 0.7, qi: Qi::Main },
        HiddenStem { stem: b, dominance: 0.3, qi: Qi::Middle },
    ]
}

const fn three(a: Stem, b: Stem, c: Stem) -> [HiddenStem; 3] {
    [
        HiddenStem { stem: a, dominance: 0.6, qi: Qi::Main },
        HiddenStem { stem: b, dominance: 0.3, qi: Qi::Middle },
        HiddenStem { stem: c, dominance: 0.1, qi: Qi::Residual },
    ]
}

static ZI: [HiddenStem; 1] = one(Stem::Gui);
static CHOU: [HiddenStem; 3] = three(Stem::Ji, Stem::Gui, Stem::Xin);
static YIN: [HiddenStem; 3] = three(Stem::Jia, Stem::Bing, Stem::Wu);
static MAO: [HiddenStem; 1] = one(Stem::Yi);
static CHEN: [HiddenStem; 3] = three(Stem::Wu, Stem::Yi, Stem::Gui);
static SI: [HiddenStem; 3] = three(Stem::Bing, Stem::Wu, Stem::Geng);
static WU: [HiddenStem; 2] = two(Stem::Ding, Stem::Ji);
static WEI: [HiddenStem; 3] = three(Stem::Ji, Stem::Ding, Stem::Yi);
static SHEN: [HiddenStem; 3] = three(Stem::Geng, Stem::Ren, Stem::Wu);
static YOU: [HiddenStem; 1] = one(Stem::Xin);
static XU: [HiddenStem; 3] = three(Stem::Wu, Stem::Xin, Stem::Ding);
static HAI: [HiddenStem; 2] = two(Stem::Ren, Stem::Jia);

/// Hidden stems of `branch`, main qi first.
pub fn hidden_stems(branch: Branch) -> &'static [HiddenStem] {
    match branch {
        Branch::Zi => &ZI,
        Branch::Chou => &CHOU,
        Branch::Yin => &YIN,
        Branch::Mao => &MAO,
        Branch::Chen => &CHEN,
        Branch::Si => &SI,
        Branch::Wu => &WU,
        Branch::Wei => &WEI,
        Branch::Shen => &SHEN,
        Branch::You => &YOU,
        Branch::Xu => &XU,
        Branch::Hai => &HAI,
    }
}

/// Main-qi stem of `branch`.
pub fn main_qi(branch: Branch) -> Stem {
    hidden_stems(branch)[0].stem
}
