//! Twelve life stages (十二长生) of a stem on a branch.
//!
//! Yang stems walk the branches forward from 长生, yin stems backward; 临官
//! always lands on the stem's 禄 branch.

use serde::{Serialize, Serializer};

use crate::ganzhi::{Branch, Stem};
use crate::relations::lu_branch;

/// Stage index of 临官.
const LIN_GUAN_INDEX: i32 = 3;

/// One of the twelve life stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifeStage {
    ChangSheng,
    MuYu,
    GuanDai,
    LinGuan,
    DiWang,
    Shuai,
    Bing,
    Si,
    Mu,
    Jue,
    Tai,
    Yang,
}

pub const ALL_LIFE_STAGES: [LifeStage; 12] = [
    LifeStage::ChangSheng,
    LifeStage::MuYu,
    LifeStage::GuanDai,
    LifeStage::LinGuan,
    LifeStage::DiWang,
    LifeStage::Shuai,
    LifeStage::Bing,
    LifeStage::Si,
    LifeStage::Mu,
    LifeStage::Jue,
    LifeStage::Tai,
    LifeStage::Yang,
];

impl LifeStage {
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn from_index(index: u8) -> Self {
        ALL_LIFE_STAGES[(index % 12) as usize]
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ChangSheng => "长生",
            Self::MuYu => "沐浴",
            Self::GuanDai => "冠带",
            Self::LinGuan => "临官",
            Self::DiWang => "帝旺",
            Self::Shuai => "衰",
            Self::Bing => "病",
            Self::Si => "死",
            Self::Mu => "墓",
            Self::Jue => "绝",
            Self::Tai => "胎",
            Self::Yang => "养",
        }
    }

    /// 长生, 临官 or 帝旺: the stem is rooted with vigour.
    pub const fn is_vigorous(self) -> bool {
        matches!(self, Self::ChangSheng | Self::LinGuan | Self::DiWang)
    }
}

impl Serialize for LifeStage {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Stage of `stem` on `branch`.
pub const fn life_stage(stem: Stem, branch: Branch) -> LifeStage {
    let lu = lu_branch(stem).index() as i32;
    let b = branch.index() as i32;
    let steps = if stem.index() % 2 == 0 { b - lu } else { lu - b };
    LifeStage::from_index((steps + LIN_GUAN_INDEX).rem_euclid(12) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ganzhi::{ALL_BRANCHES, ALL_STEMS};
    use crate::relations::di_wang_branch;

    #[test]
    fn chang_sheng_branches() {
        let expected = [
            (Stem::Jia, Branch::Hai),
            (Stem::Yi, Branch::Wu),
            (Stem::Bing, Branch::Yin),
            (Stem::Ding, Branch::You),
            (Stem::Wu, Branch::Yin),
            (Stem::Ji, Branch::You),
            (Stem::Geng, Branch::Si),
            (Stem::Xin, Branch::Zi),
            (Stem::Ren, Branch::Shen),
            (Stem::Gui, Branch::Mao),
        ];
        for (stem, branch) in expected {
            assert_eq!(life_stage(stem, branch), LifeStage::ChangSheng, "{}", stem.name());
        }
    }

    #[test]
    fn lin_guan_and_di_wang_match_lu() {
        for stem in ALL_STEMS {
            assert_eq!(life_stage(stem, lu_branch(stem)), LifeStage::LinGuan);
            assert_eq!(life_stage(stem, di_wang_branch(stem)), LifeStage::DiWang);
        }
    }

    #[test]
    fn every_stage_once_per_stem() {
        for stem in ALL_STEMS {
            let mut seen: Vec<LifeStage> = ALL_BRANCHES.iter().map(|b| life_stage(stem, *b)).collect();
            seen.sort();
            assert_eq!(seen, ALL_LIFE_STAGES);
        }
    }

    #[test]
    fn known_pairs() {
        assert_eq!(life_stage(Stem::Jia, Branch::Wei), LifeStage::Mu);
        assert_eq!(life_stage(Stem::Geng, Branch::Wu).name(), "沐浴");
        assert_eq!(life_stage(Stem::Gui, Branch::Chen), LifeStage::Yang);
        assert!(life_stage(Stem::Bing, Branch::Wu).is_vigorous());
    }
}
