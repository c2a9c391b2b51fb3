//! 命宫, 身宫 and 胎元.
//!
//! Both palaces count from the month branch: 命宫 backwards by the hour
//! branch, 身宫 forwards. Palace stems follow 五虎遁 from the year stem.

use serde::{Serialize, Serializer};

use crate::element::ElementRelation;
use crate::ganzhi::{Branch, GanZhi, month_ganzhi};
use crate::pillars::FourPillars;

const MING_GONG_READINGS: [&str; 12] = [
    "天贵星，志向远大，聪明智慧",
    "天厄星，先难后易，晚年发达",
    "天权星，权威在握，领导才能",
    "天赦星，善良仁慈，逢凶化吉",
    "天如星，事多反复，机谋多变",
    "天文星，文采出众，学业有成",
    "天福星，福泽深厚，贵人相助",
    "天驿星，奔波劳碌，变动较多",
    "天孤星，独立自主，六亲缘薄",
    "天秘星，心思缜密，保守谨慎",
    "天艺星，多才多艺，技艺超群",
    "天寿星，健康长寿，晚运佳美",
];

const SHEN_GONG_READINGS: [&str; 12] = [
    "后天发展方向偏向智慧、交际",
    "后天重视积累，务实发展",
    "后天追求权力，事业发展",
    "后天注重人际关系，仁慈为怀",
    "后天多变，善于把握机会",
    "后天学业精进，文化发展",
    "后天福运深厚，贵人运佳",
    "后天奔波劳碌，变动求财",
    "后天独立发展，专业技术",
    "后天谨慎保守，精于计算",
    "后天技艺发展，专业成就",
    "后天健康长寿，晚运发展",
];

/// How 命宫 relates to 身宫, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PalaceRelation {
    SamePalace,
    MingGeneratesShen,
    MingOvercomesShen,
    SameElement,
    Distinct,
}

impl PalaceRelation {
    pub fn between(ming: Branch, shen: Branch) -> Self {
        if ming == shen {
            return Self::SamePalace;
        }
        match ElementRelation::between(ming.element(), shen.element()) {
            ElementRelation::Generates => Self::MingGeneratesShen,
            ElementRelation::Overcomes => Self::MingOvercomesShen,
            ElementRelation::Same => Self::SameElement,
            _ => Self::Distinct,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::SamePalace => "same_palace",
            Self::MingGeneratesShen => "ming_generates_shen",
            Self::MingOvercomesShen => "ming_overcomes_shen",
            Self::SameElement => "same_element",
            Self::Distinct => "distinct",
        }
    }

    pub const fn reading(self) -> &'static str {
        match self {
            Self::SamePalace => "命身同宫，先天后天一致，人生目标明确",
            Self::MingGeneratesShen => "命宫生身宫，先天助后天，发展顺利",
            Self::MingOvercomesShen => "命宫克身宫，先天制约后天，需努力突破",
            Self::SameElement => "命身比和，先天后天协调，稳步发展",
            Self::Distinct => "命身各有侧重，需平衡发展",
        }
    }
}

impl Serialize for PalaceRelation {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

/// One palace with its fixed reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palace {
    pub ganzhi: GanZhi,
    pub reading: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palaces {
    pub ming_gong: Palace,
    pub shen_gong: Palace,
    pub tai_yuan: GanZhi,
    pub relation: PalaceRelation,
}

/// 命宫 branch: month branch counted back by the hour branch.
pub const fn ming_gong_branch(month: Branch, hour: Branch) -> Branch {
    month.offset(-(hour.index() as i32))
}

/// 身宫 branch: month branch counted forward by the hour branch.
pub const fn shen_gong_branch(month: Branch, hour: Branch) -> Branch {
    month.offset(hour.index() as i32)
}

/// 胎元: month stem + 1, month branch + 3.
pub const fn tai_yuan(month: GanZhi) -> GanZhi {
    GanZhi {
        stem: month.stem.offset(1),
        branch: month.branch.offset(3),
    }
}

/// All three palaces of a chart.
pub fn palaces(pillars: &FourPillars) -> Palaces {
    let year_stem = pillars.year.stem;
    let ming = month_ganzhi(year_stem, ming_gong_branch(pillars.month.branch, pillars.hour.branch));
    let shen = month_ganzhi(year_stem, shen_gong_branch(pillars.month.branch, pillars.hour.branch));
    Palaces {
        ming_gong: Palace {
            ganzhi: ming,
            reading: MING_GONG_READINGS[ming.branch.index() as usize],
        },
        shen_gong: Palace {
            ganzhi: shen,
            reading: SHEN_GONG_READINGS[shen.branch.index() as usize],
        },
        tai_yuan: tai_yuan(pillars.month),
        relation: PalaceRelation::between(ming.branch, shen.branch),
    }
}
