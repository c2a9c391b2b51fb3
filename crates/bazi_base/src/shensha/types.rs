//! Shensha codes, scopes and hit containers.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ChartError;
use crate::ganzhi::{Branch, GanZhi, year_ganzhi};
use crate::pillars::Position;

/// Pillar positions a marker fires on.
pub type PositionSet = BTreeSet<Position>;

/// Marker → positions; markers without hits are absent.
pub type ShenshaHits = BTreeMap<ShenshaCode, PositionSet>;

/// How a rule locates its hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// Keyed off one pillar's stem or branch.
    SinglePosition,
    /// Needs an exact stem+branch combination, or compares two pillars.
    PairPosition,
    /// Anchored on a three-harmony group.
    GroupDerived,
    /// Needs the reference-year branch; evaluated per query.
    FloatingYear,
}

/// Display group used by the external content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShenshaGroup {
    CoreNoble,
    ExtendedNoble,
    Combo,
    VoidSystem,
    FlowYear,
}

macro_rules! shensha_codes {
    ($($variant:ident => ($id:literal, $name:literal, $group:ident)),+ $(,)?) => {
        /// Every shensha marker the engine knows.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ShenshaCode {
            $($variant),+
        }

        /// All marker codes in declaration order.
        pub const ALL_SHENSHA_CODES: &[ShenshaCode] = &[$(ShenshaCode::$variant),+];

        impl ShenshaCode {
            /// snake_case key of the content store.
            pub const fn id(self) -> &'static str {
                match self {
                    $(Self::$variant => $id),+
                }
            }

            /// Chinese name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            pub const fn group(self) -> ShenshaGroup {
                match self {
                    $(Self::$variant => ShenshaGroup::$group),+
                }
            }
        }
    };
}

shensha_codes! {
    TianYi => ("tian_yi_gui_ren", "天乙贵人", CoreNoble),
    WenChang => ("wen_chang_gui_ren", "文昌贵人", CoreNoble),
    TaiJi => ("tai_ji_gui_ren", "太极贵人", ExtendedNoble),
    YueDe => ("yue_de_gui_ren", "月德贵人", ExtendedNoble),
    TianDe => ("tian_de_gui_ren", "天德贵人", ExtendedNoble),
    HongLuan => ("hong_luan", "红鸾", ExtendedNoble),
    TianXi => ("tian_xi", "天喜", ExtendedNoble),
    TaoHua => ("tao_hua", "桃花", Combo),
    XianChi => ("xian_chi", "咸池", Combo),
    YiMa => ("yi_ma", "驿马", Combo),
    JiangXing => ("jiang_xing", "将星", Combo),
    HuaGai => ("hua_gai", "华盖", Combo),
    WangShen => ("wang_shen_natal", "亡神", Combo),
    GuChen => ("gu_chen", "孤辰", Combo),
    GuaSu => ("gua_su", "寡宿", Combo),
    SangMen => ("sang_men", "丧门", Combo),
    DiaoKe => ("diao_ke", "吊客", Combo),
    PiMa => ("pi_ma", "披麻", Combo),
    YueDeHe => ("yue_de_he", "月德合", Combo),
    TianDeHe => ("tian_de_he", "天德合", Combo),
    DeXiu => ("de_xiu_gui_ren", "德秀贵人", Combo),
    LongDe => ("long_de_gui_ren", "龙德贵人", Combo),
    GuoYin => ("guo_yin_gui_ren", "国印贵人", Combo),
    TianChu => ("tian_chu_gui_ren", "天厨贵人", Combo),
    JianLu => ("jian_lu", "建禄", Combo),
    ZhuanLu => ("zhuan_lu", "专禄", Combo),
    CiGuan => ("ci_guan", "词馆", Combo),
    LiuXia => ("liu_xia", "流霞", Combo),
    BaZhuan => ("ba_zhuan", "八专", Combo),
    ShiEDaBai => ("shi_e_da_bai", "十恶大败", Combo),
    NianKongWang => ("nian_kong_wang", "年空亡", VoidSystem),
    YueKongWang => ("yue_kong_wang", "月空亡", VoidSystem),
    RiKongWang => ("ri_kong_wang", "日空亡", VoidSystem),
    TaiSui => ("tai_sui", "太岁", FlowYear),
    SuiJia => ("sui_jia", "岁驾", FlowYear),
    BingFu => ("bing_fu", "病符", FlowYear),
    WangShenFlow => ("wang_shen_flow", "亡神（流年）", FlowYear),
    JieShaFlow => ("jie_sha_flow", "劫煞（流年）", FlowYear),
}

impl ShenshaCode {
    /// Look up a code by its content-store id.
    pub fn from_id(id: &str) -> Option<Self> {
        ALL_SHENSHA_CODES.iter().copied().find(|c| c.id() == id)
    }
}

impl Display for ShenshaCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for ShenshaCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.id())
    }
}

/// Earliest Gregorian reference year.
pub const MIN_REFERENCE_YEAR: i32 = 1900;
/// Latest Gregorian reference year; a 2100 birth still has its later
/// luck cycles in reach.
pub const MAX_REFERENCE_YEAR: i32 = 2220;

/// The year floating markers are judged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceYear {
    /// A Gregorian year; its branch is `(year − 1984) mod 12`.
    Year(i32),
    /// A branch given directly.
    Branch(Branch),
}

impl ReferenceYear {
    /// Branch of the reference year.
    pub const fn branch(self) -> Branch {
        match self {
            Self::Year(y) => year_ganzhi(y).branch,
            Self::Branch(b) => b,
        }
    }

    /// Gregorian year when known.
    pub const fn year(self) -> Option<i32> {
        match self {
            Self::Year(y) => Some(y),
            Self::Branch(_) => None,
        }
    }

    /// A Gregorian year must lie in
    /// `MIN_REFERENCE_YEAR..=MAX_REFERENCE_YEAR`.
    pub fn validate(self) -> Result<Self, ChartError> {
        match self {
            Self::Year(y) => check_reference_year(y).map(Self::Year),
            Self::Branch(_) => Ok(self),
        }
    }
}

/// Reject a Gregorian year outside the reference range.
pub fn check_reference_year(year: i32) -> Result<i32, ChartError> {
    if (MIN_REFERENCE_YEAR..=MAX_REFERENCE_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ChartError::UnknownReferenceYear(format!(
            "{year} outside {MIN_REFERENCE_YEAR}..={MAX_REFERENCE_YEAR}"
        )))
    }
}

impl FromStr for ReferenceYear {
    type Err = ChartError;

    /// Accepts `2025`, `巳` or `乙巳`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(y) = t.parse::<i32>() {
            return Self::Year(y).validate();
        }
        if let Ok(b) = t.parse::<Branch>() {
            return Ok(Self::Branch(b));
        }
        if let Ok(gz) = t.parse::<GanZhi>() {
            return Ok(Self::Branch(gz.branch));
        }
        Err(ChartError::UnknownReferenceYear(s.to_string()))
    }
}

impl Serialize for ReferenceYear {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Year(y) => s.serialize_i32(*y),
            Self::Branch(b) => s.serialize_str(b.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = ALL_SHENSHA_CODES.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL_SHENSHA_CODES.len());
        assert_eq!(ShenshaCode::from_id("ba_zhuan"), Some(ShenshaCode::BaZhuan));
        assert_eq!(ShenshaCode::from_id("nope"), None);
    }

    #[test]
    fn groups() {
        assert_eq!(ShenshaCode::TianYi.group(), ShenshaGroup::CoreNoble);
        assert_eq!(ShenshaCode::RiKongWang.group(), ShenshaGroup::VoidSystem);
        assert_eq!(ShenshaCode::BingFu.group(), ShenshaGroup::FlowYear);
    }

    #[test]
    fn reference_year_parsing() {
        assert_eq!("2025".parse::<ReferenceYear>().unwrap().branch(), Branch::Si);
        assert_eq!("午".parse::<ReferenceYear>().unwrap(), ReferenceYear::Branch(Branch::Wu));
        assert_eq!("丙午".parse::<ReferenceYear>().unwrap().branch(), Branch::Wu);
        assert!(matches!(
            "next year".parse::<ReferenceYear>(),
            Err(ChartError::UnknownReferenceYear(_))
        ));
        assert!("".parse::<ReferenceYear>().is_err());
        assert!(matches!(
            "2147483647".parse::<ReferenceYear>(),
            Err(ChartError::UnknownReferenceYear(_))
        ));
        assert!("1899".parse::<ReferenceYear>().is_err());
        assert_eq!(
            "2220".parse::<ReferenceYear>().unwrap(),
            ReferenceYear::Year(MAX_REFERENCE_YEAR)
        );
    }
}
