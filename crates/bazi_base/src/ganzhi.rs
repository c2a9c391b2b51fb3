//! Heavenly stems (天干), earthly branches (地支) and the sixty-pair cycle.
//!
//! Stems and branches are plain enums with 0-based indices; a [`GanZhi`] is a
//! stem/branch pair of equal parity, indexed 0 (甲子) .. 59 (癸亥). All three
//! serialize as their Chinese names.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::element::{Element, Polarity};

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

/// The ten heavenly stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

/// All ten stems in order (0 = 甲, 9 = 癸).
pub const ALL_STEMS: [Stem; 10] = [
    Stem::Jia,
    Stem::Yi,
    Stem::Bing,
    Stem::Ding,
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
];

const STEM_NAMES: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

impl Stem {
    /// 0-based index (甲=0 .. 癸=9).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Stem at a 0-based index, wrapping modulo 10.
    pub const fn from_index(index: u8) -> Self {
        ALL_STEMS[(index % 10) as usize]
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        STEM_NAMES[self as usize]
    }

    /// Element: 甲乙木 丙丁火 戊己土 庚辛金 壬癸水.
    pub const fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    /// Odd-indexed stems are yin.
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }

    /// Step `n` places through the cycle (negative steps go backwards).
    pub const fn offset(self, n: i32) -> Self {
        Self::from_index((self.index() as i32 + n).rem_euclid(10) as u8)
    }

    /// Stem of the other half of a 五合 pair (甲己, 乙庚, 丙辛, 丁壬, 戊癸).
    pub const fn combine_partner(self) -> Self {
        self.offset(5)
    }
}

impl Display for Stem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_STEMS
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown stem: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// The twelve earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// All twelve branches in order (0 = 子, 11 = 亥).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

const BRANCH_NAMES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

const BRANCH_ELEMENTS: [Element; 12] = [
    Element::Water,
    Element::Earth,
    Element::Wood,
    Element::Wood,
    Element::Earth,
    Element::Fire,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Metal,
    Element::Earth,
    Element::Water,
];

const ZODIAC_NAMES: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

impl Branch {
    /// 0-based index (子=0 .. 亥=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Branch at a 0-based index, wrapping modulo 12.
    pub const fn from_index(index: u8) -> Self {
        ALL_BRANCHES[(index % 12) as usize]
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        BRANCH_NAMES[self as usize]
    }

    /// Governing element of the branch.
    pub const fn element(self) -> Element {
        BRANCH_ELEMENTS[self as usize]
    }

    /// Odd-indexed branches are yin.
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }

    /// Zodiac animal (生肖).
    pub const fn zodiac(self) -> &'static str {
        ZODIAC_NAMES[self as usize]
    }

    /// Step `n` places through the cycle (negative steps go backwards).
    pub const fn offset(self, n: i32) -> Self {
        Self::from_index((self.index() as i32 + n).rem_euclid(12) as u8)
    }

    /// Forward distance from `self` to `other` (0..12).
    pub const fn distance_to(self, other: Self) -> u8 {
        (other.index() + 12 - self.index()) % 12
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ALL_BRANCHES
            .iter()
            .copied()
            .find(|b| b.name() == s)
            .ok_or_else(|| format!("unknown branch: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Stem-branch pairs
// ---------------------------------------------------------------------------

/// A stem/branch pair of equal parity; one of the sixty 干支.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    /// Pair a stem and branch; `None` when their parities differ (甲丑 does
    /// not exist).
    pub const fn new(stem: Stem, branch: Branch) -> Option<Self> {
        if stem.index() % 2 == branch.index() % 2 {
            Some(Self { stem, branch })
        } else {
            None
        }
    }

    /// Pair at cycle index `index` (0 = 甲子), wrapping modulo 60.
    pub const fn from_index(index: u8) -> Self {
        let i = index % 60;
        Self {
            stem: Stem::from_index(i % 10),
            branch: Branch::from_index(i % 12),
        }
    }

    /// Cycle index 0..60.
    pub const fn index(self) -> u8 {
        let s = self.stem.index() as i32;
        let b = self.branch.index() as i32;
        (6 * s - 5 * b).rem_euclid(60) as u8
    }

    /// Step `n` places through the sixty-cycle.
    pub const fn offset(self, n: i32) -> Self {
        Self::from_index((self.index() as i32 + n).rem_euclid(60) as u8)
    }

    /// The two void (空亡) branches of this pair's decade (旬).
    pub const fn void_branches(self) -> [Branch; 2] {
        let s = self.stem.index() as i32;
        let b = self.branch.index() as i32;
        [
            Branch::from_index((b - s + 10).rem_euclid(12) as u8),
            Branch::from_index((b - s + 11).rem_euclid(12) as u8),
        ]
    }

    /// Two-character name such as "甲子".
    pub fn name(self) -> String {
        format!("{}{}", self.stem.name(), self.branch.name())
    }
}

impl Display for GanZhi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.name(), self.branch.name())
    }
}

impl FromStr for GanZhi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(a), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("expected two characters: {s}"));
        };
        let stem: Stem = a.to_string().parse()?;
        let branch: Branch = b.to_string().parse()?;
        Self::new(stem, branch).ok_or_else(|| format!("parity mismatch: {s}"))
    }
}

macro_rules! serde_by_name {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

serde_by_name!(Stem);
serde_by_name!(Branch);
serde_by_name!(GanZhi);

/// Ganzhi of a Gregorian year counted from 立春: `(year − 1984) mod 60`.
pub const fn year_ganzhi(year: i32) -> GanZhi {
    GanZhi::from_index((year as i64 - 1984).rem_euclid(60) as u8)
}

/// Stem of the 寅 month for a year stem (五虎遁).
pub const fn yin_month_stem(year_stem: Stem) -> Stem {
    Stem::from_index((year_stem.index() % 5) * 2 + 2)
}

/// Month pillar for a month branch in a year with the given stem.
pub const fn month_ganzhi(year_stem: Stem, month_branch: Branch) -> GanZhi {
    let stem = yin_month_stem(year_stem).offset(Branch::Yin.distance_to(month_branch) as i32);
    GanZhi {
        stem,
        branch: month_branch,
    }
}

/// Stem of the 子 hour for a day stem (五鼠遁).
pub const fn zi_hour_stem(day_stem: Stem) -> Stem {
    Stem::from_index((day_stem.index() % 5) * 2)
}

/// Hour branch for a clock hour 0..=23 (子 spans 23:00–00:59).
pub const fn hour_branch(hour: u32) -> Branch {
    Branch::from_index((((hour + 1) / 2) % 12) as u8)
}

/// Hour pillar for a day stem and clock hour.
pub const fn hour_ganzhi(day_stem: Stem, hour: u32) -> GanZhi {
    let branch = hour_branch(hour);
    GanZhi {
        stem: zi_hour_stem(day_stem).offset(branch.index() as i32),
        branch,
    }
}
