//! Branch and stem relations: 六合, 三合, 三会, 六冲, 刑, 害, 破 and 五合.
//!
//! Every relation here is a pure function of the two symbols involved, so the
//! tables reduce to index arithmetic where the classical pattern allows it.

use serde::{Serialize, Serializer};

use crate::element::Element;
use crate::ganzhi::{Branch, Stem};

// ---------------------------------------------------------------------------
// Three-harmony groups (三合) and their stars
// ---------------------------------------------------------------------------

/// The four three-harmony branch groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SanHeGroup {
    /// 申子辰, water.
    ShenZiChen,
    /// 巳酉丑, metal.
    SiYouChou,
    /// 寅午戌, fire.
    YinWuXu,
    /// 亥卯未, wood.
    HaiMaoWei,
}

/// Star branches fixed by a three-harmony group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupStars {
    /// 桃花 (咸池).
    pub tao_hua: Branch,
    /// 驿马.
    pub yi_ma: Branch,
    /// 将星.
    pub jiang_xing: Branch,
    /// 华盖.
    pub hua_gai: Branch,
    /// 亡神.
    pub wang_shen: Branch,
    /// 劫煞.
    pub jie_sha: Branch,
}

impl SanHeGroup {
    /// Group containing `branch` (every branch belongs to exactly one).
    pub const fn of(branch: Branch) -> Self {
        match branch.index() % 4 {
            0 => Self::ShenZiChen,
            1 => Self::SiYouChou,
            2 => Self::YinWuXu,
            _ => Self::HaiMaoWei,
        }
    }

    /// Members in 生 / 旺 / 墓 order.
    pub const fn members(self) -> [Branch; 3] {
        match self {
            Self::ShenZiChen => [Branch::Shen, Branch::Zi, Branch::Chen],
            Self::SiYouChou => [Branch::Si, Branch::You, Branch::Chou],
            Self::YinWuXu => [Branch::Yin, Branch::Wu, Branch::Xu],
            Self::HaiMaoWei => [Branch::Hai, Branch::Mao, Branch::Wei],
        }
    }

    /// Element the completed group transforms into.
    pub const fn element(self) -> Element {
        match self {
            Self::ShenZiChen => Element::Water,
            Self::SiYouChou => Element::Metal,
            Self::YinWuXu => Element::Fire,
            Self::HaiMaoWei => Element::Wood,
        }
    }

    /// Group name such as "申子辰".
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShenZiChen => "申子辰",
            Self::SiYouChou => "巳酉丑",
            Self::YinWuXu => "寅午戌",
            Self::HaiMaoWei => "亥卯未",
        }
    }

    /// Star branches for the group.
    pub const fn stars(self) -> GroupStars {
        use Branch::*;
        match self {
            Self::ShenZiChen => GroupStars {
                tao_hua: You,
                yi_ma: Yin,
                jiang_xing: Zi,
                hua_gai: Chen,
                wang_shen: Hai,
                jie_sha: Si,
            },
            Self::YinWuXu => GroupStars {
                tao_hua: Mao,
                yi_ma: Shen,
                jiang_xing: Wu,
                hua_gai: Xu,
                wang_shen: Si,
                jie_sha: Hai,
            },
            Self::HaiMaoWei => GroupStars {
                tao_hua: Zi,
                yi_ma: Si,
                jiang_xing: Mao,
                hua_gai: Wei,
                wang_shen: Yin,
                jie_sha: Shen,
            },
            Self::SiYouChou => GroupStars {
                tao_hua: Wu,
                yi_ma: Hai,
                jiang_xing: You,
                hua_gai: Chou,
                wang_shen: Shen,
                jie_sha: Yin,
            },
        }
    }

    /// Stem of 月德贵人 for a month branch in this group.
    pub const fn yue_de_stem(self) -> Stem {
        match self {
            Self::YinWuXu => Stem::Bing,
            Self::ShenZiChen => Stem::Ren,
            Self::HaiMaoWei => Stem::Jia,
            Self::SiYouChou => Stem::Geng,
        }
    }
}

// ---------------------------------------------------------------------------
// Seasonal groups (三会)
// ---------------------------------------------------------------------------

/// The four seasonal (directional) branch groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SanHuiGroup {
    /// 寅卯辰, spring, wood.
    YinMaoChen,
    /// 巳午未, summer, fire.
    SiWuWei,
    /// 申酉戌, autumn, metal.
    ShenYouXu,
    /// 亥子丑, winter, water.
    HaiZiChou,
}

impl SanHuiGroup {
    /// Group containing `branch`.
    pub const fn of(branch: Branch) -> Self {
        match ((branch.index() + 10) % 12) / 3 {
            0 => Self::YinMaoChen,
            1 => Self::SiWuWei,
            2 => Self::ShenYouXu,
            _ => Self::HaiZiChou,
        }
    }

    /// First member of the group (寅, 巳, 申, 亥).
    const fn first(self) -> Branch {
        match self {
            Self::YinMaoChen => Branch::Yin,
            Self::SiWuWei => Branch::Si,
            Self::ShenYouXu => Branch::Shen,
            Self::HaiZiChou => Branch::Hai,
        }
    }

    /// Members in seasonal order.
    pub const fn members(self) -> [Branch; 3] {
        let f = self.first();
        [f, f.offset(1), f.offset(2)]
    }

    /// Seasonal element.
    pub const fn element(self) -> Element {
        match self {
            Self::YinMaoChen => Element::Wood,
            Self::SiWuWei => Element::Fire,
            Self::ShenYouXu => Element::Metal,
            Self::HaiZiChou => Element::Water,
        }
    }

    /// 孤辰: the branch after the group.
    pub const fn gu_chen(self) -> Branch {
        self.first().offset(3)
    }

    /// 寡宿: the branch before the group.
    pub const fn gua_su(self) -> Branch {
        self.first().offset(-1)
    }
}

// ---------------------------------------------------------------------------
// Pairwise branch relations
// ---------------------------------------------------------------------------

/// Product element of a 六合 pair, `None` if the branches do not combine.
pub const fn liu_he(a: Branch, b: Branch) -> Option<Element> {
    if (a.index() + b.index()) % 12 != 1 {
        return None;
    }
    let low = if a.index() < b.index() { a } else { b };
    Some(match low {
        Branch::Yin => Element::Wood,
        Branch::Mao => Element::Fire,
        Branch::Chen => Element::Metal,
        Branch::Si => Element::Water,
        _ => Element::Earth,
    })
}

/// Two distinct branches of the same three-harmony group (半合).
pub const fn is_san_he(a: Branch, b: Branch) -> bool {
    a.index() != b.index() && a.index() % 4 == b.index() % 4
}

/// 六冲: branches six apart.
pub const fn is_chong(a: Branch, b: Branch) -> bool {
    a.distance_to(b) == 6
}

/// 刑 between two distinct branches (寅巳申, 丑戌未, 子卯).
pub const fn is_xing(a: Branch, b: Branch) -> bool {
    use Branch::*;
    matches!(
        (a, b),
        (Yin, Si)
            | (Si, Shen)
            | (Shen, Yin)
            | (Si, Yin)
            | (Shen, Si)
            | (Yin, Shen)
            | (Chou, Xu)
            | (Xu, Wei)
            | (Wei, Chou)
            | (Xu, Chou)
            | (Wei, Xu)
            | (Chou, Wei)
            | (Zi, Mao)
            | (Mao, Zi)
    )
}

/// 自刑: 辰辰, 午午, 酉酉, 亥亥.
pub const fn is_zi_xing(a: Branch, b: Branch) -> bool {
    a.index() == b.index() && matches!(a, Branch::Chen | Branch::Wu | Branch::You | Branch::Hai)
}

/// 六害: index sum 7 modulo 12.
pub const fn is_hai(a: Branch, b: Branch) -> bool {
    (a.index() + b.index()) % 12 == 7
}

/// 相破: 子酉, 卯午, 辰丑, 未戌, 寅亥, 巳申.
pub const fn is_po(a: Branch, b: Branch) -> bool {
    let (even, odd) = if a.index() % 2 == 0 { (a, b) } else { (b, a) };
    even.index() % 2 == 0 && odd.index() % 2 == 1 && (even.index() + 9) % 12 == odd.index()
}

/// A named relation between two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchRelation {
    LiuHe,
    SanHe,
    Chong,
    Xing,
    ZiXing,
    Hai,
    Po,
}

/// All branch relations in evaluation order.
pub const ALL_BRANCH_RELATIONS: [BranchRelation; 7] = [
    BranchRelation::LiuHe,
    BranchRelation::SanHe,
    BranchRelation::Chong,
    BranchRelation::Xing,
    BranchRelation::ZiXing,
    BranchRelation::Hai,
    BranchRelation::Po,
];

impl BranchRelation {
    /// Stable snake_case code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::LiuHe => "liu_he",
            Self::SanHe => "san_he",
            Self::Chong => "chong",
            Self::Xing => "xing",
            Self::ZiXing => "zi_xing",
            Self::Hai => "hai",
            Self::Po => "po",
        }
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LiuHe => "六合",
            Self::SanHe => "三合",
            Self::Chong => "六冲",
            Self::Xing => "相刑",
            Self::ZiXing => "自刑",
            Self::Hai => "六害",
            Self::Po => "相破",
        }
    }

    /// Whether the relation binds the branches rather than striking them.
    pub const fn is_harmonious(self) -> bool {
        matches!(self, Self::LiuHe | Self::SanHe)
    }

    /// Whether `a` and `b` stand in this relation.
    pub const fn holds(self, a: Branch, b: Branch) -> bool {
        match self {
            Self::LiuHe => liu_he(a, b).is_some(),
            Self::SanHe => is_san_he(a, b),
            Self::Chong => is_chong(a, b),
            Self::Xing => is_xing(a, b),
            Self::ZiXing => is_zi_xing(a, b),
            Self::Hai => is_hai(a, b),
            Self::Po => is_po(a, b),
        }
    }
}

impl Serialize for BranchRelation {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.code())
    }
}

/// Every relation between `a` and `b`, in [`ALL_BRANCH_RELATIONS`] order.
pub fn relations_between(a: Branch, b: Branch) -> Vec<BranchRelation> {
    ALL_BRANCH_RELATIONS
        .iter()
        .copied()
        .filter(|r| r.holds(a, b))
        .collect()
}

/// Number of 六冲 pairs among a set of branches.
pub fn count_chong_pairs(branches: &[Branch]) -> usize {
    let mut n = 0;
    for (i, a) in branches.iter().enumerate() {
        for b in &branches[i + 1..] {
            if is_chong(*a, *b) {
                n += 1;
            }
        }
    }
    n
}

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

/// Product element of a stem 五合 pair (甲己土 乙庚金 丙辛水 丁壬木 戊癸火).
pub const fn stem_he(a: Stem, b: Stem) -> Option<Element> {
    if a.index().abs_diff(b.index()) != 5 {
        return None;
    }
    let low = if a.index() < b.index() { a.index() } else { b.index() };
    Some(match low {
        0 => Element::Earth,
        1 => Element::Metal,
        2 => Element::Water,
        3 => Element::Wood,
        _ => Element::Fire,
    })
}

/// 禄 (临官) branch of a stem.
pub const fn lu_branch(stem: Stem) -> Branch {
    match stem {
        Stem::Jia => Branch::Yin,
        Stem::Yi => Branch::Mao,
        Stem::Bing | Stem::Wu => Branch::Si,
        Stem::Ding | Stem::Ji => Branch::Wu,
        Stem::Geng => Branch::Shen,
        Stem::Xin => Branch::You,
        Stem::Ren => Branch::Hai,
        Stem::Gui => Branch::Zi,
    }
}

/// 帝旺 branch of a stem: one step past 禄 for yang stems, one step back for yin.
pub const fn di_wang_branch(stem: Stem) -> Branch {
    let lu = lu_branch(stem);
    if stem.index() % 2 == 0 { lu.offset(1) } else { lu.offset(-1) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ganzhi::ALL_BRANCHES;
    use Branch::*;

    #[test]
    fn liu_he_pairs_and_elements() {
        assert_eq!(liu_he(Zi, Chou), Some(Element::Earth));
        assert_eq!(liu_he(Hai, Yin), Some(Element::Wood));
        assert_eq!(liu_he(Mao, Xu), Some(Element::Fire));
        assert_eq!(liu_he(You, Chen), Some(Element::Metal));
        assert_eq!(liu_he(Si, Shen), Some(Element::Water));
        assert_eq!(liu_he(Wu, Wei), Some(Element::Earth));
        assert_eq!(liu_he(Zi, Wu), None);
    }

    #[test]
    fn every_branch_has_one_partner_per_relation() {
        for a in ALL_BRANCHES {
            let he = ALL_BRANCHES.iter().filter(|b| liu_he(a, **b).is_some()).count();
            let chong = ALL_BRANCHES.iter().filter(|b| is_chong(a, **b)).count();
            let hai = ALL_BRANCHES.iter().filter(|b| is_hai(a, **b)).count();
            let po = ALL_BRANCHES.iter().filter(|b| is_po(a, **b)).count();
            assert_eq!((he, chong, hai, po), (1, 1, 1, 1), "{a}");
        }
    }

    #[test]
    fn hai_and_po_tables() {
        assert!(is_hai(Zi, Wei));
        assert!(is_hai(Yin, Si));
        assert!(is_hai(You, Xu));
        assert!(is_po(Zi, You));
        assert!(is_po(Mao, Wu));
        assert!(is_po(Chen, Chou));
        assert!(is_po(Wei, Xu));
        assert!(is_po(Yin, Hai));
        assert!(is_po(Shen, Si));
        assert!(!is_po(Zi, Wu));
    }

    #[test]
    fn xing_and_zi_xing() {
        assert!(is_xing(Yin, Si));
        assert!(is_xing(Chou, Wei));
        assert!(is_xing(Mao, Zi));
        assert!(!is_xing(Zi, Wu));
        assert!(is_zi_xing(Wu, Wu));
        assert!(!is_zi_xing(Zi, Zi));
    }

    #[test]
    fn group_stars() {
        let g = SanHeGroup::of(Zi);
        assert_eq!(g, SanHeGroup::ShenZiChen);
        assert_eq!(g.stars().tao_hua, You);
        assert_eq!(g.stars().yi_ma, Yin);
        assert_eq!(SanHeGroup::of(Xu).stars().hua_gai, Xu);
        assert_eq!(SanHeGroup::of(Wei).stars().jiang_xing, Mao);
        assert_eq!(SanHeGroup::of(You).stars().jie_sha, Yin);
        for b in ALL_BRANCHES {
            assert!(SanHeGroup::of(b).members().contains(&b));
            assert!(SanHuiGroup::of(b).members().contains(&b));
        }
    }

    #[test]
    fn gu_chen_gua_su() {
        assert_eq!(SanHuiGroup::of(Zi).gu_chen(), Yin);
        assert_eq!(SanHuiGroup::of(Zi).gua_su(), Xu);
        assert_eq!(SanHuiGroup::of(Mao).gu_chen(), Si);
        assert_eq!(SanHuiGroup::of(Mao).gua_su(), Chou);
        assert_eq!(SanHuiGroup::of(Wu).gu_chen(), Shen);
        assert_eq!(SanHuiGroup::of(You).gua_su(), Wei);
    }

    #[test]
    fn stem_combinations() {
        assert_eq!(stem_he(Stem::Jia, Stem::Ji), Some(Element::Earth));
        assert_eq!(stem_he(Stem::Geng, Stem::Yi), Some(Element::Metal));
        assert_eq!(stem_he(Stem::Gui, Stem::Wu), Some(Element::Fire));
        assert_eq!(stem_he(Stem::Jia, Stem::Geng), None);
    }

    #[test]
    fn lu_and_di_wang() {
        assert_eq!(lu_branch(Stem::Jia), Yin);
        assert_eq!(lu_branch(Stem::Gui), Zi);
        assert_eq!(di_wang_branch(Stem::Jia), Mao);
        assert_eq!(di_wang_branch(Stem::Yi), Yin);
        assert_eq!(di_wang_branch(Stem::Geng), You);
        assert_eq!(di_wang_branch(Stem::Gui), Hai);
    }

    #[test]
    fn relations_between_collects_all() {
        assert_eq!(relations_between(Zi, Wu), vec![BranchRelation::Chong]);
        // 子卯 punish without combining
        assert_eq!(relations_between(Zi, Mao), vec![BranchRelation::Xing]);
        // 巳申: combine, punish and destroy at once
        assert_eq!(
            relations_between(Si, Shen),
            vec![BranchRelation::LiuHe, BranchRelation::Xing, BranchRelation::Po]
        );
        assert_eq!(relations_between(Wu, Wu), vec![BranchRelation::ZiXing]);
        assert!(relations_between(Zi, Yin).is_empty());
    }

    #[test]
    fn chong_pairs_counted() {
        assert_eq!(count_chong_pairs(&[Zi, Wu, Mao, You]), 2);
        assert_eq!(count_chong_pairs(&[Zi, Zi, Wu, Chen]), 2);
        assert_eq!(count_chong_pairs(&[Zi, Chou, Yin, Mao]), 0);
    }
}
