//! The shensha rule interface and the registry of every marker.
//!
//! Rules are plain data: a code, a scope and the lookup that locates the
//! target. Detection iterates [`REGISTRY`] and never special-cases a marker.

use crate::ganzhi::{Branch, GanZhi, Stem};
use crate::pillars::{ALL_POSITIONS, FourPillars, Position};
use crate::relations::{GroupStars, SanHeGroup, SanHuiGroup, lu_branch};

use super::types::{PositionSet, RuleScope, ShenshaCode};

/// One shensha marker rule.
pub trait ShenshaRule: Sync {
    fn code(&self) -> ShenshaCode;

    fn scope(&self) -> RuleScope;

    /// Positions the marker fires on; `reference` is the reference-year
    /// branch and is only consulted by floating rules.
    fn evaluate(&self, pillars: &FourPillars, reference: Option<Branch>) -> PositionSet;
}

/// Positions whose branch is in `targets`.
fn hit_branches(pillars: &FourPillars, targets: &[Branch]) -> PositionSet {
    pillars
        .iter()
        .filter(|(_, gz)| targets.contains(&gz.branch))
        .map(|(p, _)| p)
        .collect()
}

/// Positions whose stem is in `targets`.
fn hit_stems(pillars: &FourPillars, targets: &[Stem]) -> PositionSet {
    pillars
        .iter()
        .filter(|(_, gz)| targets.contains(&gz.stem))
        .map(|(p, _)| p)
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Stem-keyed branch lookups
// ---------------------------------------------------------------------------

/// Branches selected by the stems of `sources`, searched on every pillar.
pub struct StemLookup {
    pub code: ShenshaCode,
    pub sources: &'static [Position],
    pub table: fn(Stem) -> &'static [Branch],
}

impl ShenshaRule for StemLookup {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::SinglePosition
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        let mut targets = Vec::with_capacity(8);
        for pos in self.sources {
            targets.extend_from_slice((self.table)(pillars.get(*pos).stem));
        }
        hit_branches(pillars, &targets)
    }
}

fn tian_yi(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia | Stem::Wu | Stem::Geng => &[Chou, Wei],
        Stem::Yi | Stem::Ji => &[Zi, Shen],
        Stem::Bing | Stem::Ding => &[Hai, You],
        Stem::Ren | Stem::Gui => &[Mao, Si],
        Stem::Xin => &[Yin, Wu],
    }
}

fn tai_ji(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia | Stem::Yi => &[Zi, Wu],
        Stem::Bing | Stem::Ding => &[You, Mao],
        Stem::Wu | Stem::Ji => &[Chen, Xu, Chou, Wei],
        Stem::Geng | Stem::Xin => &[Yin, Hai],
        Stem::Ren | Stem::Gui => &[Si, Shen],
    }
}

fn wen_chang(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia => &[Si],
        Stem::Yi => &[Wu],
        Stem::Bing | Stem::Wu => &[Shen],
        Stem::Ding | Stem::Ji => &[You],
        Stem::Geng => &[Hai],
        Stem::Xin => &[Xu],
        Stem::Ren => &[Yin],
        Stem::Gui => &[Mao],
    }
}

fn guo_yin(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia => &[Xu],
        Stem::Yi => &[Hai],
        Stem::Bing | Stem::Wu => &[Chou],
        Stem::Ding | Stem::Ji => &[Yin],
        Stem::Geng => &[Chen],
        Stem::Xin => &[Si],
        Stem::Ren => &[Wei],
        Stem::Gui => &[Shen],
    }
}

fn tian_chu(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia | Stem::Ding => &[Si],
        Stem::Yi | Stem::Wu | Stem::Xin => &[Wu],
        Stem::Bing => &[Zi],
        Stem::Ji => &[Shen],
        Stem::Geng => &[Yin],
        Stem::Ren => &[You],
        Stem::Gui => &[Hai],
    }
}

fn liu_xia(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia => &[You],
        Stem::Yi => &[Xu],
        Stem::Bing => &[Wei],
        Stem::Ding => &[Shen],
        Stem::Wu => &[Si],
        Stem::Ji => &[Wu],
        Stem::Geng => &[Chen],
        Stem::Xin => &[Mao],
        Stem::Ren => &[Hai],
        Stem::Gui => &[Yin],
    }
}

fn ci_guan(stem: Stem) -> &'static [Branch] {
    use Branch::*;
    match stem {
        Stem::Jia => &[Yin],
        Stem::Yi => &[Mao],
        Stem::Bing | Stem::Wu => &[Si],
        Stem::Ding | Stem::Ji => &[Wu],
        Stem::Geng => &[Shen],
        Stem::Xin => &[You],
        Stem::Ren => &[Hai],
        Stem::Gui => &[Xu],
    }
}

// ---------------------------------------------------------------------------
// 2. Year-branch lookups
// ---------------------------------------------------------------------------

/// One branch derived from the year branch, searched on every pillar.
pub struct YearBranchLookup {
    pub code: ShenshaCode,
    pub target: fn(Branch) -> Branch,
}

impl ShenshaRule for YearBranchLookup {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::SinglePosition
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        hit_branches(pillars, &[(self.target)(pillars.year.branch)])
    }
}

fn hong_luan(b: Branch) -> Branch {
    Branch::Mao.offset(-i32::from(b.index()))
}

fn tian_xi(b: Branch) -> Branch {
    Branch::You.offset(-i32::from(b.index()))
}

fn long_de(b: Branch) -> Branch {
    b.offset(7)
}

fn sang_men(b: Branch) -> Branch {
    b.offset(2)
}

fn diao_ke(b: Branch) -> Branch {
    b.offset(-2)
}

fn pi_ma(b: Branch) -> Branch {
    b.offset(-3)
}

fn gu_chen(b: Branch) -> Branch {
    SanHuiGroup::of(b).gu_chen()
}

fn gua_su(b: Branch) -> Branch {
    SanHuiGroup::of(b).gua_su()
}

// ---------------------------------------------------------------------------
// 3. Month-branch marks (stem or branch)
// ---------------------------------------------------------------------------

/// A target that may sit on a stem or on a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Stem(Stem),
    Branch(Branch),
}

/// A mark derived from the month branch, searched on every pillar.
pub struct MonthLookup {
    pub code: ShenshaCode,
    pub target: fn(Branch) -> Mark,
}

impl ShenshaRule for MonthLookup {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::SinglePosition
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        match (self.target)(pillars.month.branch) {
            Mark::Stem(s) => hit_stems(pillars, &[s]),
            Mark::Branch(b) => hit_branches(pillars, &[b]),
        }
    }
}

fn yue_de(month: Branch) -> Mark {
    Mark::Stem(SanHeGroup::of(month).yue_de_stem())
}

fn yue_de_he(month: Branch) -> Mark {
    Mark::Stem(SanHeGroup::of(month).yue_de_stem().combine_partner())
}

fn tian_de(month: Branch) -> Mark {
    use Branch as B;
    match month {
        B::Yin => Mark::Stem(Stem::Ding),
        B::Mao => Mark::Branch(B::Shen),
        B::Chen => Mark::Stem(Stem::Ren),
        B::Si => Mark::Stem(Stem::Xin),
        B::Wu => Mark::Branch(B::Hai),
        B::Wei => Mark::Stem(Stem::Jia),
        B::Shen => Mark::Stem(Stem::Gui),
        B::You => Mark::Branch(B::Yin),
        B::Xu => Mark::Stem(Stem::Bing),
        B::Hai => Mark::Stem(Stem::Yi),
        B::Zi => Mark::Branch(B::Si),
        B::Chou => Mark::Stem(Stem::Geng),
    }
}

fn tian_de_he(month: Branch) -> Mark {
    use Branch as B;
    match month {
        B::Yin => Mark::Stem(Stem::Ren),
        B::Mao => Mark::Branch(B::Si),
        B::Chen => Mark::Stem(Stem::Ding),
        B::Si => Mark::Stem(Stem::Bing),
        B::Wu => Mark::Branch(B::Yin),
        B::Wei => Mark::Stem(Stem::Ji),
        B::Shen => Mark::Stem(Stem::Wu),
        B::You => Mark::Branch(B::Hai),
        B::Xu => Mark::Stem(Stem::Xin),
        B::Hai => Mark::Stem(Stem::Geng),
        B::Zi => Mark::Branch(B::Shen),
        B::Chou => Mark::Stem(Stem::Yi),
    }
}

// ---------------------------------------------------------------------------
// 4. Three-harmony stars
// ---------------------------------------------------------------------------

/// Star of the year and day branches' three-harmony groups, checked on
/// every other pillar.
pub struct GroupStar {
    pub code: ShenshaCode,
    pub star: fn(&GroupStars) -> Branch,
}

/// Anchors of the group-derived stars.
const GROUP_ANCHORS: [Position; 2] = [Position::Year, Position::Day];

impl ShenshaRule for GroupStar {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::GroupDerived
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        let mut out = PositionSet::new();
        for anchor in GROUP_ANCHORS {
            let target = (self.star)(&SanHeGroup::of(pillars.get(anchor).branch).stars());
            out.extend(
                ALL_POSITIONS
                    .iter()
                    .copied()
                    .filter(|p| *p != anchor && pillars.get(*p).branch == target),
            );
        }
        out
    }
}

fn star_tao_hua(s: &GroupStars) -> Branch {
    s.tao_hua
}

fn star_yi_ma(s: &GroupStars) -> Branch {
    s.yi_ma
}

fn star_jiang_xing(s: &GroupStars) -> Branch {
    s.jiang_xing
}

fn star_hua_gai(s: &GroupStars) -> Branch {
    s.hua_gai
}

fn star_wang_shen(s: &GroupStars) -> Branch {
    s.wang_shen
}

fn star_jie_sha(s: &GroupStars) -> Branch {
    s.jie_sha
}

// ---------------------------------------------------------------------------
// 5. Whole-pillar predicates
// ---------------------------------------------------------------------------

/// A predicate on the pillars at fixed positions.
pub struct PillarMatch {
    pub code: ShenshaCode,
    pub positions: &'static [Position],
    pub matches: fn(GanZhi) -> bool,
}

impl ShenshaRule for PillarMatch {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::PairPosition
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        self.positions
            .iter()
            .copied()
            .filter(|p| (self.matches)(pillars.get(*p)))
            .collect()
    }
}

fn is_ba_zhuan(gz: GanZhi) -> bool {
    // 甲寅 乙卯 丁未 己未 庚申 辛酉 戊戌 癸丑
    matches!(gz.index(), 50 | 51 | 43 | 55 | 56 | 57 | 34 | 49)
}

fn is_own_lu(gz: GanZhi) -> bool {
    lu_branch(gz.stem) == gz.branch
}

fn is_shi_e_da_bai(gz: GanZhi) -> bool {
    // 甲辰 乙巳 丙申 丁亥 戊戌 己丑 庚辰 辛巳 壬申 癸亥
    matches!(gz.index(), 40 | 41 | 32 | 23 | 34 | 25 | 16 | 17 | 8 | 59)
}

// ---------------------------------------------------------------------------
// 6. Decade voids (空亡)
// ---------------------------------------------------------------------------

/// The void branches of `source`'s decade, searched on every pillar.
pub struct DecadeVoid {
    pub code: ShenshaCode,
    pub source: Position,
}

impl ShenshaRule for DecadeVoid {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::PairPosition
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        hit_branches(pillars, &pillars.get(self.source).void_branches())
    }
}

// ---------------------------------------------------------------------------
// 7. 德秀贵人
// ---------------------------------------------------------------------------

/// 德 and 秀 stems of the month's group must both be present; the hit
/// covers every pillar carrying either.
pub struct DeXiu;

fn de_xiu_sets(month: Branch) -> (&'static [Stem], &'static [Stem]) {
    use Stem::*;
    match SanHeGroup::of(month) {
        SanHeGroup::YinWuXu => (&[Bing, Ding], &[Wu, Gui]),
        SanHeGroup::ShenZiChen => (&[Ren, Gui, Wu, Ji], &[Bing, Xin, Jia, Ji]),
        SanHeGroup::SiYouChou => (&[Geng, Xin], &[Yi, Geng]),
        SanHeGroup::HaiMaoWei => (&[Jia, Yi], &[Ding, Ren]),
    }
}

impl ShenshaRule for DeXiu {
    fn code(&self) -> ShenshaCode {
        ShenshaCode::DeXiu
    }

    fn scope(&self) -> RuleScope {
        RuleScope::GroupDerived
    }

    fn evaluate(&self, pillars: &FourPillars, _reference: Option<Branch>) -> PositionSet {
        let (de, xiu) = de_xiu_sets(pillars.month.branch);
        let stems = pillars.stems();
        let has_de = stems.iter().any(|s| de.contains(s));
        let has_xiu = stems.iter().any(|s| xiu.contains(s));
        if !(has_de && has_xiu) {
            return PositionSet::new();
        }
        pillars
            .iter()
            .filter(|(_, gz)| de.contains(&gz.stem) || xiu.contains(&gz.stem))
            .map(|(p, _)| p)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// 8. Floating (reference-year) markers
// ---------------------------------------------------------------------------

/// Natal branches standing at a fixed step from the reference branch.
pub struct ReferenceOffset {
    pub code: ShenshaCode,
    /// Natal branch = reference + `offset`.
    pub offset: i32,
}

impl ShenshaRule for ReferenceOffset {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::FloatingYear
    }

    fn evaluate(&self, pillars: &FourPillars, reference: Option<Branch>) -> PositionSet {
        match reference {
            Some(r) => hit_branches(pillars, &[r.offset(self.offset)]),
            None => PositionSet::new(),
        }
    }
}

/// The reference branch is a group star of the year or day branch; the hit
/// lands on that anchor pillar.
pub struct ReferenceGroupStar {
    pub code: ShenshaCode,
    pub star: fn(&GroupStars) -> Branch,
}

impl ShenshaRule for ReferenceGroupStar {
    fn code(&self) -> ShenshaCode {
        self.code
    }

    fn scope(&self) -> RuleScope {
        RuleScope::FloatingYear
    }

    fn evaluate(&self, pillars: &FourPillars, reference: Option<Branch>) -> PositionSet {
        let Some(r) = reference else {
            return PositionSet::new();
        };
        GROUP_ANCHORS
            .iter()
            .copied()
            .filter(|a| (self.star)(&SanHeGroup::of(pillars.get(*a).branch).stars()) == r)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

const DAY_YEAR: &[Position] = &[Position::Day, Position::Year];
const DAY_ONLY: &[Position] = &[Position::Day];

/// Every marker rule, static and floating.
pub static REGISTRY: &[&dyn ShenshaRule] = &[
    &StemLookup { code: ShenshaCode::TianYi, sources: DAY_YEAR, table: tian_yi },
    &StemLookup { code: ShenshaCode::WenChang, sources: DAY_YEAR, table: wen_chang },
    &StemLookup { code: ShenshaCode::TaiJi, sources: DAY_YEAR, table: tai_ji },
    &MonthLookup { code: ShenshaCode::YueDe, target: yue_de },
    &MonthLookup { code: ShenshaCode::TianDe, target: tian_de },
    &YearBranchLookup { code: ShenshaCode::HongLuan, target: hong_luan },
    &YearBranchLookup { code: ShenshaCode::TianXi, target: tian_xi },
    &GroupStar { code: ShenshaCode::TaoHua, star: star_tao_hua },
    &GroupStar { code: ShenshaCode::XianChi, star: star_tao_hua },
    &GroupStar { code: ShenshaCode::YiMa, star: star_yi_ma },
    &GroupStar { code: ShenshaCode::JiangXing, star: star_jiang_xing },
    &GroupStar { code: ShenshaCode::HuaGai, star: star_hua_gai },
    &GroupStar { code: ShenshaCode::WangShen, star: star_wang_shen },
    &YearBranchLookup { code: ShenshaCode::GuChen, target: gu_chen },
    &YearBranchLookup { code: ShenshaCode::GuaSu, target: gua_su },
    &YearBranchLookup { code: ShenshaCode::SangMen, target: sang_men },
    &YearBranchLookup { code: ShenshaCode::DiaoKe, target: diao_ke },
    &YearBranchLookup { code: ShenshaCode::PiMa, target: pi_ma },
    &MonthLookup { code: ShenshaCode::YueDeHe, target: yue_de_he },
    &MonthLookup { code: ShenshaCode::TianDeHe, target: tian_de_he },
    &DeXiu,
    &YearBranchLookup { code: ShenshaCode::LongDe, target: long_de },
    &StemLookup { code: ShenshaCode::GuoYin, sources: DAY_ONLY, table: guo_yin },
    &StemLookup { code: ShenshaCode::TianChu, sources: DAY_ONLY, table: tian_chu },
    &PillarMatch { code: ShenshaCode::JianLu, positions: &[Position::Month], matches: is_own_lu },
    &PillarMatch { code: ShenshaCode::ZhuanLu, positions: &[Position::Day], matches: is_own_lu },
    &StemLookup { code: ShenshaCode::CiGuan, sources: DAY_YEAR, table: ci_guan },
    &StemLookup { code: ShenshaCode::LiuXia, sources: DAY_ONLY, table: liu_xia },
    &PillarMatch {
        code: ShenshaCode::BaZhuan,
        positions: &[Position::Day, Position::Hour],
        matches: is_ba_zhuan,
    },
    &PillarMatch {
        code: ShenshaCode::ShiEDaBai,
        positions: &[Position::Day],
        matches: is_shi_e_da_bai,
    },
    &DecadeVoid { code: ShenshaCode::NianKongWang, source: Position::Year },
    &DecadeVoid { code: ShenshaCode::YueKongWang, source: Position::Month },
    &DecadeVoid { code: ShenshaCode::RiKongWang, source: Position::Day },
    &ReferenceOffset { code: ShenshaCode::TaiSui, offset: 0 },
    &ReferenceOffset { code: ShenshaCode::SuiJia, offset: 0 },
    &ReferenceOffset { code: ShenshaCode::BingFu, offset: -1 },
    &ReferenceGroupStar { code: ShenshaCode::WangShenFlow, star: star_wang_shen },
    &ReferenceGroupStar { code: ShenshaCode::JieShaFlow, star: star_jie_sha },
];

/// Registered rule for `code`.
pub fn rule_for(code: ShenshaCode) -> Option<&'static dyn ShenshaRule> {
    REGISTRY.iter().copied().find(|r| r.code() == code)
}
