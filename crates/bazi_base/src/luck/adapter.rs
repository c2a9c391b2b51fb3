//! Display projection of luck cycles.
//!
//! Views are recomputed per query: they depend on the caller's current age
//! and are never stored with the chart.

use serde::Serialize;

use crate::luck::types::{FavourLevel, LuckCycle, RawFavour};
use crate::ten_god::TenGod;

/// One luck cycle as shown on a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckCycleView {
    /// `"{stem-branch}-{start age}"`, e.g. `"甲子-31"`.
    pub id: String,
    pub stem_branch: String,
    pub ten_god: TenGod,
    pub start_age: u32,
    pub end_age: u32,
    pub start_year: i32,
    pub end_year: i32,
    pub favour_level: FavourLevel,
    pub tone_tag: &'static str,
    pub keywords: &'static [&'static str],
    pub is_current: bool,
}

impl LuckCycleView {
    /// The view covers calendar `year`.
    pub fn contains_year(&self, year: i32) -> bool {
        self.start_year <= year && year < self.end_year
    }
}

/// Three-level display favour. A favourable cycle whose score has been
/// dragged to zero or below by natal clashes reads as a wave.
pub fn favour_level(raw: RawFavour, score: f64) -> FavourLevel {
    match raw {
        RawFavour::Yong if score > 0.0 => FavourLevel::Good,
        RawFavour::Yong | RawFavour::Ji => FavourLevel::Wave,
        RawFavour::Neutral => FavourLevel::Flat,
    }
}

/// One-line tone of a cycle.
pub const fn tone_tag(level: FavourLevel, god: TenGod) -> &'static str {
    use FavourLevel::*;
    use TenGod::*;
    match (level, god) {
        (Good, ZhengGuan) => "整体偏顺",
        (Good, QiSha) => "压力中有机会",
        (Good, ZhengCai) => "收获期，资源聚拢",
        (Good, PianCai) => "机会多、人脉活跃",
        (Good, ShiShen) => "学习成长期",
        (Good, ShangGuan) => "突破创新期",
        (Good, ZhengYin) => "贵人相助，稳步提升",
        (Good, PianYin) => "思考深入，适合学习",
        (Good, BiJian) => "合作机会增多",
        (Good, JieCai) => "竞争激烈但有机会",

        (Flat, ZhengGuan) => "稳中小进",
        (Flat, QiSha) => "压力与机会并存",
        (Flat, ZhengCai) => "脚踏实地慢慢来",
        (Flat, PianCai) => "机会与风险并存",
        (Flat, ShiShen) => "平稳发展期",
        (Flat, ShangGuan) => "需要控制情绪",
        (Flat, ZhengYin) => "调整蓄力期",
        (Flat, PianYin) => "思考期，不宜冲动",
        (Flat, BiJian) => "合作需谨慎",
        (Flat, JieCai) => "竞争压力略大",

        (Wave, ZhengGuan) => "压力增大，需要稳住",
        (Wave, QiSha) => "压力与突破并存",
        (Wave, ZhengCai) => "财务压力，需谨慎",
        (Wave, PianCai) => "花费增多，要懂取舍",
        (Wave, ShiShen) => "情绪波动，注意调节",
        (Wave, ShangGuan) => "容易冲动，需冷静",
        (Wave, ZhengYin) => "依赖心理，需独立",
        (Wave, PianYin) => "思虑过多，需行动",
        (Wave, BiJian) => "竞争压力略大",
        (Wave, JieCai) => "竞争激烈，需谨慎",
    }
}

/// Tone used when no ten god is known.
pub const fn fallback_tone(level: FavourLevel) -> &'static str {
    match level {
        FavourLevel::Good => "整体偏顺",
        FavourLevel::Wave => "压力与机会并存",
        FavourLevel::Flat => "整体平稳，适合内调整",
    }
}

/// Three display keywords of a cycle.
pub const fn keywords(level: FavourLevel, god: TenGod) -> &'static [&'static str] {
    use FavourLevel::*;
    use TenGod::*;
    match (level, god) {
        (Good, ZhengGuan) => &["事业稳定发展", "责任感提升", "适合规划长远"],
        (Good, QiSha) => &["压力中有机会", "适合挑战", "需要主动出击"],
        (Good, ZhengCai) => &["收获期", "资源聚拢", "适合理财规划"],
        (Good, PianCai) => &["偏财机会多", "人际应酬多", "适合拓展副业"],
        (Good, ShiShen) => &["学习成长期", "适合进修", "创意灵感多"],
        (Good, ShangGuan) => &["突破创新期", "适合尝试新方向", "表达欲增强"],
        (Good, ZhengYin) => &["贵人相助", "稳步提升", "适合学习"],
        (Good, PianYin) => &["思考深入", "适合研究", "灵感增多"],
        (Good, BiJian) => &["合作机会增多", "适合团队协作", "人脉拓展"],
        (Good, JieCai) => &["竞争激烈但有机会", "需要主动争取", "适合合作"],

        (Flat, ZhengGuan) => &["稳中小进", "适合规划", "不要急躁"],
        (Flat, QiSha) => &["压力与机会并存", "需要平衡", "谨慎决策"],
        (Flat, ZhengCai) => &["脚踏实地", "慢慢积累", "不宜冒进"],
        (Flat, PianCai) => &["机会与风险并存", "需要谨慎", "不宜大额投资"],
        (Flat, ShiShen) => &["平稳发展", "适合学习", "保持节奏"],
        (Flat, ShangGuan) => &["需要控制情绪", "避免冲动", "理性思考"],
        (Flat, ZhengYin) => &["调整蓄力期", "适合学习", "不要急于求成"],
        (Flat, PianYin) => &["思考期", "不宜冲动", "需要沉淀"],
        (Flat, BiJian) => &["合作需谨慎", "避免竞争", "保持和谐"],
        (Flat, JieCai) => &["竞争压力略大", "需要谨慎", "避免冲突"],

        (Wave, ZhengGuan) => &["压力增大", "需要稳住", "不要硬扛"],
        (Wave, QiSha) => &["压力与突破并存", "适合磨炼心性", "不要硬扛，学会求助"],
        (Wave, ZhengCai) => &["财务压力", "需谨慎", "不宜大额支出"],
        (Wave, PianCai) => &["消费欲增强", "投资需谨慎", "容易冲动花钱"],
        (Wave, ShiShen) => &["情绪波动", "注意调节", "保持冷静"],
        (Wave, ShangGuan) => &["容易冲动", "需冷静", "避免口舌"],
        (Wave, ZhengYin) => &["依赖心理", "需独立", "不要过度依赖"],
        (Wave, PianYin) => &["思虑过多", "需行动", "避免钻牛角尖"],
        (Wave, BiJian) => &["竞争压力略大", "需要谨慎", "避免冲突"],
        (Wave, JieCai) => &["竞争激烈", "需谨慎", "避免破财"],
    }
}

/// Project one cycle for `current_age`.
pub fn view_of(cycle: &LuckCycle, current_age: u32) -> LuckCycleView {
    let stem_branch = cycle.ganzhi.name();
    let level = favour_level(cycle.raw_favour, cycle.favour_score);
    LuckCycleView {
        id: format!("{stem_branch}-{}", cycle.start_age),
        stem_branch,
        ten_god: cycle.ten_god,
        start_age: cycle.start_age,
        end_age: cycle.end_age,
        start_year: cycle.start_year,
        end_year: cycle.end_year,
        favour_level: level,
        tone_tag: tone_tag(level, cycle.ten_god),
        keywords: keywords(level, cycle.ten_god),
        is_current: cycle.start_age <= current_age && current_age < cycle.end_age,
    }
}

/// Project every cycle; at most one view is current.
pub fn build_views(cycles: &[LuckCycle], current_age: u32) -> Vec<LuckCycleView> {
    cycles.iter().map(|c| view_of(c, current_age)).collect()
}
