//! Na-yin (纳音): the thirty sound-elements, one per consecutive pair of the
//! sixty-cycle.

use crate::element::Element;
use crate::ganzhi::GanZhi;

const NAYIN: [(&str, Element); 30] = [
    ("海中金", Element::Metal),
    ("炉中火", Element::Fire),
    ("大林木", Element::Wood),
    ("路旁土", Element::Earth),
    ("剑锋金", Element::Metal),
    ("山头火", Element::Fire),
    ("涧下水", Element::Water),
    ("城头土", Element::Earth),
    ("白蜡金", Element::Metal),
    ("杨柳木", Element::Wood),
    ("泉中水", Element::Water),
    ("屋上土", Element::Earth),
    ("霹雳火", Element::Fire),
    ("松柏木", Element::Wood),
    ("长流水", Element::Water),
    ("沙中金", Element::Metal),
    ("山下火", Element::Fire),
    ("平地木", Element::Wood),
    ("壁上土", Element::Earth),
    ("金箔金", Element::Metal),
    ("覆灯火", Element::Fire),
    ("天河水", Element::Water),
    ("大驿土", Element::Earth),
    ("钗钏金", Element::Metal),
    ("桑柘木", Element::Wood),
    ("大溪水", Element::Water),
    ("沙中土", Element::Earth),
    ("天上火", Element::Fire),
    ("石榴木", Element::Wood),
    ("大海水", Element::Water),
];

/// Na-yin name of a pillar.
pub const fn nayin(gz: GanZhi) -> &'static str {
    NAYIN[(gz.index() / 2) as usize].0
}

/// Element of a pillar's na-yin.
pub const fn nayin_element(gz: GanZhi) -> Element {
    NAYIN[(gz.index() / 2) as usize].1
}
