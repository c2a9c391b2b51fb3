//! The five elements (五行), yin/yang polarity and their relations.

use serde::{Serialize, Serializer};

/// The five elements in generating order (木 → 火 → 土 → 金 → 水).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// All five elements in generating order.
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

impl Element {
    /// 0-based index (Wood=0 .. Water=4).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Element at a 0-based index, wrapping modulo 5.
    pub const fn from_index(index: u8) -> Self {
        ALL_ELEMENTS[(index % 5) as usize]
    }

    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    /// The element this one generates (木生火 ...).
    pub const fn generates(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The element this one overcomes (木克土 ...).
    pub const fn overcomes(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The element that generates this one.
    pub const fn generated_by(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// The element that overcomes this one.
    pub const fn overcome_by(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Parse a Chinese element name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ELEMENTS.iter().copied().find(|e| e.name() == name)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// Yin/yang polarity of a stem or branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yang => "阳",
            Self::Yin => "阴",
        }
    }

    /// Polarity of a 0-based cyclic index (even = yang).
    pub const fn of_index(index: u8) -> Self {
        if index % 2 == 0 { Self::Yang } else { Self::Yin }
    }
}

impl Serialize for Polarity {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

/// How an element relates to the day master's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementRelation {
    /// 同我: same element.
    Same,
    /// 我生: the day master generates it.
    Generates,
    /// 我克: the day master overcomes it.
    Overcomes,
    /// 克我: it overcomes the day master.
    OvercomeBy,
    /// 生我: it generates the day master.
    GeneratedBy,
}

/// All five relations.
pub const ALL_RELATIONS: [ElementRelation; 5] = [
    ElementRelation::Generates,
    ElementRelation::Overcomes,
    ElementRelation::OvercomeBy,
    ElementRelation::GeneratedBy,
    ElementRelation::Same,
];

impl ElementRelation {
    /// Relation of `other` seen from `me`.
    pub const fn between(me: Element, other: Element) -> Self {
        match (other.index() + 5 - me.index()) % 5 {
            0 => Self::Same,
            1 => Self::Generates,
            2 => Self::Overcomes,
            3 => Self::OvercomeBy,
            _ => Self::GeneratedBy,
        }
    }

    /// The element standing in this relation to `me`.
    pub const fn element_for(self, me: Element) -> Element {
        match self {
            Self::Same => me,
            Self::Generates => me.generates(),
            Self::Overcomes => me.overcomes(),
            Self::OvercomeBy => me.overcome_by(),
            Self::GeneratedBy => me.generated_by(),
        }
    }

    /// Chinese name (同我, 我生, 我克, 克我, 生我).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Same => "同我",
            Self::Generates => "我生",
            Self::Overcomes => "我克",
            Self::OvercomeBy => "克我",
            Self::GeneratedBy => "生我",
        }
    }
}

impl Serialize for ElementRelation {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}
