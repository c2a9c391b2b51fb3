//! Five-element distribution of a chart, normalized to 100.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::element::{ALL_ELEMENTS, Element, ElementRelation};
use crate::hidden::hidden_stems;
use crate::pillars::FourPillars;

/// Normalization target of the distribution.
pub const DISTRIBUTION_TOTAL: f64 = 100.0;

/// Count of a visible stem.
const STEM_COUNT: f64 = 1.0;

/// Extra count a branch adds to its own element.
const BRANCH_SELF_COUNT: f64 = 0.5;

/// Weighted element counts and their percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDistribution {
    /// Raw weighted counts.
    pub counts: BTreeMap<Element, f64>,
    /// Percentages summing to 100.
    pub percent: BTreeMap<Element, f64>,
}

impl ElementDistribution {
    /// Tally the elements of `pillars`.
    pub fn compute(pillars: &FourPillars) -> Self {
        let mut counts: BTreeMap<Element, f64> = ALL_ELEMENTS.iter().map(|e| (*e, 0.0)).collect();
        for stem in pillars.stems() {
            *counts.entry(stem.element()).or_insert(0.0) += STEM_COUNT;
        }
        for branch in pillars.branches() {
            for h in hidden_stems(branch) {
                *counts.entry(h.stem.element()).or_insert(0.0) += h.dominance;
            }
            *counts.entry(branch.element()).or_insert(0.0) += BRANCH_SELF_COUNT;
        }
        let total: f64 = counts.values().sum();
        let percent = counts
            .iter()
            .map(|(e, c)| (*e, c / total * DISTRIBUTION_TOTAL))
            .collect();
        Self { counts, percent }
    }

    /// Percentage of `element`.
    pub fn percent_of(&self, element: Element) -> f64 {
        self.percent.get(&element).copied().unwrap_or(0.0)
    }

    /// Percentage of the element standing in `rel` to the day-master element.
    pub fn relation_percent(&self, dm: Element, rel: ElementRelation) -> f64 {
        self.percent_of(rel.element_for(dm))
    }

    /// Elements with no count at all.
    pub fn missing(&self) -> Vec<Element> {
        self.counts
            .iter()
            .filter(|(_, c)| **c <= 0.0)
            .map(|(e, _)| *e)
            .collect()
    }
}
