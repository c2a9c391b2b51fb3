//! Shensha (神煞) detection.
//!
//! Static markers depend only on the four pillars and are cached with the
//! chart; floating markers also need a reference-year branch and are
//! computed per query. Both walk the same [`REGISTRY`].

pub mod flow;
pub mod rules;
pub mod types;

pub use flow::{FloatingShensha, detect_floating};
pub use rules::{REGISTRY, ShenshaRule, rule_for};
pub use types::{
    ALL_SHENSHA_CODES, MAX_REFERENCE_YEAR, MIN_REFERENCE_YEAR, PositionSet, ReferenceYear,
    RuleScope, ShenshaCode, ShenshaGroup, ShenshaHits, check_reference_year,
};

use crate::ganzhi::Branch;
use crate::pillars::FourPillars;

/// Run every rule accepted by `keep` and collect the non-empty hits.
fn collect_hits(
    pillars: &FourPillars,
    reference: Option<Branch>,
    keep: impl Fn(RuleScope) -> bool,
) -> ShenshaHits {
    let mut hits = ShenshaHits::new();
    for rule in REGISTRY.iter().filter(|r| keep(r.scope())) {
        let positions = rule.evaluate(pillars, reference);
        if !positions.is_empty() {
            hits.insert(rule.code(), positions);
        }
    }
    hits
}

/// Markers that depend only on the birth chart.
pub fn detect_static(pillars: &FourPillars) -> ShenshaHits {
    let hits = collect_hits(pillars, None, |s| s != RuleScope::FloatingYear);
    tracing::debug!(markers = hits.len(), "static shensha detected");
    hits
}
