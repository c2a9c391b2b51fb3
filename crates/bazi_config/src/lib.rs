//! Tunable thresholds and coefficients for the chart engine.
//!
//! Every classification step that cuts a continuous value into labels reads
//! its cut-offs from here, so the tables can be adjusted from a TOML file
//! without touching classification code. The rule tables themselves (stems,
//! branches, shensha lookups) are not configurable.
//!
//! ```toml
//! [strength]
//! shen_qiang = 0.60
//!
//! [luck]
//! cycle_count = 10
//! ```
//!
//! Missing sections and keys fall back to [`EngineConfig::default`].

pub mod error;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

// ---------------------------------------------------------------------------
// 1. Day-master strength
// ---------------------------------------------------------------------------

/// Band cut-offs and weighted-sum coefficients of the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrengthConfig {
    /// Scores at or above this are 从强 candidates.
    pub cong_qiang: f64,
    /// Lower bound of 身强.
    pub shen_qiang: f64,
    /// Lower bound of 平衡.
    pub ping_heng: f64,
    /// Lower bound of 身弱; below it is a 从弱 candidate.
    pub shen_ruo: f64,

    /// Weight of seasonal support.
    pub w_month: f64,
    /// Weight of rooting.
    pub w_root: f64,
    /// Weight of help (比劫 + 印).
    pub w_help: f64,
    /// Weight of drain (官杀 + 财 + 食伤), subtracted.
    pub w_drain: f64,
    /// Constant offset added before clamping.
    pub bias: f64,

    /// Root sum that saturates the root signal.
    pub root_saturation: f64,
    /// Help sum that saturates the help signal.
    pub help_saturation: f64,
    /// Drain sum that saturates the drain signal.
    pub drain_saturation: f64,

    /// Help must exceed drain by this ratio for 从强 (and vice versa for 从弱).
    pub cong_ratio: f64,
    /// Largest drain still allowing 从强.
    pub cong_qiang_max_drain: f64,
    /// Largest help still allowing 从弱.
    pub cong_ruo_max_help: f64,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            cong_qiang: 0.85,
            shen_qiang: 0.62,
            ping_heng: 0.45,
            shen_ruo: 0.22,
            w_month: 0.45,
            w_root: 0.35,
            w_help: 0.25,
            w_drain: 0.35,
            bias: 0.12,
            root_saturation: 1.5,
            help_saturation: 3.5,
            drain_saturation: 1.5,
            cong_ratio: 1.6,
            cong_qiang_max_drain: 0.55,
            cong_ruo_max_help: 0.45,
        }
    }
}

impl StrengthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bands = [self.cong_qiang, self.shen_qiang, self.ping_heng, self.shen_ruo];
        if !strictly_decreasing(&bands) || bands.iter().any(|b| !(0.0..=1.0).contains(b)) {
            return Err(ConfigError::Invalid(
                "strength bands must strictly decrease within [0, 1]",
            ));
        }
        let positive = [
            self.w_month,
            self.w_root,
            self.w_help,
            self.w_drain,
            self.root_saturation,
            self.help_saturation,
            self.drain_saturation,
            self.cong_ratio,
        ];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ConfigError::Invalid(
                "strength weights and saturations must be positive",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 2. Stability (chaos, 0–100 strength, rooting)
// ---------------------------------------------------------------------------

/// Cut-offs for the stability labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StabilityConfig {
    /// Chaos below this is 穩定.
    pub chaos_stable: f64,
    /// Chaos below this is 偏穩.
    pub chaos_mostly_stable: f64,
    /// Chaos below this is 多變 (career) / 起伏大 (wealth).
    pub chaos_volatile: f64,

    /// 0–100 strength at or above this is 很強.
    pub level_very_strong: f64,
    /// 0–100 strength at or above this is 較強.
    pub level_strong: f64,
    /// 0–100 strength at or above this is 中等.
    pub level_medium: f64,

    /// Rooting at or above this is 有根.
    pub rooted: f64,
    /// Rooting at or above this is 部分有根.
    pub partly_rooted: f64,

    /// Share of chaos contributed by impurity (1 − purity).
    pub purity_weight: f64,
    /// Factor count that saturates the count term.
    pub count_divisor: f64,
    /// Cap of the count term per category.
    pub category_cap: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            chaos_stable: 0.2,
            chaos_mostly_stable: 0.4,
            chaos_volatile: 0.7,
            level_very_strong: 80.0,
            level_strong: 65.0,
            level_medium: 50.0,
            rooted: 0.6,
            partly_rooted: 0.3,
            purity_weight: 0.5,
            count_divisor: 3.0,
            category_cap: 0.5,
        }
    }
}

impl StabilityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !strictly_increasing(&[self.chaos_stable, self.chaos_mostly_stable, self.chaos_volatile])
        {
            return Err(ConfigError::Invalid("chaos bands must strictly increase"));
        }
        if !strictly_decreasing(&[self.level_very_strong, self.level_strong, self.level_medium]) {
            return Err(ConfigError::Invalid("strength levels must strictly decrease"));
        }
        if !strictly_decreasing(&[self.rooted, self.partly_rooted]) {
            return Err(ConfigError::Invalid("rooting levels must strictly decrease"));
        }
        if self.count_divisor <= 0.0 || !(0.0..=1.0).contains(&self.category_cap) {
            return Err(ConfigError::Invalid(
                "count_divisor must be positive and category_cap within [0, 1]",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 3. 破格 severity
// ---------------------------------------------------------------------------

/// Severity weights and level cut-offs for pattern-breaking factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PogeConfig {
    /// Severity at or above this is 严重.
    pub severe: f64,
    /// Severity at or above this is 中等.
    pub moderate: f64,
    /// Severity at or above this is 轻微; below is 微瑕.
    pub mild: f64,
    /// Position weight when the factor shows on stems only.
    pub stem_weight: f64,
    /// Position weight when the factor sits in branches only.
    pub branch_weight: f64,
    /// Position weight when it appears in both.
    pub both_weight: f64,
    /// Extra severity per affected life area.
    pub impact_factor: f64,
    /// Multiplier for factors formed by two ten gods.
    pub combo_multiplier: f64,
}

impl Default for PogeConfig {
    fn default() -> Self {
        Self {
            severe: 2.5,
            moderate: 1.8,
            mild: 1.2,
            stem_weight: 1.2,
            branch_weight: 1.5,
            both_weight: 1.8,
            impact_factor: 0.3,
            combo_multiplier: 1.5,
        }
    }
}

impl PogeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !strictly_decreasing(&[self.severe, self.moderate, self.mild]) {
            return Err(ConfigError::Invalid("poge levels must strictly decrease"));
        }
        if [self.stem_weight, self.branch_weight, self.both_weight, self.combo_multiplier]
            .iter()
            .any(|w| *w <= 0.0)
        {
            return Err(ConfigError::Invalid("poge weights must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 4. Luck cycles
// ---------------------------------------------------------------------------

/// Shape of the luck-cycle timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LuckConfig {
    /// Number of cycles generated.
    pub cycle_count: u8,
    /// Years per cycle.
    pub span_years: u8,
}

impl Default for LuckConfig {
    fn default() -> Self {
        Self {
            cycle_count: 8,
            span_years: 10,
        }
    }
}

impl LuckConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_count == 0 || self.span_years == 0 {
            return Err(ConfigError::Invalid("cycle_count and span_years must be > 0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 5. Favorability windows
// ---------------------------------------------------------------------------

/// Score contributions and level cut-offs of favorability windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Added when the containing luck cycle is good.
    pub luck_good: f64,
    /// Added when the containing luck cycle is a wave (usually negative).
    pub luck_wave: f64,
    /// Added (favourable) or subtracted (unfavourable) by the year's stem.
    pub year_favour: f64,
    /// Added when the year's ten god falls in a target bucket.
    pub target_hit: f64,
    /// 六合 with the anchor branch.
    pub he: f64,
    /// Year branch completes a 三合 with the anchor.
    pub san_he: f64,
    /// 六冲 with the anchor.
    pub chong: f64,
    /// 刑 with the anchor.
    pub xing: f64,
    /// 六害 with the anchor.
    pub hai: f64,
    /// 相破 with the anchor.
    pub po: f64,
    /// Score at or above this is golden.
    pub golden: f64,
    /// Score at or above this is good.
    pub good: f64,
    /// Score strictly above this is normal; otherwise hard.
    pub normal: f64,
    /// Absolute clamp on the total score.
    pub clamp: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            luck_good: 0.5,
            luck_wave: -0.5,
            year_favour: 1.0,
            target_hit: 1.0,
            he: 1.0,
            san_he: 0.5,
            chong: -1.5,
            xing: -0.75,
            hai: -0.5,
            po: -0.25,
            golden: 1.5,
            good: 0.5,
            normal: -0.5,
            clamp: 2.0,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !strictly_decreasing(&[self.golden, self.good, self.normal]) {
            return Err(ConfigError::Invalid("window levels must strictly decrease"));
        }
        if self.clamp <= 0.0 {
            return Err(ConfigError::Invalid("window clamp must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

/// All tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub strength: StrengthConfig,
    pub stability: StabilityConfig,
    pub poge: PogeConfig,
    pub luck: LuckConfig,
    pub window: WindowConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every threshold table is ordered and every weight usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strength.validate()?;
        self.stability.validate()?;
        self.poge.validate()?;
        self.luck.validate()?;
        self.window.validate()
    }
}

fn strictly_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] > w[1])
}

fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}
