//! Chart engine with a memoized static-chart cache.
//!
//! The static chart depends only on the birth input and the configuration,
//! so it is computed once per [`BirthKey`] and shared through an `Arc`.
//! Query results depend on the reference year and are never cached.
//!
//! The cache holds at most `capacity` charts; the oldest entry goes first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bazi_base::{
    BirthInfo, CalendarKind, Chart, ChartQuery, DayBoundary, QueryResult, Sex, compute_chart,
    query,
};
use bazi_config::EngineConfig;
use bazi_time::UtcOffset;
use parking_lot::RwLock;

use crate::error::BaziError;

/// Arc-second resolution of cached longitudes.
const ARCSEC_PER_DEG: f64 = 3600.0;

/// Charts kept by [`ChartEngine::new`] and [`ChartEngine::with_defaults`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Hashable normalization of a [`BirthInfo`].
///
/// Longitudes are rounded to whole arc-seconds so that equal inputs
/// written with different float noise share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BirthKey {
    sex: Sex,
    calendar: CalendarKind,
    date: (i32, u8, u8),
    time: (u8, u8),
    offset: UtcOffset,
    true_solar: Option<(i64, i64)>,
    day_boundary: DayBoundary,
}

impl From<&BirthInfo> for BirthKey {
    fn from(b: &BirthInfo) -> Self {
        let arcsec = |deg: f64| (deg * ARCSEC_PER_DEG).round() as i64;
        Self {
            sex: b.sex,
            calendar: b.calendar,
            date: (b.year, b.month, b.day),
            time: (b.hour, b.minute),
            offset: b.offset,
            true_solar: b
                .true_solar_time
                .map(|t| (arcsec(t.longitude_deg), arcsec(t.std_meridian_deg))),
            day_boundary: b.day_boundary,
        }
    }
}

#[derive(Debug, Default)]
struct ChartCache {
    charts: HashMap<BirthKey, Arc<Chart>>,
    /// Keys in insertion order.
    order: VecDeque<BirthKey>,
}

impl ChartCache {
    /// Insert unless present, evicting the oldest entries beyond `capacity`.
    fn insert(&mut self, key: BirthKey, chart: Arc<Chart>, capacity: usize) -> Arc<Chart> {
        if let Some(existing) = self.charts.get(&key) {
            return Arc::clone(existing);
        }
        while self.charts.len() >= capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.charts.remove(&oldest);
            tracing::trace!(?oldest, "chart evicted");
        }
        self.order.push_back(key);
        self.charts.insert(key, Arc::clone(&chart));
        chart
    }

    fn clear(&mut self) {
        self.charts.clear();
        self.order.clear();
    }
}

/// A validated configuration plus the chart cache.
#[derive(Debug)]
pub struct ChartEngine {
    config: EngineConfig,
    capacity: usize,
    cache: RwLock<ChartCache>,
}

impl ChartEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self, BaziError> {
        Self::with_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    /// Create an engine caching at most `capacity` charts; 0 disables the
    /// cache.
    pub fn with_capacity(config: EngineConfig, capacity: usize) -> Result<Self, BaziError> {
        config.validate()?;
        Ok(Self {
            config,
            capacity,
            cache: RwLock::new(ChartCache::default()),
        })
    }

    /// Engine over the built-in tables.
    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
            capacity: DEFAULT_CACHE_CAPACITY,
            cache: RwLock::new(ChartCache::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Static chart for `birth`, computed on first use.
    pub fn chart(&self, birth: &BirthInfo) -> Result<Arc<Chart>, BaziError> {
        let key = BirthKey::from(birth);
        if let Some(chart) = self.cache.read().charts.get(&key) {
            tracing::trace!(?key, "chart cache hit");
            return Ok(Arc::clone(chart));
        }

        let chart = Arc::new(compute_chart(birth, &self.config)?);
        if self.capacity == 0 {
            return Ok(chart);
        }
        // A concurrent writer may have landed first; its chart wins.
        let mut cache = self.cache.write();
        let chart = cache.insert(key, chart, self.capacity);
        tracing::debug!(entries = cache.charts.len(), "chart cached");
        Ok(chart)
    }

    /// Reference-year evaluation of the cached chart for `birth`.
    pub fn query(&self, birth: &BirthInfo, q: &ChartQuery) -> Result<QueryResult, BaziError> {
        let chart = self.chart(birth)?;
        Ok(query(&chart, q, &self.config)?)
    }

    /// Number of cached charts.
    pub fn cached(&self) -> usize {
        self.cache.read().charts.len()
    }

    /// Drop every cached chart.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_base::TrueSolarTime;

    fn birth() -> BirthInfo {
        BirthInfo::builder()
            .sex(Sex::Female)
            .solar_date(2025, 6, 20)
            .time(8, 0)
            .build()
            .unwrap()
    }

    #[test]
    fn longitude_noise_shares_a_key() {
        let mut a = birth();
        a.true_solar_time = Some(TrueSolarTime {
            longitude_deg: 116.4,
            std_meridian_deg: 120.0,
        });
        let mut b = a.clone();
        b.true_solar_time = Some(TrueSolarTime {
            longitude_deg: 116.400_000_01,
            std_meridian_deg: 120.0,
        });
        assert_eq!(BirthKey::from(&a), BirthKey::from(&b));
        assert_ne!(BirthKey::from(&a), BirthKey::from(&birth()));
    }

    #[test]
    fn second_call_hits_the_cache() {
        let engine = ChartEngine::new(EngineConfig::default()).unwrap();
        let first = engine.chart(&birth()).unwrap();
        let second = engine.chart(&birth()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cached(), 1);
        engine.clear_cache();
        assert_eq!(engine.cached(), 0);
    }

    #[test]
    fn oldest_chart_is_evicted_at_capacity() {
        let engine = ChartEngine::with_capacity(EngineConfig::default(), 2).unwrap();
        let day = |d: u8| {
            BirthInfo::builder()
                .sex(Sex::Male)
                .solar_date(2000, 1, d)
                .time(12, 0)
                .build()
                .unwrap()
        };
        let first = engine.chart(&day(1)).unwrap();
        engine.chart(&day(2)).unwrap();
        engine.chart(&day(3)).unwrap();
        assert_eq!(engine.cached(), 2);
        // day 1 was dropped and comes back as a fresh chart
        let again = engine.chart(&day(1)).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(*first, *again);
        assert_eq!(engine.cached(), 2);
    }

    #[test]
    fn zero_capacity_never_caches() {
        let engine = ChartEngine::with_capacity(EngineConfig::default(), 0).unwrap();
        let a = engine.chart(&birth()).unwrap();
        let b = engine.chart(&birth()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(engine.cached(), 0);
    }

    #[test]
    fn failures_are_not_cached() {
        let engine = ChartEngine::new(EngineConfig::default()).unwrap();
        let mut bad = birth();
        bad.year = 2150;
        assert!(engine.chart(&bad).is_err());
        assert_eq!(engine.cached(), 0);
    }

    #[test]
    fn defaults_validate() {
        let engine = ChartEngine::with_defaults();
        assert!(engine.config().validate().is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.luck.cycle_count = 0;
        assert!(matches!(ChartEngine::new(cfg), Err(BaziError::Config(_))));
    }
}
