//! Process-wide engine handle.

use std::sync::OnceLock;

use bazi_config::EngineConfig;

use crate::engine::ChartEngine;
use crate::error::BaziError;

static ENGINE: OnceLock<ChartEngine> = OnceLock::new();

/// Install the global engine. Fails if `config` is invalid or an engine is
/// already installed.
pub fn init(config: EngineConfig) -> Result<(), BaziError> {
    let engine = ChartEngine::new(config)?;
    ENGINE
        .set(engine)
        .map_err(|_| BaziError::AlreadyInitialized)?;
    tracing::debug!("global chart engine installed");
    Ok(())
}

/// Install the global engine with the built-in tables unless one exists.
pub fn init_default() -> &'static ChartEngine {
    ENGINE.get_or_init(ChartEngine::with_defaults)
}

pub fn is_initialized() -> bool {
    ENGINE.get().is_some()
}

/// The global engine.
pub fn engine() -> Result<&'static ChartEngine, BaziError> {
    ENGINE.get().ok_or(BaziError::NotInitialized)
}
