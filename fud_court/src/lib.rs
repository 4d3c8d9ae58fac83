use std::sync::Arc;
use tokio::sync::Mutex;

pub mod config;
pub mod errors;
pub mod fetch;
pub mod holders;
pub mod models;
pub mod routers;
pub mod scoring;
pub mod services;

pub use crate::config::{load_config, AppConfig};
pub use errors::{FudCourtError, Result};
pub use fetch::JsonFetcher;
pub use holders::SnapshotHolder;
pub use models::{
    ComponentScores, DailySnapshot, MarketAnalysisInput, MarketAnalysisOutput, TopCoin,
};
pub use scoring::{analyze_market, Interpretation, ScoreWeights};
pub use services::{MarketAnalysisService, MarketDataCollectorService};

#[derive(Clone)]
pub struct AppState {
    pub analysis: MarketAnalysisService,
}

impl AppState {
    /// Собирает сервисы из конфигурации.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let collector = MarketDataCollectorService::new(config.clone())?;
        let snapshots = SnapshotHolder::new(config.snapshot_history_days);
        let weights = Arc::new(Mutex::new(config.weights));

        Ok(AppState {
            analysis: MarketAnalysisService::new(collector, snapshots, weights),
        })
    }
}
