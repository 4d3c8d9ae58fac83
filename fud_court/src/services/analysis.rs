use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::{FudCourtError, Result};
use crate::holders::SnapshotHolder;
use crate::models::{DailySnapshot, MarketAnalysisInput, MarketAnalysisOutput};
use crate::scoring::{self, ScoreWeights};
use crate::services::MarketDataCollectorService;

#[derive(Clone)]
pub struct MarketAnalysisService {
    collector: MarketDataCollectorService,
    snapshots: SnapshotHolder,
    weights: Arc<Mutex<ScoreWeights>>,
}

impl MarketAnalysisService {
    pub fn new(
        collector: MarketDataCollectorService,
        snapshots: SnapshotHolder,
        weights: Arc<Mutex<ScoreWeights>>,
    ) -> Self {
        MarketAnalysisService {
            collector,
            snapshots,
            weights,
        }
    }

    /// Собирает живые данные, считает оценку и сохраняет снимок за сегодня.
    pub async fn analyze_live(&self) -> Result<MarketAnalysisOutput> {
        let input = self.collector.collect_input().await?;
        // Некорректные данные от источников - проблема сервера, а не клиента
        let output = self.analyze_input(&input).await.map_err(|e| match e {
            FudCourtError::InvalidInput { field, reason } => FudCourtError::InsufficientData(
                format!("upstream value `{}` rejected: {}", field, reason),
            ),
            other => other,
        })?;
        self.record(Utc::now().date_naive(), &output).await?;
        Ok(output)
    }

    /// Оценка переданных клиентом данных с текущими весами. Снимок не сохраняется.
    pub async fn analyze_input(&self, input: &MarketAnalysisInput) -> Result<MarketAnalysisOutput> {
        let weights = self.weights().await;
        let output = scoring::analyze_market(input, &weights)?;
        tracing::info!("Макро-оценка {} ({})", output.macro_score, output.interpretation);
        Ok(output)
    }

    pub async fn record(&self, date: NaiveDate, output: &MarketAnalysisOutput) -> Result<()> {
        self.snapshots
            .record(DailySnapshot::from_output(date, output))
            .await
    }

    pub async fn weights(&self) -> ScoreWeights {
        *self.weights.lock().await
    }

    pub async fn set_weights(&self, weights: ScoreWeights) -> Result<()> {
        weights.validate()?;
        let mut active = self.weights.lock().await;
        *active = weights;
        tracing::info!("Веса оценки заменены: {:?}", weights);
        Ok(())
    }

    pub fn snapshots(&self) -> &SnapshotHolder {
        &self.snapshots
    }
}
