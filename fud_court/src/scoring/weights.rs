use serde::{Deserialize, Serialize};

use crate::errors::{FudCourtError, Result};
use crate::models::ComponentScores;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Вклад каждой компоненты в макро-оценку.
/// Отсутствующие ключи берутся из значений по умолчанию.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub market_cap: f64,
    pub volume: f64,
    pub btc_dominance: f64,
    pub fear_and_greed: f64,
    pub altseason: f64,
    pub market_breadth: f64,
    pub ath: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            market_cap: 0.20,
            volume: 0.10,
            btc_dominance: 0.15,
            fear_and_greed: 0.20,
            altseason: 0.10,
            market_breadth: 0.15,
            ath: 0.10,
        }
    }
}

impl ScoreWeights {
    fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("market_cap", self.market_cap),
            ("volume", self.volume),
            ("btc_dominance", self.btc_dominance),
            ("fear_and_greed", self.fear_and_greed),
            ("altseason", self.altseason),
            ("market_breadth", self.market_breadth),
            ("ath", self.ath),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.entries() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(FudCourtError::InvalidWeights(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(FudCourtError::InvalidWeights(format!(
                "weights must sum to 1.0, got {:.6}",
                sum
            )));
        }

        Ok(())
    }

    /// Взвешенная сумма компонент до округления.
    pub fn apply(&self, scores: &ComponentScores) -> f64 {
        self.market_cap * scores.market_cap
            + self.volume * scores.volume
            + self.btc_dominance * scores.btc_dominance
            + self.fear_and_greed * scores.fear_and_greed
            + self.altseason * scores.altseason
            + self.market_breadth * scores.market_breadth
            + self.ath * scores.ath
    }
}
