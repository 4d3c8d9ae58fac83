use serde::{Deserialize, Serialize};
use std::fmt;

pub const BULLISH_THRESHOLD: u8 = 70;
pub const NEUTRAL_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    Bullish,
    Neutral,
    Bearish,
}

impl Interpretation {
    /// Нижние границы включительно: 70 - бычья зона, 40 - нейтральная.
    pub fn from_score(score: u8) -> Self {
        if score >= BULLISH_THRESHOLD {
            Interpretation::Bullish
        } else if score >= NEUTRAL_THRESHOLD {
            Interpretation::Neutral
        } else {
            Interpretation::Bearish
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Interpretation::Bullish => {
                "The market is showing strong bullish signals, indicating high confidence and positive momentum."
            }
            Interpretation::Neutral => {
                "The market is in a neutral zone, showing a mix of signals without a clear directional trend."
            }
            Interpretation::Bearish => {
                "The market is showing bearish signals, suggesting caution and potential for downward price movement."
            }
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Interpretation::Bullish => "Bullish",
            Interpretation::Neutral => "Neutral",
            Interpretation::Bearish => "Bearish",
        };
        f.write_str(label)
    }
}
