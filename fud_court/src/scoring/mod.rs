//! Макро-оценка настроений рынка: нормализация семи сигналов, взвешенная
//! сумма в диапазоне 0-100 и отнесение к одной из трёх зон.

pub mod interpreter;
pub mod normalizer;
pub mod weights;

pub use interpreter::{Interpretation, BULLISH_THRESHOLD, NEUTRAL_THRESHOLD};
pub use normalizer::{normalize, validate_input};
pub use weights::ScoreWeights;

use crate::errors::Result;
use crate::models::{ComponentScores, MarketAnalysisInput, MarketAnalysisOutput};

/// Округление половины от нуля.
pub fn aggregate(scores: &ComponentScores, weights: &ScoreWeights) -> u8 {
    weights.apply(scores).round().clamp(0.0, 100.0) as u8
}

pub fn analyze_market(
    input: &MarketAnalysisInput,
    weights: &ScoreWeights,
) -> Result<MarketAnalysisOutput> {
    weights.validate()?;
    let components = normalize(input)?;
    let macro_score = aggregate(&components, weights);
    let interpretation = Interpretation::from_score(macro_score);

    Ok(MarketAnalysisOutput {
        macro_score,
        interpretation,
        summary: interpretation.summary().to_string(),
        components,
    })
}
