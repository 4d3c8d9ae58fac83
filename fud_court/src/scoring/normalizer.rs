use crate::errors::{FudCourtError, Result};
use crate::models::{ComponentScores, MarketAnalysisInput, TopCoin};

pub fn clamp_score(value: f64) -> f64 {
    value.min(100.0).max(0.0)
}

/// Отклоняет данные, на которых компоненты превратились бы в NaN или бесконечность.
pub fn validate_input(input: &MarketAnalysisInput) -> Result<()> {
    require_positive("maxHistoricalMarketCap", input.max_historical_market_cap)?;
    require_positive("avg30DayVolume", input.avg_30_day_volume)?;
    require_positive("btcMarketCap", input.btc_market_cap)?;

    require_non_negative("totalMarketCap", input.total_market_cap)?;
    require_non_negative("totalVolume24h", input.total_volume_24h)?;
    require_non_negative("altcoinMarketCap", input.altcoin_market_cap)?;

    require_percentage("btcDominance", input.btc_dominance)?;
    require_percentage("fearAndGreedIndex", input.fear_and_greed_index)?;

    if input.top_coins.is_empty() {
        return Err(FudCourtError::invalid_input(
            "topCoins",
            "at least one coin is required",
        ));
    }

    for (i, coin) in input.top_coins.iter().enumerate() {
        require_positive(&format!("topCoins[{}].ath", i), coin.ath)?;
        require_non_negative(&format!("topCoins[{}].current_price", i), coin.current_price)?;
    }

    Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FudCourtError::invalid_input(
            field,
            format!("must be a finite number greater than zero, got {}", value),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FudCourtError::invalid_input(
            field,
            format!("must be a finite non-negative number, got {}", value),
        ));
    }
    Ok(())
}

fn require_percentage(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(FudCourtError::invalid_input(
            field,
            format!("must be within 0..=100, got {}", value),
        ));
    }
    Ok(())
}

/// Доля монет с положительным изменением за 24ч, в процентах.
/// Отсутствующее изменение считается нулевым.
pub fn market_breadth_score(coins: &[TopCoin]) -> f64 {
    let advancing = coins
        .iter()
        .filter(|c| c.price_change_percentage_24h.unwrap_or(0.0) > 0.0)
        .count();
    (advancing as f64 / coins.len() as f64) * 100.0
}

/// 100 минус среднее отставание от ATH, в процентах.
///
/// Монеты на уровне ATH или выше дают нулевое отставание, но учитываются
/// в знаменателе.
pub fn ath_score(coins: &[TopCoin]) -> f64 {
    let total_distance: f64 = coins
        .iter()
        .map(|c| 1.0 - c.current_price / c.ath)
        .filter(|distance| *distance > 0.0)
        .sum();
    let avg_distance_from_ath = (total_distance / coins.len() as f64) * 100.0;
    100.0 - avg_distance_from_ath
}

pub fn normalize(input: &MarketAnalysisInput) -> Result<ComponentScores> {
    validate_input(input)?;

    let market_cap = (input.total_market_cap / input.max_historical_market_cap) * 100.0;
    let volume = (input.total_volume_24h / input.avg_30_day_volume) * 100.0;
    let btc_dominance = 100.0 - input.btc_dominance;
    let altseason = (input.altcoin_market_cap / input.btc_market_cap) * 100.0;

    Ok(ComponentScores {
        market_cap: clamp_score(market_cap),
        volume: clamp_score(volume),
        btc_dominance: clamp_score(btc_dominance),
        fear_and_greed: input.fear_and_greed_index,
        altseason: clamp_score(altseason),
        market_breadth: clamp_score(market_breadth_score(&input.top_coins)),
        ath: clamp_score(ath_score(&input.top_coins)),
    })
}
