use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::scoring::Interpretation;

/// Монета из корзины для ширины рынка и отставания от ATH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCoin {
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    pub ath: f64,
    pub current_price: f64,
}

/// Сырые рыночные метрики от внешних источников.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisInput {
    pub total_market_cap: f64,
    pub max_historical_market_cap: f64,
    pub total_volume_24h: f64,
    pub avg_30_day_volume: f64,
    pub btc_dominance: f64,
    pub altcoin_market_cap: f64,
    pub btc_market_cap: f64,
    pub fear_and_greed_index: f64,
    pub top_coins: Vec<TopCoin>,
}

/// Нормализованные компоненты, каждая в 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub market_cap: f64,
    pub volume: f64,
    pub btc_dominance: f64,
    pub fear_and_greed: f64,
    pub altseason: f64,
    pub market_breadth: f64,
    pub ath: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisOutput {
    pub macro_score: u8,
    pub interpretation: Interpretation,
    pub summary: String,
    pub components: ComponentScores,
}

/// Одна запись на UTC-день.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub macro_score: u8,
    pub market_cap_score: u8,
    pub volume_score: u8,
    pub btc_dominance_score: u8,
    pub fear_and_greed_score: u8,
    pub altseason_score: u8,
    pub market_breadth_score: u8,
    pub ath_score: u8,
}

impl DailySnapshot {
    pub fn from_output(date: NaiveDate, output: &MarketAnalysisOutput) -> Self {
        let c = &output.components;
        DailySnapshot {
            date,
            macro_score: output.macro_score,
            market_cap_score: score_to_int(c.market_cap),
            volume_score: score_to_int(c.volume),
            btc_dominance_score: score_to_int(c.btc_dominance),
            fear_and_greed_score: score_to_int(c.fear_and_greed),
            altseason_score: score_to_int(c.altseason),
            market_breadth_score: score_to_int(c.market_breadth),
            ath_score: score_to_int(c.ath),
        }
    }
}

fn score_to_int(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

// --- Ответы CoinGecko ---

#[derive(Debug, Deserialize)]
pub struct CoinGeckoGlobalResponse {
    pub data: CoinGeckoGlobalData,
}

#[derive(Debug, Deserialize)]
pub struct CoinGeckoGlobalData {
    pub total_market_cap: HashMap<String, f64>,
    pub total_volume: HashMap<String, f64>,
    pub market_cap_percentage: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoMarketCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    pub current_price: Option<f64>,
    pub ath: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

impl CoinGeckoMarketCoin {
    /// Монеты без цены или ATH в оценке не участвуют.
    pub fn to_top_coin(&self) -> Option<TopCoin> {
        Some(TopCoin {
            price_change_percentage_24h: self.price_change_percentage_24h,
            ath: self.ath?,
            current_price: self.current_price?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketCapChartResponse {
    pub market_cap_chart: CoinGeckoMarketCapChart,
}

#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketCapChart {
    #[serde(default)]
    pub market_cap: Vec<ChartPoint>,
    #[serde(default)]
    pub volume: Vec<ChartPoint>,
}

/// `[timestamp_ms, value]`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChartPoint(pub f64, pub f64);

// --- Alternative.me Fear & Greed ---

#[derive(Debug, Deserialize)]
pub struct FearGreedResponse {
    pub data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FearGreedEntry {
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
    #[serde(default)]
    pub value_classification: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

// Индекс приходит строкой в кавычках
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
