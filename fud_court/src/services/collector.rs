use futures::stream::{self, StreamExt};
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{FudCourtError, Result};
use crate::fetch::JsonFetcher;
use crate::models::{
    CoinGeckoGlobalData, CoinGeckoGlobalResponse, CoinGeckoMarketCapChart,
    CoinGeckoMarketCapChartResponse, CoinGeckoMarketCoin, FearGreedResponse,
    MarketAnalysisInput, TopCoin,
};

// CoinGecko отдаёт не больше 250 монет на страницу /coins/markets
const MAX_PAGE_SIZE: usize = 250;
const VOLUME_WINDOW_DAYS: &str = "30";
const ATH_WINDOW_DAYS: &str = "max";

/// Глобальные показатели из `/global` CoinGecko.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalMarket {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub btc_dominance: f64,
}

/// Исторический максимум капитализации и средний объём за 30 дней.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketHistory {
    pub max_market_cap: f64,
    pub avg_volume: f64,
}

#[derive(Clone)]
pub struct MarketDataCollectorService {
    coingecko: JsonFetcher,
    fear_greed: JsonFetcher,
    config: AppConfig,
}

impl MarketDataCollectorService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let mut coingecko = JsonFetcher::new(timeout)?;
        if let Some(key) = &config.coingecko_api_key {
            coingecko = coingecko.with_header("x-cg-pro-api-key", key.clone());
        }
        let fear_greed = JsonFetcher::new(timeout)?;

        Ok(MarketDataCollectorService {
            coingecko,
            fear_greed,
            config,
        })
    }

    /// Опрашивает все источники параллельно и дожидается каждого,
    /// чтобы в ошибке были перечислены все недоступные источники.
    pub async fn collect_input(&self) -> Result<MarketAnalysisInput> {
        let global_task = {
            let service = self.clone();
            tokio::spawn(async move { service.collect_global().await })
        };
        let history_task = {
            let service = self.clone();
            tokio::spawn(async move { service.collect_history().await })
        };
        let coins_task = {
            let service = self.clone();
            tokio::spawn(async move { service.collect_top_coins().await })
        };
        let fear_greed_task = {
            let service = self.clone();
            tokio::spawn(async move { service.collect_fear_and_greed().await })
        };

        let (global, history, coins, fear_greed) =
            tokio::try_join!(global_task, history_task, coins_task, fear_greed_task)?;

        let mut failed = Vec::new();
        let global = settle("CoinGecko global", global, &mut failed);
        let history = settle("CoinGecko market cap chart", history, &mut failed);
        let coins = settle("CoinGecko markets", coins, &mut failed);
        let fear_greed = settle("Fear & Greed index", fear_greed, &mut failed);

        match (global, history, coins, fear_greed) {
            (Some(global), Some(history), Some(coins), Some(fear_greed)) => {
                let input = self.assemble(global, history, coins, fear_greed);
                tracing::info!(
                    "Собраны рыночные данные: капитализация {:.0}, монет {}, fear & greed {}",
                    input.total_market_cap,
                    input.top_coins.len(),
                    input.fear_and_greed_index
                );
                Ok(input)
            }
            _ => Err(FudCourtError::InsufficientData(format!(
                "unavailable sources: {}",
                failed.join(", ")
            ))),
        }
    }

    fn assemble(
        &self,
        global: GlobalMarket,
        history: MarketHistory,
        top_coins: Vec<TopCoin>,
        fear_and_greed_index: f64,
    ) -> MarketAnalysisInput {
        let btc_market_cap = global.total_market_cap * global.btc_dominance / 100.0;
        let altcoin_market_cap = global.total_market_cap - btc_market_cap;

        let max_historical_market_cap = self
            .config
            .historical_max_market_cap_usd
            .unwrap_or(0.0)
            .max(history.max_market_cap)
            .max(global.total_market_cap);

        MarketAnalysisInput {
            total_market_cap: global.total_market_cap,
            max_historical_market_cap,
            total_volume_24h: global.total_volume_24h,
            avg_30_day_volume: history.avg_volume,
            btc_dominance: global.btc_dominance,
            altcoin_market_cap,
            btc_market_cap,
            fear_and_greed_index,
            top_coins,
        }
    }

    pub async fn collect_global(&self) -> Result<GlobalMarket> {
        let url = format!("{}/global", self.config.coingecko_api_url.trim_end_matches('/'));
        let response: CoinGeckoGlobalResponse =
            self.coingecko.get_json("CoinGecko global", &url).await?;
        parse_global(&response.data, &self.config.vs_currency)
    }

    /// Объём берётся из 30-дневного графика, максимум капитализации из
    /// графика за всю историю.
    pub async fn collect_history(&self) -> Result<MarketHistory> {
        let recent_url = self.market_cap_chart_url(VOLUME_WINDOW_DAYS);
        let long_range_url = self.market_cap_chart_url(ATH_WINDOW_DAYS);

        let source = "CoinGecko market cap chart";
        let (recent, long_range) = tokio::try_join!(
            self.coingecko
                .get_json::<CoinGeckoMarketCapChartResponse>(source, &recent_url),
            self.coingecko
                .get_json::<CoinGeckoMarketCapChartResponse>(source, &long_range_url),
        )?;

        summarize_history(&recent.market_cap_chart, &long_range.market_cap_chart)
    }

    /// Первая страница обязательна; остальные только расширяют выборку
    /// и при ошибке пропускаются с предупреждением.
    pub async fn collect_top_coins(&self) -> Result<Vec<TopCoin>> {
        let limit = self.config.top_coins_limit;
        let per_page = limit.min(MAX_PAGE_SIZE);
        let pages = (limit + per_page - 1) / per_page;

        let first: Vec<CoinGeckoMarketCoin> = self
            .coingecko
            .get_json("CoinGecko markets", &self.markets_url(1, per_page))
            .await?;

        let rest: Vec<Option<(usize, Vec<CoinGeckoMarketCoin>)>> = stream::iter(2..=pages)
            .map(|page| {
                let url = self.markets_url(page, per_page);
                async move {
                    self.coingecko
                        .get_json_or_none::<Vec<CoinGeckoMarketCoin>>("CoinGecko markets", &url)
                        .await
                        .map(|coins| (page, coins))
                }
            })
            .buffer_unordered(self.config.max_concurrent_requests)
            .collect()
            .await;

        let mut later: Vec<(usize, Vec<CoinGeckoMarketCoin>)> =
            rest.into_iter().flatten().collect();
        later.sort_by_key(|(page, _)| *page);

        let mut top_coins = Vec::with_capacity(limit);
        for coin in first
            .iter()
            .chain(later.iter().flat_map(|(_, coins)| coins.iter()))
            .take(limit)
        {
            match coin.to_top_coin() {
                Some(top_coin) => top_coins.push(top_coin),
                None => tracing::debug!(
                    "Пропущена монета {} ({}): нет цены или ATH",
                    coin.id,
                    coin.symbol
                ),
            }
        }

        if top_coins.is_empty() {
            return Err(FudCourtError::InvalidDataFormat(
                "no coins with price and ATH in markets response".to_string(),
            ));
        }

        Ok(top_coins)
    }

    pub async fn collect_fear_and_greed(&self) -> Result<f64> {
        let url = format!("{}?limit=1", self.config.fear_greed_api_url);
        let response: FearGreedResponse =
            self.fear_greed.get_json("Fear & Greed index", &url).await?;
        let entry = response.data.first().ok_or_else(|| {
            FudCourtError::InvalidDataFormat("empty fear & greed data".to_string())
        })?;
        if let Some(label) = &entry.value_classification {
            tracing::debug!("Fear & Greed: {} ({})", entry.value, label);
        }
        Ok(entry.value)
    }

    fn market_cap_chart_url(&self, days: &str) -> String {
        format!(
            "{}/global/market_cap_chart?vs_currency={}&days={}",
            self.config.coingecko_api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.vs_currency),
            days
        )
    }

    fn markets_url(&self, page: usize, per_page: usize) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&price_change_percentage=24h",
            self.config.coingecko_api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.vs_currency),
            per_page,
            page
        )
    }
}

fn settle<T>(source: &str, result: Result<T>, failed: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{} недоступен: {}", source, e);
            failed.push(source.to_string());
            None
        }
    }
}

pub fn parse_global(data: &CoinGeckoGlobalData, vs_currency: &str) -> Result<GlobalMarket> {
    let currency = vs_currency.to_lowercase();
    let total_market_cap = *data.total_market_cap.get(&currency).ok_or_else(|| {
        FudCourtError::InvalidDataFormat(format!("total_market_cap.{} missing", currency))
    })?;
    let total_volume_24h = *data.total_volume.get(&currency).ok_or_else(|| {
        FudCourtError::InvalidDataFormat(format!("total_volume.{} missing", currency))
    })?;
    let btc_dominance = *data.market_cap_percentage.get("btc").ok_or_else(|| {
        FudCourtError::InvalidDataFormat("market_cap_percentage.btc missing".to_string())
    })?;

    if !total_market_cap.is_finite() || total_market_cap <= 0.0 {
        return Err(FudCourtError::InvalidDataFormat(format!(
            "total_market_cap.{} is not positive: {}",
            currency, total_market_cap
        )));
    }
    if !total_volume_24h.is_finite() || total_volume_24h < 0.0 {
        return Err(FudCourtError::InvalidDataFormat(format!(
            "total_volume.{} is negative: {}",
            currency, total_volume_24h
        )));
    }
    // Нулевая доминация даёт нулевую капитализацию BTC, на неё делится altseason
    if !btc_dominance.is_finite() || btc_dominance <= 0.0 || btc_dominance > 100.0 {
        return Err(FudCourtError::InvalidDataFormat(format!(
            "market_cap_percentage.btc out of range: {}",
            btc_dominance
        )));
    }

    Ok(GlobalMarket {
        total_market_cap,
        total_volume_24h,
        btc_dominance,
    })
}

pub fn summarize_history(
    recent: &CoinGeckoMarketCapChart,
    long_range: &CoinGeckoMarketCapChart,
) -> Result<MarketHistory> {
    if recent.volume.is_empty() {
        return Err(FudCourtError::InvalidDataFormat(
            "market cap chart has no volume series".to_string(),
        ));
    }

    let avg_volume = recent.volume.iter().map(|p| p.1).sum::<f64>() / recent.volume.len() as f64;
    if !avg_volume.is_finite() || avg_volume <= 0.0 {
        return Err(FudCourtError::InvalidDataFormat(format!(
            "average 30 day volume is not positive: {}",
            avg_volume
        )));
    }

    let max_market_cap = long_range
        .market_cap
        .iter()
        .chain(recent.market_cap.iter())
        .map(|p| p.1)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    Ok(MarketHistory {
        max_market_cap,
        avg_volume,
    })
}
