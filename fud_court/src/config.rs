use anyhow::Result;
use config::Config;
use std::env;

use crate::scoring::ScoreWeights;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AppConfig {
    pub bind_address: String,
    pub coingecko_api_url: String,
    pub coingecko_api_key: Option<String>,
    pub fear_greed_api_url: String,
    pub vs_currency: String,
    pub top_coins_limit: usize,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
    pub historical_max_market_cap_usd: Option<f64>,
    pub snapshot_history_days: usize,
    pub log_dir: Option<String>,
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_address: "0.0.0.0:3000".to_string(),
            coingecko_api_url: "https://api.coingecko.com/api/v3".to_string(),
            coingecko_api_key: None,
            fear_greed_api_url: "https://api.alternative.me/fng/".to_string(),
            vs_currency: "usd".to_string(),
            top_coins_limit: 100,
            max_concurrent_requests: 4,
            request_timeout_secs: 10,
            historical_max_market_cap_usd: None,
            snapshot_history_days: 365,
            log_dir: None,
            weights: ScoreWeights::default(),
        }
    }
}

impl AppConfig {
    /// Валидация конфигурации
    pub fn validate(&self) -> Result<()> {
        if self.vs_currency.trim().is_empty() {
            return Err(anyhow::anyhow!("vs_currency cannot be empty"));
        }

        if self.top_coins_limit == 0 || self.top_coins_limit > 1000 {
            return Err(anyhow::anyhow!("top_coins_limit must be between 1 and 1000"));
        }

        if self.max_concurrent_requests == 0 || self.max_concurrent_requests > 50 {
            return Err(anyhow::anyhow!("max_concurrent_requests must be between 1 and 50"));
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(anyhow::anyhow!("request_timeout_secs must be between 1 and 120"));
        }

        if self.snapshot_history_days == 0 || self.snapshot_history_days > 3650 {
            return Err(anyhow::anyhow!("snapshot_history_days must be between 1 and 3650"));
        }

        if let Some(floor) = self.historical_max_market_cap_usd {
            if !floor.is_finite() || floor <= 0.0 {
                return Err(anyhow::anyhow!(
                    "historical_max_market_cap_usd must be a positive number"
                ));
            }
        }

        self.weights.validate()?;

        Ok(())
    }
}

pub fn load_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let defaults = AppConfig::default();
    let settings = Config::builder()
        .set_default("bind_address", defaults.bind_address)?
        .set_default("coingecko_api_url", defaults.coingecko_api_url)?
        .set_default("fear_greed_api_url", defaults.fear_greed_api_url)?
        .set_default("vs_currency", defaults.vs_currency)?
        .set_default("top_coins_limit", defaults.top_coins_limit as i64)?
        .set_default("max_concurrent_requests", defaults.max_concurrent_requests as i64)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
        .set_default("snapshot_history_days", defaults.snapshot_history_days as i64)?
        .add_source(config::File::with_name("config").required(false))
        .add_source(
            config::Environment::with_prefix("FUD_COURT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if config.coingecko_api_key.is_none() {
        config.coingecko_api_key = env::var("COINGECKO_API_KEY").ok().filter(|k| !k.is_empty());
    }

    config.validate()?;

    Ok(config)
}
