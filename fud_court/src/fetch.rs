use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::{FudCourtError, Result};

/// Типизированный GET с разбором JSON поверх общего клиента reqwest.
///
/// Все обращения к внешним API проходят здесь: `get_json` возвращает ошибку,
/// `get_json_or_none` логирует её и возвращает `None`.
#[derive(Clone)]
pub struct JsonFetcher {
    client: Client,
    headers: Vec<(String, String)>,
}

impl JsonFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("fud_court/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(JsonFetcher {
            client,
            headers: Vec::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub async fn get_json<T: DeserializeOwned>(&self, source: &str, url: &str) -> Result<T> {
        tracing::debug!("{} GET {}", source, url);

        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FudCourtError::ApiError(format!(
                "{} error: {} - {}",
                source, status, error_text
            )));
        }

        let body = response.bytes().await?;
        let value = serde_json::from_slice::<T>(&body)?;
        Ok(value)
    }

    pub async fn get_json_or_none<T: DeserializeOwned>(
        &self,
        source: &str,
        url: &str,
    ) -> Option<T> {
        match self.get_json(source, url).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{} недоступен: {}", source, e);
                None
            }
        }
    }
}
