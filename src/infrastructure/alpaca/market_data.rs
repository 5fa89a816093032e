use super::common::AlpacaBar;
use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::DailyBar;
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, warn};

// ===== Market Data Service (REST, daily bars) =====

pub struct AlpacaMarketDataService {
    client: ClientWithMiddleware,
    api_key: String,
    api_secret: String,
    data_base_url: String,
    feed: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarResponse {
    #[serde(default)]
    bars: Option<HashMap<String, Vec<AlpacaBar>>>,
    next_page_token: Option<String>,
}

impl AlpacaMarketDataService {
    pub fn builder() -> AlpacaMarketDataServiceBuilder {
        AlpacaMarketDataServiceBuilder::default()
    }

    fn rfc3339_midnight(date: NaiveDate) -> String {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[async_trait]
impl MarketDataService for AlpacaMarketDataService {
    async fn get_daily_bars(
        &self,
        symbol: TickerSymbol,
        window: DateWindow,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        let start = Self::rfc3339_midnight(window.start);
        let end = Self::rfc3339_midnight(window.end_exclusive);

        let mut all_bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query_params = vec![
                ("symbols", symbol.to_string()),
                ("start", start.clone()),
                ("end", end.clone()),
                ("timeframe", "1Day".to_string()),
                ("limit", "10000".to_string()),
                ("feed", self.feed.clone()),
            ];

            if let Some(token) = &page_token {
                query_params.push(("page_token", token.clone()));
            }

            let url = build_url_with_query(&self.data_base_url, "v2/stocks/bars", &query_params)
                .map_err(|e| MarketDataError::InvalidRequest {
                    reason: format!("bad Alpaca data URL {}: {}", self.data_base_url, e),
                })?;

            debug!(
                "AlpacaMarketDataService: Fetching bars: symbol={}, start={}, end={}",
                symbol, start, end
            );

            let response = self
                .client
                .get(url.as_str())
                .header("APCA-API-KEY-ID", &self.api_key)
                .header("APCA-API-SECRET-KEY", &self.api_secret)
                .send()
                .await
                .map_err(|e| MarketDataError::Request {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                error!(
                    "AlpacaMarketDataService: API error {} for {}: {}",
                    status, symbol, error_text
                );
                return Err(MarketDataError::Api {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                    body: error_text,
                });
            }

            let resp_body: AlpacaBarResponse =
                response
                    .json()
                    .await
                    .map_err(|e| MarketDataError::InvalidData {
                        symbol: symbol.to_string(),
                        reason: format!("failed to parse bars response: {}", e),
                    })?;

            if let Some(bars) = resp_body.bars.and_then(|mut b| b.remove(symbol.as_str())) {
                for bar in &bars {
                    match bar.to_daily_bar() {
                        Some(daily) => all_bars.push(daily),
                        None => warn!(
                            "AlpacaMarketDataService: Skipping bar with bad timestamp {:?} for {}",
                            bar.timestamp, symbol
                        ),
                    }
                }
            }

            page_token = resp_body.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_bars)
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}

#[derive(Default)]
pub struct AlpacaMarketDataServiceBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    data_base_url: Option<String>,
    feed: Option<String>,
    timeout: Option<Duration>,
}

impl AlpacaMarketDataServiceBuilder {
    pub fn api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn api_secret(mut self, api_secret: String) -> Self {
        self.api_secret = Some(api_secret);
        self
    }

    pub fn data_base_url(mut self, data_base_url: String) -> Self {
        self.data_base_url = Some(data_base_url);
        self
    }

    pub fn feed(mut self, feed: String) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<AlpacaMarketDataService, MarketDataError> {
        let missing = |field: &str| MarketDataError::InvalidRequest {
            reason: format!("Alpaca {} is required", field),
        };
        let api_key = self.api_key.filter(|k| !k.is_empty()).ok_or_else(|| missing("api_key"))?;
        let api_secret = self
            .api_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("api_secret"))?;
        let data_base_url = self
            .data_base_url
            .unwrap_or_else(|| "https://data.alpaca.markets".to_string());
        let feed = self.feed.unwrap_or_else(|| "iex".to_string());
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        Ok(AlpacaMarketDataService {
            client: HttpClientFactory::create_client(timeout),
            api_key,
            api_secret,
            data_base_url,
            feed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_keys() {
        let err = AlpacaMarketDataService::builder()
            .api_key("key".to_string())
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("api_secret"));
    }

    #[test]
    fn test_rfc3339_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            AlpacaMarketDataService::rfc3339_midnight(date),
            "2025-03-14T00:00:00Z"
        );
    }

    #[test]
    fn test_bar_timestamp_to_date() {
        let bar = AlpacaBar {
            timestamp: "2025-03-14T04:00:00Z".to_string(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 100.0,
        };
        let daily = bar.to_daily_bar().unwrap();
        assert_eq!(daily.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert!(AlpacaBar { timestamp: "yesterday".into(), ..bar }.to_daily_bar().is_none());
    }
}
