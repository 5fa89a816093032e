use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::DailyBar;
use crate::domain::market::ticker::TickerSymbol;
use crate::domain::market::window::DateWindow;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_url_with_query};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;
use tracing::{debug, error};

// ===== Market Data Service (Yahoo Finance chart API) =====

pub struct YahooMarketDataService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl YahooMarketDataService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout),
            base_url: base_url.into(),
        }
    }

    fn unix_midnight(date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn get_daily_bars(
        &self,
        symbol: TickerSymbol,
        window: DateWindow,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        let period1 = Self::unix_midnight(window.start).to_string();
        let period2 = Self::unix_midnight(window.end_exclusive).to_string();

        let url = build_url_with_query(
            &self.base_url,
            &format!("v8/finance/chart/{}", symbol),
            &[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ],
        )
        .map_err(|e| MarketDataError::InvalidRequest {
            reason: format!("bad Yahoo base URL {}: {}", self.base_url, e),
        })?;

        debug!("YahooMarketDataService: GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| MarketDataError::Request {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| MarketDataError::Request {
            symbol: symbol.to_string(),
            reason: format!("failed to read body: {}", e),
        })?;

        // 404 carries a structured "Not Found" payload for unknown or delisted symbols.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            error!(
                "YahooMarketDataService: API error {} for {}: {}",
                status, symbol, body
            );
            return Err(MarketDataError::Api {
                symbol: symbol.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response_parser::parse_chart(symbol.as_str(), &body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

pub(crate) mod response_parser {
    use super::*;
    use chrono::DateTime;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct ChartEnvelope {
        chart: Chart,
    }

    #[derive(Debug, Deserialize)]
    struct Chart {
        result: Option<Vec<ChartResult>>,
        error: Option<ChartError>,
    }

    #[derive(Debug, Deserialize)]
    struct ChartError {
        code: String,
        #[serde(default)]
        description: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct ChartResult {
        meta: ChartMeta,
        #[serde(default)]
        timestamp: Vec<i64>,
        indicators: Indicators,
    }

    #[derive(Debug, Deserialize)]
    struct ChartMeta {
        #[serde(default)]
        gmtoffset: i64,
    }

    #[derive(Debug, Deserialize)]
    struct Indicators {
        #[serde(default)]
        quote: Vec<Quote>,
    }

    #[derive(Debug, Default, Deserialize)]
    struct Quote {
        #[serde(default)]
        open: Vec<Option<f64>>,
        #[serde(default)]
        high: Vec<Option<f64>>,
        #[serde(default)]
        low: Vec<Option<f64>>,
        #[serde(default)]
        close: Vec<Option<f64>>,
        #[serde(default)]
        volume: Vec<Option<f64>>,
    }

    /// Turns a chart payload into bars. Rows with any null field are skipped;
    /// dates are taken in the exchange's local time.
    pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        let envelope: ChartEnvelope =
            serde_json::from_str(body).map_err(|e| MarketDataError::InvalidData {
                symbol: symbol.to_string(),
                reason: format!("failed to parse chart response: {}", e),
            })?;

        if let Some(err) = envelope.chart.error {
            if err.code.eq_ignore_ascii_case("Not Found") {
                debug!("YahooMarketDataService: {} not found, treating as no data", symbol);
                return Ok(Vec::new());
            }
            return Err(MarketDataError::InvalidData {
                symbol: symbol.to_string(),
                reason: format!(
                    "{}: {}",
                    err.code,
                    err.description.unwrap_or_default()
                ),
            });
        }

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };

        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = result.meta.gmtoffset;

        let bars = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
                let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
                Some(DailyBar {
                    date,
                    open: field(&quote.open)?,
                    high: field(&quote.high)?,
                    low: field(&quote.low)?,
                    close: field(&quote.close)?,
                    volume: field(&quote.volume)?,
                })
            })
            .collect();

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::response_parser::parse_chart;
    use chrono::NaiveDate;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "gmtoffset": -14400, "exchangeTimezoneName": "America/New_York"},
                "timestamp": [1741959000, 1742218200],
                "indicators": {"quote": [{
                    "open": [211.25, 213.31],
                    "high": [213.95, 215.22],
                    "low": [209.58, 209.97],
                    "close": [213.49, 214.0],
                    "volume": [60107600, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_rows() {
        let bars = parse_chart("AAPL", CHART).unwrap();
        // Second row has a null volume and is dropped.
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(bars[0].close, 213.49);
        assert_eq!(bars[0].volume, 60_107_600.0);
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(parse_chart("AAPL", body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_not_found_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart("WBA", body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_other_error_fails() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = parse_chart("AAPL", body).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_chart("AAPL", "<html>").is_err());
    }
}
