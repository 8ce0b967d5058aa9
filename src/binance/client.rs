// =============================================================================
// Binance USDⓈ-M Futures REST Client — public market data only
// =============================================================================
//
// Endpoints (all unsigned):
//   GET /fapi/v1/exchangeInfo             instruments
//   GET /fapi/v1/ticker/24hr              24h tickers, whole market
//   GET /fapi/v1/klines                   candles
//   GET /fapi/v1/premiumIndex             mark price + funding
//   GET /futures/data/openInterestHist    open-interest history
//
// Binance encodes most decimals as JSON strings; every numeric field goes
// through `parse_str_f64`, which accepts either representation.
// =============================================================================

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::binance::rate_limit::RateLimitTracker;
use crate::futures_intel::{MarkSnapshot, OpenInterestPoint};
use crate::market_data::{Candle, InstrumentInfo, MarketDataSource, TickerSnapshot};

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Per-request timeout; a slow symbol is dropped rather than stalling a pass.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Characters of an error body kept in the error message.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Clone)]
pub struct BinanceFuturesClient {
    base_url: String,
    client: reqwest::Client,
    rate_limit: Arc<RateLimitTracker>,
}

impl BinanceFuturesClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "BinanceFuturesClient initialised");

        Ok(Self {
            base_url,
            client,
            rate_limit: Arc::new(RateLimitTracker::new()),
        })
    }

    /// Shared handle to the request-weight tracker.
    pub fn rate_limit(&self) -> Arc<RateLimitTracker> {
        Arc::clone(&self.rate_limit)
    }

    /// GET `path` with `query`, record request weight, and fail on non-2xx.
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path} request failed"))?;

        self.rate_limit.update_from_headers(resp.headers());

        let status = resp.status();
        if !status.is_success() {
            // gateway errors are often HTML, so keep the raw text
            let text = resp.text().await.unwrap_or_default();
            bail!(
                "Binance GET {} returned {}: {}",
                path,
                status,
                truncate(text.trim(), ERROR_BODY_LIMIT)
            );
        }

        resp.json()
            .await
            .with_context(|| format!("failed to parse {path} response"))
    }
}

#[async_trait]
impl MarketDataSource for BinanceFuturesClient {
    #[instrument(skip(self), name = "binance::exchange_info")]
    async fn exchange_info(&self) -> Result<Vec<InstrumentInfo>> {
        let body = self.get_json("/fapi/v1/exchangeInfo", &[]).await?;
        let instruments = parse_exchange_info(&body)?;
        debug!(count = instruments.len(), "exchange info fetched");
        Ok(instruments)
    }

    #[instrument(skip(self), name = "binance::tickers_24h")]
    async fn tickers_24h(&self) -> Result<Vec<TickerSnapshot>> {
        let body = self.get_json("/fapi/v1/ticker/24hr", &[]).await?;
        let tickers = parse_tickers(&body)?;
        debug!(count = tickers.len(), "24h tickers fetched");
        Ok(tickers)
    }

    #[instrument(skip(self), name = "binance::klines")]
    async fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>> {
        let query = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.get_json("/fapi/v1/klines", &query).await?;
        let candles = parse_klines(&body)?;
        debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    #[instrument(skip(self), name = "binance::mark_snapshot")]
    async fn mark_snapshot(&self, symbol: &str) -> Result<MarkSnapshot> {
        let body = self
            .get_json("/fapi/v1/premiumIndex", &[("symbol", symbol.to_string())])
            .await?;
        parse_mark_snapshot(&body)
    }

    #[instrument(skip(self), name = "binance::open_interest_history")]
    async fn open_interest_history(
        &self,
        symbol: &str,
        period: &str,
        limit: u32,
    ) -> Result<Vec<OpenInterestPoint>> {
        let query = [
            ("symbol", symbol.to_string()),
            ("period", period.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.get_json("/futures/data/openInterestHist", &query).await?;
        parse_open_interest(&body)
    }
}

impl std::fmt::Debug for BinanceFuturesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceFuturesClient")
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

// =============================================================================
// Response decoding
// =============================================================================

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        bail!("expected string or number, got: {val}")
    }
}

fn str_field(obj: &Value, key: &str) -> String {
    obj[key].as_str().unwrap_or_default().to_string()
}

fn num_field(obj: &Value, key: &str) -> Result<f64> {
    parse_str_f64(&obj[key]).with_context(|| format!("field '{key}'"))
}

pub fn parse_exchange_info(body: &Value) -> Result<Vec<InstrumentInfo>> {
    let symbols = body["symbols"]
        .as_array()
        .context("exchangeInfo response missing 'symbols' array")?;

    Ok(symbols
        .iter()
        .map(|s| InstrumentInfo {
            symbol: str_field(s, "symbol"),
            contract_type: str_field(s, "contractType"),
            status: str_field(s, "status"),
            base_asset: str_field(s, "baseAsset"),
            quote_asset: str_field(s, "quoteAsset"),
        })
        .filter(|i| !i.symbol.is_empty())
        .collect())
}

/// Malformed entries are skipped with a warning; one bad ticker should not
/// cost the whole universe.
pub fn parse_tickers(body: &Value) -> Result<Vec<TickerSnapshot>> {
    let raw = body.as_array().context("ticker/24hr response is not an array")?;

    let mut tickers = Vec::with_capacity(raw.len());
    for entry in raw {
        match parse_ticker(entry) {
            Ok(t) => tickers.push(t),
            Err(e) => warn!(error = %e, "skipping malformed ticker entry"),
        }
    }
    Ok(tickers)
}

fn parse_ticker(entry: &Value) -> Result<TickerSnapshot> {
    let symbol = entry["symbol"].as_str().context("ticker missing symbol")?;
    let ticker = TickerSnapshot {
        symbol: symbol.to_string(),
        last_price: num_field(entry, "lastPrice")?,
        price_change_percent: num_field(entry, "priceChangePercent")?,
        volume: num_field(entry, "volume")?,
        quote_volume: num_field(entry, "quoteVolume")?,
        trade_count: entry["count"].as_u64().unwrap_or(0),
        high_price: num_field(entry, "highPrice")?,
        low_price: num_field(entry, "lowPrice")?,
        weighted_avg_price: num_field(entry, "weightedAvgPrice")?,
    };
    if !ticker.is_consistent() {
        bail!("inconsistent ticker for {symbol}");
    }
    Ok(ticker)
}

/// Kline array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, [7] quoteAssetVolume, [8] numberOfTrades, ...
pub fn parse_klines(body: &Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 7 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = arr[0].as_i64().unwrap_or(0);
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;
        let close_time = arr[6].as_i64().unwrap_or(0);

        candles.push(Candle::new(open_time, open, high, low, close, volume, close_time));
    }
    Ok(candles)
}

pub fn parse_mark_snapshot(body: &Value) -> Result<MarkSnapshot> {
    Ok(MarkSnapshot {
        mark_price: num_field(body, "markPrice")?,
        index_price: num_field(body, "indexPrice")?,
        last_funding_rate: num_field(body, "lastFundingRate")?,
        next_funding_time: body["nextFundingTime"].as_i64().unwrap_or(0),
    })
}

pub fn parse_open_interest(body: &Value) -> Result<Vec<OpenInterestPoint>> {
    let raw = body
        .as_array()
        .context("openInterestHist response is not an array")?;

    raw.iter()
        .map(|p| {
            Ok(OpenInterestPoint {
                timestamp: p["timestamp"].as_i64().unwrap_or(0),
                open_interest: num_field(p, "sumOpenInterest")?,
                open_interest_value: num_field(p, "sumOpenInterestValue")?,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_str_f64_accepts_both_encodings() {
        assert_eq!(parse_str_f64(&json!("1.25")).unwrap(), 1.25);
        assert_eq!(parse_str_f64(&json!(3)).unwrap(), 3.0);
        assert!(parse_str_f64(&json!("abc")).is_err());
        assert!(parse_str_f64(&json!(null)).is_err());
    }

    #[test]
    fn exchange_info_fields() {
        let body = json!({
            "timezone": "UTC",
            "symbols": [
                {"symbol": "BTCUSDT", "contractType": "PERPETUAL", "status": "TRADING",
                 "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "BTCUSDT_250328", "contractType": "CURRENT_QUARTER", "status": "TRADING",
                 "baseAsset": "BTC", "quoteAsset": "USDT"}
            ]
        });
        let info = parse_exchange_info(&body).unwrap();
        assert_eq!(info.len(), 2);
        assert!(info[0].is_eligible());
        assert!(!info[1].is_eligible());
        assert!(parse_exchange_info(&json!({})).is_err());
    }

    #[test]
    fn tickers_skip_malformed_entries() {
        let body = json!([
            {"symbol": "ETHUSDT", "priceChange": "60.0", "priceChangePercent": "2.150",
             "weightedAvgPrice": "2810.5", "lastPrice": "2850.10", "volume": "123456.7",
             "quoteVolume": "347000000.0", "highPrice": "2870.0", "lowPrice": "2770.0",
             "count": 987654},
            {"symbol": "BROKEN", "lastPrice": "n/a"},
            {"symbol": "INVERTED", "priceChangePercent": "1.0", "weightedAvgPrice": "1.0",
             "lastPrice": "1.0", "volume": "10", "quoteVolume": "10",
             "highPrice": "0.9", "lowPrice": "1.1", "count": 1}
        ]);
        let tickers = parse_tickers(&body).unwrap();
        assert_eq!(tickers.len(), 1);
        let t = &tickers[0];
        assert_eq!(t.symbol, "ETHUSDT");
        assert_eq!(t.price_change_percent, 2.15);
        assert_eq!(t.quote_volume, 347_000_000.0);
        assert_eq!(t.trade_count, 987_654);
    }

    #[test]
    fn klines_decode_string_prices() {
        let body = json!([
            [1_700_000_000_000_i64, "100.0", "101.5", "99.5", "101.0", "2500.5",
             1_700_003_599_999_i64, "252000.0", 1200, "1300.0", "131000.0", "0"],
            [1_700_003_600_000_i64, "101.0", "102.0"]
        ]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open_time, 1_700_000_000_000);
        assert_eq!(candles[0].high, 101.5);
        assert_eq!(candles[0].close, 101.0);
        assert_eq!(candles[0].volume, 2500.5);
    }

    #[test]
    fn mark_snapshot_fields() {
        let body = json!({
            "symbol": "BTCUSDT", "markPrice": "64000.12", "indexPrice": "63990.00",
            "estimatedSettlePrice": "63995.0", "lastFundingRate": "0.00010000",
            "interestRate": "0.0001", "nextFundingTime": 1_700_006_400_000_i64,
            "time": 1_700_000_000_000_i64
        });
        let mark = parse_mark_snapshot(&body).unwrap();
        assert_eq!(mark.mark_price, 64000.12);
        assert!((mark.funding_rate_pct() - 0.01).abs() < 1e-12);
        assert_eq!(mark.next_funding_time, 1_700_006_400_000);
    }

    #[test]
    fn open_interest_points() {
        let body = json!([
            {"symbol": "BTCUSDT", "sumOpenInterest": "1000.0",
             "sumOpenInterestValue": "64000000.0", "timestamp": 1_700_000_000_000_i64},
            {"symbol": "BTCUSDT", "sumOpenInterest": "1020.0",
             "sumOpenInterestValue": "65280000.0", "timestamp": 1_700_000_900_000_i64}
        ]);
        let points = parse_open_interest(&body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].open_interest, 1020.0);
        assert!(parse_open_interest(&json!([{"timestamp": 1}])).is_err());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("USDⓈ-M", 4), "USDⓈ");
    }

    #[tokio::test]
    async fn non_json_error_body_keeps_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fapi/v1/ticker/24hr"))
            .respond_with(
                ResponseTemplate::new(502)
                    .insert_header("x-mbx-used-weight-1m", "41")
                    .set_body_string("<html><body>502 Bad Gateway</body></html>"),
            )
            .mount(&server)
            .await;

        let client = BinanceFuturesClient::new(server.uri()).unwrap();
        let err = client.tickers_24h().await.unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("502"), "{text}");
        assert!(text.contains("Bad Gateway"), "{text}");
        assert_eq!(client.rate_limit().used_weight(), 41);
    }

    #[tokio::test]
    async fn success_body_is_decoded() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fapi/v1/premiumIndex"))
            .and(query_param("symbol", "BTCUSDT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "symbol": "BTCUSDT", "markPrice": "64000.0", "indexPrice": "63990.0",
                "lastFundingRate": "0.0002", "nextFundingTime": 1_700_006_400_000_i64
            })))
            .mount(&server)
            .await;

        let client = BinanceFuturesClient::new(server.uri()).unwrap();
        let mark = client.mark_snapshot("BTCUSDT").await.unwrap();
        assert_eq!(mark.mark_price, 64000.0);
        assert_eq!(mark.last_funding_rate, 0.0002);
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = BinanceFuturesClient::new("https://fapi.binance.com/").unwrap();
        assert!(format!("{client:?}").contains("base_url: \"https://fapi.binance.com\""));
    }
}
