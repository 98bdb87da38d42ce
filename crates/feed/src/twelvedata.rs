use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use kawase_core::common::{CurrencyPair, Interval};
use kawase_core::market::entity::Candle;
use kawase_core::market::error::MarketError;
use kawase_core::market::port::MarketDataProvider;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// # Summary
/// Twelve Data 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，固定 10 秒超时。
/// - Twelve Data 按最新在前返回数据；本适配器在返回前反转为时间升序。
#[derive(Clone)]
pub struct TwelveDataProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口密钥
    api_key: String,
    /// 接口根地址 (测试时可替换)
    base_url: String,
}

impl TwelveDataProvider {
    /// # Summary
    /// 创建一个新的 TwelveDataProvider 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时，避免单个标的的网络阻塞拖垮整轮分析。
    /// 2. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `api_key`: Twelve Data 接口密钥。
    ///
    /// # Returns
    /// 返回初始化后的 TwelveDataProvider。
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// # Summary
    /// 指定接口根地址的构造方式，主要用于测试。
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// # Summary
/// Twelve Data `time_series` 接口响应顶层结构。
///
/// # Invariants
/// - 业务错误通过 `status == "error"` 加 `message` 字段表达。
#[derive(Deserialize, Debug)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    values: Option<Vec<RawValue>>,
}

/// # Summary
/// 单条原始 K 线记录。所有数值字段均为字符串。
#[derive(Deserialize, Debug)]
struct RawValue {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    // 外汇现货常缺失成交量
    #[serde(default)]
    volume: Option<String>,
}

/// # Summary
/// 把字符串数值字段解析为 f64，失败时携带字段名报解析错误。
fn parse_field(name: &str, value: &str) -> Result<f64, MarketError> {
    value
        .parse::<f64>()
        .map_err(|e| MarketError::Parse(format!("field {}: {}", name, e)))
}

/// # Summary
/// 解析 Twelve Data 的时间戳字符串，兼容日线的纯日期格式。
fn parse_datetime(value: &str) -> Result<DateTime<Utc>, MarketError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        .map_err(|e| MarketError::Parse(format!("field datetime: {}", e)))
}

/// # Summary
/// 把接口响应转换为按时间升序的领域 K 线序列。
///
/// # Logic
/// 1. `status == "error"` 映射为上游业务错误。
/// 2. 缺失或空的 `values` 视为数据未找到。
/// 3. 逐条解析字符串字段，缺失的成交量按 0 处理。
/// 4. 接口按最新在前返回，最后反转为时间升序 —— 这是行情端口的硬性契约。
fn convert(response: TimeSeriesResponse) -> Result<Vec<Candle>, MarketError> {
    if response.status.as_deref() == Some("error") {
        return Err(MarketError::Api(
            response
                .message
                .unwrap_or_else(|| "unspecified upstream error".to_string()),
        ));
    }

    let values = match response.values {
        Some(values) if !values.is_empty() => values,
        _ => return Err(MarketError::NotFound),
    };

    let mut candles = Vec::with_capacity(values.len());
    for value in &values {
        candles.push(Candle {
            time: parse_datetime(&value.datetime)?,
            open: parse_field("open", &value.open)?,
            high: parse_field("high", &value.high)?,
            low: parse_field("low", &value.low)?,
            close: parse_field("close", &value.close)?,
            volume: match &value.volume {
                Some(v) => parse_field("volume", v)?,
                None => 0.0,
            },
        });
    }

    candles.reverse();
    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for TwelveDataProvider {
    /// # Summary
    /// 从 Twelve Data 抓取货币对最近的 K 线序列。
    ///
    /// # Logic
    /// 1. 构建携带 symbol / interval / outputsize / apikey 的查询。
    /// 2. 发起异步请求并解析 JSON 响应。
    /// 3. 经 `convert` 校验业务状态并反转为时间升序。
    ///
    /// # Arguments
    /// * `pair`: 货币对。
    /// * `interval`: K 线周期。
    /// * `count`: 请求的 K 线数量。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表，失败返回 MarketError。
    async fn fetch_candles(
        &self,
        pair: &CurrencyPair,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Candle>, MarketError> {
        let url = format!("{}/time_series", self.base_url);
        let symbol = pair.to_string();
        let count_param = count.to_string();

        debug!(%pair, %interval, count, "fetching candles from Twelve Data");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.as_str()),
                ("interval", interval.code()),
                ("outputsize", count_param.as_str()),
                ("apikey", self.api_key.as_str()),
                ("timezone", "UTC"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let body: TimeSeriesResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        convert(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_reverses_to_ascending() {
        // 接口按最新在前返回
        let body = r#"{
            "status": "ok",
            "values": [
                {"datetime": "2024-01-01 00:10:00", "open": "1.2", "high": "1.3", "low": "1.1", "close": "1.25", "volume": "100"},
                {"datetime": "2024-01-01 00:05:00", "open": "1.1", "high": "1.2", "low": "1.0", "close": "1.15", "volume": "90"},
                {"datetime": "2024-01-01 00:00:00", "open": "1.0", "high": "1.1", "low": "0.9", "close": "1.05"}
            ]
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).expect("json");
        let candles = convert(response).expect("convert");
        assert_eq!(candles.len(), 3);
        assert!(candles[0].time < candles[1].time && candles[1].time < candles[2].time);
        assert!((candles[0].close - 1.05).abs() < 1e-12);
        assert!((candles[2].close - 1.25).abs() < 1e-12);
        // 缺失成交量按 0 处理
        assert!(candles[0].volume.abs() < 1e-12);
    }

    #[test]
    fn test_convert_maps_upstream_error() {
        let body = r#"{"status": "error", "message": "symbol not supported", "code": 400}"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).expect("json");
        assert!(matches!(
            convert(response),
            Err(MarketError::Api(message)) if message.contains("not supported")
        ));
    }

    #[test]
    fn test_convert_missing_values_is_not_found() {
        let body = r#"{"status": "ok"}"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).expect("json");
        assert!(matches!(convert(response), Err(MarketError::NotFound)));
    }

    #[test]
    fn test_convert_rejects_malformed_price() {
        let body = r#"{
            "status": "ok",
            "values": [
                {"datetime": "2024-01-01 00:00:00", "open": "abc", "high": "1.1", "low": "0.9", "close": "1.05"}
            ]
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).expect("json");
        assert!(matches!(
            convert(response),
            Err(MarketError::Parse(message)) if message.contains("open")
        ));
    }

    #[test]
    fn test_parse_daily_datetime() {
        let time = parse_datetime("2024-03-05").expect("datetime");
        assert_eq!(time.to_rfc3339(), "2024-03-05T00:00:00+00:00");
    }
}
