//! 供各 crate 集成测试使用的内存版桩实现与造数工具。

use crate::analysis::error::SinkError;
use crate::analysis::port::{AnalysisEvent, DecisionSink};
use crate::common::{CurrencyPair, Interval};
use crate::market::entity::{Candle, NewsArticle};
use crate::market::error::MarketError;
use crate::market::port::{MarketDataProvider, SentimentProvider};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::Mutex;

/// # Summary
/// 返回固定 K 线序列的行情桩，支持测试中途替换数据。
pub struct StaticMarketProvider {
    // 预设的 K 线数据 (按时间升序)
    candles: Mutex<Vec<Candle>>,
}

impl StaticMarketProvider {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles: Mutex::new(candles),
        }
    }

    /// 替换桩内数据，用于模拟行情在两次周期之间发生变化。
    pub async fn set_candles(&self, candles: Vec<Candle>) {
        *self.candles.lock().await = candles;
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketProvider {
    async fn fetch_candles(
        &self,
        _pair: &CurrencyPair,
        _interval: Interval,
        count: usize,
    ) -> Result<Vec<Candle>, MarketError> {
        let candles = self.candles.lock().await;
        if candles.is_empty() {
            return Err(MarketError::NotFound);
        }
        let start = candles.len().saturating_sub(count);
        Ok(candles[start..].to_vec())
    }
}

/// # Summary
/// 返回固定文章列表的情绪桩，可配置为始终失败以测试降级路径。
pub struct StaticSentimentProvider {
    // 预设文章
    articles: Vec<NewsArticle>,
    // 是否模拟网络失败
    fail: bool,
}

impl StaticSentimentProvider {
    pub fn new(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SentimentProvider for StaticSentimentProvider {
    async fn fetch_sentiment(
        &self,
        _pair: &CurrencyPair,
    ) -> Result<Vec<NewsArticle>, MarketError> {
        if self.fail {
            return Err(MarketError::Network("simulated outage".to_string()));
        }
        Ok(self.articles.clone())
    }
}

/// # Summary
/// 把收到的事件记入内存的决策接收器。
pub struct MemorySink {
    // 收到的全部事件
    events: Mutex<Vec<AnalysisEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub async fn events(&self) -> Vec<AnalysisEvent> {
        self.events.lock().await.clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionSink for MemorySink {
    async fn publish(&self, event: &AnalysisEvent) -> Result<(), SinkError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// # Summary
/// 由收盘价序列构造合成 K 线，开盘取前一收盘，高低价外扩固定点差。
///
/// # Arguments
/// * `closes`: 收盘价序列 (按时间升序)。
/// * `volume`: 每根 K 线的成交量。
pub fn candles_from_closes(closes: &[f64], volume: f64) -> Vec<Candle> {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single();
    let mut candles = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        let open = if i == 0 { close } else { closes[i - 1] };
        let spread = (close * 0.0005).max(0.0005);
        let time = match t0 {
            Some(base) => base + Duration::minutes(5 * i64::try_from(i).unwrap_or(0)),
            None => Utc::now(),
        };
        candles.push(Candle {
            time,
            open,
            high: open.max(close) + spread,
            low: open.min(close) - spread,
            close,
            volume,
        });
    }
    candles
}

/// # Summary
/// 构造稳步上行的 K 线序列，最后一根放量，便于凑出强买信号。
pub fn rallying_candles(len: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..len).map(|i| 1.0 + 0.01 * i as f64).collect();
    let mut candles = candles_from_closes(&closes, 1000.0);
    if let Some(last) = candles.last_mut() {
        last.volume = 2500.0;
    }
    candles
}

/// # Summary
/// 构造恒定价格的 K 线序列 (零方差窗口)。
pub fn flat_candles(len: usize, price: f64) -> Vec<Candle> {
    candles_from_closes(&vec![price; len], 1000.0)
}
