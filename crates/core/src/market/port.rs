use crate::common::{CurrencyPair, Interval};
use crate::market::entity::{Candle, NewsArticle};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 返回的 K 线序列必须按时间升序排列；若数据源按最新在前返回，
///   适配器必须在返回前完成反转。
/// - 实现必须设置请求超时，单个标的的阻塞不得拖垮其他标的的分析。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取特定货币对最近的 K 线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求并执行。
    /// 2. 解析响应数据并映射为领域实体。
    /// 3. 保证输出按时间升序排列。
    ///
    /// # Arguments
    /// * `pair`: 货币对。
    /// * `interval`: K 线周期。
    /// * `count`: 请求的 K 线数量上限。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表，失败返回 MarketError。
    async fn fetch_candles(
        &self,
        pair: &CurrencyPair,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Candle>, MarketError>;
}

/// # Summary
/// 新闻情绪数据提供者接口。
///
/// # Invariants
/// - 空文章列表是合法的低信息量状态，不是错误。
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// # Summary
    /// 获取与货币对相关的已打分新闻文章。
    ///
    /// # Logic
    /// 1. 向新闻情绪源查询该货币对的相关报道。
    /// 2. 过滤掉缺失情绪得分的条目。
    ///
    /// # Arguments
    /// * `pair`: 货币对。
    ///
    /// # Returns
    /// 成功返回文章列表 (可为空)，失败返回 MarketError。
    async fn fetch_sentiment(&self, pair: &CurrencyPair) -> Result<Vec<NewsArticle>, MarketError>;
}
