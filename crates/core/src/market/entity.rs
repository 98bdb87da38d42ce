use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单根 K 线数据实体，记录特定时段内的行情波动。
///
/// # Invariants
/// - `high` 必须大于或等于 `low`, `open`, `close`。
/// - 一经抓取不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间
    pub time: DateTime<Utc>,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量 (外汇现货通常为 0)
    pub volume: f64,
}

/// # Summary
/// 新闻情绪源返回的单篇已打分文章。
///
/// # Invariants
/// - `score` 为情绪极性得分，正值看多，负值看空。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    // 文章标题
    pub title: String,
    // 整体情绪得分
    pub score: f64,
    // 数据源给出的情绪标签 (例如: Bullish, Neutral)
    pub label: String,
}
