use async_trait::async_trait;
use kawase_core::common::CurrencyPair;
use kawase_core::market::entity::NewsArticle;
use kawase_core::market::error::MarketError;
use kawase_core::market::port::SentimentProvider;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// # Summary
/// Alpha Vantage 新闻情绪提供者实现。
///
/// # Invariants
/// - 缺失或为空的 `feed` (包括限流提示响应) 映射为空文章列表而非错误。
/// - 未配置密钥时直接返回空列表，情绪路径整体降级为中性。
#[derive(Clone)]
pub struct AlphaVantageProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口密钥 (可为空)
    api_key: String,
    /// 接口根地址 (测试时可替换)
    base_url: String,
}

impl AlphaVantageProvider {
    /// # Summary
    /// 创建一个新的 AlphaVantageProvider 实例。
    ///
    /// # Arguments
    /// * `api_key`: Alpha Vantage 接口密钥，允许为空。
    ///
    /// # Returns
    /// 返回初始化后的 AlphaVantageProvider。
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
/// `NEWS_SENTIMENT` 接口响应结构。限流时 `feed` 缺失，仅有提示文本。
#[derive(Deserialize, Debug)]
struct NewsResponse {
    feed: Option<Vec<RawArticle>>,
}

/// # Summary
/// 单篇原始新闻条目，情绪字段可能缺失。
#[derive(Deserialize, Debug)]
struct RawArticle {
    title: Option<String>,
    overall_sentiment_score: Option<f64>,
    overall_sentiment_label: Option<String>,
}

/// # Summary
/// 过滤掉缺失情绪得分的条目，映射为领域文章实体。
fn convert(response: NewsResponse) -> Vec<NewsArticle> {
    response
        .feed
        .unwrap_or_default()
        .into_iter()
        .filter_map(|article| {
            article.overall_sentiment_score.map(|score| NewsArticle {
                title: article.title.unwrap_or_default(),
                score,
                label: article.overall_sentiment_label.unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl SentimentProvider for AlphaVantageProvider {
    /// # Summary
    /// 抓取与货币对相关的已打分新闻。
    ///
    /// # Logic
    /// 1. 未配置密钥时跳过请求，返回空列表。
    /// 2. 以 `FOREX:<紧凑代码>` 作为 tickers 查询 `NEWS_SENTIMENT`。
    /// 3. 缺失 `feed` (无新闻或被限流) 按空列表处理。
    ///
    /// # Arguments
    /// * `pair`: 货币对。
    ///
    /// # Returns
    /// 成功返回文章列表 (可为空)，网络或解析失败返回 MarketError。
    async fn fetch_sentiment(&self, pair: &CurrencyPair) -> Result<Vec<NewsArticle>, MarketError> {
        if self.api_key.is_empty() {
            debug!(%pair, "no Alpha Vantage key configured, skipping news sentiment");
            return Ok(Vec::new());
        }

        let url = format!("{}/query", self.base_url);
        let tickers = format!("FOREX:{}", pair.ticker());

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", tickers.as_str()),
                ("apikey", self.api_key.as_str()),
                ("limit", "10"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(MarketError::Network(format!("HTTP {}", resp.status())));
        }

        let body: NewsResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let articles = convert(body);
        debug!(%pair, count = articles.len(), "fetched scored news articles");
        Ok(articles)
    }
}
