use crate::error::CycleError;
use kawase_analysis::{aggregator, forecast, indicators, planner, sentiment, volatility};
use kawase_core::analysis::entity::DecisionRecord;
use kawase_core::analysis::error::AnalysisError;
use kawase_core::common::{CurrencyPair, Interval};
use kawase_core::config::AnalysisConfig;
use kawase_core::market::port::{MarketDataProvider, SentimentProvider};
use std::sync::Arc;
use tracing::{debug, warn};

/// # Summary
/// 单货币对分析器：把行情抓取、指标、回归、波动率、情绪与规划
/// 串成一条管线，产出一条完整的决策记录。
///
/// # Invariants
/// - 情绪源失败只降级为空文章列表，绝不让单轮分析失败。
/// - 行情与指标失败会中止本轮并向上返回 CycleError。
pub struct Analyzer {
    /// 行情数据源
    provider: Arc<dyn MarketDataProvider>,
    /// 新闻情绪数据源
    sentiment: Arc<dyn SentimentProvider>,
    /// 窗口与计分参数
    analysis: AnalysisConfig,
    /// 每轮抓取的 K 线数量
    candle_count: usize,
}

impl Analyzer {
    /// # Summary
    /// 创建一个新的 Analyzer 实例。
    ///
    /// # Arguments
    /// * `provider`: 行情数据源端口。
    /// * `sentiment`: 新闻情绪数据源端口。
    /// * `analysis`: 窗口与计分参数。
    /// * `candle_count`: 每轮抓取的 K 线数量。
    ///
    /// # Returns
    /// 返回初始化后的 Analyzer。
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        analysis: AnalysisConfig,
        candle_count: usize,
    ) -> Self {
        Self {
            provider,
            sentiment,
            analysis,
            candle_count,
        }
    }

    /// # Summary
    /// 对单个货币对执行一轮完整分析。
    ///
    /// # Logic
    /// 1. 抓取最近 `candle_count` 根 K 线 (时间升序)。
    /// 2. 计算技术指标快照 (RSI / EMA / ATR / 枢轴 / 形态)。
    /// 3. 在各自的窗口上执行回归预测与波动率统计。
    /// 4. 抓取新闻情绪，失败时降级为空列表并记告警。
    /// 5. 运行交易规划器，最后聚合为决策记录。
    ///
    /// # Arguments
    /// * `pair`: 货币对。
    /// * `interval`: K 线周期。
    ///
    /// # Returns
    /// 成功返回决策记录，失败返回 CycleError。
    pub async fn run_cycle(
        &self,
        pair: &CurrencyPair,
        interval: Interval,
    ) -> Result<DecisionRecord, CycleError> {
        let candles = self
            .provider
            .fetch_candles(pair, interval, self.candle_count)
            .await?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let current_price = closes
            .last()
            .copied()
            .ok_or(AnalysisError::InsufficientData {
                required: 1,
                actual: 0,
            })?;

        let windows = &self.analysis.windows;
        let snapshot = indicators::snapshot(&candles, windows)?;

        let forecast_slice = &closes[closes.len().saturating_sub(windows.forecast_window)..];
        let forecast = forecast::predict(forecast_slice)?;

        let stat_slice = &candles[candles.len().saturating_sub(windows.stat_window)..];
        let volatility = volatility::analyze(stat_slice, windows)?;

        // 情绪属于加分项，源故障不应拖垮整轮技术分析
        let articles = match self.sentiment.fetch_sentiment(pair).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(%pair, error = %e, "sentiment fetch failed, degrading to neutral");
                Vec::new()
            }
        };
        let sentiment = sentiment::score(&articles, &self.analysis.scoring);

        let technical = planner::plan(&snapshot, current_price, &self.analysis.scoring)?;

        debug!(%pair, %interval, current_price, "analysis cycle complete");

        Ok(aggregator::aggregate(
            pair.clone(),
            current_price,
            forecast,
            volatility,
            sentiment,
            technical,
            &self.analysis.scoring,
        ))
    }
}
