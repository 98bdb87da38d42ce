use crate::common::{CurrencyPair, Interval};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub feed: FeedConfig,
    pub analysis: AnalysisConfig,
    pub notify: NotifyConfig,
}

/// 周期监控配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // 监控的货币对列表 (例如: "USD/JPY")
    pub symbols: Vec<String>,
    // K 线周期代码 (例如: "5min")
    pub interval: String,
    // 轮询间隔 (秒)
    pub poll_interval_secs: u64,
    // 并发分析上限 (尊重第三方接口限额)
    pub max_concurrency: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "USD/JPY".to_string(),
                "EUR/USD".to_string(),
                "GBP/USD".to_string(),
            ],
            interval: "5min".to_string(),
            poll_interval_secs: 300,
            max_concurrency: 2,
        }
    }
}

/// 数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    // Twelve Data 行情接口密钥
    pub twelvedata_api_key: String,
    // Alpha Vantage 新闻情绪接口密钥 (留空则情绪降级为中性)
    pub alphavantage_api_key: String,
    // 每次抓取的 K 线数量
    pub candle_count: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            twelvedata_api_key: String::new(),
            alphavantage_api_key: String::new(),
            candle_count: 100,
        }
    }
}

/// 分析层配置：窗口参数与计分策略常量
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub windows: WindowConfig,
    pub scoring: ScoringConfig,
}

/// 指标窗口参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    // RSI 周期
    pub rsi_period: usize,
    // 快速 EMA 周期
    pub ema_fast: usize,
    // 中速 EMA 周期
    pub ema_mid: usize,
    // 慢速 EMA 周期
    pub ema_slow: usize,
    // ATR 周期
    pub atr_period: usize,
    // 枢轴位取样窗口 (根数, 对应约 24 小时)
    pub pivot_window: usize,
    // 回归预测窗口
    pub forecast_window: usize,
    // 波动率统计窗口
    pub stat_window: usize,
    // 动量回看周期数
    pub momentum_lookback: usize,
    // 均量窗口
    pub volume_window: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_fast: 9,
            ema_mid: 21,
            ema_slow: 50,
            atr_period: 14,
            pivot_window: 24,
            forecast_window: 50,
            stat_window: 50,
            momentum_lookback: 10,
            volume_window: 20,
        }
    }
}

/// 计分策略常量
///
/// 阈值集中为可调参数，调参不需要改动计分代码。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    // RSI 超卖阈值 (买 +3)
    pub rsi_oversold: f64,
    // RSI 偏低阈值 (买 +1)
    pub rsi_low: f64,
    // RSI 偏高阈值 (卖 +1)
    pub rsi_high: f64,
    // RSI 超买阈值 (卖 +3)
    pub rsi_overbought: f64,
    // 枢轴位接近判定系数 (× ATR)
    pub pivot_proximity_atr: f64,
    // 止损距离系数 (× ATR)
    pub stop_atr_multiple: f64,
    // 方向性信号的最低单边点数
    pub min_signal_points: u32,
    // 回归预测的最低采信置信度 (百分比)
    pub forecast_min_confidence: f64,
    // 预期变动强阈值 (百分比, ±3 分)
    pub forecast_strong_change: f64,
    // 预期变动弱阈值 (百分比, ±1 分)
    pub forecast_weak_change: f64,
    // 动量阈值 (百分比)
    pub momentum_threshold: f64,
    // 相对成交量阈值
    pub relative_volume_threshold: f64,
    // 情绪强阈值 (±3 分)
    pub sentiment_strong: f64,
    // 情绪弱阈值 (±1 分)
    pub sentiment_weak: f64,
    // 强信号告警的总分绝对值下限
    pub alert_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_low: 40.0,
            rsi_high: 60.0,
            rsi_overbought: 70.0,
            pivot_proximity_atr: 0.5,
            stop_atr_multiple: 1.5,
            min_signal_points: 4,
            forecast_min_confidence: 70.0,
            forecast_strong_change: 0.05,
            forecast_weak_change: 0.02,
            momentum_threshold: 0.1,
            relative_volume_threshold: 1.2,
            sentiment_strong: 0.15,
            sentiment_weak: 0.05,
            alert_score: 3,
        }
    }
}

/// 通知通道配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    // Telegram 推送配置，缺省则不启用
    pub telegram: Option<TelegramConfig>,
}

/// Telegram 推送配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    // Bot API Token
    pub bot_token: String,
    // 目标会话 ID
    pub chat_id: String,
}

impl AppConfig {
    /// # Summary
    /// 启动期配置校验。配置错误是唯一允许中止进程的错误类别。
    ///
    /// # Logic
    /// 1. 校验货币对列表非空且全部可解析。
    /// 2. 校验 K 线周期代码可识别。
    /// 3. 校验轮询间隔为正、行情接口密钥非空。
    ///
    /// # Returns
    /// 合法返回解析后的货币对与周期，否则返回描述性错误信息。
    pub fn validate(&self) -> Result<(Vec<CurrencyPair>, Interval), String> {
        if self.monitor.symbols.is_empty() {
            return Err("monitor.symbols must not be empty".to_string());
        }
        let pairs = self
            .monitor
            .symbols
            .iter()
            .map(|s| CurrencyPair::from_str(s))
            .collect::<Result<Vec<_>, _>>()?;
        let interval = Interval::from_str(&self.monitor.interval)?;
        if self.monitor.poll_interval_secs == 0 {
            return Err("monitor.poll_interval_secs must be positive".to_string());
        }
        if self.monitor.max_concurrency == 0 {
            return Err("monitor.max_concurrency must be positive".to_string());
        }
        if self.feed.twelvedata_api_key.is_empty() {
            return Err("feed.twelvedata_api_key is required".to_string());
        }
        Ok((pairs, interval))
    }
}
