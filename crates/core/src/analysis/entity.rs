use crate::common::CurrencyPair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 方向性信号枚举，贯穿蜡烛形态、情绪和技术面信号。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    // 做多
    Buy,
    // 做空
    Sell,
    // 观望
    Neutral,
}

/// # Summary
/// 蜡烛形态分类结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatternKind {
    // 锤子线 (看多反转)
    Hammer,
    // 射击之星 (看空反转)
    ShootingStar,
    // 看多吞没
    BullishEngulfing,
    // 看空吞没
    BearishEngulfing,
    // 十字星 (犹豫不决)
    Doji,
    // 无明确形态
    None,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternKind::Hammer => "Hammer",
            PatternKind::ShootingStar => "Shooting Star",
            PatternKind::BullishEngulfing => "Bullish Engulfing",
            PatternKind::BearishEngulfing => "Bearish Engulfing",
            PatternKind::Doji => "Doji",
            PatternKind::None => "No clear pattern",
        };
        write!(f, "{}", name)
    }
}

/// # Summary
/// 蜡烛形态实体：形态种类、方向信号与整数强度。
///
/// # Invariants
/// - `strength` 取值范围为 0 到 3。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandlePattern {
    // 形态种类
    pub kind: PatternKind,
    // 方向信号
    pub signal: Direction,
    // 形态强度 (0-3)
    pub strength: u32,
}

/// # Summary
/// 经典地板交易员枢轴位：中枢加三档阻力与三档支撑。
///
/// # Invariants
/// - 当 high > low 时，阻力位单调递增，支撑位单调递减。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotLevels {
    // 中枢位 P = (H + L + C) / 3
    pub pivot: f64,
    // 阻力位 [R1, R2, R3]
    pub resistances: [f64; 3],
    // 支撑位 [S1, S2, S3]
    pub supports: [f64; 3],
}

/// # Summary
/// 一次分析周期内计算出的全部技术指标快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    // 14 周期 RSI
    pub rsi14: f64,
    // 9 周期 EMA
    pub ema9: f64,
    // 21 周期 EMA
    pub ema21: f64,
    // 50 周期 EMA
    pub ema50: f64,
    // 14 周期 ATR
    pub atr14: f64,
    // 枢轴支撑阻力位
    pub pivots: PivotLevels,
    // 最近两根蜡烛构成的形态
    pub pattern: CandlePattern,
}

/// # Summary
/// 趋势方向枚举。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrendDirection {
    // 上行
    Up,
    // 下行
    Down,
}

/// # Summary
/// 线性回归预测结果。
///
/// # Invariants
/// - `confidence_pct` 始终被钳制在 [0, 100]。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    // 预测的下一个价格 (窗口外一步)
    pub predicted_price: f64,
    // 相对最新收盘价的预期变动百分比
    pub expected_change_pct: f64,
    // 趋势方向
    pub trend: TrendDirection,
    // 拟合置信度 (R² × 100, 钳制到 [0, 100])
    pub confidence_pct: f64,
    // 回归斜率
    pub slope: f64,
}

/// # Summary
/// 波动率与动量统计结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityResult {
    // 收益率的总体标准差 (百分比)
    pub volatility_pct: f64,
    // 相对 10 周期前收盘价的动量 (百分比)
    pub momentum_pct: f64,
    // 最新成交量相对近 20 根均量的比值
    pub relative_volume: f64,
}

/// # Summary
/// 新闻情绪打分结果。
///
/// # Invariants
/// - 空文章集合映射为 {0.0, Neutral, 0, 0}，不是错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    // 情绪得分的算术平均
    pub average_score: f64,
    // 映射后的方向标签
    pub label: Direction,
    // 贡献点数 (无符号, 方向由 label 决定)
    pub points: i32,
    // 参与统计的文章数量
    pub article_count: usize,
}

/// # Summary
/// 具体的入场/止损/止盈交易计划。
///
/// # Invariants
/// - 仅在方向性信号 (非 Neutral) 时存在。
/// - 构造时 ATR 必须为正，确保风险距离与盈亏比有限。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlan {
    // 入场价 (当前价)
    pub entry: f64,
    // 止损价 (入场价 ∓ 1.5 × ATR)
    pub stop_loss: f64,
    // 第一止盈位
    pub take_profit_1: f64,
    // 第二止盈位
    pub take_profit_2: f64,
    // 风险距离 |入场 - 止损|
    pub risk: f64,
    // TP1 的盈亏比
    pub reward_risk_1: f64,
    // TP2 的盈亏比
    pub reward_risk_2: f64,
}

/// # Summary
/// 入场/出场规划器的输出：买卖双边计分与可选交易计划。
///
/// # Invariants
/// - 方向性信号要求单边得分严格高于另一边且达到最低门槛。
/// - 规划器自身的点数不参与聚合总分，作为平行信号通道透传。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSignal {
    // 最终方向
    pub signal: Direction,
    // 买方累计点数
    pub buy_points: u32,
    // 卖方累计点数
    pub sell_points: u32,
    // 触发的规则说明 (用于展示层)
    pub reasons: Vec<String>,
    // 具体交易计划，仅方向性信号时存在
    pub plan: Option<TradePlan>,
}

/// # Summary
/// 聚合器各分量的点数拆解。
///
/// # Invariants
/// - 三个分量之和必须等于 DecisionRecord::total_score。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    // 回归预测贡献
    pub forecast: i32,
    // 波动率/动量贡献
    pub volatility: i32,
    // 新闻情绪贡献 (带符号)
    pub sentiment: i32,
}

impl ScoreBreakdown {
    /// # Summary
    /// 三个分量的精确整数和。
    pub fn total(&self) -> i32 {
        self.forecast + self.volatility + self.sentiment
    }
}

/// # Summary
/// 聚合后的最终信号标签。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    WeakBuy,
    Neutral,
    WeakSell,
    Sell,
    StrongSell,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignalLabel::StrongBuy => "STRONG BUY",
            SignalLabel::Buy => "BUY",
            SignalLabel::WeakBuy => "WEAK BUY",
            SignalLabel::Neutral => "NEUTRAL - WAIT",
            SignalLabel::WeakSell => "WEAK SELL",
            SignalLabel::Sell => "SELL",
            SignalLabel::StrongSell => "STRONG SELL",
        };
        write!(f, "{}", name)
    }
}

/// # Summary
/// 信号置信度分层。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// # Summary
/// 单个货币对在一次分析周期中的完整决策记录。
///
/// # Invariants
/// - 构造后不可变；下一周期产生新记录替换旧记录，核心不保留历史。
/// - `total_score` 等于 `breakdown` 三分量之和，与规划器输出无关。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    // 货币对
    pub pair: CurrencyPair,
    // 记录生成时间
    pub time: DateTime<Utc>,
    // 最新收盘价
    pub current_price: f64,
    // 回归预测结果
    pub forecast: ForecastResult,
    // 波动率/动量结果
    pub volatility: VolatilityResult,
    // 新闻情绪结果
    pub sentiment: SentimentResult,
    // 技术面规划器输出 (平行信号通道, 不计入总分)
    pub technical: TechnicalSignal,
    // 各分量点数拆解
    pub breakdown: ScoreBreakdown,
    // 聚合总分
    pub total_score: i32,
    // 最终标签
    pub label: SignalLabel,
    // 置信度分层
    pub confidence: ConfidenceTier,
}
