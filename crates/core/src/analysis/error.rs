use thiserror::Error;

/// # Summary
/// 分析计算域错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 单个标的的计算失败不得波及其他标的的分析周期。
#[derive(Error, Debug)]
pub enum AnalysisError {
    // 输入窗口长度不满足指标的最小样本要求
    #[error("Insufficient data: required {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    // 退化输入 (例如 ATR 为零或零方差回归窗口)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

/// # Summary
/// 决策分发 (展示层) 错误枚举。
#[derive(Error, Debug)]
pub enum SinkError {
    // 投递失败 (网络或底层写入错误)
    #[error("Delivery error: {0}")]
    Delivery(String),
    // 配置错误 (如缺少 Token)
    #[error("Configuration error: {0}")]
    Config(String),
}
