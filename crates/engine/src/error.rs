use kawase_core::analysis::error::AnalysisError;
use kawase_core::market::error::MarketError;
use thiserror::Error;

/// # Summary
/// 单轮分析管线的错误类型。
///
/// # Invariants
/// - 行情获取失败与指标计算失败分开归因，便于监控循环按症状记日志。
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("market data error: {0}")]
    Market(#[from] MarketError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}
