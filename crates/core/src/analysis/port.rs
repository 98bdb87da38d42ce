use crate::analysis::entity::{DecisionRecord, SignalLabel};
use crate::analysis::error::SinkError;
use crate::common::CurrencyPair;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// # Summary
/// 调度器向展示层分发的分析事件。
///
/// # Invariants
/// - `Decision` 每个标的每个周期恰好产生一次 (失败的周期除外)。
/// - `StrongSignal` 仅在总分绝对值达到告警阈值时伴随产生。
/// - `SignalFlip` 仅在标签相对上一周期发生变化且新标签非 Neutral 时产生。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisEvent {
    // 常规周期决策
    Decision {
        // 全局周期计数 (从 1 开始)
        revision: u64,
        record: DecisionRecord,
    },
    // 强信号告警
    StrongSignal { record: DecisionRecord },
    // 信号翻转提示
    SignalFlip {
        pair: CurrencyPair,
        previous: SignalLabel,
        current: SignalLabel,
    },
}

/// # Summary
/// 决策事件订阅者接口 (控制台、推送通道、socket 订阅者等)。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发分发。
/// - 投递失败只影响自身，调度器记录日志后继续。
#[async_trait]
pub trait DecisionSink: Send + Sync {
    /// # Summary
    /// 接收一条分析事件。
    ///
    /// # Logic
    /// 1. 按目标通道要求格式化事件。
    /// 2. 通过底层传输写出。
    ///
    /// # Arguments
    /// * `event`: 待投递的分析事件。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`，失败返回 `Err(SinkError)`。
    async fn publish(&self, event: &AnalysisEvent) -> Result<(), SinkError>;
}
