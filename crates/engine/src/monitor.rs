use crate::analyzer::Analyzer;
use dashmap::DashMap;
use kawase_core::analysis::entity::{DecisionRecord, SignalLabel};
use kawase_core::analysis::port::{AnalysisEvent, DecisionSink};
use kawase_core::common::{CurrencyPair, Interval};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// # Summary
/// 多货币对监控调度器。
///
/// # Invariants
/// - 同一货币对同一时刻至多一个分析任务在途。
/// - 并发分析任务数不超过 `max_concurrency`。
/// - 单个标的失败或单个订阅者投递失败只记日志，不影响其余标的与订阅者。
pub struct Monitor {
    /// 单标的分析器
    analyzer: Arc<Analyzer>,
    /// 事件订阅者列表
    sinks: Vec<Arc<dyn DecisionSink>>,
    /// 监控的货币对
    pairs: Vec<CurrencyPair>,
    /// K 线周期
    interval: Interval,
    /// 轮询间隔
    poll_interval: Duration,
    /// 强信号告警阈值 (总分绝对值)
    alert_score: i32,
    /// 并发许可
    semaphore: Arc<Semaphore>,
    /// 在途任务守卫
    in_flight: Arc<DashMap<CurrencyPair, ()>>,
    /// 各标的上一周期的信号标签
    last_labels: DashMap<CurrencyPair, SignalLabel>,
    /// 全局周期计数
    revision: AtomicU64,
}

/// # Summary
/// 在途守卫：随分析任务存活，任务结束 (包括 panic 展开) 时释放注册表条目。
struct InFlightGuard {
    registry: Arc<DashMap<CurrencyPair, ()>>,
    pair: CurrencyPair,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.pair);
    }
}

impl Monitor {
    /// # Summary
    /// 创建一个新的 Monitor 实例。
    ///
    /// # Arguments
    /// * `analyzer`: 单标的分析器。
    /// * `sinks`: 事件订阅者列表。
    /// * `pairs`: 监控的货币对 (已校验非空)。
    /// * `interval`: K 线周期。
    /// * `poll_interval`: 轮询间隔。
    /// * `max_concurrency`: 并发分析任务上限 (已校验非零)。
    /// * `alert_score`: 强信号告警阈值。
    ///
    /// # Returns
    /// 返回初始化后的 Monitor。
    pub fn new(
        analyzer: Arc<Analyzer>,
        sinks: Vec<Arc<dyn DecisionSink>>,
        pairs: Vec<CurrencyPair>,
        interval: Interval,
        poll_interval: Duration,
        max_concurrency: usize,
        alert_score: i32,
    ) -> Self {
        Self {
            analyzer,
            sinks,
            pairs,
            interval,
            poll_interval,
            alert_score,
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            in_flight: Arc::new(DashMap::new()),
            last_labels: DashMap::new(),
            revision: AtomicU64::new(0),
        }
    }

    /// # Summary
    /// 执行一个完整的监控周期并分发产生的事件。
    ///
    /// # Logic
    /// 1. 递增全局周期计数。
    /// 2. 为每个不在途的货币对派生一个受信号量约束的分析任务。
    /// 3. 汇合全部任务结果；失败的标的记日志后跳过。
    /// 4. 每条成功决策依次派发 Decision、StrongSignal (达到阈值时)、
    ///    SignalFlip (标签变化且新标签非 Neutral 时)。
    ///
    /// # Returns
    /// 返回本周期成功产出的决策数量。
    pub async fn run_once(&self) -> usize {
        let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
        let mut tasks: JoinSet<(CurrencyPair, Result<DecisionRecord, crate::CycleError>)> =
            JoinSet::new();

        for pair in &self.pairs {
            if self.in_flight.insert(pair.clone(), ()).is_some() {
                warn!(%pair, "previous analysis still in flight, skipping");
                continue;
            }

            let guard = InFlightGuard {
                registry: self.in_flight.clone(),
                pair: pair.clone(),
            };
            let analyzer = self.analyzer.clone();
            let semaphore = self.semaphore.clone();
            let interval = self.interval;
            let pair = pair.clone();
            tasks.spawn(async move {
                // 守卫随任务存活，任务异常终止时同样释放在途条目
                let _guard = guard;
                // 信号量关闭只会发生在进程退出路径，此处视为任务取消
                let _permit = semaphore.acquire_owned().await;
                let result = analyzer.run_cycle(&pair, interval).await;
                (pair, result)
            });
        }

        let mut published = 0;
        while let Some(joined) = tasks.join_next().await {
            let (pair, result) = match joined {
                Ok(output) => output,
                Err(e) => {
                    error!(error = %e, "analysis task aborted");
                    continue;
                }
            };

            match result {
                Ok(record) => {
                    self.dispatch(revision, record).await;
                    published += 1;
                }
                Err(e) => {
                    error!(%pair, error = %e, "analysis cycle failed");
                }
            }
        }
        published
    }

    /// # Summary
    /// 周期性运行监控循环，首轮立即执行。
    pub async fn run(&self) {
        info!(
            pairs = self.pairs.len(),
            interval = %self.interval,
            poll_secs = self.poll_interval.as_secs(),
            "monitor loop started"
        );
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }

    /// # Summary
    /// 把一条决策记录展开为事件序列并投递给全部订阅者。
    async fn dispatch(&self, revision: u64, record: DecisionRecord) {
        let pair = record.pair.clone();
        let label = record.label;
        let total_score = record.total_score;

        let mut events = vec![AnalysisEvent::Decision {
            revision,
            record: record.clone(),
        }];

        if total_score.abs() >= self.alert_score {
            events.push(AnalysisEvent::StrongSignal { record });
        }

        let previous = self.last_labels.insert(pair.clone(), label);
        if let Some(previous) = previous
            && previous != label
            && label != SignalLabel::Neutral
        {
            events.push(AnalysisEvent::SignalFlip {
                pair: pair.clone(),
                previous,
                current: label,
            });
        }

        for event in &events {
            for sink in &self.sinks {
                if let Err(e) = sink.publish(event).await {
                    error!(%pair, error = %e, "failed to publish analysis event");
                }
            }
        }
    }
}
