//! 纯函数形式的多因子计分库：技术指标、回归预测、波动率统计、
//! 新闻情绪打分、入场规划与最终信号聚合。
//!
//! 所有计算都作用于按时间升序的有限窗口，无共享状态，也不做任何 I/O。

pub mod aggregator;
pub mod forecast;
pub mod indicators;
pub mod planner;
pub mod sentiment;
pub mod volatility;
