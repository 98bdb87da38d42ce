//! 分析编排层：单轮分析管线与多货币对监控循环。

pub mod analyzer;
pub mod error;
pub mod monitor;

pub use analyzer::Analyzer;
pub use error::CycleError;
pub use monitor::Monitor;
