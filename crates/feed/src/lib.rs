//! 外部数据源适配器：Twelve Data 行情与 Alpha Vantage 新闻情绪。

pub mod alphavantage;
pub mod twelvedata;
