use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 外汇货币对实体，代表系统关注的特定交易对。
///
/// # Invariants
/// - `base` 与 `quote` 均为非空的大写货币代码 (例如: USD, JPY)。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    // 基础货币 (例如: USD)
    pub base: String,
    // 计价货币 (例如: JPY)
    pub quote: String,
}

impl CurrencyPair {
    /// # Summary
    /// 直接由两个货币代码构造货币对。
    ///
    /// # Arguments
    /// * `base`: 基础货币代码。
    /// * `quote`: 计价货币代码。
    ///
    /// # Returns
    /// 返回构造好的 CurrencyPair。
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// # Summary
    /// 渲染不含斜杠的紧凑形式 (例如: USDJPY)。
    ///
    /// # Logic
    /// 1. 拼接 base 与 quote。
    ///
    /// # Returns
    /// 紧凑的交易代码字符串。
    pub fn ticker(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid currency pair: {}", s))?;
        if base.is_empty() || quote.is_empty() {
            return Err(format!("Invalid currency pair: {}", s));
        }
        Ok(CurrencyPair {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        })
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// # Summary
/// K 线时间周期枚举，定义单根蜡烛覆盖的时间跨度。
///
/// # Invariants
/// - 无特定约束。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 30分钟
    Minute30,
    // 1小时
    Hour1,
    // 4小时
    Hour4,
    // 1日
    Day1,
}

impl Interval {
    /// # Summary
    /// 返回 Twelve Data 风格的周期代码 (例如: "5min")。
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1min",
            Interval::Minute5 => "5min",
            Interval::Minute15 => "15min",
            Interval::Minute30 => "30min",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1day",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Ok(Interval::Minute1),
            "5m" | "5min" => Ok(Interval::Minute5),
            "15m" | "15min" => Ok(Interval::Minute15),
            "30m" | "30min" => Ok(Interval::Minute30),
            "1h" | "hour1" => Ok(Interval::Hour1),
            "4h" | "hour4" => Ok(Interval::Hour4),
            "1d" | "1day" => Ok(Interval::Day1),
            _ => Err(format!("Unknown interval: {}", s)),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_parse_roundtrip() {
        let pair: CurrencyPair = "usd/jpy".parse().expect("should parse");
        assert_eq!(pair.base, "USD");
        assert_eq!(pair.quote, "JPY");
        assert_eq!(pair.to_string(), "USD/JPY");
        assert_eq!(pair.ticker(), "USDJPY");
    }

    #[test]
    fn test_pair_parse_rejects_garbage() {
        assert!("USDJPY".parse::<CurrencyPair>().is_err());
        assert!("/JPY".parse::<CurrencyPair>().is_err());
        assert!("USD/".parse::<CurrencyPair>().is_err());
    }

    #[test]
    fn test_interval_codes() {
        assert_eq!("5min".parse::<Interval>(), Ok(Interval::Minute5));
        assert_eq!("1h".parse::<Interval>(), Ok(Interval::Hour1));
        assert_eq!(Interval::Day1.to_string(), "1day");
    }
}
