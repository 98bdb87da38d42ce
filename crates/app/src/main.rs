use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment, File};
use kawase_core::analysis::port::DecisionSink;
use kawase_core::config::AppConfig;
use kawase_engine::{Analyzer, Monitor};
use kawase_feed::alphavantage::AlphaVantageProvider;
use kawase_feed::twelvedata::TwelveDataProvider;
use kawase_notify::console::ConsoleSink;
use kawase_notify::telegram::TelegramSink;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 Monitor。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 加载并校验配置（默认值 <- 配置文件 <- KAWASE 环境变量）。
/// 3. 实例化数据源层（行情、情绪）。
/// 4. 实例化分析层与事件订阅者。
/// 5. 启动监控循环并挂起等待外部信号退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("Kawase signal engine starting...");

    // 2. 加载配置
    let settings = Config::builder()
        .add_source(File::with_name("config/kawase").required(false))
        .add_source(Environment::with_prefix("KAWASE").separator("__"))
        .build()?;
    let app_config: AppConfig = settings.try_deserialize()?;
    let (pairs, interval) = app_config.validate()?;

    // 3. 实例化数据源层
    let provider = Arc::new(TwelveDataProvider::new(
        app_config.feed.twelvedata_api_key.clone(),
    ));
    let sentiment = Arc::new(AlphaVantageProvider::new(
        app_config.feed.alphavantage_api_key.clone(),
    ));

    // 4. 实例化分析层与事件订阅者
    let analyzer = Arc::new(Analyzer::new(
        provider,
        sentiment,
        app_config.analysis.clone(),
        app_config.feed.candle_count,
    ));

    let mut sinks: Vec<Arc<dyn DecisionSink>> = vec![Arc::new(ConsoleSink::new())];
    if let Some(telegram) = &app_config.notify.telegram {
        sinks.push(Arc::new(TelegramSink::new(
            telegram.bot_token.clone(),
            telegram.chat_id.clone(),
        )));
        info!("Telegram sink enabled");
    }

    let monitor = Arc::new(Monitor::new(
        analyzer,
        sinks,
        pairs,
        interval,
        Duration::from_secs(app_config.monitor.poll_interval_secs),
        app_config.monitor.max_concurrency,
        app_config.analysis.scoring.alert_score,
    ));

    // 5. 启动监控循环
    let monitor_task = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.run().await })
    };
    info!("Monitor started. Waiting for signals...");

    // 6. 挂起主线程，等待外部退出信号
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");
    monitor_task.abort();

    Ok(())
}
