//! 日志初始化
//!
//! 基于 tracing / tracing-subscriber。`RUST_LOG` 环境变量优先于配置中的日志级别。

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LogLevel, LoggingConfig};

impl LogLevel {
    /// 转换为 EnvFilter 指令
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 构建过滤器
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()))
}

/// 初始化日志系统
///
/// 重复调用是安全的：已经安装过全局订阅者时直接返回。
pub fn init_logging(config: &LoggingConfig) {
    if config.log_to_file {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file_path)
        {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(build_filter(config))
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(e) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(build_filter(config))
                    .try_init();
                tracing::warn!(
                    target: "wardrobe",
                    "Could not open log file {}: {}, logging to console",
                    config.log_file_path,
                    e
                );
            }
        }
    } else if config.log_to_console {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(build_filter(config))
            .try_init();
    }

    tracing::info!(target: "wardrobe", "Wardrobe logging initialized");
}
