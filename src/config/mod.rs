/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量和运行时动态调整
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod combine;
pub mod equip;
pub mod randomizer;

pub use combine::CombineConfig;
pub use equip::EquipConfig;
pub use randomizer::RandomizerConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 换装系统主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardrobeConfig {
    /// 穿戴配置
    #[serde(default)]
    pub equip: EquipConfig,

    /// 网格合并配置
    #[serde(default)]
    pub combine: CombineConfig,

    /// 随机搭配配置
    #[serde(default)]
    pub randomizer: RandomizerConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardrobeConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        // 随机搭配
        if let Ok(val) = env::var("WARDROBE_OUTFIT_CHANCE") {
            if let Ok(chance) = val.parse() {
                self.randomizer.outfit_chance = chance;
            }
        }
        if let Ok(val) = env::var("WARDROBE_RANDOM_SEED") {
            if let Ok(seed) = val.parse() {
                self.randomizer.seed = Some(seed);
            }
        }

        // 网格合并
        if let Ok(val) = env::var("WARDROBE_RECALCULATE_NORMALS") {
            self.combine.recalculate_normals =
                val.parse().unwrap_or(self.combine.recalculate_normals);
        }
        if let Ok(val) = env::var("WARDROBE_RECALCULATE_TANGENTS") {
            self.combine.recalculate_tangents =
                val.parse().unwrap_or(self.combine.recalculate_tangents);
        }

        // 日志
        if let Ok(val) = env::var("WARDROBE_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.equip.validate()?;
        self.randomizer.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./wardrobe.toml
    /// 2. ./wardrobe.json
    /// 3. ~/.config/avatar_wardrobe/wardrobe.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("wardrobe.toml") {
            tracing::info!(target: "wardrobe", "Loaded config from wardrobe.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("wardrobe.json") {
            tracing::info!(target: "wardrobe", "Loaded config from wardrobe.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("avatar_wardrobe")
                .join("wardrobe.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "wardrobe", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "wardrobe", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到文件
    pub log_to_file: bool,

    /// 日志文件路径
    pub log_file_path: String,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_to_file: false,
            log_file_path: "avatar_wardrobe.log".to_string(),
            log_to_console: true,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 从字符串解析（不区分大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}
