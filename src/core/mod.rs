//! 核心模块
//!
//! 包含换装系统的基础设施：
//! - `error` - 错误类型定义
//! - `logging` - 日志初始化

pub mod error;
pub mod logging;

// 重新导出错误类型
pub use error::{
    CombineError, EquipError, MeshError, MeshResult, RigError, WardrobeError, WardrobeResult,
};
pub use logging::init_logging;
