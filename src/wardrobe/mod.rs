//! 换装核心
//!
//! - `state`: 每个角色的穿戴状态（实例、隐藏部位撤销日志、穿戴记录）
//! - `service`: 穿脱规则（互斥、替换、部位隐藏与恢复）
//! - `session`: 绑定一个角色的会话入口

pub mod service;
pub mod session;
pub mod state;


pub use service::{EquipReport, EquipService};
pub use session::AvatarSession;
pub use state::{WornItem, WornState};
