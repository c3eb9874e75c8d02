/// 网格合并配置

use serde::{Deserialize, Serialize};

/// 网格合并配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineConfig {
    /// 合并后按面重新计算法线
    pub recalculate_normals: bool,

    /// 合并后按 UV 重新计算切线
    pub recalculate_tangents: bool,

    /// 合并网格在视锥外也持续更新蒙皮（人群实例需要）
    pub update_when_offscreen: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            recalculate_normals: false,
            recalculate_tangents: false,
            update_when_offscreen: true,
        }
    }
}
