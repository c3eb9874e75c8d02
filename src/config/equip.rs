/// 穿戴配置

use serde::{Deserialize, Serialize};
use super::{ConfigError, ConfigResult};
use crate::catalog::ClothingCategory;

/// 穿戴配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipConfig {
    /// 当前角色会话接受的服装分类
    pub enabled_categories: Vec<ClothingCategory>,
}

impl Default for EquipConfig {
    fn default() -> Self {
        Self {
            enabled_categories: ClothingCategory::ALL.to_vec(),
        }
    }
}

impl EquipConfig {
    /// 分类是否启用
    pub fn is_enabled(&self, category: ClothingCategory) -> bool {
        self.enabled_categories.contains(&category)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled_categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one clothing category must be enabled".to_string(),
            ));
        }
        for (i, category) in self.enabled_categories.iter().enumerate() {
            if self.enabled_categories[..i].contains(category) {
                return Err(ConfigError::ValidationError(format!(
                    "Clothing category {} is listed twice",
                    category
                )));
            }
        }
        Ok(())
    }
}
