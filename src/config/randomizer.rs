/// 随机搭配配置

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use super::{ConfigError, ConfigResult};

/// 随机搭配配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomizerConfig {
    /// 选择整套服装（而不是上衣+下装）的概率 (0.0 - 1.0)
    pub outfit_chance: f64,

    /// 固定随机种子，便于复现人群
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            outfit_chance: 0.5,
            seed: None,
        }
    }
}

impl RandomizerConfig {
    /// 根据种子创建随机数生成器
    pub fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.outfit_chance) {
            return Err(ConfigError::ValidationError(
                "Invalid outfit chance".to_string(),
            ));
        }
        Ok(())
    }
}
