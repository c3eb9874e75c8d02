//! 服装分类

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::EquipError;

/// 服装分类
///
/// 同一分类同一时间最多穿戴一件；整套服装（Outfit）与上衣/下装互斥。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClothingCategory {
    Hair,
    Top,
    Bottom,
    Shoes,
    Outfit,
}

impl ClothingCategory {
    pub const ALL: [ClothingCategory; 5] = [
        ClothingCategory::Hair,
        ClothingCategory::Top,
        ClothingCategory::Bottom,
        ClothingCategory::Shoes,
        ClothingCategory::Outfit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClothingCategory::Hair => "Hair",
            ClothingCategory::Top => "Top",
            ClothingCategory::Bottom => "Bottom",
            ClothingCategory::Shoes => "Shoes",
            ClothingCategory::Outfit => "Outfit",
        }
    }

    /// 穿上本分类时必须先卸下的分类
    pub fn conflicts(&self) -> &'static [ClothingCategory] {
        match self {
            ClothingCategory::Outfit => &[ClothingCategory::Top, ClothingCategory::Bottom],
            ClothingCategory::Top | ClothingCategory::Bottom => &[ClothingCategory::Outfit],
            _ => &[],
        }
    }

    /// 是否以非蒙皮挂件的形式挂在配饰挂点上（不参与网格合并）
    pub fn uses_prop(&self) -> bool {
        matches!(self, ClothingCategory::Hair)
    }
}

impl fmt::Display for ClothingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClothingCategory {
    type Err = EquipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClothingCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EquipError::UnrecognizedCategory(s.to_string()))
    }
}
