//! 服装记录（外部拥有的只读数据）

use std::sync::Arc;

use crate::mesh::{Material, Mesh};
use crate::scene::Transform;

use super::category::ClothingCategory;

/// 蒙皮服装预制体
#[derive(Clone, Debug)]
pub struct SkinnedPrefab {
    pub mesh: Arc<Mesh>,
    pub materials: Vec<Arc<Material>>,
    /// 相对身体根节点的局部变换
    pub transform: Transform,
}

/// 静态挂件预制体（头发）
#[derive(Clone, Debug)]
pub struct PropPrefab {
    pub mesh: Arc<Mesh>,
    pub materials: Vec<Arc<Material>>,
    /// 相对配饰挂点的局部变换
    pub transform: Transform,
}

#[derive(Clone, Debug)]
pub enum ClothingPayload {
    Skinned(SkinnedPrefab),
    Prop(PropPrefab),
}

impl ClothingPayload {
    pub fn is_prop(&self) -> bool {
        matches!(self, ClothingPayload::Prop(_))
    }
}

/// 服装记录
#[derive(Clone, Debug)]
pub struct ClothingRecord {
    pub name: String,
    pub category: ClothingCategory,
    pub payload: ClothingPayload,
    /// 穿戴期间需要隐藏的身体部位名（有序、无重复）
    pub hidden_parts: Vec<String>,
}

impl ClothingRecord {
    pub fn skinned(
        name: impl Into<String>,
        category: ClothingCategory,
        mesh: Arc<Mesh>,
        materials: Vec<Arc<Material>>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            payload: ClothingPayload::Skinned(SkinnedPrefab {
                mesh,
                materials,
                transform: Transform::default(),
            }),
            hidden_parts: Vec::new(),
        }
    }

    pub fn prop(
        name: impl Into<String>,
        category: ClothingCategory,
        mesh: Arc<Mesh>,
        materials: Vec<Arc<Material>>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            payload: ClothingPayload::Prop(PropPrefab {
                mesh,
                materials,
                transform: Transform::default(),
            }),
            hidden_parts: Vec::new(),
        }
    }

    /// 追加需要隐藏的部位，重复名称只保留第一次出现
    pub fn hiding<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for part in parts {
            let part = part.into();
            if !self.hidden_parts.contains(&part) {
                self.hidden_parts.push(part);
            }
        }
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        match &mut self.payload {
            ClothingPayload::Skinned(prefab) => prefab.transform = transform,
            ClothingPayload::Prop(prefab) => prefab.transform = transform,
        }
        self
    }

    pub fn hides(&self, part: &str) -> bool {
        self.hidden_parts.iter().any(|p| p == part)
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
