//! 渲染器组件

use bevy_ecs::prelude::*;
use std::sync::Arc;

use super::geometry::Mesh;
use super::material::Material;

/// 蒙皮网格渲染器
///
/// `materials` 与网格子网格按下标一一对应。
#[derive(Component, Clone, Debug, Default)]
pub struct SkinnedMeshRenderer {
    pub mesh: Option<Arc<Mesh>>,
    pub materials: Vec<Arc<Material>>,
    /// 驱动该网格的骨骼实体，顺序与 `Mesh::bind_poses` 一致
    pub bones: Vec<Entity>,
    pub root_bone: Option<Entity>,
    /// 视锥外也持续更新蒙皮
    pub update_when_offscreen: bool,
}

impl SkinnedMeshRenderer {
    pub fn new(mesh: Arc<Mesh>, materials: Vec<Arc<Material>>) -> Self {
        Self {
            mesh: Some(mesh),
            materials,
            ..Default::default()
        }
    }

    /// 子网格数量（没有网格时为 0）
    pub fn section_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.submesh_count())
    }
}

/// 静态网格渲染器（头发等挂件）
#[derive(Component, Clone, Debug)]
pub struct MeshRenderer {
    pub mesh: Arc<Mesh>,
    pub materials: Vec<Arc<Material>>,
}
