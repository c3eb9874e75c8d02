//! 场景组件
//!
//! 角色层级中的每个节点（骨骼、挂点、身体部位、服装实例、合并槽）都是一个实体，
//! 携带局部变换、父子链接、名称和激活状态。

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

/// 局部变换（相对于父节点）
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub rot: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(pos: Vec3) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// 转换为 4x4 矩阵
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rot, self.pos)
    }

    /// 从 4x4 矩阵分解
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rot, pos) = matrix.to_scale_rotation_translation();
        Self { pos, rot, scale }
    }
}

/// 父节点
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// 子节点列表
#[derive(Component, Clone, Debug, Default)]
pub struct Children(pub Vec<Entity>);

/// 调试名称
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// 激活状态（隐藏身体部位、显示合并网格都通过它完成）
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Self(true)
    }
}
