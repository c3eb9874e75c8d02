//! 统一错误处理模块
//!
//! 提供换装系统范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`RigError`, `EquipError::UnrecognizedCategory` 等): 调用方配置不匹配，操作被拒绝
//! - **不变量违例** (`CombineError`, `MeshError`): 编程错误，操作在修改场景之前中止
//!
//! 软性查找失败（部位名不存在、目录分类为空）不是错误，只记录日志并写入操作报告。

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::catalog::ClothingCategory;
use crate::config::ConfigError;

/// 换装系统核心错误类型
#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rig error: {0}")]
    Rig(#[from] RigError),

    #[error("Equip error: {0}")]
    Equip(#[from] EquipError),

    #[error("Combine error: {0}")]
    Combine(#[from] CombineError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),
}

/// 角色绑定错误（会话级致命配置错误）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    #[error("Model {0:?} has no ModelReferenceBinder")]
    MissingBinder(Entity),

    #[error("Required rig reference is not assigned: {0}")]
    MissingReference(&'static str),

    #[error("Base body {0:?} has no skinned mesh")]
    MissingBaseBody(Entity),

    #[error("Rig has no body part entries")]
    MissingBodyPartIndex,

    #[error("Duplicate body part name: {0}")]
    DuplicateBodyPart(String),

    #[error("Rig reference {what} points at a despawned entity {entity:?}")]
    DanglingEntity { what: String, entity: Entity },
}

/// 穿戴错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    #[error("Unrecognized clothing category: {0}")]
    UnrecognizedCategory(String),

    #[error("Clothing '{name}' in category {category} needs a {expected} payload")]
    PayloadMismatch {
        name: String,
        category: ClothingCategory,
        expected: &'static str,
    },
}

/// 网格合并错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    #[error("Renderer '{part}' has {materials} materials for {sections} sub-meshes")]
    MaterialSectionMismatch {
        part: String,
        materials: usize,
        sections: usize,
    },

    #[error("Base skeleton has {bones} bones but {bind_poses} bind poses")]
    BindPoseMismatch { bones: usize, bind_poses: usize },

    #[error("Combined mesh has {sections} sections but {materials} materials")]
    ParityViolation { sections: usize, materials: usize },
}

/// 网格数据错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh '{mesh}' sub-mesh {submesh} references vertex {index} of {vertex_count}")]
    IndexOutOfRange {
        mesh: String,
        submesh: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Mesh '{mesh}' has no sub-mesh {index} (count {count})")]
    MissingSubMesh {
        mesh: String,
        index: usize,
        count: usize,
    },

    #[error("Mesh '{mesh}' sub-mesh {submesh} index count {count} is not a multiple of 3")]
    IncompleteTriangle {
        mesh: String,
        submesh: usize,
        count: usize,
    },

    #[error("Mesh '{mesh}' exceeds the 32-bit index range with {count} vertices")]
    TooManyVertices { mesh: String, count: usize },
}

/// 结果类型别名
pub type WardrobeResult<T> = Result<T, WardrobeError>;
pub type MeshResult<T> = Result<T, MeshError>;
