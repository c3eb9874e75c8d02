//! 角色绑定描述
//!
//! `ModelReferenceBinder` 是挂在角色根实体上的制作期引用表；
//! `RigDescriptor` 是会话开始时从它校验得到的只读描述。

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::core::{RigError, WardrobeResult};
use crate::mesh::SkinnedMeshRenderer;

/// 角色性别（决定人群生成时使用哪份目录）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// 身体部位条目
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyPartEntry {
    pub part_name: String,
    pub renderer: Entity,
}

impl BodyPartEntry {
    pub fn new(part_name: impl Into<String>, renderer: Entity) -> Self {
        Self {
            part_name: part_name.into(),
            renderer,
        }
    }
}

/// 角色引用绑定组件
#[derive(Component, Clone, Debug, Default)]
pub struct ModelReferenceBinder {
    pub gender: Gender,
    pub root_bone: Option<Entity>,
    pub accessory_slot: Option<Entity>,
    pub base_body: Option<Entity>,
    pub combined_slot: Option<Entity>,
    pub body_parts: Vec<BodyPartEntry>,
}

/// 角色绑定描述
#[derive(Clone, Debug)]
pub struct RigDescriptor {
    /// 角色根实体（蒙皮服装生成在它下面）
    pub model: Entity,
    pub gender: Gender,
    pub root_bone: Entity,
    pub accessory_slot: Entity,
    pub base_body: Entity,
    pub body_parts: HashMap<String, Entity>,
    pub combined_slot: Option<Entity>,
}

impl RigDescriptor {
    /// 从角色根实体上的绑定组件构建描述
    pub fn from_model(world: &World, model: Entity) -> Result<Self, RigError> {
        let binder = world
            .get::<ModelReferenceBinder>(model)
            .ok_or(RigError::MissingBinder(model))?;

        let root_bone = binder
            .root_bone
            .ok_or(RigError::MissingReference("root_bone"))?;
        let accessory_slot = binder
            .accessory_slot
            .ok_or(RigError::MissingReference("accessory_slot"))?;
        let base_body = binder
            .base_body
            .ok_or(RigError::MissingReference("base_body"))?;

        for (what, entity) in [
            ("root_bone", root_bone),
            ("accessory_slot", accessory_slot),
            ("base_body", base_body),
        ] {
            ensure_alive(world, what, entity)?;
        }
        if let Some(slot) = binder.combined_slot {
            ensure_alive(world, "combined_slot", slot)?;
        }

        let has_mesh = world
            .get::<SkinnedMeshRenderer>(base_body)
            .is_some_and(|r| r.mesh.is_some());
        if !has_mesh {
            return Err(RigError::MissingBaseBody(base_body));
        }

        if binder.body_parts.is_empty() {
            return Err(RigError::MissingBodyPartIndex);
        }
        let mut body_parts = HashMap::with_capacity(binder.body_parts.len());
        for entry in &binder.body_parts {
            ensure_alive(world, &entry.part_name, entry.renderer)?;
            if body_parts
                .insert(entry.part_name.clone(), entry.renderer)
                .is_some()
            {
                return Err(RigError::DuplicateBodyPart(entry.part_name.clone()));
            }
        }

        Ok(Self {
            model,
            gender: binder.gender,
            root_bone,
            accessory_slot,
            base_body,
            body_parts,
            combined_slot: binder.combined_slot,
        })
    }

    /// 按名称查找身体部位，未知名称返回 None
    pub fn body_part(&self, name: &str) -> Option<Entity> {
        self.body_parts.get(name).copied()
    }

    /// 基础身体的骨骼数组与绑定姿态（规范骨骼顺序）
    pub fn base_skeleton(&self, world: &World) -> WardrobeResult<(Vec<Entity>, Vec<Mat4>)> {
        let renderer = world
            .get::<SkinnedMeshRenderer>(self.base_body)
            .ok_or(RigError::MissingBaseBody(self.base_body))?;
        let mesh = renderer
            .mesh
            .as_ref()
            .ok_or(RigError::MissingBaseBody(self.base_body))?;
        Ok((renderer.bones.clone(), mesh.bind_poses.clone()))
    }
}

fn ensure_alive(world: &World, what: &str, entity: Entity) -> Result<(), RigError> {
    if world.get_entity(entity).is_none() {
        return Err(RigError::DanglingEntity {
            what: what.to_string(),
            entity,
        });
    }
    Ok(())
}
