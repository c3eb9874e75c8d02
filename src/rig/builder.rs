//! 角色构建
//!
//! 按模板在 World 中生成一个可换装的角色：骨骼层级、基础身体、身体部位、
//! 配饰挂点和（可选的）合并网格槽，并挂上 `ModelReferenceBinder`。

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::mesh::{cuboid, Material, Mesh, SkinnedMeshRenderer};
use crate::scene::{local_to_world, spawn_child, Active, Name, Transform};

use super::descriptor::{BodyPartEntry, Gender, ModelReferenceBinder};

// ============================================================================
// 模板
// ============================================================================

/// 骨骼定义
#[derive(Clone, Debug)]
pub struct BoneDef {
    /// 骨骼名称
    pub name: String,
    /// 父骨骼索引（None 表示根骨骼，必须排在子骨骼之前）
    pub parent_index: Option<usize>,
    /// 局部变换（相对于父骨骼）
    pub local_transform: Transform,
}

impl BoneDef {
    pub fn new(name: impl Into<String>, parent_index: Option<usize>, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            parent_index,
            local_transform: Transform::from_translation(offset),
        }
    }
}

/// 身体部位定义（角色空间中的长方体）
#[derive(Clone, Debug)]
pub struct BodyPartDef {
    pub name: String,
    pub bone: usize,
    pub center: Vec3,
    pub size: Vec3,
}

/// 角色模板
#[derive(Clone, Debug)]
pub struct CharacterTemplate {
    pub name: String,
    pub gender: Gender,
    pub bones: Vec<BoneDef>,
    /// 配饰挂点所在骨骼
    pub head_bone: usize,
    pub body_parts: Vec<BodyPartDef>,
    pub with_combined_slot: bool,
}

impl CharacterTemplate {
    /// 简单人形：11 根骨骼，5 个可隐藏的身体部位
    pub fn humanoid(gender: Gender) -> Self {
        let bones = vec![
            BoneDef::new("Hips", None, Vec3::new(0.0, 1.0, 0.0)),
            BoneDef::new("Spine", Some(0), Vec3::new(0.0, 0.2, 0.0)),
            BoneDef::new("Chest", Some(1), Vec3::new(0.0, 0.2, 0.0)),
            BoneDef::new("Neck", Some(2), Vec3::new(0.0, 0.2, 0.0)),
            BoneDef::new("Head", Some(3), Vec3::new(0.0, 0.1, 0.0)),
            BoneDef::new("LeftUpperArm", Some(2), Vec3::new(0.25, 0.1, 0.0)),
            BoneDef::new("RightUpperArm", Some(2), Vec3::new(-0.25, 0.1, 0.0)),
            BoneDef::new("LeftUpperLeg", Some(0), Vec3::new(0.1, -0.05, 0.0)),
            BoneDef::new("RightUpperLeg", Some(0), Vec3::new(-0.1, -0.05, 0.0)),
            BoneDef::new("LeftFoot", Some(7), Vec3::new(0.0, -0.9, 0.0)),
            BoneDef::new("RightFoot", Some(8), Vec3::new(0.0, -0.9, 0.0)),
        ];
        let part = |name: &str, bone, center: Vec3, size: Vec3| BodyPartDef {
            name: name.to_string(),
            bone,
            center,
            size,
        };
        let body_parts = vec![
            part("Head", 4, Vec3::new(0.0, 1.65, 0.0), Vec3::splat(0.25)),
            part("Torso", 2, Vec3::new(0.0, 1.3, 0.0), Vec3::new(0.4, 0.6, 0.25)),
            part("Arms", 2, Vec3::new(0.0, 1.45, 0.0), Vec3::new(1.0, 0.12, 0.12)),
            part("Legs", 0, Vec3::new(0.0, 0.55, 0.0), Vec3::new(0.35, 0.9, 0.2)),
            part("Feet", 9, Vec3::new(0.0, 0.05, 0.05), Vec3::new(0.35, 0.1, 0.3)),
        ];

        Self {
            name: match gender {
                Gender::Male => "MaleAvatar".to_string(),
                Gender::Female => "FemaleAvatar".to_string(),
            },
            gender,
            bones,
            head_bone: 4,
            body_parts,
            with_combined_slot: true,
        }
    }
}

// ============================================================================
// 构建器
// ============================================================================

/// 角色构建器
pub struct CharacterBuilder {
    template: CharacterTemplate,
    placement: Transform,
    skin: Arc<Material>,
}

impl CharacterBuilder {
    pub fn new(template: CharacterTemplate) -> Self {
        Self {
            template,
            placement: Transform::default(),
            skin: Arc::new(Material::new("Skin", [0.87, 0.72, 0.6, 1.0])),
        }
    }

    /// 角色根节点的世界位置
    pub fn at(mut self, position: Vec3) -> Self {
        self.placement.pos = position;
        self
    }

    pub fn facing(mut self, rotation: Quat) -> Self {
        self.placement.rot = rotation;
        self
    }

    /// 在 World 中生成角色，返回角色根实体
    pub fn spawn(&self, world: &mut World) -> Entity {
        let template = &self.template;
        let model = world
            .spawn((Name::new(template.name.clone()), self.placement, Active(true)))
            .id();

        let mut bones: Vec<Entity> = Vec::with_capacity(template.bones.len());
        for (i, def) in template.bones.iter().enumerate() {
            let parent = match def.parent_index {
                Some(p) if p < i => bones[p],
                Some(p) => {
                    tracing::warn!(
                        target: "wardrobe",
                        "Bone {} lists parent {} which is not defined before it, attaching to model root",
                        def.name,
                        p
                    );
                    model
                }
                None => model,
            };
            bones.push(spawn_child(
                world,
                Some(parent),
                (Name::new(def.name.clone()), def.local_transform, Active(true)),
            ));
        }

        let base_body = spawn_child(
            world,
            Some(model),
            (Name::new("BaseBody"), Transform::default(), Active(true)),
        );
        let body_world = local_to_world(world, base_body);
        let bind_poses: Vec<_> = bones
            .iter()
            .map(|&bone| local_to_world(world, bone).inverse() * body_world)
            .collect();

        let root_bone = bones.first().copied();
        let skeleton_mesh =
            Arc::new(Mesh::new("BaseBodySkeleton", Vec::new(), Vec::new()).with_bind_poses(bind_poses.clone()));
        world.entity_mut(base_body).insert(SkinnedMeshRenderer {
            mesh: Some(skeleton_mesh),
            materials: Vec::new(),
            bones: bones.clone(),
            root_bone,
            update_when_offscreen: false,
        });

        let mut body_parts = Vec::with_capacity(template.body_parts.len());
        for def in &template.body_parts {
            let mesh = cuboid(def.name.clone(), def.center, def.size, 1, def.bone as u32)
                .with_bind_poses(bind_poses.clone());
            let renderer = SkinnedMeshRenderer {
                mesh: Some(Arc::new(mesh)),
                materials: vec![self.skin.clone()],
                bones: bones.clone(),
                root_bone,
                update_when_offscreen: false,
            };
            let part = spawn_child(
                world,
                Some(model),
                (Name::new(def.name.clone()), Transform::default(), Active(true), renderer),
            );
            body_parts.push(BodyPartEntry::new(def.name.clone(), part));
        }

        let accessory_slot = bones.get(template.head_bone).map(|&head| {
            spawn_child(
                world,
                Some(head),
                (Name::new("HeadAccessories"), Transform::default(), Active(true)),
            )
        });

        let combined_slot = template.with_combined_slot.then(|| {
            spawn_child(
                world,
                Some(model),
                (
                    Name::new("CombinedMesh"),
                    Transform::default(),
                    Active(false),
                    SkinnedMeshRenderer::default(),
                ),
            )
        });

        world.entity_mut(model).insert(ModelReferenceBinder {
            gender: template.gender,
            root_bone,
            accessory_slot,
            base_body: Some(base_body),
            combined_slot,
            body_parts,
        });

        tracing::debug!(
            target: "wardrobe",
            "Spawned character {} with {} bones",
            template.name,
            bones.len()
        );
        model
    }
}
