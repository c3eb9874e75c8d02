//! 蒙皮网格合并
//!
//! `finalize` 把当前穿戴的所有蒙皮服装烘焙进角色的合并网格槽，一次绘制提交；
//! 再次穿戴前会先拆分，按穿戴记录重建各件服装。
//!
//! 合并规则：
//! - 每件服装的每个分段在合并网格中占一个分段，材质按同样顺序拼接
//! - 顶点变换 = 合并槽的世界->局部 * 服装的局部->世界
//! - 骨骼数组与绑定姿态取自基础身体，而不是各件服装
//! - 挂件（头发）不参与合并

use std::sync::Arc;

use bevy_ecs::prelude::*;

use crate::catalog::ClothingPayload;
use crate::config::CombineConfig;
use crate::core::{CombineError, RigError, WardrobeResult};
use crate::mesh::{Aabb, CombineInstance, CombineOptions, Material, Mesh, SkinnedMeshRenderer};
use crate::rig::RigDescriptor;
use crate::scene::{despawn_recursive, is_active, local_to_world, set_active, world_to_local, Name};
use crate::wardrobe::{EquipService, WornState};

/// 合并统计
#[derive(Clone, Debug, PartialEq)]
pub struct CombineStats {
    /// 参与合并的服装实例数
    pub renderables: usize,
    pub sections: usize,
    pub vertices: usize,
    pub bones: usize,
    pub bounds: Aabb,
}

/// 合并结果
#[derive(Clone, Debug, PartialEq)]
pub enum CombineOutcome {
    Combined(CombineStats),
    /// 没有可合并的蒙皮服装，场景未改动
    NothingToCombine,
    /// 角色没有合并网格槽，服装保持分件显示
    NoCombinedSlot,
}

impl CombineOutcome {
    pub fn is_combined(&self) -> bool {
        matches!(self, CombineOutcome::Combined(_))
    }
}

/// 网格合并器
pub struct MeshCombiner;

impl MeshCombiner {
    /// 合并网格槽当前是否显示着合并结果
    pub fn is_combined(world: &World, rig: &RigDescriptor) -> bool {
        rig.combined_slot
            .is_some_and(|slot| world.get_entity(slot).is_some() && is_active(world, slot))
    }

    /// 合并当前穿戴的所有蒙皮服装
    ///
    /// 所有校验在修改场景之前完成：任何一项失败都原样返回错误，服装实例保持不变。
    pub fn combine(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        config: &CombineConfig,
    ) -> WardrobeResult<CombineOutcome> {
        let Some(slot) = rig.combined_slot else {
            tracing::warn!(target: "wardrobe", "Rig has no combined mesh slot, skipping combine");
            return Ok(CombineOutcome::NoCombinedSlot);
        };
        if world.get_entity(slot).is_none() {
            return Err(RigError::DanglingEntity {
                what: "combined_slot".to_string(),
                entity: slot,
            }
            .into());
        }

        if worn.active_renderables.is_empty() {
            tracing::info!(target: "wardrobe", "Nothing to combine");
            return Ok(CombineOutcome::NothingToCombine);
        }

        let slot_from_world = world_to_local(world, slot);
        let mut instances = Vec::new();
        let mut materials: Vec<Arc<Material>> = Vec::new();
        let mut renderables = 0;

        for (category, entity) in worn.active_renderables() {
            let Some(renderer) = world.get::<SkinnedMeshRenderer>(entity) else {
                tracing::warn!(target: "wardrobe", "{} instance {:?} has no skinned renderer", category, entity);
                continue;
            };
            let part = worn
                .equipped(category)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| category.to_string());
            let Some(mesh) = &renderer.mesh else {
                tracing::warn!(target: "wardrobe", "Renderer '{}' has no mesh, skipping", part);
                continue;
            };

            let sections = mesh.submesh_count();
            if renderer.materials.len() != sections {
                return Err(CombineError::MaterialSectionMismatch {
                    part,
                    materials: renderer.materials.len(),
                    sections,
                }
                .into());
            }

            let transform = slot_from_world * local_to_world(world, entity);
            for (submesh_index, material) in renderer.materials.iter().enumerate() {
                instances.push(CombineInstance {
                    mesh: mesh.clone(),
                    submesh_index,
                    transform,
                });
                materials.push(material.clone());
            }
            renderables += 1;
        }

        if instances.is_empty() {
            tracing::info!(target: "wardrobe", "No renderer carried a mesh, nothing to combine");
            return Ok(CombineOutcome::NothingToCombine);
        }

        let (bones, bind_poses) = rig.base_skeleton(world)?;
        if bones.len() != bind_poses.len() {
            return Err(CombineError::BindPoseMismatch {
                bones: bones.len(),
                bind_poses: bind_poses.len(),
            }
            .into());
        }

        let model_name = world
            .get::<Name>(rig.model)
            .map(|n| n.0.clone())
            .unwrap_or_else(|| "Avatar".to_string());
        let options = CombineOptions {
            recalculate_normals: config.recalculate_normals,
            recalculate_tangents: config.recalculate_tangents,
        };
        let mut mesh = Mesh::combine(format!("{model_name}_Combined"), &instances, options)?;

        if mesh.submesh_count() != materials.len() {
            return Err(CombineError::ParityViolation {
                sections: mesh.submesh_count(),
                materials: materials.len(),
            }
            .into());
        }
        mesh.bind_poses = bind_poses;

        let stats = CombineStats {
            renderables,
            sections: mesh.submesh_count(),
            vertices: mesh.vertex_count(),
            bones: bones.len(),
            bounds: mesh.bounds,
        };

        let renderer = SkinnedMeshRenderer {
            mesh: Some(Arc::new(mesh)),
            materials,
            bones,
            root_bone: Some(rig.root_bone),
            update_when_offscreen: config.update_when_offscreen,
        };
        world.entity_mut(slot).insert(renderer);
        set_active(world, slot, true);

        for entity in std::mem::take(&mut worn.active_renderables).into_values() {
            despawn_recursive(world, entity);
        }

        tracing::info!(
            target: "wardrobe",
            "Combined {} renderers into {} sections, {} vertices",
            stats.renderables,
            stats.sections,
            stats.vertices
        );
        Ok(CombineOutcome::Combined(stats))
    }

    /// 拆分合并网格，按穿戴记录重建蒙皮服装
    ///
    /// 未合并时什么也不做，返回 false。
    pub fn decompose(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
    ) -> WardrobeResult<bool> {
        let Some(slot) = rig.combined_slot else {
            return Ok(false);
        };
        if !Self::is_combined(world, rig) {
            return Ok(false);
        }

        let (bones, _) = rig.base_skeleton(world)?;

        if let Some(mut renderer) = world.get_mut::<SkinnedMeshRenderer>(slot) {
            renderer.mesh = None;
            renderer.materials.clear();
        }
        set_active(world, slot, false);

        let records: Vec<_> = worn.equipped.values().cloned().collect();
        let mut respawned = 0;
        for record in records {
            let ClothingPayload::Skinned(prefab) = &record.payload else {
                continue;
            };
            if worn.active_renderables.contains_key(&record.category) {
                continue;
            }
            EquipService::spawn_skinned(world, rig, worn, &record, prefab, &bones);
            respawned += 1;
        }

        tracing::info!(target: "wardrobe", "Decomposed combined mesh, respawned {} items", respawned);
        Ok(true)
    }
}
