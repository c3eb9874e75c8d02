//! 穿戴服务层
//!
//! 遵循贫血模型：`WornState` 只保存数据，穿脱规则全部封装在 `EquipService` 中。

use std::sync::Arc;

use bevy_ecs::prelude::*;

use crate::catalog::{ClothingCategory, ClothingPayload, ClothingRecord, PropPrefab, SkinnedPrefab};
use crate::combiner::MeshCombiner;
use crate::core::{EquipError, WardrobeResult};
use crate::mesh::{MeshRenderer, SkinnedMeshRenderer};
use crate::rig::RigDescriptor;
use crate::scene::{despawn_recursive, set_active, spawn_child, Active, Name};

use super::state::{WornItem, WornState};

/// 一次穿戴的结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquipReport {
    pub category: ClothingCategory,
    /// 新生成的蒙皮实例或挂件
    pub spawned: Entity,
    /// 因互斥被卸下的分类
    pub retired: Vec<ClothingCategory>,
    /// 本次新隐藏的身体部位
    pub hidden: Vec<Entity>,
    /// 在角色上找不到的部位名
    pub missing_parts: Vec<String>,
}

/// 穿戴服务
pub struct EquipService;

impl EquipService {
    /// 检查服装载荷与分类是否匹配
    pub fn validate_payload(record: &ClothingRecord) -> Result<(), EquipError> {
        let expected = if record.category.uses_prop() {
            "prop"
        } else {
            "skinned mesh"
        };
        if record.payload.is_prop() != record.category.uses_prop() {
            return Err(EquipError::PayloadMismatch {
                name: record.name.clone(),
                category: record.category,
                expected,
            });
        }
        Ok(())
    }

    /// 穿上一件服装
    ///
    /// 顺序：拆分合并网格 -> 卸下互斥分类 -> 卸下同分类旧服装 -> 生成新实例 -> 隐藏部位 -> 记录。
    /// 所有配置检查都在修改场景之前完成。
    pub fn equip(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        record: &Arc<ClothingRecord>,
    ) -> WardrobeResult<EquipReport> {
        Self::validate_payload(record)?;
        let (bones, _) = rig.base_skeleton(world)?;

        MeshCombiner::decompose(world, rig, worn)?;

        let category = record.category;
        let mut retired = Vec::new();
        for &conflict in category.conflicts() {
            if Self::retire(world, rig, worn, conflict) {
                retired.push(conflict);
            }
        }
        Self::retire(world, rig, worn, category);

        let spawned = match &record.payload {
            ClothingPayload::Skinned(prefab) => {
                Self::spawn_skinned(world, rig, worn, record, prefab, &bones)
            }
            ClothingPayload::Prop(prefab) => Self::spawn_prop(world, rig, worn, record, prefab),
        };

        let (hidden, missing_parts) = Self::hide_parts(world, rig, worn, record);
        worn.equipped.insert(category, record.clone());

        tracing::info!(
            target: "wardrobe",
            "Equipped {} ({}), retired {:?}, hid {} parts",
            record.name,
            category,
            retired,
            hidden.len()
        );

        Ok(EquipReport {
            category,
            spawned,
            retired,
            hidden,
            missing_parts,
        })
    }

    /// 卸下某分类，返回该分类之前是否有服装
    pub fn unequip(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        category: ClothingCategory,
    ) -> WardrobeResult<bool> {
        MeshCombiner::decompose(world, rig, worn)?;
        let removed = Self::retire(world, rig, worn, category);
        if removed {
            tracing::info!(target: "wardrobe", "Unequipped {}", category);
        }
        Ok(removed)
    }

    /// 生成蒙皮服装并重绑到基础身体的骨骼
    pub(crate) fn spawn_skinned(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        record: &ClothingRecord,
        prefab: &SkinnedPrefab,
        bones: &[Entity],
    ) -> Entity {
        let renderer = SkinnedMeshRenderer {
            mesh: Some(prefab.mesh.clone()),
            materials: prefab.materials.clone(),
            bones: bones.to_vec(),
            root_bone: Some(rig.root_bone),
            update_when_offscreen: false,
        };
        let entity = spawn_child(
            world,
            Some(rig.model),
            (
                Name::new(record.name.clone()),
                prefab.transform,
                Active(true),
                renderer,
                WornItem {
                    category: record.category,
                },
            ),
        );
        worn.active_renderables.insert(record.category, entity);
        entity
    }

    /// 在配饰挂点下生成挂件
    fn spawn_prop(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        record: &ClothingRecord,
        prefab: &PropPrefab,
    ) -> Entity {
        let entity = spawn_child(
            world,
            Some(rig.accessory_slot),
            (
                Name::new(record.name.clone()),
                prefab.transform,
                Active(true),
                MeshRenderer {
                    mesh: prefab.mesh.clone(),
                    materials: prefab.materials.clone(),
                },
                WornItem {
                    category: record.category,
                },
            ),
        );
        worn.active_props.insert(record.category, entity);
        entity
    }

    /// 卸下某分类：销毁实例、忘记记录、恢复它隐藏的部位
    pub(crate) fn retire(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        category: ClothingCategory,
    ) -> bool {
        let had_record = worn.equipped.remove(&category).is_some();
        let had_renderable = Self::remove_instance(world, worn, category);
        Self::restore_hidden_parts(world, rig, worn, category);
        had_record || had_renderable
    }

    fn remove_instance(world: &mut World, worn: &mut WornState, category: ClothingCategory) -> bool {
        let renderable = worn.active_renderables.remove(&category);
        let prop = worn.active_props.remove(&category);
        for entity in renderable.iter().chain(prop.iter()) {
            despawn_recursive(world, *entity);
        }
        renderable.is_some() || prop.is_some()
    }

    /// 恢复某分类隐藏的部位
    ///
    /// 仍在穿戴的其他服装也要求隐藏的部位不重新显示，而是转交给那个分类。
    fn restore_hidden_parts(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        category: ClothingCategory,
    ) {
        let Some(parts) = worn.hidden_by_category.remove(&category) else {
            return;
        };

        for part in parts {
            let heir = rig
                .body_parts
                .iter()
                .find(|(_, &e)| e == part)
                .and_then(|(name, _)| {
                    worn.equipped
                        .iter()
                        .find(|(&c, r)| c != category && r.hides(name))
                        .map(|(&c, _)| c)
                });

            match heir {
                Some(owner) => {
                    tracing::debug!(
                        target: "wardrobe",
                        "Part {:?} stays hidden, handed from {} to {}",
                        part,
                        category,
                        owner
                    );
                    worn.hidden_by_category.entry(owner).or_default().push(part);
                }
                None => set_active(world, part, true),
            }
        }
    }

    /// 隐藏服装要求的部位，返回 (新隐藏的部位, 找不到的部位名)
    fn hide_parts(
        world: &mut World,
        rig: &RigDescriptor,
        worn: &mut WornState,
        record: &ClothingRecord,
    ) -> (Vec<Entity>, Vec<String>) {
        let mut hidden = Vec::new();
        let mut missing = Vec::new();

        for name in &record.hidden_parts {
            let Some(part) = rig.body_part(name) else {
                tracing::warn!(
                    target: "wardrobe",
                    "Body part '{}' requested by {} not found on rig",
                    name,
                    record.name
                );
                missing.push(name.clone());
                continue;
            };

            if let Some(owner) = worn.hidden_owner(part) {
                tracing::debug!(
                    target: "wardrobe",
                    "Body part '{}' already hidden by {}",
                    name,
                    owner
                );
                continue;
            }

            set_active(world, part, false);
            hidden.push(part);
        }

        if !hidden.is_empty() {
            worn.hidden_by_category
                .insert(record.category, hidden.clone());
        }
        (hidden, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WardrobeError;
    use crate::mesh::{cuboid, Material};
    use crate::rig::{CharacterBuilder, CharacterTemplate, Gender};
    use crate::scene::{is_active, Parent};
    use glam::Vec3;

    fn setup() -> (World, RigDescriptor, WornState) {
        let mut world = World::new();
        let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Female)).spawn(&mut world);
        let rig = RigDescriptor::from_model(&world, model).unwrap();
        (world, rig, WornState::new())
    }

    fn item(name: &str, category: ClothingCategory, hides: &[&str]) -> Arc<ClothingRecord> {
        let mesh = Arc::new(cuboid(name, Vec3::Y, Vec3::ONE, 1, 0));
        let materials = vec![Arc::new(Material::new(name, [1.0; 4]))];
        let record = if category.uses_prop() {
            ClothingRecord::prop(name, category, mesh, materials)
        } else {
            ClothingRecord::skinned(name, category, mesh, materials)
        };
        record.hiding(hides.iter().copied()).into_shared()
    }

    #[test]
    fn test_hair_is_parented_to_accessory_slot() {
        let (mut world, rig, mut worn) = setup();

        let report =
            EquipService::equip(&mut world, &rig, &mut worn, &item("H1", ClothingCategory::Hair, &[]))
                .unwrap();

        assert_eq!(world.get::<Parent>(report.spawned).unwrap().0, rig.accessory_slot);
        assert_eq!(worn.active_prop(ClothingCategory::Hair), Some(report.spawned));
        assert!(worn.active_renderable(ClothingCategory::Hair).is_none());
        assert!(world.get::<MeshRenderer>(report.spawned).is_some());
    }

    #[test]
    fn test_skinned_item_uses_base_skeleton() {
        let (mut world, rig, mut worn) = setup();

        let report =
            EquipService::equip(&mut world, &rig, &mut worn, &item("T1", ClothingCategory::Top, &[]))
                .unwrap();

        let renderer = world.get::<SkinnedMeshRenderer>(report.spawned).unwrap();
        let (bones, _) = rig.base_skeleton(&world).unwrap();
        assert_eq!(renderer.bones, bones);
        assert_eq!(renderer.root_bone, Some(rig.root_bone));
        assert_eq!(world.get::<Parent>(report.spawned).unwrap().0, rig.model);
    }

    #[test]
    fn test_outfit_then_top_scenario() {
        let (mut world, rig, mut worn) = setup();
        let torso = rig.body_part("Torso").unwrap();
        let legs = rig.body_part("Legs").unwrap();

        EquipService::equip(&mut world, &rig, &mut worn, &item("H1", ClothingCategory::Hair, &[]))
            .unwrap();
        let outfit = EquipService::equip(
            &mut world,
            &rig,
            &mut worn,
            &item("O1", ClothingCategory::Outfit, &["Torso", "Legs"]),
        )
        .unwrap();
        assert!(!is_active(&world, torso));
        assert!(!is_active(&world, legs));

        let top =
            EquipService::equip(&mut world, &rig, &mut worn, &item("T1", ClothingCategory::Top, &["Torso"]))
                .unwrap();

        assert_eq!(top.retired, vec![ClothingCategory::Outfit]);
        assert!(world.get_entity(outfit.spawned).is_none());
        assert!(worn.equipped(ClothingCategory::Outfit).is_none());
        assert!(!is_active(&world, torso));
        assert!(is_active(&world, legs));
        assert_eq!(worn.hidden_parts(ClothingCategory::Top), &[torso]);
        assert!(worn.active_prop(ClothingCategory::Hair).is_some());
    }

    #[test]
    fn test_replacing_same_category_despawns_previous() {
        let (mut world, rig, mut worn) = setup();
        let arms = rig.body_part("Arms").unwrap();

        let first = EquipService::equip(
            &mut world,
            &rig,
            &mut worn,
            &item("Jacket", ClothingCategory::Top, &["Torso", "Arms"]),
        )
        .unwrap();
        let second =
            EquipService::equip(&mut world, &rig, &mut worn, &item("Tee", ClothingCategory::Top, &["Torso"]))
                .unwrap();

        assert!(second.retired.is_empty());
        assert!(world.get_entity(first.spawned).is_none());
        assert!(is_active(&world, arms));
        assert_eq!(worn.equipped(ClothingCategory::Top).unwrap().name, "Tee");
    }

    #[test]
    fn test_shared_part_handed_off_on_retire() {
        let (mut world, rig, mut worn) = setup();
        let legs = rig.body_part("Legs").unwrap();

        EquipService::equip(&mut world, &rig, &mut worn, &item("Boots", ClothingCategory::Shoes, &["Feet", "Legs"]))
            .unwrap();
        let jeans =
            EquipService::equip(&mut world, &rig, &mut worn, &item("Jeans", ClothingCategory::Bottom, &["Legs"]))
                .unwrap();
        // 已被鞋子隐藏，不重复记录
        assert!(jeans.hidden.is_empty());
        assert_eq!(worn.hidden_owner(legs), Some(ClothingCategory::Shoes));

        EquipService::unequip(&mut world, &rig, &mut worn, ClothingCategory::Shoes).unwrap();

        assert!(!is_active(&world, legs));
        assert_eq!(worn.hidden_owner(legs), Some(ClothingCategory::Bottom));

        EquipService::unequip(&mut world, &rig, &mut worn, ClothingCategory::Bottom).unwrap();
        assert!(is_active(&world, legs));
    }

    #[test]
    fn test_missing_part_is_reported_not_fatal() {
        let (mut world, rig, mut worn) = setup();

        let report = EquipService::equip(
            &mut world,
            &rig,
            &mut worn,
            &item("Robe", ClothingCategory::Outfit, &["Torso", "Tail"]),
        )
        .unwrap();

        assert_eq!(report.missing_parts, vec!["Tail".to_string()]);
        assert_eq!(report.hidden.len(), 1);
    }

    #[test]
    fn test_payload_mismatch_rejected_before_mutation() {
        let (mut world, rig, mut worn) = setup();
        EquipService::equip(&mut world, &rig, &mut worn, &item("Tee", ClothingCategory::Top, &["Torso"]))
            .unwrap();
        let mesh = Arc::new(cuboid("Wig", Vec3::ZERO, Vec3::ONE, 1, 0));
        let wrong = ClothingRecord::skinned("Wig", ClothingCategory::Hair, mesh, vec![]).into_shared();

        let err = EquipService::equip(&mut world, &rig, &mut worn, &wrong).unwrap_err();

        assert!(matches!(
            err,
            WardrobeError::Equip(EquipError::PayloadMismatch { expected: "prop", .. })
        ));
        assert!(worn.equipped(ClothingCategory::Hair).is_none());
        assert!(worn.equipped(ClothingCategory::Top).is_some());
    }

    #[test]
    fn test_unequip_empty_category() {
        let (mut world, rig, mut worn) = setup();
        assert!(!EquipService::unequip(&mut world, &rig, &mut worn, ClothingCategory::Shoes).unwrap());
    }
}
