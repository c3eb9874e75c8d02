//! 换装会话
//!
//! 一个会话绑定一个角色：持有校验过的 `RigDescriptor`、独占的 `WornState` 和配置。
//! 所有操作都需要 `&mut World`，同一角色上的操作天然串行。

use std::sync::Arc;

use bevy_ecs::prelude::*;
use rand::RngCore;

use crate::catalog::{ClothingCatalog, ClothingCategory, ClothingRecord};
use crate::combiner::{CombineOutcome, MeshCombiner};
use crate::config::WardrobeConfig;
use crate::core::{EquipError, WardrobeResult};
use crate::mesh::SkinnedMeshRenderer;
use crate::randomizer::{OutfitRandomizer, RandomizeReport};
use crate::rig::RigDescriptor;
use crate::scene::set_active;

use super::service::{EquipReport, EquipService};
use super::state::WornState;

/// 换装会话
#[derive(Debug)]
pub struct AvatarSession {
    rig: RigDescriptor,
    worn: WornState,
    config: WardrobeConfig,
}

impl AvatarSession {
    /// 绑定角色，开始会话
    pub fn bind(world: &World, model: Entity, config: WardrobeConfig) -> WardrobeResult<Self> {
        config.validate()?;
        let rig = RigDescriptor::from_model(world, model)?;
        tracing::info!(
            target: "wardrobe",
            "Bound avatar {:?} ({:?}, {} body parts)",
            model,
            rig.gender,
            rig.body_parts.len()
        );
        Ok(Self {
            rig,
            worn: WornState::new(),
            config,
        })
    }

    /// 切换到另一个角色
    ///
    /// 新角色校验失败时保持原会话不变。成功时先卸下旧角色上的全部服装。
    pub fn rebind(&mut self, world: &mut World, model: Entity) -> WardrobeResult<()> {
        let rig = RigDescriptor::from_model(world, model)?;
        self.release(world);
        self.rig = rig;
        tracing::info!(target: "wardrobe", "Rebound session to avatar {:?}", model);
        Ok(())
    }

    pub fn rig(&self) -> &RigDescriptor {
        &self.rig
    }

    pub fn worn(&self) -> &WornState {
        &self.worn
    }

    pub fn config(&self) -> &WardrobeConfig {
        &self.config
    }

    pub fn model(&self) -> Entity {
        self.rig.model
    }

    fn ensure_enabled(&self, category: ClothingCategory) -> Result<(), EquipError> {
        if self.config.equip.is_enabled(category) {
            Ok(())
        } else {
            tracing::warn!(target: "wardrobe", "Category {} is not enabled", category);
            Err(EquipError::UnrecognizedCategory(category.to_string()))
        }
    }

    /// 穿上一件服装
    pub fn equip(
        &mut self,
        world: &mut World,
        record: &Arc<ClothingRecord>,
    ) -> WardrobeResult<EquipReport> {
        self.ensure_enabled(record.category)?;
        EquipService::equip(world, &self.rig, &mut self.worn, record)
    }

    /// 按分类名和服装名穿戴（选择界面的入口）
    ///
    /// 分类名无法识别是错误；目录里没有这件服装只记录警告，返回 `Ok(None)`。
    pub fn equip_named(
        &mut self,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        category: &str,
        item: &str,
    ) -> WardrobeResult<Option<EquipReport>> {
        let category: ClothingCategory = category.parse()?;
        self.ensure_enabled(category)?;

        let Some(record) = catalog
            .items_for(category)
            .iter()
            .find(|r| r.name == item)
            .cloned()
        else {
            tracing::warn!(target: "wardrobe", "No {} named '{}' in catalog", category, item);
            return Ok(None);
        };
        self.equip(world, &record).map(Some)
    }

    /// 卸下某分类
    pub fn unequip(&mut self, world: &mut World, category: ClothingCategory) -> WardrobeResult<bool> {
        self.ensure_enabled(category)?;
        EquipService::unequip(world, &self.rig, &mut self.worn, category)
    }

    /// 随机搭配：头发、鞋，再按概率选整套或上衣+下装
    pub fn randomize_outfit(
        &mut self,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        rng: &mut dyn RngCore,
    ) -> WardrobeResult<RandomizeReport> {
        OutfitRandomizer::randomize_outfit(self, world, catalog, rng)
    }

    /// 目录里每个分类各随机穿一件
    pub fn randomize_all(
        &mut self,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        rng: &mut dyn RngCore,
    ) -> WardrobeResult<RandomizeReport> {
        OutfitRandomizer::randomize_all(self, world, catalog, rng)
    }

    /// 合并当前蒙皮服装
    pub fn finalize(&mut self, world: &mut World) -> WardrobeResult<CombineOutcome> {
        MeshCombiner::combine(world, &self.rig, &mut self.worn, &self.config.combine)
    }

    /// 拆分合并网格
    pub fn decompose(&mut self, world: &mut World) -> WardrobeResult<bool> {
        MeshCombiner::decompose(world, &self.rig, &mut self.worn)
    }

    pub fn is_combined(&self, world: &World) -> bool {
        MeshCombiner::is_combined(world, &self.rig)
    }

    /// 结束会话：卸下全部服装，恢复身体部位，清空合并网格
    pub fn end(mut self, world: &mut World) {
        self.release(world);
        tracing::info!(target: "wardrobe", "Ended session for avatar {:?}", self.rig.model);
    }

    fn release(&mut self, world: &mut World) {
        let categories: Vec<_> = self
            .worn
            .equipped
            .keys()
            .copied()
            .chain(self.worn.active_categories())
            .chain(self.worn.hidden_by_category.keys().copied())
            .collect();
        for category in categories {
            EquipService::retire(world, &self.rig, &mut self.worn, category);
        }

        if let Some(slot) = self.rig.combined_slot {
            if let Some(mut renderer) = world.get_mut::<SkinnedMeshRenderer>(slot) {
                renderer.mesh = None;
                renderer.materials.clear();
            }
            set_active(world, slot, false);
        }
        self.worn.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClothingList;
    use crate::config::EquipConfig;
    use crate::core::WardrobeError;
    use crate::mesh::{cuboid, Material};
    use crate::rig::{CharacterBuilder, CharacterTemplate, Gender};
    use crate::scene::is_active;
    use glam::Vec3;

    fn record(name: &str, category: ClothingCategory, hides: &[&str]) -> Arc<ClothingRecord> {
        let mesh = Arc::new(cuboid(name, Vec3::Y, Vec3::ONE, 1, 0));
        let materials = vec![Arc::new(Material::new(name, [1.0; 4]))];
        let record = if category.uses_prop() {
            ClothingRecord::prop(name, category, mesh, materials)
        } else {
            ClothingRecord::skinned(name, category, mesh, materials)
        };
        record.hiding(hides.iter().copied()).into_shared()
    }

    fn session(world: &mut World, config: WardrobeConfig) -> AvatarSession {
        let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Male)).spawn(world);
        AvatarSession::bind(world, model, config).unwrap()
    }

    #[test]
    fn test_disabled_category_is_rejected() {
        let mut world = World::new();
        let config = WardrobeConfig {
            equip: EquipConfig {
                enabled_categories: vec![ClothingCategory::Top, ClothingCategory::Bottom],
            },
            ..Default::default()
        };
        let mut session = session(&mut world, config);

        let err = session
            .equip(&mut world, &record("Sneakers", ClothingCategory::Shoes, &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            WardrobeError::Equip(EquipError::UnrecognizedCategory(_))
        ));
        assert!(session.worn().is_empty());
    }

    #[test]
    fn test_equip_named() {
        let mut world = World::new();
        let mut session = session(&mut world, WardrobeConfig::default());
        let catalog = ClothingList::new().with_item(record("Tee", ClothingCategory::Top, &["Torso"]));

        let report = session
            .equip_named(&mut world, &catalog, "top", "Tee")
            .unwrap()
            .unwrap();
        assert_eq!(report.category, ClothingCategory::Top);

        assert!(session
            .equip_named(&mut world, &catalog, "Top", "Missing")
            .unwrap()
            .is_none());
        assert!(matches!(
            session.equip_named(&mut world, &catalog, "Hat", "Tee"),
            Err(WardrobeError::Equip(EquipError::UnrecognizedCategory(_)))
        ));
    }

    #[test]
    fn test_end_restores_body_and_despawns_items() {
        let mut world = World::new();
        let mut session = session(&mut world, WardrobeConfig::default());
        let torso = session.rig().body_part("Torso").unwrap();

        let report = session
            .equip(&mut world, &record("Tee", ClothingCategory::Top, &["Torso"]))
            .unwrap();
        session.finalize(&mut world).unwrap();
        let slot = session.rig().combined_slot.unwrap();
        assert!(is_active(&world, slot));
        assert!(!is_active(&world, torso));

        session.end(&mut world);

        assert!(world.get_entity(report.spawned).is_none());
        assert!(is_active(&world, torso));
        assert!(!is_active(&world, slot));
    }

    #[test]
    fn test_rebind_to_invalid_model_keeps_session() {
        let mut world = World::new();
        let mut session = session(&mut world, WardrobeConfig::default());
        let model = session.model();
        let bogus = world.spawn_empty().id();

        assert!(session.rebind(&mut world, bogus).is_err());
        assert_eq!(session.model(), model);

        let other = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Female)).spawn(&mut world);
        session.rebind(&mut world, other).unwrap();
        assert_eq!(session.rig().gender, Gender::Female);
    }
}
