//! 随机搭配
//!
//! 从目录中按分类均匀抽取服装并穿上。空分类只记录警告并跳过。

use bevy_ecs::prelude::*;
use rand::{Rng, RngCore};

use crate::catalog::{ClothingCatalog, ClothingCategory};
use crate::core::WardrobeResult;
use crate::wardrobe::AvatarSession;

/// 随机搭配结果
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RandomizeReport {
    /// 穿上的 (分类, 服装名)，按穿戴顺序
    pub equipped: Vec<(ClothingCategory, String)>,
    /// 目录中没有服装的分类
    pub skipped: Vec<ClothingCategory>,
    /// `randomize_outfit` 是否选择了整套服装
    pub chose_outfit: Option<bool>,
}

impl RandomizeReport {
    pub fn item_for(&self, category: ClothingCategory) -> Option<&str> {
        self.equipped
            .iter()
            .rev()
            .find(|(c, _)| *c == category)
            .map(|(_, name)| name.as_str())
    }
}

/// 随机搭配器
pub struct OutfitRandomizer;

impl OutfitRandomizer {
    /// 目录中每个分类各抽一件，按目录分类顺序穿戴
    ///
    /// 互斥规则照常生效：后穿的整套服装会替换先穿的上衣和下装。
    /// 配置中未启用的分类直接跳过。
    pub fn randomize_all(
        session: &mut AvatarSession,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        rng: &mut dyn RngCore,
    ) -> WardrobeResult<RandomizeReport> {
        let mut report = RandomizeReport::default();
        for category in catalog.list_categories() {
            if !session.config().equip.is_enabled(category) {
                tracing::debug!(target: "wardrobe", "Category {} is disabled, not drawing", category);
                continue;
            }
            Self::draw(session, world, catalog, category, rng, &mut report)?;
        }
        Ok(report)
    }

    /// 头发、鞋子各抽一件；再按 `outfit_chance` 在整套服装与上衣+下装之间二选一
    pub fn randomize_outfit(
        session: &mut AvatarSession,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        rng: &mut dyn RngCore,
    ) -> WardrobeResult<RandomizeReport> {
        let mut report = RandomizeReport::default();
        Self::draw(session, world, catalog, ClothingCategory::Hair, rng, &mut report)?;
        Self::draw(session, world, catalog, ClothingCategory::Shoes, rng, &mut report)?;

        let chance = session.config().randomizer.outfit_chance;
        let chose_outfit = rng.gen_bool(chance);
        report.chose_outfit = Some(chose_outfit);

        if chose_outfit {
            Self::draw(session, world, catalog, ClothingCategory::Outfit, rng, &mut report)?;
        } else {
            Self::draw(session, world, catalog, ClothingCategory::Top, rng, &mut report)?;
            Self::draw(session, world, catalog, ClothingCategory::Bottom, rng, &mut report)?;
        }

        tracing::debug!(
            target: "wardrobe",
            "Randomized outfit: {:?}, skipped {:?}",
            report.equipped,
            report.skipped
        );
        Ok(report)
    }

    fn draw(
        session: &mut AvatarSession,
        world: &mut World,
        catalog: &dyn ClothingCatalog,
        category: ClothingCategory,
        rng: &mut dyn RngCore,
        report: &mut RandomizeReport,
    ) -> WardrobeResult<()> {
        match catalog.random_item_for(category, rng) {
            Some(record) => {
                session.equip(world, &record)?;
                report.equipped.push((category, record.name.clone()));
            }
            None => {
                tracing::warn!(target: "wardrobe", "No clothing available for {}", category);
                report.skipped.push(category);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{ClothingList, ClothingRecord};
    use crate::config::{RandomizerConfig, WardrobeConfig};
    use crate::mesh::{cuboid, Material};
    use crate::rig::{CharacterBuilder, CharacterTemplate, Gender};
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(name: &str, category: ClothingCategory) -> ClothingRecord {
        let mesh = Arc::new(cuboid(name, Vec3::Y, Vec3::ONE, 1, 0));
        let materials = vec![Arc::new(Material::new(name, [1.0; 4]))];
        if category.uses_prop() {
            ClothingRecord::prop(name, category, mesh, materials)
        } else {
            ClothingRecord::skinned(name, category, mesh, materials)
        }
    }

    fn full_catalog() -> ClothingList {
        ClothingList::new()
            .with_item(item("Bob", ClothingCategory::Hair))
            .with_item(item("Tee", ClothingCategory::Top))
            .with_item(item("Jeans", ClothingCategory::Bottom))
            .with_item(item("Boots", ClothingCategory::Shoes))
            .with_item(item("Suit", ClothingCategory::Outfit))
    }

    fn session(world: &mut World, outfit_chance: f64) -> AvatarSession {
        let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Male)).spawn(world);
        let config = WardrobeConfig {
            randomizer: RandomizerConfig {
                outfit_chance,
                seed: None,
            },
            ..Default::default()
        };
        AvatarSession::bind(world, model, config).unwrap()
    }

    #[test]
    fn test_empty_catalog_changes_nothing() {
        let mut world = World::new();
        let mut session = session(&mut world, 0.5);
        let mut rng = StdRng::seed_from_u64(7);

        let report = session
            .randomize_all(&mut world, &ClothingList::new(), &mut rng)
            .unwrap();
        assert!(report.equipped.is_empty());
        assert!(session.worn().is_empty());

        let catalog = ClothingList::new().with_category(ClothingCategory::Shoes);
        let report = session.randomize_all(&mut world, &catalog, &mut rng).unwrap();
        assert_eq!(report.skipped, vec![ClothingCategory::Shoes]);
        assert!(session.worn().is_empty());
    }

    #[test]
    fn test_randomize_all_skips_disabled_categories() {
        let mut world = World::new();
        let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Male)).spawn(&mut world);
        let mut config = WardrobeConfig::default();
        config.equip.enabled_categories = vec![
            ClothingCategory::Hair,
            ClothingCategory::Top,
            ClothingCategory::Shoes,
        ];
        let mut session = AvatarSession::bind(&world, model, config).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        let report = session
            .randomize_all(&mut world, &full_catalog(), &mut rng)
            .unwrap();

        assert_eq!(report.item_for(ClothingCategory::Hair), Some("Bob"));
        assert_eq!(report.item_for(ClothingCategory::Top), Some("Tee"));
        assert_eq!(report.item_for(ClothingCategory::Shoes), Some("Boots"));
        assert!(report.item_for(ClothingCategory::Bottom).is_none());
        assert!(report.item_for(ClothingCategory::Outfit).is_none());
        assert!(session.worn().equipped(ClothingCategory::Top).is_some());
        assert!(session.worn().equipped(ClothingCategory::Outfit).is_none());
    }

    #[test]
    fn test_always_outfit() {
        let mut world = World::new();
        let mut session = session(&mut world, 1.0);
        let mut rng = StdRng::seed_from_u64(1);

        let report = session
            .randomize_outfit(&mut world, &full_catalog(), &mut rng)
            .unwrap();

        assert_eq!(report.chose_outfit, Some(true));
        assert_eq!(report.item_for(ClothingCategory::Outfit), Some("Suit"));
        assert!(session.worn().equipped(ClothingCategory::Top).is_none());
        assert!(session.worn().equipped(ClothingCategory::Hair).is_some());
        assert!(session.worn().equipped(ClothingCategory::Shoes).is_some());
    }

    #[test]
    fn test_never_outfit() {
        let mut world = World::new();
        let mut session = session(&mut world, 0.0);
        let mut rng = StdRng::seed_from_u64(1);

        let report = session
            .randomize_outfit(&mut world, &full_catalog(), &mut rng)
            .unwrap();

        assert_eq!(report.chose_outfit, Some(false));
        assert_eq!(report.item_for(ClothingCategory::Top), Some("Tee"));
        assert_eq!(report.item_for(ClothingCategory::Bottom), Some("Jeans"));
        assert!(session.worn().equipped(ClothingCategory::Outfit).is_none());
    }

    #[test]
    fn test_randomize_all_respects_exclusivity() {
        let mut world = World::new();
        let mut session = session(&mut world, 0.5);
        let mut rng = StdRng::seed_from_u64(3);

        let report = session
            .randomize_all(&mut world, &full_catalog(), &mut rng)
            .unwrap();

        assert_eq!(report.equipped.len(), 5);
        let worn = session.worn();
        assert!(worn.equipped(ClothingCategory::Outfit).is_some());
        assert!(worn.equipped(ClothingCategory::Top).is_none());
        assert!(worn.equipped(ClothingCategory::Bottom).is_none());
    }

    #[test]
    fn test_same_seed_same_choices() {
        let catalog = ClothingList::new()
            .with_item(item("Tee", ClothingCategory::Top))
            .with_item(item("Polo", ClothingCategory::Top))
            .with_item(item("Vest", ClothingCategory::Top))
            .with_item(item("Jeans", ClothingCategory::Bottom))
            .with_item(item("Skirt", ClothingCategory::Bottom));

        let run = |seed| {
            let mut world = World::new();
            let mut session = session(&mut world, 0.0);
            let mut rng = StdRng::seed_from_u64(seed);
            session
                .randomize_outfit(&mut world, &catalog, &mut rng)
                .unwrap()
        };

        assert_eq!(run(42), run(42));
    }
}
