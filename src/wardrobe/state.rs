//! 穿戴状态
//!
//! 每个角色会话独占一份。按分类记录当前生成的实例、被隐藏的身体部位（撤销日志）
//! 以及当前穿戴的服装记录（用于合并网格拆分后重建）。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bevy_ecs::prelude::*;

use crate::catalog::{ClothingCategory, ClothingRecord};

/// 服装实例标记组件
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WornItem {
    pub category: ClothingCategory,
}

/// 穿戴状态
#[derive(Debug, Default, Clone)]
pub struct WornState {
    pub(crate) active_renderables: BTreeMap<ClothingCategory, Entity>,
    pub(crate) active_props: BTreeMap<ClothingCategory, Entity>,
    pub(crate) hidden_by_category: BTreeMap<ClothingCategory, Vec<Entity>>,
    pub(crate) equipped: BTreeMap<ClothingCategory, Arc<ClothingRecord>>,
}

impl WornState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_renderable(&self, category: ClothingCategory) -> Option<Entity> {
        self.active_renderables.get(&category).copied()
    }

    pub fn active_prop(&self, category: ClothingCategory) -> Option<Entity> {
        self.active_props.get(&category).copied()
    }

    pub fn active_renderables(&self) -> impl Iterator<Item = (ClothingCategory, Entity)> + '_ {
        self.active_renderables.iter().map(|(&c, &e)| (c, e))
    }

    /// 当前有实例（蒙皮或挂件）的分类
    pub fn active_categories(&self) -> BTreeSet<ClothingCategory> {
        self.active_renderables
            .keys()
            .chain(self.active_props.keys())
            .copied()
            .collect()
    }

    /// 当前有蒙皮实例的分类
    pub fn renderable_categories(&self) -> BTreeSet<ClothingCategory> {
        self.active_renderables.keys().copied().collect()
    }

    /// 因该分类当前服装而被隐藏的部位
    pub fn hidden_parts(&self, category: ClothingCategory) -> &[Entity] {
        self.hidden_by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 隐藏该部位的分类
    pub fn hidden_owner(&self, part: Entity) -> Option<ClothingCategory> {
        self.hidden_by_category
            .iter()
            .find(|(_, parts)| parts.contains(&part))
            .map(|(&c, _)| c)
    }

    pub fn equipped(&self, category: ClothingCategory) -> Option<&Arc<ClothingRecord>> {
        self.equipped.get(&category)
    }

    pub fn equipped_records(
        &self,
    ) -> impl Iterator<Item = (ClothingCategory, &Arc<ClothingRecord>)> + '_ {
        self.equipped.iter().map(|(&c, r)| (c, r))
    }

    /// 当前穿戴的 (分类, 服装名)
    pub fn equipped_names(&self) -> BTreeMap<ClothingCategory, String> {
        self.equipped
            .iter()
            .map(|(&c, r)| (c, r.name.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.equipped.is_empty() && self.active_renderables.is_empty() && self.active_props.is_empty()
    }

    /// 丢弃全部记录（不触碰场景）
    pub fn clear(&mut self) {
        self.active_renderables.clear();
        self.active_props.clear();
        self.hidden_by_category.clear();
        self.equipped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_owner_lookup() {
        let mut world = World::new();
        let torso = world.spawn_empty().id();
        let legs = world.spawn_empty().id();

        let mut state = WornState::new();
        state
            .hidden_by_category
            .insert(ClothingCategory::Outfit, vec![torso, legs]);

        assert_eq!(state.hidden_owner(legs), Some(ClothingCategory::Outfit));
        assert_eq!(state.hidden_parts(ClothingCategory::Outfit).len(), 2);
        assert!(state.hidden_parts(ClothingCategory::Top).is_empty());

        state.clear();
        assert_eq!(state.hidden_owner(legs), None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_active_categories_union() {
        let mut world = World::new();
        let mut state = WornState::new();
        state
            .active_renderables
            .insert(ClothingCategory::Top, world.spawn_empty().id());
        state
            .active_props
            .insert(ClothingCategory::Hair, world.spawn_empty().id());

        let categories: Vec<_> = state.active_categories().into_iter().collect();
        assert_eq!(categories, vec![ClothingCategory::Hair, ClothingCategory::Top]);
        assert_eq!(state.renderable_categories().len(), 1);
    }
}
