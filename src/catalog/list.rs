//! 服装目录
//!
//! 核心只通过 `ClothingCatalog` 查询目录；`ClothingList` 是内存实现。

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::rig::Gender;

use super::category::ClothingCategory;
use super::record::ClothingRecord;

/// 目录查询接口
pub trait ClothingCatalog {
    /// 目录提供的分类（有序）
    fn list_categories(&self) -> Vec<ClothingCategory>;

    /// 某分类下的全部服装
    fn items_for(&self, category: ClothingCategory) -> &[Arc<ClothingRecord>];

    /// 均匀随机取一件，分类为空时返回 None
    fn random_item_for(
        &self,
        category: ClothingCategory,
        rng: &mut dyn RngCore,
    ) -> Option<Arc<ClothingRecord>> {
        self.items_for(category).choose(rng).cloned()
    }
}

/// 内存服装列表
#[derive(Clone, Debug, Default)]
pub struct ClothingList {
    items: BTreeMap<ClothingCategory, Vec<Arc<ClothingRecord>>>,
}

impl ClothingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个分类（即使暂时没有服装）
    pub fn with_category(mut self, category: ClothingCategory) -> Self {
        self.items.entry(category).or_default();
        self
    }

    pub fn with_item(mut self, record: impl Into<Arc<ClothingRecord>>) -> Self {
        self.add(record);
        self
    }

    pub fn add(&mut self, record: impl Into<Arc<ClothingRecord>>) {
        let record = record.into();
        self.items.entry(record.category).or_default().push(record);
    }

    /// 按名称查找
    pub fn find(&self, name: &str) -> Option<&Arc<ClothingRecord>> {
        self.items.values().flatten().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClothingCatalog for ClothingList {
    fn list_categories(&self) -> Vec<ClothingCategory> {
        self.items.keys().copied().collect()
    }

    fn items_for(&self, category: ClothingCategory) -> &[Arc<ClothingRecord>] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 按性别区分的目录
#[derive(Clone, Debug, Default)]
pub struct GenderedCatalogs {
    pub male: ClothingList,
    pub female: ClothingList,
}

impl GenderedCatalogs {
    pub fn for_gender(&self, gender: Gender) -> &ClothingList {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}
