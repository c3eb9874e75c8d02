//! 服装目录模块
//!
//! 服装分类、服装记录以及目录查询接口。目录内容由外部数据制作流程提供，
//! 核心只读取。

pub mod category;
pub mod list;
pub mod record;

pub use category::ClothingCategory;
pub use list::{ClothingCatalog, ClothingList, GenderedCatalogs};
pub use record::{ClothingPayload, ClothingRecord, PropPrefab, SkinnedPrefab};
