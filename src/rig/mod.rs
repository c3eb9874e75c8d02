//! 角色绑定模块
//!
//! - `descriptor` - 角色引用绑定组件与校验后的绑定描述
//! - `builder` - 按模板生成可换装角色

pub mod builder;
pub mod descriptor;

pub use builder::{BodyPartDef, BoneDef, CharacterBuilder, CharacterTemplate};
pub use descriptor::{BodyPartEntry, Gender, ModelReferenceBinder, RigDescriptor};
