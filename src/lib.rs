//! # Avatar Wardrobe
//!
//! Runtime clothing system for skinned avatars built on bevy_ecs.
//!
//! ## Features
//!
//! - **Equip Engine**: category-exclusive clothing slots, outfit/separates exclusion, body part hiding
//! - **Mesh Combiner**: bake every worn skinned item into one mesh bound to the base skeleton
//! - **Randomizer**: uniform per-category draws from a clothing catalog
//! - **Crowd**: bulk dressing of many avatars with per-avatar rollback
//!
//! ## Architecture Design
//!
//! This crate follows the **Anemic Domain Model (贫血模型)** pattern:
//! - **State**: `WornState` stores per-avatar data only
//! - **Service**: `EquipService` / `MeshCombiner` hold the rules as static methods
//! - **Session**: `AvatarSession` binds one avatar and orchestrates services
//!
//! ### Example
//!
//! ```
//! use avatar_wardrobe::prelude::*;
//! use bevy_ecs::world::World;
//! use glam::Vec3;
//! use std::sync::Arc;
//!
//! let mut world = World::new();
//! let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Male)).spawn(&mut world);
//! let mut session = AvatarSession::bind(&world, model, WardrobeConfig::default()).unwrap();
//!
//! let mesh = Arc::new(cuboid("Tee", Vec3::new(0.0, 1.3, 0.0), Vec3::ONE, 1, 2));
//! let tee = ClothingRecord::skinned("Tee", ClothingCategory::Top, mesh, vec![Arc::new(Material::new("Cotton", [1.0; 4]))])
//!     .hiding(["Torso"])
//!     .into_shared();
//!
//! session.equip(&mut world, &tee).unwrap();
//! assert!(session.finalize(&mut world).unwrap().is_combined());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors and logging
//! - [`config`]: Configuration loading
//! - [`scene`]: Transform hierarchy and activation
//! - [`mesh`]: Skinned mesh data and combining
//! - [`rig`]: Avatar rig binding
//! - [`catalog`]: Clothing records and catalogs
//! - [`wardrobe`]: Equip engine
//! - [`combiner`]: Combined mesh finalize/decompose
//! - [`randomizer`]: Random outfits
//! - [`crowd`]: Bulk spawning

/// Errors and logging
pub mod core;
/// Configuration system
pub mod config;
/// Scene hierarchy on top of bevy_ecs
pub mod scene;
/// Skinned mesh data
pub mod mesh;
/// Avatar rig binding and construction
pub mod rig;
/// Clothing catalog
pub mod catalog;
/// Equip engine
pub mod wardrobe;
/// Skinned mesh combining
pub mod combiner;
/// Random outfit selection
pub mod randomizer;
/// Crowd spawning
pub mod crowd;

/// Commonly used types
pub mod prelude {
    pub use crate::catalog::{
        ClothingCatalog, ClothingCategory, ClothingList, ClothingPayload, ClothingRecord,
        GenderedCatalogs,
    };
    pub use crate::combiner::{CombineOutcome, CombineStats, MeshCombiner};
    pub use crate::config::WardrobeConfig;
    pub use crate::core::{WardrobeError, WardrobeResult};
    pub use crate::crowd::{Crowd, CrowdMember, CrowdSpawner};
    pub use crate::mesh::{cuboid, Material, Mesh, SkinnedMeshRenderer};
    pub use crate::randomizer::{OutfitRandomizer, RandomizeReport};
    pub use crate::rig::{CharacterBuilder, CharacterTemplate, Gender, RigDescriptor};
    pub use crate::wardrobe::{AvatarSession, EquipReport, EquipService, WornState};
}
