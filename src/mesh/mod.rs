//! 网格模块
//!
//! 蒙皮网格数据、材质、渲染器组件以及多网格合并。
//!
//! ## 使用示例
//!
//! ```rust
//! use avatar_wardrobe::mesh::{cuboid, CombineInstance, CombineOptions, Mesh};
//! use glam::{Mat4, Vec3};
//! use std::sync::Arc;
//!
//! let shirt = Arc::new(cuboid("shirt", Vec3::ZERO, Vec3::ONE, 2, 0));
//! let instances: Vec<_> = (0..shirt.submesh_count())
//!     .map(|i| CombineInstance {
//!         mesh: shirt.clone(),
//!         submesh_index: i,
//!         transform: Mat4::IDENTITY,
//!     })
//!     .collect();
//! let combined = Mesh::combine("combined", &instances, CombineOptions::default()).unwrap();
//! assert_eq!(combined.submesh_count(), 2);
//! ```

pub mod combine;
pub mod geometry;
pub mod material;
pub mod primitives;
pub mod renderer;
pub mod vertex;

pub use combine::{CombineInstance, CombineOptions};
pub use geometry::{Aabb, Mesh, SubMesh};
pub use material::Material;
pub use primitives::cuboid;
pub use renderer::{MeshRenderer, SkinnedMeshRenderer};
pub use vertex::SkinnedVertex;
