//! 场景层级
//!
//! 换装核心操作的宿主场景：一个 `bevy_ecs::World`，节点之间通过显式的
//! `Parent` / `Children` 组件链接。

pub mod components;
pub mod hierarchy;

pub use components::{Active, Children, Name, Parent, Transform};
pub use hierarchy::{
    attach, despawn_recursive, detach, is_active, local_to_world,
    set_active, spawn_child, world_to_local,
};
