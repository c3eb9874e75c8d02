//! 层级操作
//!
//! 显式维护 `Parent` / `Children` 链接，不依赖 bevy_hierarchy。

use bevy_ecs::prelude::*;
use glam::Mat4;

use super::components::{Active, Children, Parent, Transform};

/// 在 `parent` 下生成一个子实体（`parent` 为 None 时生成根实体）
pub fn spawn_child<B: Bundle>(world: &mut World, parent: Option<Entity>, bundle: B) -> Entity {
    let entity = world.spawn(bundle).id();
    if let Some(parent) = parent {
        attach(world, parent, entity);
    }
    entity
}

/// 把 `child` 挂到 `parent` 下
pub fn attach(world: &mut World, parent: Entity, child: Entity) {
    detach(world, child);
    world.entity_mut(child).insert(Parent(parent));
    match world.get_mut::<Children>(parent) {
        Some(mut children) => children.0.push(child),
        None => {
            world.entity_mut(parent).insert(Children(vec![child]));
        }
    }
}

/// 从父节点上摘下 `child`
pub fn detach(world: &mut World, child: Entity) {
    let Some(Parent(parent)) = world.get::<Parent>(child).copied() else {
        return;
    };
    if let Some(mut children) = world.get_mut::<Children>(parent) {
        children.0.retain(|&c| c != child);
    }
    world.entity_mut(child).remove::<Parent>();
}

/// 递归销毁实体及其所有子节点
pub fn despawn_recursive(world: &mut World, entity: Entity) {
    if world.get_entity(entity).is_none() {
        return;
    }
    detach(world, entity);
    despawn_subtree(world, entity);
}

fn despawn_subtree(world: &mut World, entity: Entity) {
    let children = world
        .get::<Children>(entity)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    for child in children {
        despawn_subtree(world, child);
    }
    world.despawn(entity);
}

/// 局部到世界矩阵（沿父链累乘）
pub fn local_to_world(world: &World, entity: Entity) -> Mat4 {
    let mut matrix = world
        .get::<Transform>(entity)
        .map(Transform::to_matrix)
        .unwrap_or(Mat4::IDENTITY);
    let mut current = world.get::<Parent>(entity).map(|p| p.0);
    while let Some(parent) = current {
        if let Some(t) = world.get::<Transform>(parent) {
            matrix = t.to_matrix() * matrix;
        }
        current = world.get::<Parent>(parent).map(|p| p.0);
    }
    matrix
}

/// 世界到局部矩阵
pub fn world_to_local(world: &World, entity: Entity) -> Mat4 {
    local_to_world(world, entity).inverse()
}

/// 设置激活状态
pub fn set_active(world: &mut World, entity: Entity, active: bool) {
    if let Some(mut flag) = world.get_mut::<Active>(entity) {
        flag.0 = active;
    } else if world.get_entity(entity).is_some() {
        world.entity_mut(entity).insert(Active(active));
    }
}

/// 自身激活状态（没有 `Active` 组件视为激活）
pub fn is_active(world: &World, entity: Entity) -> bool {
    world.get::<Active>(entity).map_or(true, |a| a.0)
}
