//! 人群批量生成
//!
//! 对每个角色：绑定会话 -> 随机搭配 -> 合并网格。单个角色的流程是原子的，
//! 中途失败时结束该会话（卸下已穿服装），不影响其他角色。

use bevy_ecs::prelude::*;
use rand::RngCore;

use crate::catalog::{ClothingCatalog, GenderedCatalogs};
use crate::combiner::CombineOutcome;
use crate::config::WardrobeConfig;
use crate::core::{RigError, WardrobeError, WardrobeResult};
use crate::randomizer::RandomizeReport;
use crate::rig::ModelReferenceBinder;
use crate::scene::despawn_recursive;
use crate::wardrobe::AvatarSession;

/// 人群中的一个角色
#[derive(Debug)]
pub struct CrowdMember {
    pub session: AvatarSession,
    pub outfit: RandomizeReport,
    pub outcome: CombineOutcome,
}

impl CrowdMember {
    pub fn model(&self) -> Entity {
        self.session.model()
    }
}

/// 已生成的人群
#[derive(Resource, Debug, Default)]
pub struct Crowd {
    members: Vec<CrowdMember>,
    failed: Vec<(Entity, String)>,
}

impl Crowd {
    pub fn members(&self) -> &[CrowdMember] {
        &self.members
    }

    /// 生成失败的角色及原因
    pub fn failures(&self) -> &[(Entity, String)] {
        &self.failed
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 结束所有会话并销毁角色
    pub fn clear(&mut self, world: &mut World) {
        for member in self.members.drain(..) {
            let model = member.model();
            member.session.end(world);
            despawn_recursive(world, model);
        }
        self.failed.clear();
    }
}

/// 人群生成器
pub struct CrowdSpawner {
    config: WardrobeConfig,
}

impl CrowdSpawner {
    pub fn new(config: WardrobeConfig) -> Self {
        Self { config }
    }

    /// 为单个角色随机搭配并合并网格
    pub fn spawn_avatar(
        &self,
        world: &mut World,
        model: Entity,
        catalog: &dyn ClothingCatalog,
        rng: &mut dyn RngCore,
    ) -> WardrobeResult<CrowdMember> {
        let mut session = AvatarSession::bind(world, model, self.config.clone())?;

        let result = session
            .randomize_outfit(world, catalog, rng)
            .and_then(|outfit| session.finalize(world).map(|outcome| (outfit, outcome)));

        match result {
            Ok((outfit, outcome)) => Ok(CrowdMember {
                session,
                outfit,
                outcome,
            }),
            Err(err) => {
                tracing::warn!(target: "wardrobe", "Rolling back avatar {:?}: {}", model, err);
                session.end(world);
                Err(err)
            }
        }
    }

    /// 按角色性别选择目录，批量生成
    ///
    /// 单个角色失败只记录在 `Crowd::failures` 中。
    pub fn spawn_crowd(
        &self,
        world: &mut World,
        models: &[Entity],
        catalogs: &GenderedCatalogs,
        rng: &mut dyn RngCore,
    ) -> Crowd {
        let mut crowd = Crowd::default();

        for &model in models {
            let result = world
                .get::<ModelReferenceBinder>(model)
                .map(|binder| binder.gender)
                .ok_or_else(|| WardrobeError::from(RigError::MissingBinder(model)))
                .and_then(|gender| {
                    self.spawn_avatar(world, model, catalogs.for_gender(gender), rng)
                });

            match result {
                Ok(member) => crowd.members.push(member),
                Err(err) => {
                    tracing::error!(target: "wardrobe", "Failed to dress avatar {:?}: {}", model, err);
                    crowd.failed.push((model, err.to_string()));
                }
            }
        }

        tracing::info!(
            target: "wardrobe",
            "Spawned crowd of {} avatars ({} failed)",
            crowd.members.len(),
            crowd.failed.len()
        );
        crowd
    }
}
