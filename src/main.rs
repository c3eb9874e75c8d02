use std::sync::Arc;

use avatar_wardrobe::core::init_logging;
use avatar_wardrobe::prelude::*;
use avatar_wardrobe::scene::Transform;
use bevy_ecs::world::World;
use glam::{Quat, Vec3};

fn main() {
    if let Err(e) = run() {
        eprintln!("Wardrobe demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> WardrobeResult<()> {
    let mut config = WardrobeConfig::load_or_default();
    config.apply_env_overrides();
    config.validate()?;
    init_logging(&config.logging);

    let catalogs = GenderedCatalogs {
        male: demo_catalog("M"),
        female: demo_catalog("F"),
    };
    let mut rng = config.randomizer.make_rng();
    let mut world = World::new();

    // 单个角色：逐件穿戴后合并
    let model = CharacterBuilder::new(CharacterTemplate::humanoid(Gender::Female)).spawn(&mut world);
    let mut session = AvatarSession::bind(&world, model, config.clone())?;
    for (category, item) in [("Hair", "F_Bob"), ("Outfit", "F_Overalls"), ("Top", "F_Tee")] {
        if let Some(report) = session.equip_named(&mut world, &catalogs.female, category, item)? {
            tracing::info!(
                target: "wardrobe",
                "{} -> {:?}, retired {:?}",
                item,
                report.spawned,
                report.retired
            );
        }
    }
    match session.finalize(&mut world)? {
        CombineOutcome::Combined(stats) => tracing::info!(
            target: "wardrobe",
            "Combined avatar: {} sections, {} vertices, {} bones",
            stats.sections,
            stats.vertices,
            stats.bones
        ),
        CombineOutcome::NothingToCombine => tracing::info!(target: "wardrobe", "Nothing to combine"),
        CombineOutcome::NoCombinedSlot => tracing::info!(target: "wardrobe", "Avatar stays uncombined"),
    }
    session.end(&mut world);

    // 人群
    let models: Vec<_> = (0..8)
        .map(|i| {
            let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
            CharacterBuilder::new(CharacterTemplate::humanoid(gender))
                .at(Vec3::new(i as f32 * 1.5, 0.0, 0.0))
                .facing(Quat::from_rotation_y(i as f32 * 0.3))
                .spawn(&mut world)
        })
        .collect();
    let mut crowd = CrowdSpawner::new(config).spawn_crowd(&mut world, &models, &catalogs, &mut rng);
    for member in crowd.members() {
        tracing::info!(
            target: "wardrobe",
            "{:?} wears {:?}",
            member.model(),
            member.session.worn().equipped_names()
        );
    }
    crowd.clear(&mut world);
    Ok(())
}

fn demo_catalog(prefix: &str) -> ClothingList {
    let material = |name: &str, color: [f32; 4]| Arc::new(Material::new(format!("{prefix}_{name}"), color));
    let skinned = |name: &str, category, center: Vec3, size: Vec3, bone, hides: &[&str]| {
        let mesh = Arc::new(cuboid(format!("{prefix}_{name}"), center, size, 2, bone));
        ClothingRecord::skinned(
            format!("{prefix}_{name}"),
            category,
            mesh,
            vec![material(name, [0.8, 0.2, 0.2, 1.0]), material("Trim", [0.1, 0.1, 0.1, 1.0])],
        )
        .hiding(hides.iter().copied())
    };

    let hair = ClothingRecord::prop(
        format!("{prefix}_Bob"),
        ClothingCategory::Hair,
        Arc::new(cuboid("Bob", Vec3::ZERO, Vec3::new(0.3, 0.15, 0.3), 1, 4)),
        vec![material("Hair", [0.3, 0.2, 0.1, 1.0])],
    )
    .with_transform(Transform::from_translation(Vec3::new(0.0, 0.1, 0.0)));

    ClothingList::new()
        .with_item(hair)
        .with_item(skinned("Tee", ClothingCategory::Top, Vec3::new(0.0, 1.3, 0.0), Vec3::new(0.45, 0.62, 0.3), 2, &["Torso"]))
        .with_item(skinned("Jacket", ClothingCategory::Top, Vec3::new(0.0, 1.35, 0.0), Vec3::new(1.05, 0.7, 0.3), 2, &["Torso", "Arms"]))
        .with_item(skinned("Jeans", ClothingCategory::Bottom, Vec3::new(0.0, 0.55, 0.0), Vec3::new(0.4, 0.92, 0.25), 0, &["Legs"]))
        .with_item(skinned("Boots", ClothingCategory::Shoes, Vec3::new(0.0, 0.06, 0.05), Vec3::new(0.4, 0.14, 0.34), 9, &["Feet"]))
        .with_item(skinned("Overalls", ClothingCategory::Outfit, Vec3::new(0.0, 0.9, 0.0), Vec3::new(0.45, 1.4, 0.3), 0, &["Torso", "Legs"]))
}
