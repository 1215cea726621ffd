//! Snapshot system: read-only views of the ECS world for the draw pass.

use hecs::World;

use skyfire_core::components::*;
use skyfire_core::enums::Lifecycle;
use skyfire_core::state::{EnemyView, PowerUpView, ProjectileView};

use crate::systems::lifecycle::blast_radius;

pub fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut query = world.query::<(
        &Enemy,
        &Body,
        &Health,
        &SpriteAnimation,
        &Destruction,
        Option<&Shield>,
        Option<&DeathBlast>,
    )>();
    let mut views: Vec<EnemyView> = query
        .iter()
        .map(
            |(entity, (enemy, body, health, animation, destruction, shield, blast))| EnemyView {
                id: entity.to_bits().get(),
                archetype: enemy.archetype,
                position: body.position,
                size: body.size,
                angle: body.angle,
                state: health.state,
                frame: match health.state {
                    Lifecycle::Alive => animation.frame,
                    _ => destruction.frame,
                },
                hp: health.hp,
                max_hp: health.max_hp,
                shield_active: shield.is_some_and(|s| s.active),
                blast_radius: blast
                    .filter(|b| b.armed && b.elapsed_ms < b.duration_ms)
                    .map(blast_radius),
            },
        )
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

pub fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Body)>()
        .iter()
        .filter(|(_, (projectile, _))| !projectile.destroyed)
        .map(|(_, (projectile, body))| ProjectileView {
            owner: projectile.owner,
            position: body.position,
            size: body.size,
            angle: body.angle,
            kind: projectile.kind,
        })
        .collect()
}

pub fn build_power_ups(world: &World) -> Vec<PowerUpView> {
    world
        .query::<(&PowerUp, &Body)>()
        .iter()
        .filter(|(_, (power_up, _))| !power_up.collected)
        .map(|(_, (power_up, body))| PowerUpView {
            kind: power_up.kind,
            rarity: power_up.rarity,
            position: body.position,
            size: body.size,
        })
        .collect()
}

/// Number of enemies still in the world, dying ones included.
pub fn enemy_count(world: &World) -> usize {
    world.query::<&Enemy>().iter().count()
}
