//! Entity spawn factories.
//!
//! Creates enemies, projectiles and power-ups with the component bundles the
//! systems expect, plus the cosmetic star field.

use hecs::{Entity, EntityBuilder, World};
use rand::Rng;

use skyfire_core::combat;
use skyfire_core::components::*;
use skyfire_core::config::{BossConfig, GameConfig};
use skyfire_core::constants::*;
use skyfire_core::enums::*;
use skyfire_core::types::{Playfield, Position, Size};
use skyfire_enemy_ai::fsm;
use skyfire_enemy_ai::profiles::get_profile;

use crate::assets::AssetCatalog;
use crate::progression::difficulty_ramp;

/// Links an anchored projectile (beam) to whoever fired it.
/// `None` means the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor(pub Option<Entity>);

/// Spawn point for a new enemy: random x just above the screen, or
/// horizontally centred for the boss.
pub fn enemy_spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    archetype: EnemyArchetype,
    size: Size,
    playfield: Playfield,
) -> Position {
    let max_x = (playfield.width - size.width).max(0.0);
    let x = if archetype.is_boss() {
        max_x / 2.0
    } else if max_x > 0.0 {
        rng.gen_range(0.0..max_x)
    } else {
        0.0
    };
    Position::new(x, -size.height - ENEMY_SPAWN_OFFSET)
}

/// Spawn an enemy of `archetype` at `position` with stats for `level`.
pub fn spawn_enemy<R: Rng>(
    world: &mut World,
    rng: &mut R,
    archetype: EnemyArchetype,
    position: Position,
    assets: &AssetCatalog,
    config: &GameConfig,
    level: u32,
) -> Entity {
    let profile = get_profile(archetype);
    let ramp = if profile.ramped {
        difficulty_ramp(&config.waves, level)
    } else {
        1.0
    };
    let sheet = assets.sheet(archetype.sprite_key());
    let size = sheet.scaled(profile.scale);

    let mut builder = EntityBuilder::new();
    builder.add(Enemy {
        archetype,
        speed: profile.speed * ramp,
        score_value: ((profile.score_value as f64 * ramp).round() as u64).max(1),
    });
    builder.add(Body::new(position, size));
    builder.add(combat::new_health(profile.max_hp * ramp));
    builder.add(combat::new_destruction());
    builder.add(combat::new_sprite_animation(sheet.frame_count));
    builder.add(fsm::initial_state(archetype, rng));

    if archetype.is_boss() {
        builder.add(boss_shield(&config.boss));
    }
    if let Some(blast) = profile.death_blast {
        builder.add(DeathBlast {
            radius: blast.radius,
            damage: blast.damage,
            duration_ms: blast.duration_ms,
            elapsed_ms: 0.0,
            armed: false,
            landed: false,
        });
    }

    world.spawn(builder.build())
}

pub fn boss_shield(config: &BossConfig) -> Shield {
    combat::triggered_shield(
        config.damage_threshold,
        config.shield_health,
        config.shield_duration_ms,
        config.shield_cooldown_ms,
        config.damage_window_ms,
    )
}

/// Add a projectile. Anchored spawns follow `anchor`.
pub fn spawn_projectile(world: &mut World, spawn: ProjectileSpawn, anchor: Option<Entity>) -> Entity {
    if spawn.anchored {
        world.spawn((spawn.projectile, spawn.body, spawn.velocity, Anchor(anchor)))
    } else {
        world.spawn((spawn.projectile, spawn.body, spawn.velocity))
    }
}

/// Drop a power-up at a random x just above the screen.
pub fn spawn_power_up<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    kind: PowerUpKind,
    playfield: Playfield,
) -> Entity {
    let size = Size::square(POWER_UP_SIZE);
    let max_x = (playfield.width - size.width).max(0.0);
    let x = if max_x > 0.0 { rng.gen_range(0.0..max_x) } else { 0.0 };
    spawn_power_up_at(world, kind, Position::new(x, -size.height))
}

pub fn spawn_power_up_at(world: &mut World, kind: PowerUpKind, position: Position) -> Entity {
    world.spawn((
        PowerUp {
            kind,
            rarity: kind.rarity(),
            fall_speed: POWER_UP_FALL_SPEED,
            collected: false,
        },
        Body::new(position, Size::square(POWER_UP_SIZE)),
    ))
}

pub fn make_stars<R: Rng + ?Sized>(rng: &mut R, playfield: Playfield) -> Vec<Star> {
    (0..STAR_COUNT).map(|_| random_star(rng, playfield, None)).collect()
}

/// A star at a random position, or at height `y` when given.
pub fn random_star<R: Rng + ?Sized>(rng: &mut R, playfield: Playfield, y: Option<f64>) -> Star {
    let x = rng.gen_range(0.0..playfield.width.max(1.0));
    let y = y.unwrap_or_else(|| rng.gen_range(0.0..playfield.height.max(1.0)));
    Star {
        position: Position::new(x, y),
        size: rng.gen_range(STAR_MIN_SIZE..=STAR_MAX_SIZE),
        speed: rng.gen_range(STAR_MIN_SPEED..=STAR_MAX_SPEED),
    }
}
