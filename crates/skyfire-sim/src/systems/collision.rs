//! Collision system: resolves every overlap for one update.
//!
//! Passes run in a fixed order: player shots against enemies, enemy shots
//! against the player, enemy contact, power-up pickup, then death blasts.
//! A projectile destroyed in one pass is skipped by the later ones.

use hecs::{Entity, World};
use tracing::debug;

use skyfire_core::collision::{beam_end, overlaps, point_segment_distance_sq, within_radius};
use skyfire_core::combat::{self, DamageOutcome};
use skyfire_core::components::{
    Body, DeathBlast, Destruction, Enemy, Health, PowerUp, Projectile, ProjectileKind, Shield,
};
use skyfire_core::enums::{EnemyArchetype, Lifecycle, Owner, PowerUpKind, ShieldOverflow};
use skyfire_core::events::GameEvent;
use skyfire_core::types::Rect;

use crate::player::Player;
use crate::systems::lifecycle;

/// Read-only inputs for one collision pass.
#[derive(Debug, Clone, Copy)]
pub struct CollisionContext {
    pub level: u32,
    pub overflow: ShieldOverflow,
    pub contact_damage: f64,
    pub power_up_duration_ms: f64,
}

/// What changed during a collision pass, for session statistics.
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub score: u64,
    pub kills: Vec<EnemyArchetype>,
    pub collected: Vec<PowerUpKind>,
}

/// Enemy state captured at the start of the pass.
#[derive(Debug, Clone, Copy)]
struct Target {
    entity: Entity,
    rect: Rect,
    alive: bool,
    boss: bool,
}

pub fn run(
    world: &mut World,
    player: &mut Player,
    ctx: &CollisionContext,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    let mut targets: Vec<Target> = world
        .query::<(&Enemy, &Body, &Health)>()
        .iter()
        .map(|(entity, (enemy, body, health))| Target {
            entity,
            rect: body.rect(),
            alive: health.state == Lifecycle::Alive,
            boss: enemy.archetype.is_boss(),
        })
        .collect();
    // Contact uses the state before any damage this update, so an enemy shot
    // down while ramming still hits the player.
    let contacts: Vec<Target> = targets.iter().copied().filter(|t| t.alive).collect();

    // (a) Player projectiles vs enemies
    player_projectiles(world, player, &mut targets, ctx, &mut report, events);
    // (b) Enemy projectiles vs player
    enemy_projectiles(world, player, ctx, events);
    // (c) Enemy contact
    enemy_contact(world, player, &contacts, ctx, &mut report, events);
    // (d) Power-up pickup
    collect_power_ups(world, player, ctx, &mut report, events);
    // (e) Death blasts
    death_blasts(world, player, ctx, events);

    report
}

/// Route damage to an enemy through its shield. Arms its death blast on kill.
pub fn damage_enemy(
    world: &mut World,
    entity: Entity,
    amount: f64,
    overflow: ShieldOverflow,
) -> Option<(DamageOutcome, Enemy)> {
    let (enemy, health, destruction, shield, blast) = world
        .query_one_mut::<(
            &Enemy,
            &mut Health,
            &mut Destruction,
            Option<&mut Shield>,
            Option<&mut DeathBlast>,
        )>(entity)
        .ok()?;
    let outcome = combat::take_damage(health, destruction, shield, amount, overflow);
    if outcome.killed() {
        if let Some(blast) = blast {
            blast.armed = true;
            blast.elapsed_ms = 0.0;
        }
    }
    Some((outcome, *enemy))
}

/// Credit a kill: score is the ramped value times the level.
fn register_kill(
    player: &mut Player,
    enemy: &Enemy,
    level: u32,
    report: &mut CollisionReport,
    events: &mut Vec<GameEvent>,
) {
    let score = enemy.score_value * u64::from(level.max(1));
    player.score += score;
    report.score += score;
    report.kills.push(enemy.archetype);
    debug!(archetype = %enemy.archetype, score, "enemy destroyed");
    events.push(GameEvent::EnemyDestroyed {
        archetype: enemy.archetype,
        score,
    });
}

fn hit_player(player: &mut Player, damage: f64, ctx: &CollisionContext, events: &mut Vec<GameEvent>) {
    let outcome = player.take_damage(damage, ctx.overflow);
    if outcome != DamageOutcome::Ignored {
        events.push(GameEvent::PlayerHit {
            damage,
            hp: player.health.hp,
        });
    }
}

/// Number of whole hit intervals banked in a beam's timer.
fn beam_hits(hit_timer_ms: f64, hit_interval_ms: f64) -> f64 {
    if hit_interval_ms <= 0.0 {
        1.0
    } else {
        (hit_timer_ms / hit_interval_ms).floor()
    }
}

fn player_projectiles(
    world: &mut World,
    player: &mut Player,
    targets: &mut [Target],
    ctx: &CollisionContext,
    report: &mut CollisionReport,
    events: &mut Vec<GameEvent>,
) {
    let shots: Vec<(Entity, Projectile, Body)> = world
        .query::<(&Projectile, &Body)>()
        .iter()
        .filter(|(_, (projectile, _))| projectile.owner == Owner::Player && !projectile.destroyed)
        .map(|(entity, (projectile, body))| (entity, *projectile, *body))
        .collect();

    for (shot, projectile, body) in shots {
        match projectile.kind {
            ProjectileKind::Beam {
                width,
                length,
                hit_interval_ms,
                hit_timer_ms,
                ..
            } => {
                let beam = Rect::new(body.position.x - width / 2.0, body.position.y - length, width, length);
                let hits = beam_hits(hit_timer_ms, hit_interval_ms);
                let touching: Vec<usize> = targets
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.alive && overlaps(&beam, &t.rect))
                    .map(|(i, _)| i)
                    .collect();

                // Time only banks while something is in the beam.
                let next_timer = if hits >= 1.0 && !touching.is_empty() {
                    for i in touching {
                        let damage = projectile.damage * hits;
                        if let Some((outcome, enemy)) =
                            damage_enemy(world, targets[i].entity, damage, ctx.overflow)
                        {
                            if outcome.killed() {
                                targets[i].alive = false;
                                register_kill(player, &enemy, ctx.level, report, events);
                            }
                        }
                    }
                    hit_timer_ms - hits * hit_interval_ms
                } else {
                    hit_timer_ms.min(hit_interval_ms)
                };

                if let Ok(mut stored) = world.get::<&mut Projectile>(shot) {
                    if let ProjectileKind::Beam { hit_timer_ms, .. } = &mut stored.kind {
                        *hit_timer_ms = next_timer;
                    }
                }
            }
            _ => {
                let rect = body.rect();
                let Some(i) = targets
                    .iter()
                    .position(|t| t.alive && overlaps(&rect, &t.rect))
                else {
                    continue;
                };
                if let Ok(mut stored) = world.get::<&mut Projectile>(shot) {
                    stored.destroyed = true;
                }
                if let Some((outcome, enemy)) =
                    damage_enemy(world, targets[i].entity, projectile.damage, ctx.overflow)
                {
                    if outcome.killed() {
                        targets[i].alive = false;
                        register_kill(player, &enemy, ctx.level, report, events);
                    }
                }
            }
        }
    }
}

fn enemy_projectiles(
    world: &mut World,
    player: &mut Player,
    ctx: &CollisionContext,
    events: &mut Vec<GameEvent>,
) {
    let alive = player.is_alive();
    let player_rect = player.rect();
    let player_center = player.center();
    let mut hits: Vec<f64> = Vec::new();

    for (_entity, (projectile, body)) in world.query_mut::<(&mut Projectile, &Body)>() {
        if projectile.owner != Owner::Enemy || projectile.destroyed {
            continue;
        }
        let damage = projectile.damage;
        match &mut projectile.kind {
            ProjectileKind::Straight { .. }
            | ProjectileKind::Homing { .. }
            | ProjectileKind::Charged { .. } => {
                if alive && overlaps(&body.rect(), &player_rect) {
                    hits.push(damage);
                    projectile.destroyed = true;
                }
            }
            ProjectileKind::Grenade {
                blast_radius,
                detonated,
                resolved,
                ..
            } => {
                if *detonated && !*resolved {
                    *resolved = true;
                    if alive && within_radius(body.center(), *blast_radius, player_center) {
                        hits.push(damage);
                    }
                }
            }
            ProjectileKind::Beam {
                angle,
                width,
                length,
                hit_interval_ms,
                hit_timer_ms,
                ..
            } => {
                let count = beam_hits(*hit_timer_ms, *hit_interval_ms);
                if count < 1.0 {
                    continue;
                }
                *hit_timer_ms -= count * *hit_interval_ms;
                let end = beam_end(body.position, *angle, *length);
                if alive
                    && point_segment_distance_sq(player_center, body.position, end)
                        < *width * *width
                {
                    hits.push(damage * count);
                }
            }
        }
    }

    for damage in hits {
        hit_player(player, damage, ctx, events);
    }
}

fn enemy_contact(
    world: &mut World,
    player: &mut Player,
    contacts: &[Target],
    ctx: &CollisionContext,
    report: &mut CollisionReport,
    events: &mut Vec<GameEvent>,
) {
    for target in contacts {
        if !player.is_alive() {
            return;
        }
        if !overlaps(&target.rect, &player.rect()) {
            continue;
        }
        if !target.boss {
            if let Some((outcome, enemy)) =
                damage_enemy(world, target.entity, f64::MAX, ctx.overflow)
            {
                if outcome.killed() {
                    register_kill(player, &enemy, ctx.level, report, events);
                }
            }
        }
        hit_player(player, ctx.contact_damage, ctx, events);
    }
}

/// Pick up every overlapping power-up. The collected flag is set before the
/// effect runs, so each pickup applies once no matter how often it is checked.
pub fn collect_power_ups(
    world: &mut World,
    player: &mut Player,
    ctx: &CollisionContext,
    report: &mut CollisionReport,
    events: &mut Vec<GameEvent>,
) {
    if !player.is_alive() {
        return;
    }
    let player_rect = player.rect();
    let mut collected = Vec::new();
    for (_entity, (power_up, body)) in world.query_mut::<(&mut PowerUp, &Body)>() {
        if power_up.collected || !overlaps(&body.rect(), &player_rect) {
            continue;
        }
        power_up.collected = true;
        collected.push(power_up.kind);
    }
    for kind in collected {
        player.apply_power_up(kind, ctx.level, ctx.power_up_duration_ms);
        report.collected.push(kind);
        events.push(GameEvent::PowerUpCollected { kind });
    }
}

fn death_blasts(
    world: &mut World,
    player: &mut Player,
    ctx: &CollisionContext,
    events: &mut Vec<GameEvent>,
) {
    if !player.is_alive() {
        return;
    }
    let player_center = player.center();
    let half_extent = player.body.size.max_side() / 2.0;
    let mut hits = Vec::new();
    for (_entity, (body, blast)) in world.query_mut::<(&Body, &mut DeathBlast)>() {
        if !lifecycle::blast_live(blast) {
            continue;
        }
        let reach = lifecycle::blast_radius(blast) + half_extent;
        if body.center().distance_to(&player_center) <= reach {
            blast.landed = true;
            hits.push(blast.damage);
        }
    }
    for damage in hits {
        hit_player(player, damage, ctx, events);
    }
}
