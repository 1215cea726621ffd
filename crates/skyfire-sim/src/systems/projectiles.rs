//! Projectile system: integrates motion for every projectile variant.
//!
//! Damage is resolved later by the collision system; this only moves things,
//! runs timers, and flags projectiles that should disappear.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use hecs::{Entity, World};
use tracing::error;

use skyfire_core::components::{Body, Enemy, Health, Projectile, ProjectileKind};
use skyfire_core::enums::{Lifecycle, Owner};
use skyfire_core::types::{frame_scale, Playfield, Position, Rect, Size, Velocity};

use crate::player::Player;
use crate::world_setup::{self, Anchor};

pub fn run(world: &mut World, player: &Player, playfield: Playfield, dt_ms: f64) {
    let scale = frame_scale(dt_ms);

    // Enemy centres for homing targets and beam anchors.
    let enemies: Vec<(Entity, Position, bool)> = world
        .query::<(&Enemy, &Body, &Health)>()
        .iter()
        .map(|(entity, (_enemy, body, health))| {
            (entity, body.center(), health.state == Lifecycle::Alive)
        })
        .collect();

    for (entity, (projectile, body, velocity, anchor)) in world.query_mut::<(
        &mut Projectile,
        &mut Body,
        &mut Velocity,
        Option<&Anchor>,
    )>() {
        if projectile.destroyed {
            continue;
        }

        if let Some(lifetime) = projectile.lifetime_ms.as_mut() {
            *lifetime -= dt_ms;
            if *lifetime <= 0.0 {
                projectile.destroyed = true;
                continue;
            }
        }

        let mut kind = projectile.kind;
        let mut destroyed = false;
        let mut bounded = true;

        match &mut kind {
            ProjectileKind::Straight { spin } => {
                advance(body, velocity, scale);
                body.angle = (body.angle + *spin * scale) % TAU;
            }
            ProjectileKind::Homing { speed, turn_rate } => {
                let target = match projectile.owner {
                    Owner::Enemy => player.is_alive().then(|| player.center()),
                    Owner::Player => nearest_alive(&enemies, body.center()),
                };
                if let Some(target) = target {
                    let desired = body.center().angle_to(&target);
                    let heading = steer(velocity.heading(), desired, *turn_rate * scale);
                    *velocity = Velocity::from_angle(heading, *speed);
                    body.angle = heading + FRAC_PI_2;
                }
                advance(body, velocity, scale);
            }
            ProjectileKind::Charged {
                charge_remaining_ms,
                radius,
                max_radius,
                speed,
                target,
            } => {
                if *charge_remaining_ms > 0.0 {
                    let fraction = (dt_ms / *charge_remaining_ms).min(1.0);
                    *radius += (*max_radius - *radius) * fraction;
                    *charge_remaining_ms -= dt_ms;
                    if *charge_remaining_ms <= 0.0 {
                        *radius = *max_radius;
                        let heading = body.center().angle_to(target);
                        *velocity = Velocity::from_angle(heading, *speed);
                        body.angle = heading + FRAC_PI_2;
                    }
                    resize_around_center(body, Size::square(*radius * 2.0));
                } else {
                    advance(body, velocity, scale);
                }
            }
            ProjectileKind::Grenade {
                target,
                detonated,
                explosion_remaining_ms,
                ..
            } => {
                if *detonated {
                    *explosion_remaining_ms -= dt_ms;
                    destroyed = *explosion_remaining_ms <= 0.0;
                } else {
                    let step = velocity.speed() * scale;
                    if body.center().distance_to(target) <= step {
                        body.position = Rect::centered(*target, body.size).top_left();
                        *velocity = Velocity::default();
                        *detonated = true;
                    } else {
                        advance(body, velocity, scale);
                    }
                }
            }
            ProjectileKind::Beam {
                width,
                length,
                remaining_ms,
                hit_timer_ms,
                ..
            } => {
                bounded = false;
                *hit_timer_ms += dt_ms;
                match anchor {
                    Some(Anchor(None)) | None if projectile.owner == Owner::Player => {
                        if player.laser_mode() {
                            let origin = player.beam_origin();
                            *length = origin.y.max(0.0);
                            body.position = origin;
                            body.size = Size::new(*width, *length);
                            *remaining_ms = player
                                .active_power_up
                                .map_or(0.0, |active| active.remaining_ms);
                        } else {
                            destroyed = true;
                        }
                    }
                    Some(Anchor(Some(owner))) => {
                        match enemies.iter().find(|(e, _, _)| e == owner) {
                            Some((_, center, true)) => body.position = *center,
                            _ => destroyed = true,
                        }
                        *remaining_ms -= dt_ms;
                        if *remaining_ms <= 0.0 {
                            destroyed = true;
                        }
                    }
                    _ => {
                        *remaining_ms -= dt_ms;
                        if *remaining_ms <= 0.0 {
                            destroyed = true;
                        }
                    }
                }
            }
        }

        projectile.kind = kind;

        if !body.position.is_finite() {
            error!(?entity, owner = ?projectile.owner, "non-finite projectile position, removing");
            destroyed = true;
        }
        if bounded && out_of_bounds(body, velocity, playfield) {
            destroyed = true;
        }
        if destroyed {
            projectile.destroyed = true;
        }
    }
}

/// Whether a player beam currently exists.
pub fn player_beam_exists(world: &World) -> bool {
    world
        .query::<(&Projectile, &Anchor)>()
        .iter()
        .any(|(_, (projectile, _))| projectile.owner == Owner::Player && !projectile.destroyed)
}

/// Keep exactly one player beam alive while laser mode is active.
pub fn sync_player_beam(world: &mut World, player: &Player) {
    if player.laser_mode() {
        if !player_beam_exists(world) {
            world_setup::spawn_projectile(world, player.beam_spawn(), None);
        }
        return;
    }
    for (_entity, (projectile, _anchor)) in world.query_mut::<(&mut Projectile, &Anchor)>() {
        if projectile.owner == Owner::Player {
            projectile.destroyed = true;
        }
    }
}

fn advance(body: &mut Body, velocity: &Velocity, scale: f64) {
    body.position = body.position.offset(velocity.x * scale, velocity.y * scale);
}

fn resize_around_center(body: &mut Body, size: Size) {
    let center = body.center();
    body.size = size;
    body.position = Rect::centered(center, size).top_left();
}

/// Turn from `current` toward `desired` by at most `max_turn` radians.
pub fn steer(current: f64, desired: f64, max_turn: f64) -> f64 {
    let mut diff = (desired - current) % TAU;
    if diff > PI {
        diff -= TAU;
    } else if diff < -PI {
        diff += TAU;
    }
    current + diff.clamp(-max_turn, max_turn)
}

fn nearest_alive(enemies: &[(Entity, Position, bool)], from: Position) -> Option<Position> {
    enemies
        .iter()
        .filter(|(_, _, alive)| *alive)
        .map(|(_, center, _)| *center)
        .min_by(|a, b| from.distance_to(a).total_cmp(&from.distance_to(b)))
}

/// Fully outside the playfield. Shots still descending from above the
/// screen are kept so enemies entering from the top can fire.
fn out_of_bounds(body: &Body, velocity: &Velocity, playfield: Playfield) -> bool {
    let rect = body.rect();
    rect.right() < 0.0
        || rect.x > playfield.width
        || rect.y > playfield.height
        || (rect.bottom() < 0.0 && velocity.y <= 0.0)
}
