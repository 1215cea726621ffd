//! Enemy behavior state machines.
//!
//! Pure functions that move an enemy and decide its attacks based on its
//! archetype, its stored AI state, and where the player is. Each archetype
//! maps to a `Behavior`: a movement policy and an attack policy.
//! No ECS dependency; operates on plain data.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;
use rand::{Rng, RngCore};

use skyfire_core::components::{Body, Projectile, ProjectileKind, ProjectileSpawn};
use skyfire_core::constants::*;
use skyfire_core::enums::{BossAttack, EnemyArchetype, Owner};
use skyfire_core::types::{frame_scale, Playfield, Position, Rect, Size, Velocity};

use crate::profiles::get_profile;

/// Input to the enemy FSM for a single entity.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub archetype: EnemyArchetype,
    pub body: Body,
    /// Ramped speed, pixels per reference frame.
    pub speed: f64,
    /// The player's body, if the player is alive.
    pub target: Option<Body>,
    pub playfield: Playfield,
    pub dt_ms: f64,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone)]
pub struct EnemyUpdate {
    pub position: Position,
    pub angle: f64,
    pub spawns: Vec<ProjectileSpawn>,
    /// Enemy drifted far enough off screen to be culled.
    pub left_playfield: bool,
}

/// Shot sequencing for burst-firing archetypes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstState {
    /// Time until the next burst starts.
    pub cooldown_ms: f64,
    pub shots_left: u32,
    /// Time until the next shot inside the current burst.
    pub gap_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserPhase {
    Entering,
    Idle,
    Charging,
    Firing,
    Retreating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserState {
    pub phase: LaserPhase,
    /// Countdown used by idle (until charge) and firing (until retreat).
    pub timer_ms: f64,
    pub charge_ms: f64,
    /// Beam angle, locked when charging starts.
    pub angle: f64,
    pub retreat_target: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossState {
    pub entered: bool,
    /// -1.0 or 1.0.
    pub direction: f64,
    pub roam_speed: f64,
    pub attack_cooldown_ms: f64,
    pub gun_remaining_ms: f64,
    pub last_attack: Option<BossAttack>,
}

/// Per-entity AI state, tagged by archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiState {
    Kamikaze,
    Assault(BurstState),
    Tank(BurstState),
    Laser(LaserState),
    Boss(BossState),
}

pub type MovementPolicy = fn(&EnemyContext, &mut AiState, &mut dyn RngCore) -> Position;
pub type AttackPolicy =
    fn(&EnemyContext, &mut AiState, &mut dyn RngCore, &mut Vec<ProjectileSpawn>);

/// Movement and attack policy pair for one archetype.
#[derive(Clone, Copy)]
pub struct Behavior {
    pub movement: MovementPolicy,
    pub attack: AttackPolicy,
}

const KAMIKAZE: Behavior = Behavior {
    movement: pursue,
    attack: no_attack,
};
const ASSAULT: Behavior = Behavior {
    movement: approach,
    attack: assault_attack,
};
const TANK: Behavior = Behavior {
    movement: approach,
    attack: tank_attack,
};
const LASER: Behavior = Behavior {
    movement: laser_movement,
    attack: laser_attack,
};
const BOSS: Behavior = Behavior {
    movement: boss_movement,
    attack: boss_attack,
};

/// Look up the policy pair for an archetype.
pub fn behavior(archetype: EnemyArchetype) -> Behavior {
    match archetype {
        EnemyArchetype::Kamikaze => KAMIKAZE,
        EnemyArchetype::Assault => ASSAULT,
        EnemyArchetype::Tank => TANK,
        EnemyArchetype::Laser => LASER,
        EnemyArchetype::Boss => BOSS,
    }
}

/// Fresh AI state for a newly spawned enemy.
pub fn initial_state(archetype: EnemyArchetype, rng: &mut dyn RngCore) -> AiState {
    match archetype {
        EnemyArchetype::Kamikaze => AiState::Kamikaze,
        EnemyArchetype::Assault => AiState::Assault(BurstState {
            cooldown_ms: ASSAULT_INITIAL_COOLDOWN_MS,
            shots_left: 0,
            gap_ms: 0.0,
        }),
        EnemyArchetype::Tank => AiState::Tank(BurstState {
            cooldown_ms: TANK_INITIAL_COOLDOWN_MS,
            shots_left: 0,
            gap_ms: 0.0,
        }),
        EnemyArchetype::Laser => AiState::Laser(LaserState {
            phase: LaserPhase::Entering,
            timer_ms: 0.0,
            charge_ms: 0.0,
            angle: FRAC_PI_2,
            retreat_target: None,
        }),
        EnemyArchetype::Boss => AiState::Boss(BossState {
            entered: false,
            direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            roam_speed: rng.gen_range(BOSS_ROAM_MIN_SPEED..=BOSS_ROAM_MAX_SPEED),
            attack_cooldown_ms: BOSS_ATTACK_COOLDOWN_MS,
            gun_remaining_ms: 0.0,
            last_attack: None,
        }),
    }
}

/// Evaluate the FSM for one living enemy: move, then attack from the new position.
pub fn evaluate(ctx: &EnemyContext, state: &mut AiState, rng: &mut dyn RngCore) -> EnemyUpdate {
    let behavior = behavior(ctx.archetype);
    let position = (behavior.movement)(ctx, state, rng);

    let moved = EnemyContext {
        body: Body { position, ..ctx.body },
        ..*ctx
    };

    let mut spawns = Vec::new();
    if moved.target.is_some() {
        (behavior.attack)(&moved, state, rng, &mut spawns);
    }

    let angle = match moved.target_center() {
        Some(target) => moved.center().angle_to(&target) - FRAC_PI_2,
        None => ctx.body.angle,
    };

    let left_playfield = position.y > ctx.playfield.height
        || position.y < -ENEMY_CULL_ABOVE_FACTOR * ctx.playfield.height;

    EnemyUpdate {
        position,
        angle,
        spawns,
        left_playfield,
    }
}

impl EnemyContext {
    pub fn center(&self) -> Position {
        self.body.center()
    }

    pub fn target_center(&self) -> Option<Position> {
        self.target.map(|t| t.center())
    }

    fn frame_scale(&self) -> f64 {
        frame_scale(self.dt_ms)
    }
}

// --- Movement policies ---

/// Without a player to chase, enemies keep descending.
fn drift(ctx: &EnemyContext) -> Position {
    ctx.body
        .position
        .offset(0.0, ctx.speed * ctx.frame_scale())
}

fn direction(from: Position, to: Position) -> DVec2 {
    (to.as_vec() - from.as_vec()).normalize_or_zero()
}

/// Move `from` toward `to` by at most `step`, never overshooting.
fn step_toward(from: Position, to: Position, step: f64) -> Position {
    let distance = from.distance_to(&to);
    if distance <= step {
        return to;
    }
    let d = direction(from, to) * step;
    from.offset(d.x, d.y)
}

fn pursue(ctx: &EnemyContext, _state: &mut AiState, _rng: &mut dyn RngCore) -> Position {
    let Some(target) = ctx.target_center() else {
        return drift(ctx);
    };
    let d = direction(ctx.center(), target) * ctx.speed * ctx.frame_scale();
    ctx.body.position.offset(d.x, d.y)
}

/// Pursue until within the archetype's stand-off distance, then hold.
fn approach(ctx: &EnemyContext, _state: &mut AiState, _rng: &mut dyn RngCore) -> Position {
    let Some(target) = ctx.target_center() else {
        return drift(ctx);
    };
    let standoff = get_profile(ctx.archetype).standoff.unwrap_or(0.0);
    let center = ctx.center();
    let gap = center.distance_to(&target) - standoff;
    if gap <= 0.0 {
        return ctx.body.position;
    }
    let d = direction(center, target) * (ctx.speed * ctx.frame_scale()).min(gap);
    ctx.body.position.offset(d.x, d.y)
}

fn laser_movement(ctx: &EnemyContext, state: &mut AiState, _rng: &mut dyn RngCore) -> Position {
    let AiState::Laser(laser) = state else {
        return drift(ctx);
    };
    let scale = ctx.frame_scale();
    let mut position = ctx.body.position;

    match laser.phase {
        LaserPhase::Entering => {
            if position.y < LASER_TARGET_Y {
                position.y = (position.y + ctx.speed * scale).min(LASER_TARGET_Y);
            } else {
                laser.phase = LaserPhase::Idle;
            }
        }
        LaserPhase::Idle => {
            laser.timer_ms -= ctx.dt_ms;
            if let Some(target) = ctx.target_center() {
                let center = ctx.center();
                if center.distance_to(&target) < LASER_RETREAT_DISTANCE {
                    let away = direction(target, center) * ctx.speed * scale;
                    position = ctx
                        .playfield
                        .clamp(position.offset(away.x, away.y), ctx.body.size);
                }
                if laser.timer_ms <= 0.0 {
                    laser.phase = LaserPhase::Charging;
                    laser.charge_ms = LASER_CHARGE_MS;
                    laser.angle = center.angle_to(&target);
                }
            }
        }
        LaserPhase::Charging | LaserPhase::Firing => {}
        LaserPhase::Retreating => match laser.retreat_target {
            Some(goal) => {
                position = step_toward(position, goal, LASER_RETREAT_SPEED * scale);
                if position.distance_to(&goal) < LASER_RETREAT_ARRIVAL {
                    laser.phase = LaserPhase::Idle;
                    laser.timer_ms = LASER_COOLDOWN_MS;
                    laser.retreat_target = None;
                }
            }
            None => {
                laser.phase = LaserPhase::Idle;
                laser.timer_ms = LASER_COOLDOWN_MS;
            }
        },
    }
    position
}

fn boss_movement(ctx: &EnemyContext, state: &mut AiState, rng: &mut dyn RngCore) -> Position {
    let AiState::Boss(boss) = state else {
        return drift(ctx);
    };
    let scale = ctx.frame_scale();
    let mut position = ctx.body.position;

    if !boss.entered {
        position.y += BOSS_ENTRY_SPEED * scale;
        if position.y >= BOSS_TARGET_Y {
            position.y = BOSS_TARGET_Y;
            boss.entered = true;
        }
        return position;
    }

    if rng.gen_bool((BOSS_TURN_CHANCE * scale).clamp(0.0, 1.0)) {
        boss.direction = -boss.direction;
        boss.roam_speed = rng.gen_range(BOSS_ROAM_MIN_SPEED..=BOSS_ROAM_MAX_SPEED);
    }

    position.x += boss.direction * boss.roam_speed * scale;
    let max_x = (ctx.playfield.width - ctx.body.size.width).max(0.0);
    if position.x <= 0.0 {
        position.x = 0.0;
        boss.direction = 1.0;
    } else if position.x >= max_x {
        position.x = max_x;
        boss.direction = -1.0;
    }
    position
}

// --- Attack policies ---

fn no_attack(
    _ctx: &EnemyContext,
    _state: &mut AiState,
    _rng: &mut dyn RngCore,
    _spawns: &mut Vec<ProjectileSpawn>,
) {
}

/// Advance a burst. Returns true when a shot is due this update.
fn run_burst(burst: &mut BurstState, dt_ms: f64, shots: u32, gap_ms: f64) -> bool {
    if burst.shots_left == 0 {
        burst.cooldown_ms -= dt_ms;
        if burst.cooldown_ms > 0.0 {
            return false;
        }
        burst.shots_left = shots;
        burst.gap_ms = 0.0;
    } else {
        burst.gap_ms -= dt_ms;
    }
    if burst.gap_ms > 0.0 {
        return false;
    }
    burst.shots_left -= 1;
    burst.gap_ms = gap_ms;
    true
}

fn assault_attack(
    ctx: &EnemyContext,
    state: &mut AiState,
    rng: &mut dyn RngCore,
    spawns: &mut Vec<ProjectileSpawn>,
) {
    let AiState::Assault(burst) = state else {
        return;
    };
    let Some(target) = ctx.target_center() else {
        return;
    };
    if !run_burst(burst, ctx.dt_ms, ASSAULT_BURST_SHOTS, ASSAULT_BURST_GAP_MS) {
        return;
    }
    let origin = ctx.center();
    spawns.push(enemy_shot(
        origin,
        Size::new(BLASTER_WIDTH, BLASTER_HEIGHT),
        Velocity::from_angle(origin.angle_to(&target), BLASTER_SPEED),
        BLASTER_DAMAGE,
        Some(BLASTER_LIFETIME_MS),
        ProjectileKind::Straight { spin: 0.0 },
    ));
    if burst.shots_left == 0 {
        burst.cooldown_ms =
            ASSAULT_BURST_COOLDOWN_MS + rng.gen::<f64>() * ASSAULT_BURST_COOLDOWN_JITTER_MS;
    }
}

fn tank_attack(
    ctx: &EnemyContext,
    state: &mut AiState,
    rng: &mut dyn RngCore,
    spawns: &mut Vec<ProjectileSpawn>,
) {
    let AiState::Tank(burst) = state else {
        return;
    };
    let Some(target) = ctx.target_center() else {
        return;
    };
    if !run_burst(burst, ctx.dt_ms, TANK_VOLLEYS, TANK_VOLLEY_GAP_MS) {
        return;
    }

    let origin = ctx.center();
    let aim = origin.angle_to(&target);
    let flank = |offset: f64| {
        let a = aim + offset;
        target.offset(a.cos() * TANK_FLANK_DISTANCE, a.sin() * TANK_FLANK_DISTANCE)
    };
    let points = [
        target,
        target,
        flank(TANK_FLANK_ANGLE),
        flank(-TANK_FLANK_ANGLE),
    ];
    for point in points {
        spawns.push(grenade(origin, point));
    }

    if burst.shots_left == 0 {
        burst.cooldown_ms =
            TANK_BURST_COOLDOWN_MS + rng.gen::<f64>() * TANK_BURST_COOLDOWN_JITTER_MS;
    }
}

fn laser_attack(
    ctx: &EnemyContext,
    state: &mut AiState,
    _rng: &mut dyn RngCore,
    spawns: &mut Vec<ProjectileSpawn>,
) {
    let AiState::Laser(laser) = state else {
        return;
    };
    match laser.phase {
        LaserPhase::Charging => {
            laser.charge_ms -= ctx.dt_ms;
            if laser.charge_ms <= 0.0 {
                laser.phase = LaserPhase::Firing;
                laser.timer_ms = LASER_BEAM_MS;
                spawns.push(enemy_beam(ctx, laser.angle));
            }
        }
        LaserPhase::Firing => {
            laser.timer_ms -= ctx.dt_ms;
            if laser.timer_ms <= 0.0 {
                laser.phase = LaserPhase::Retreating;
                laser.retreat_target = Some(retreat_point(ctx));
            }
        }
        _ => {}
    }
}

/// Point offset perpendicular to the line toward the player.
fn retreat_point(ctx: &EnemyContext) -> Position {
    let center = ctx.center();
    let to_player = ctx
        .target_center()
        .map(|t| t.as_vec() - center.as_vec())
        .unwrap_or(DVec2::Y);
    let perp = to_player.normalize_or_zero().perp();
    let perp = if perp == DVec2::ZERO { DVec2::X } else { perp };
    let goal = ctx.body.position.as_vec() + perp * LASER_RETREAT_DISTANCE;
    ctx.playfield.clamp(goal.into(), ctx.body.size)
}

fn boss_attack(
    ctx: &EnemyContext,
    state: &mut AiState,
    rng: &mut dyn RngCore,
    spawns: &mut Vec<ProjectileSpawn>,
) {
    let AiState::Boss(boss) = state else {
        return;
    };
    if !boss.entered {
        return;
    }
    let Some(target) = ctx.target_center() else {
        return;
    };

    if boss.gun_remaining_ms > 0.0 {
        boss.gun_remaining_ms -= ctx.dt_ms;
        if rng.gen_bool((BOSS_GUN_FIRE_CHANCE * ctx.frame_scale()).clamp(0.0, 1.0)) {
            gun_pair(ctx, target, spawns);
        }
    }

    boss.attack_cooldown_ms -= ctx.dt_ms;
    if boss.attack_cooldown_ms > 0.0 {
        return;
    }
    boss.attack_cooldown_ms = BOSS_ATTACK_COOLDOWN_MS;

    let attack = match rng.gen_range(0..3) {
        0 => BossAttack::OrbRing,
        1 => BossAttack::ChargedOrb,
        _ => BossAttack::GunSpray,
    };
    launch_boss_attack(ctx, boss, attack, rng, spawns);
}

/// Start one boss attack pattern.
pub fn launch_boss_attack(
    ctx: &EnemyContext,
    boss: &mut BossState,
    attack: BossAttack,
    rng: &mut dyn RngCore,
    spawns: &mut Vec<ProjectileSpawn>,
) {
    boss.last_attack = Some(attack);
    let center = ctx.center();
    match attack {
        BossAttack::OrbRing => {
            for i in 0..BOSS_ORB_COUNT {
                let angle = i as f64 / BOSS_ORB_COUNT as f64 * TAU;
                let origin = center.offset(
                    angle.cos() * BOSS_ORB_RING_RADIUS,
                    angle.sin() * BOSS_ORB_RING_RADIUS,
                );
                spawns.push(enemy_shot(
                    origin,
                    Size::square(BOSS_ORB_SIZE),
                    Velocity::from_angle(angle, BOSS_ORB_SPEED),
                    BOSS_ORB_DAMAGE,
                    Some(BOSS_ORB_LIFETIME_MS),
                    ProjectileKind::Straight {
                        spin: rng.gen_range(BOSS_ORB_MIN_SPIN..=BOSS_ORB_MAX_SPIN),
                    },
                ));
            }
        }
        BossAttack::ChargedOrb => {
            let origin = Position::new(center.x, ctx.body.position.y + ctx.body.size.height);
            let target = ctx.target_center().unwrap_or(origin.offset(0.0, 1.0));
            spawns.push(enemy_shot(
                origin,
                Size::square(BOSS_CHARGE_START_RADIUS * 2.0),
                Velocity::default(),
                BOSS_CHARGE_DAMAGE,
                Some(BOSS_CHARGE_LIFETIME_MS),
                ProjectileKind::Charged {
                    charge_remaining_ms: BOSS_CHARGE_MS,
                    radius: BOSS_CHARGE_START_RADIUS,
                    max_radius: BOSS_CHARGE_RADIUS,
                    speed: BOSS_CHARGE_SPEED,
                    target,
                },
            ));
        }
        BossAttack::GunSpray => {
            boss.gun_remaining_ms = BOSS_GUN_MS;
        }
    }
}

fn gun_pair(ctx: &EnemyContext, target: Position, spawns: &mut Vec<ProjectileSpawn>) {
    let bottom = ctx.body.position.y + ctx.body.size.height;
    for fraction in [0.3, 0.7] {
        let origin = Position::new(ctx.body.position.x + ctx.body.size.width * fraction, bottom);
        spawns.push(enemy_shot(
            origin,
            Size::new(BOSS_GUN_WIDTH, BOSS_GUN_HEIGHT),
            Velocity::from_angle(origin.angle_to(&target), BOSS_GUN_SPEED),
            BOSS_GUN_DAMAGE,
            Some(BOSS_GUN_LIFETIME_MS),
            ProjectileKind::Straight { spin: 0.0 },
        ));
    }
}

// --- Projectile builders ---

fn enemy_shot(
    center: Position,
    size: Size,
    velocity: Velocity,
    damage: f64,
    lifetime_ms: Option<f64>,
    kind: ProjectileKind,
) -> ProjectileSpawn {
    let rect = Rect::centered(center, size);
    ProjectileSpawn {
        body: Body {
            position: Position::new(rect.x, rect.y),
            size,
            angle: velocity.heading() + FRAC_PI_2,
        },
        velocity,
        projectile: Projectile {
            owner: Owner::Enemy,
            damage,
            destroyed: false,
            lifetime_ms,
            kind,
        },
        anchored: false,
    }
}

fn grenade(origin: Position, target: Position) -> ProjectileSpawn {
    enemy_shot(
        origin,
        Size::square(GRENADE_SIZE),
        Velocity::from_angle(origin.angle_to(&target), GRENADE_SPEED),
        GRENADE_DAMAGE,
        Some(GRENADE_LIFETIME_MS),
        ProjectileKind::Grenade {
            target,
            blast_radius: GRENADE_RADIUS,
            detonated: false,
            resolved: false,
            explosion_remaining_ms: GRENADE_EXPLOSION_MS,
        },
    )
}

/// Beam from the enemy's centre along `angle`, long enough to cross the screen.
fn enemy_beam(ctx: &EnemyContext, angle: f64) -> ProjectileSpawn {
    let origin = ctx.center();
    ProjectileSpawn {
        body: Body {
            position: origin,
            size: Size::square(LASER_BEAM_WIDTH),
            angle,
        },
        velocity: Velocity::default(),
        projectile: Projectile {
            owner: Owner::Enemy,
            damage: LASER_BEAM_DAMAGE,
            destroyed: false,
            lifetime_ms: None,
            kind: ProjectileKind::Beam {
                angle,
                width: LASER_BEAM_WIDTH,
                length: ctx.playfield.width + ctx.playfield.height,
                remaining_ms: LASER_BEAM_MS,
                hit_interval_ms: REFERENCE_FRAME_MS,
                hit_timer_ms: 0.0,
            },
        },
        anchored: true,
    }
}
