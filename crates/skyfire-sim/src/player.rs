//! The player's ship.
//!
//! The player lives outside the ECS world: there is exactly one, and nearly
//! every system needs to read it. Enemies and projectiles only ever see a
//! copy of its `Body`.

use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use skyfire_core::combat::{self, DamageOutcome};
use skyfire_core::components::{
    Body, Destruction, Health, Projectile, ProjectileKind, ProjectileSpawn, Shield, ShipStats,
    SpriteAnimation,
};
use skyfire_core::constants::*;
use skyfire_core::enums::{Action, Lifecycle, Owner, PowerUpKind, ShieldOverflow, ShipType};
use skyfire_core::events::GameEvent;
use skyfire_core::state::{ActivePowerUpView, PlayerView, UpgradeOption};
use skyfire_core::types::{frame_scale, Playfield, Position, Rect, Size, Velocity};

use crate::assets::SpriteSheet;
use crate::input::InputProvider;
use crate::upgrades;

/// Base statistics of each ship before upgrades.
pub fn ship_stats(ship: ShipType) -> ShipStats {
    let (max_hp, speed, bullet_damage, projectile_speed) = match ship {
        ShipType::Assault => (
            ASSAULT_SHIP_HP,
            ASSAULT_SHIP_SPEED,
            ASSAULT_SHIP_DAMAGE,
            ASSAULT_SHIP_PROJECTILE_SPEED,
        ),
        ShipType::Laser => (
            LASER_SHIP_HP,
            LASER_SHIP_SPEED,
            LASER_SHIP_DAMAGE,
            LASER_SHIP_PROJECTILE_SPEED,
        ),
        ShipType::Tank => (
            TANK_SHIP_HP,
            TANK_SHIP_SPEED,
            TANK_SHIP_DAMAGE,
            TANK_SHIP_PROJECTILE_SPEED,
        ),
    };
    ShipStats {
        max_hp,
        speed,
        bullet_damage,
        shot_cooldown_ms: PLAYER_SHOT_COOLDOWN_MS,
        projectile_speed,
    }
}

/// Multiplier applied to power-up magnitudes at `level`.
pub fn power_up_scale(level: u32) -> f64 {
    1.0 + POWER_UP_LEVEL_STEP * level.saturating_sub(1) as f64
}

/// The single timed power-up slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
    /// Level multiplier captured at pickup.
    pub magnitude: f64,
}

/// Stats with `active` layered over `baseline`. Never compounds: the
/// result only depends on the baseline and the one active power-up.
pub fn effective_stats(baseline: ShipStats, active: Option<&ActivePowerUp>) -> ShipStats {
    let mut stats = baseline;
    let Some(active) = active else {
        return stats;
    };
    match active.kind {
        PowerUpKind::SpeedBoost => stats.speed += SPEED_BOOST_AMOUNT * active.magnitude,
        PowerUpKind::FireRateBoost => {
            stats.shot_cooldown_ms = (stats.shot_cooldown_ms
                - FIRE_RATE_BOOST_MS * active.magnitude)
                .max(MIN_SHOT_COOLDOWN_MS)
        }
        PowerUpKind::TankMode => {
            stats.bullet_damage *= TANK_MODE_DAMAGE_FACTOR * active.magnitude;
            stats.speed *= TANK_MODE_SPEED_FACTOR;
        }
        PowerUpKind::LaserMode | PowerUpKind::Boost => {}
        PowerUpKind::Shield | PowerUpKind::Heal => {}
    }
    stats
}

#[derive(Debug, Clone)]
pub struct Player {
    pub ship: ShipType,
    pub body: Body,
    pub health: Health,
    pub destruction: Destruction,
    pub animation: SpriteAnimation,
    pub shield: Shield,
    /// Ship stats plus permanent upgrades.
    pub baseline: ShipStats,
    /// Baseline with the active power-up applied.
    pub stats: ShipStats,
    pub active_power_up: Option<ActivePowerUp>,
    pub score: u64,
    firing: bool,
    last_shot_ms: Option<f64>,
}

impl Player {
    /// New ship centred near the bottom of the playfield.
    pub fn new(ship: ShipType, sheet: SpriteSheet, playfield: Playfield) -> Self {
        let baseline = ship_stats(ship);
        let size = sheet.scaled(PLAYER_SCALE);
        Self {
            ship,
            body: Body::new(spawn_position(size, playfield), size),
            health: combat::new_health(baseline.max_hp),
            destruction: combat::new_destruction(),
            animation: combat::new_sprite_animation(sheet.frame_count),
            shield: Shield::default(),
            baseline,
            stats: baseline,
            active_power_up: None,
            score: 0,
            firing: false,
            last_shot_ms: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health.state == Lifecycle::Alive
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn center(&self) -> Position {
        self.body.center()
    }

    pub fn wants_to_fire(&self) -> bool {
        self.firing && self.is_alive()
    }

    pub fn laser_mode(&self) -> bool {
        self.is_alive()
            && matches!(
                self.active_power_up,
                Some(ActivePowerUp {
                    kind: PowerUpKind::LaserMode,
                    ..
                })
            )
    }

    /// Read movement and fire intent, move, then clamp to the playfield.
    pub fn handle_input<I: InputProvider + ?Sized>(
        &mut self,
        input: &I,
        playfield: Playfield,
        dt_ms: f64,
    ) {
        if !self.is_alive() {
            self.firing = false;
            return;
        }

        let mut move_x = 0.0;
        if let Some(pointer) = input.pointer_position() {
            let target = Position::new(
                pointer.x - self.body.size.width / 2.0,
                pointer.y - self.body.size.height / 2.0,
            );
            // Touch flight keeps the ship level.
            self.body.position = target;
            self.firing = true;
        } else {
            let axis = |neg: Action, pos: Action| {
                let mut value: f64 = 0.0;
                if input.is_action_active(neg) {
                    value -= 1.0;
                }
                if input.is_action_active(pos) {
                    value += 1.0;
                }
                value
            };
            let dx = axis(Action::MoveLeft, Action::MoveRight);
            let dy = axis(Action::MoveUp, Action::MoveDown);
            let length = dx.hypot(dy);
            if length > 0.0 {
                let step = self.stats.speed * frame_scale(dt_ms);
                move_x = dx / length;
                self.body.position = self
                    .body
                    .position
                    .offset(move_x * step, dy / length * step);
            }
            self.firing = input.is_action_active(Action::Fire);
        }

        self.body.angle = move_x * PLAYER_TILT_FACTOR;
        self.body.position = playfield.clamp(self.body.position, self.body.size);
    }

    /// Fire if the cooldown has elapsed on the simulation clock.
    pub fn shoot(&mut self, now_ms: f64) -> Vec<ProjectileSpawn> {
        if !self.is_alive() || self.laser_mode() {
            return Vec::new();
        }
        if let Some(last) = self.last_shot_ms {
            if now_ms - last < self.stats.shot_cooldown_ms {
                return Vec::new();
            }
        }
        self.last_shot_ms = Some(now_ms);

        let rect = self.rect();
        let muzzle = Position::new(rect.center().x, rect.y);
        let boosted = matches!(
            self.active_power_up,
            Some(ActivePowerUp {
                kind: PowerUpKind::Boost,
                ..
            })
        );

        if boosted {
            [-BOOST_SPREAD_ANGLE, 0.0, BOOST_SPREAD_ANGLE]
                .into_iter()
                .map(|spread| {
                    let heading = -FRAC_PI_2 + spread;
                    self.shot(
                        muzzle,
                        heading,
                        Some(HOMING_LIFETIME_MS),
                        ProjectileKind::Homing {
                            speed: self.stats.projectile_speed,
                            turn_rate: HOMING_TURN_RATE,
                        },
                    )
                })
                .collect()
        } else {
            vec![self.shot(
                muzzle,
                -FRAC_PI_2,
                None,
                ProjectileKind::Straight { spin: 0.0 },
            )]
        }
    }

    fn shot(
        &self,
        muzzle: Position,
        heading: f64,
        lifetime_ms: Option<f64>,
        kind: ProjectileKind,
    ) -> ProjectileSpawn {
        let size = Size::new(PLAYER_SHOT_WIDTH, PLAYER_SHOT_HEIGHT);
        ProjectileSpawn {
            body: Body {
                position: Position::new(muzzle.x - size.width / 2.0, muzzle.y - size.height),
                size,
                angle: heading + FRAC_PI_2,
            },
            velocity: Velocity::from_angle(heading, self.stats.projectile_speed),
            projectile: Projectile {
                owner: Owner::Player,
                damage: self.stats.bullet_damage,
                destroyed: false,
                lifetime_ms,
                kind,
            },
            anchored: false,
        }
    }

    /// The laser-mode beam, from the ship's nose to the top of the screen.
    pub fn beam_spawn(&self) -> ProjectileSpawn {
        let origin = self.beam_origin();
        let remaining_ms = self.active_power_up.map_or(0.0, |p| p.remaining_ms);
        ProjectileSpawn {
            body: Body {
                position: origin,
                size: Size::new(PLAYER_BEAM_WIDTH, origin.y.max(0.0)),
                angle: -FRAC_PI_2,
            },
            velocity: Velocity::default(),
            projectile: Projectile {
                owner: Owner::Player,
                damage: self.stats.bullet_damage * PLAYER_BEAM_DAMAGE_FACTOR,
                destroyed: false,
                lifetime_ms: None,
                kind: ProjectileKind::Beam {
                    angle: -FRAC_PI_2,
                    width: PLAYER_BEAM_WIDTH,
                    length: origin.y.max(0.0),
                    remaining_ms,
                    hit_interval_ms: PLAYER_BEAM_HIT_INTERVAL_MS,
                    // First contact lands immediately.
                    hit_timer_ms: PLAYER_BEAM_HIT_INTERVAL_MS,
                },
            },
            anchored: true,
        }
    }

    pub fn beam_origin(&self) -> Position {
        let rect = self.rect();
        Position::new(rect.center().x, rect.y)
    }

    pub fn take_damage(&mut self, amount: f64, overflow: ShieldOverflow) -> DamageOutcome {
        combat::take_damage(
            &mut self.health,
            &mut self.destruction,
            Some(&mut self.shield),
            amount,
            overflow,
        )
    }

    /// Advance animations, the shield, and the timed power-up.
    pub fn tick(&mut self, dt_ms: f64, events: &mut Vec<GameEvent>) {
        match self.health.state {
            Lifecycle::Alive => combat::advance_sprite(&mut self.animation, dt_ms),
            Lifecycle::Dying => {
                combat::advance_destruction(&mut self.health, &mut self.destruction, dt_ms);
            }
            Lifecycle::Dead => {}
        }
        combat::tick_shield(&mut self.shield, dt_ms);

        if let Some(active) = self.active_power_up.as_mut() {
            active.remaining_ms -= dt_ms;
            if active.remaining_ms <= 0.0 {
                let kind = active.kind;
                self.revert_power_up();
                debug!(?kind, "power-up expired");
                events.push(GameEvent::PowerUpExpired { kind });
            }
        }
    }

    /// Apply a collected power-up. Timed kinds replace whatever was active.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, level: u32, duration_ms: f64) {
        let magnitude = power_up_scale(level);
        match kind {
            PowerUpKind::Heal => combat::heal(&mut self.health, HEAL_AMOUNT * magnitude),
            PowerUpKind::Shield => {
                combat::activate_shield(&mut self.shield, SHIELD_POWER_UP_HEALTH * magnitude)
            }
            timed => {
                self.revert_power_up();
                self.active_power_up = Some(ActivePowerUp {
                    kind: timed,
                    remaining_ms: duration_ms,
                    magnitude,
                });
                self.stats = effective_stats(self.baseline, self.active_power_up.as_ref());
            }
        }
        debug!(?kind, level, "power-up applied");
    }

    pub fn revert_power_up(&mut self) {
        self.active_power_up = None;
        self.stats = self.baseline;
    }

    /// Take a permanent upgrade. HP upgrades also restore the added amount.
    pub fn apply_upgrade(&mut self, upgrade: &UpgradeOption) {
        self.baseline = upgrades::apply(self.baseline, upgrade);
        self.stats = effective_stats(self.baseline, self.active_power_up.as_ref());
        let gained = self.baseline.max_hp - self.health.max_hp;
        self.health.max_hp = self.baseline.max_hp;
        if gained > 0.0 {
            combat::heal(&mut self.health, gained);
        }
    }

    /// Fresh turn: full HP at the spawn point, no score. Upgrades stay.
    pub fn reset(&mut self, playfield: Playfield) {
        self.revert_power_up();
        self.health = combat::new_health(self.baseline.max_hp);
        self.destruction = combat::new_destruction();
        self.shield = Shield::default();
        self.body = Body::new(spawn_position(self.body.size, playfield), self.body.size);
        self.score = 0;
        self.firing = false;
        self.last_shot_ms = None;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            ship: self.ship,
            position: self.body.position,
            size: self.body.size,
            angle: self.body.angle,
            state: self.health.state,
            frame: match self.health.state {
                Lifecycle::Alive => self.animation.frame,
                _ => self.destruction.frame,
            },
            hp: self.health.hp,
            max_hp: self.health.max_hp,
            shield_active: self.shield.active,
            shield_hp: self.shield.health,
            active_power_up: self.active_power_up.map(|p| ActivePowerUpView {
                kind: p.kind,
                remaining_ms: p.remaining_ms,
            }),
            stats: self.stats,
        }
    }
}

fn spawn_position(size: Size, playfield: Playfield) -> Position {
    playfield.clamp(
        Position::new(
            (playfield.width - size.width) / 2.0,
            playfield.height - size.height - PLAYER_SPAWN_MARGIN,
        ),
        size,
    )
}
