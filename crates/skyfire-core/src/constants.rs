//! Simulation constants and tuning parameters.
//!
//! Speeds are in pixels per reference frame, timers in milliseconds.

/// Duration of one reference frame (60 Hz) in milliseconds.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest delta time a single update may advance.
pub const MAX_DELTA_MS: f64 = 100.0;

// --- Playfield ---

pub const PLAYFIELD_WIDTH: f64 = 800.0;
pub const PLAYFIELD_HEIGHT: f64 = 900.0;

// --- Animation ---

/// Interval between alive animation frames.
pub const ANIMATION_FRAME_MS: f64 = 100.0;

/// Interval between destruction animation frames.
pub const DESTRUCTION_FRAME_MS: f64 = 75.0;

/// Number of frames in the destruction animation.
pub const DESTRUCTION_FRAME_COUNT: u32 = 9;

/// Fallback sprite edge length when no sheet is loaded for a key.
pub const DEFAULT_FRAME_SIZE: f64 = 32.0;

// --- Player ---

pub const PLAYER_SCALE: f64 = 2.0;
pub const PLAYER_SHOT_COOLDOWN_MS: f64 = 200.0;
pub const PLAYER_SHOT_WIDTH: f64 = 4.0;
pub const PLAYER_SHOT_HEIGHT: f64 = 16.0;
/// Floor for the shot cooldown after upgrades and power-ups.
pub const MIN_SHOT_COOLDOWN_MS: f64 = 50.0;
/// Facing tilt per unit of horizontal input.
pub const PLAYER_TILT_FACTOR: f64 = 0.4;
/// Distance from the bottom edge at which the player spawns.
pub const PLAYER_SPAWN_MARGIN: f64 = 120.0;

pub const ASSAULT_SHIP_HP: f64 = 100.0;
pub const ASSAULT_SHIP_SPEED: f64 = 7.0;
pub const ASSAULT_SHIP_DAMAGE: f64 = 10.0;
pub const ASSAULT_SHIP_PROJECTILE_SPEED: f64 = 15.0;

pub const LASER_SHIP_HP: f64 = 80.0;
pub const LASER_SHIP_SPEED: f64 = 9.0;
pub const LASER_SHIP_DAMAGE: f64 = 8.0;
pub const LASER_SHIP_PROJECTILE_SPEED: f64 = 20.0;

pub const TANK_SHIP_HP: f64 = 150.0;
pub const TANK_SHIP_SPEED: f64 = 5.0;
pub const TANK_SHIP_DAMAGE: f64 = 15.0;
pub const TANK_SHIP_PROJECTILE_SPEED: f64 = 12.0;

// --- Collision ---

/// Damage the player takes from touching an enemy.
pub const CONTACT_DAMAGE: f64 = 20.0;

// --- Enemies ---

/// Enemies below this many playfield heights above the top are culled.
pub const ENEMY_CULL_ABOVE_FACTOR: f64 = 2.0;
/// Enemies spawn with their top edge this far above the playfield.
pub const ENEMY_SPAWN_OFFSET: f64 = 60.0;

pub const KAMIKAZE_HP: f64 = 20.0;
pub const KAMIKAZE_SPEED: f64 = 4.0;
pub const KAMIKAZE_SCALE: f64 = 2.0;
pub const KAMIKAZE_SCORE: u64 = 10;
pub const KAMIKAZE_BLAST_RADIUS: f64 = 100.0;
pub const KAMIKAZE_BLAST_DAMAGE: f64 = 30.0;
pub const KAMIKAZE_BLAST_MS: f64 = 800.0;

pub const ASSAULT_HP: f64 = 30.0;
pub const ASSAULT_SPEED: f64 = 2.5;
pub const ASSAULT_SCALE: f64 = 2.0;
pub const ASSAULT_SCORE: u64 = 40;
pub const ASSAULT_STANDOFF: f64 = 150.0;
pub const ASSAULT_BURST_SHOTS: u32 = 3;
pub const ASSAULT_BURST_GAP_MS: f64 = 150.0;
pub const ASSAULT_INITIAL_COOLDOWN_MS: f64 = 2000.0;
pub const ASSAULT_BURST_COOLDOWN_MS: f64 = 2000.0;
pub const ASSAULT_BURST_COOLDOWN_JITTER_MS: f64 = 1000.0;
pub const BLASTER_SPEED: f64 = 6.0;
pub const BLASTER_WIDTH: f64 = 30.0;
pub const BLASTER_HEIGHT: f64 = 5.0;
pub const BLASTER_DAMAGE: f64 = 5.0;
pub const BLASTER_LIFETIME_MS: f64 = 2000.0;

pub const TANK_HP: f64 = 300.0;
pub const TANK_SPEED: f64 = 1.2;
pub const TANK_SCALE: f64 = 2.5;
pub const TANK_SCORE: u64 = 300;
pub const TANK_STANDOFF: f64 = 80.0;
pub const TANK_BLAST_RADIUS: f64 = 150.0;
pub const TANK_BLAST_DAMAGE: f64 = 50.0;
pub const TANK_BLAST_MS: f64 = 300.0;
pub const TANK_INITIAL_COOLDOWN_MS: f64 = 2000.0;
pub const TANK_VOLLEYS: u32 = 4;
pub const TANK_VOLLEY_GAP_MS: f64 = 200.0;
pub const TANK_BURST_COOLDOWN_MS: f64 = 3000.0;
pub const TANK_BURST_COOLDOWN_JITTER_MS: f64 = 2000.0;
/// Angular spread of the flanking grenades in a volley.
pub const TANK_FLANK_ANGLE: f64 = std::f64::consts::PI / 8.0;
pub const TANK_FLANK_DISTANCE: f64 = 50.0;
pub const GRENADE_SPEED: f64 = 3.0;
pub const GRENADE_DAMAGE: f64 = 30.0;
pub const GRENADE_RADIUS: f64 = 50.0;
pub const GRENADE_SIZE: f64 = 12.0;
pub const GRENADE_EXPLOSION_MS: f64 = 500.0;
pub const GRENADE_LIFETIME_MS: f64 = 6000.0;

pub const LASER_HP: f64 = 200.0;
pub const LASER_SPEED: f64 = 1.5;
pub const LASER_SCALE: f64 = 2.5;
pub const LASER_SCORE: u64 = 250;
pub const LASER_TARGET_Y: f64 = 120.0;
pub const LASER_BEAM_MS: f64 = 1500.0;
pub const LASER_COOLDOWN_MS: f64 = 2000.0;
pub const LASER_BEAM_WIDTH: f64 = 20.0;
pub const LASER_CHARGE_MS: f64 = 800.0;
pub const LASER_RETREAT_DISTANCE: f64 = 120.0;
pub const LASER_RETREAT_SPEED: f64 = 1.5;
/// Retreat ends once the enemy is this close to its retreat point.
pub const LASER_RETREAT_ARRIVAL: f64 = 2.0;
/// Enemy beam damage per reference frame of contact.
pub const LASER_BEAM_DAMAGE: f64 = 1.0;

pub const BOSS_HP: f64 = 1200.0;
pub const BOSS_SPEED: f64 = 1.2;
pub const BOSS_SCALE: f64 = 4.0;
pub const BOSS_SCORE: u64 = 5000;
pub const BOSS_ENTRY_SPEED: f64 = 0.5;
pub const BOSS_TARGET_Y: f64 = 50.0;
pub const BOSS_ROAM_MIN_SPEED: f64 = 1.0;
pub const BOSS_ROAM_MAX_SPEED: f64 = 3.0;
/// Chance per reference frame that the boss picks a new roaming direction.
pub const BOSS_TURN_CHANCE: f64 = 0.02;
pub const BOSS_ATTACK_COOLDOWN_MS: f64 = 2500.0;
pub const BOSS_ORB_COUNT: u32 = 16;
pub const BOSS_ORB_RING_RADIUS: f64 = 40.0;
pub const BOSS_ORB_SIZE: f64 = 18.0;
pub const BOSS_ORB_DAMAGE: f64 = 20.0;
pub const BOSS_ORB_SPEED: f64 = 3.0;
pub const BOSS_ORB_MIN_SPIN: f64 = 0.3;
pub const BOSS_ORB_MAX_SPIN: f64 = 0.7;
pub const BOSS_ORB_LIFETIME_MS: f64 = 6000.0;
pub const BOSS_CHARGE_MS: f64 = 1200.0;
pub const BOSS_CHARGE_START_RADIUS: f64 = 4.0;
pub const BOSS_CHARGE_RADIUS: f64 = 20.0;
pub const BOSS_CHARGE_DAMAGE: f64 = 40.0;
pub const BOSS_CHARGE_SPEED: f64 = 1.5;
pub const BOSS_CHARGE_LIFETIME_MS: f64 = 10_000.0;
pub const BOSS_GUN_MS: f64 = 3000.0;
/// Chance per reference frame that the gun spray fires a pair.
pub const BOSS_GUN_FIRE_CHANCE: f64 = 0.3;
pub const BOSS_GUN_WIDTH: f64 = 6.0;
pub const BOSS_GUN_HEIGHT: f64 = 16.0;
pub const BOSS_GUN_DAMAGE: f64 = 8.0;
pub const BOSS_GUN_SPEED: f64 = 6.0;
pub const BOSS_GUN_LIFETIME_MS: f64 = 4000.0;
pub const BOSS_SHIELD_THRESHOLD: f64 = 80.0;
pub const BOSS_SHIELD_MS: f64 = 3000.0;
pub const BOSS_SHIELD_HEALTH: f64 = 150.0;
pub const BOSS_SHIELD_COOLDOWN_MS: f64 = 5000.0;
/// Window over which boss damage counts as recent.
pub const BOSS_DAMAGE_WINDOW_MS: f64 = 3000.0;

// --- Projectiles ---

/// Homing turn limit per reference frame (radians).
pub const HOMING_TURN_RATE: f64 = 0.05;
pub const HOMING_LIFETIME_MS: f64 = 5000.0;

// --- Waves ---

pub const ENEMIES_PER_WAVE: u32 = 5;
pub const WAVES_PER_LEVEL: u32 = 5;
/// First level at which wave sizes grow.
pub const WAVE_STEP_START_LEVEL: u32 = 4;
pub const ENEMIES_PER_WAVE_STEP: u32 = 1;
pub const WAVES_PER_LEVEL_STEP: u32 = 1;
/// Interval between draining spawn tokens from the wave queue.
pub const SPAWN_INTERVAL_MS: f64 = 1000.0;
/// Spawn weight increase per level.
pub const SPAWN_WEIGHT_STEP: f64 = 0.02;
pub const KAMIKAZE_WEIGHT: f64 = 0.5;
pub const ASSAULT_WEIGHT: f64 = 0.3;
pub const TANK_WEIGHT: f64 = 0.1;
pub const LASER_WEIGHT: f64 = 0.1;
/// Non-boss effectiveness at level 1.
pub const DIFFICULTY_RAMP_START: f64 = 0.7;
/// Level at which non-boss enemies reach full effectiveness.
pub const DIFFICULTY_RAMP_FULL_LEVEL: u32 = 5;

// --- Power-ups ---

pub const POWER_UP_SIZE: f64 = 60.0;
pub const POWER_UP_FALL_SPEED: f64 = 1.0;
pub const POWER_UP_DURATION_MS: f64 = 10_000.0;
pub const COMMON_WEIGHT: f64 = 0.6;
pub const RARE_WEIGHT: f64 = 0.3;
pub const EPIC_WEIGHT: f64 = 0.1;
pub const COMMON_INTERVAL_MS: (f64, f64) = (8000.0, 12_000.0);
pub const RARE_INTERVAL_MS: (f64, f64) = (12_000.0, 18_000.0);
pub const EPIC_INTERVAL_MS: (f64, f64) = (18_000.0, 26_000.0);
pub const SPEED_BOOST_AMOUNT: f64 = 1.0;
pub const FIRE_RATE_BOOST_MS: f64 = 50.0;
pub const SHIELD_POWER_UP_HEALTH: f64 = 100.0;
pub const HEAL_AMOUNT: f64 = 20.0;
pub const TANK_MODE_DAMAGE_FACTOR: f64 = 1.5;
pub const TANK_MODE_SPEED_FACTOR: f64 = 0.7;
pub const BOOST_SPREAD_ANGLE: f64 = 0.2;
pub const PLAYER_BEAM_WIDTH: f64 = 40.0;
pub const PLAYER_BEAM_HIT_INTERVAL_MS: f64 = 100.0;
/// Player beam damage per hit as a multiple of bullet damage.
pub const PLAYER_BEAM_DAMAGE_FACTOR: f64 = 0.5;
/// Power-up magnitude growth per level.
pub const POWER_UP_LEVEL_STEP: f64 = 0.1;

// --- Upgrades ---

pub const UPGRADE_CHOICES: usize = 3;
pub const UPGRADE_HP: f64 = 20.0;
pub const UPGRADE_SPEED: f64 = 0.5;
pub const UPGRADE_DAMAGE: f64 = 2.0;
pub const UPGRADE_FIRE_RATE_MS: f64 = 15.0;
pub const UPGRADE_PROJECTILE_SPEED: f64 = 1.5;
/// Upgrade magnitude growth per level.
pub const UPGRADE_LEVEL_STEP: f64 = 0.25;

// --- Session ---

/// Countdown before the next hot-seat player takes over.
pub const SWITCH_PLAYER_MS: f64 = 3000.0;

// --- Background ---

pub const STAR_COUNT: usize = 200;
pub const STAR_MIN_SIZE: f64 = 1.0;
pub const STAR_MAX_SIZE: f64 = 3.0;
pub const STAR_MIN_SPEED: f64 = 0.2;
pub const STAR_MAX_SPEED: f64 = 0.7;
