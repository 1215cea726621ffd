//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the player and the level
//! progression. It processes host commands, runs all systems in order each
//! update, and produces `GameStateSnapshot`s. Completely headless; the same
//! seed and the same inputs give the same session.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, trace, warn};

use skyfire_core::commands::PlayerCommand;
use skyfire_core::components::{ProjectileSpawn, ShipStats, Star};
use skyfire_core::config::GameConfig;
use skyfire_core::enums::{Action, EnemyArchetype, GamePhase, Lifecycle, ShipType};
use skyfire_core::error::SimResult;
use skyfire_core::events::GameEvent;
use skyfire_core::state::{GameStateSnapshot, PlayerResult, SessionStats, UpgradeOption};
use skyfire_core::types::{Playfield, SimClock};
use skyfire_enemy_ai::profiles::get_profile;

use crate::assets::{AssetCatalog, SpriteSheet};
use crate::input::InputProvider;
use crate::player::Player;
use crate::power_ups::PowerUpScheduler;
use crate::progression::{Progression, WaveCheck};
use crate::systems;
use crate::systems::collision::{CollisionContext, CollisionReport};
use crate::upgrades;
use crate::world_setup;

/// One hot-seat participant.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    pub ship: ShipType,
}

impl SeatConfig {
    pub fn new(name: impl Into<String>, ship: ShipType) -> Self {
        Self {
            name: name.into(),
            ship,
        }
    }
}

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub game: GameConfig,
    /// Players in turn order. More than one enables hot-seat play.
    pub players: Vec<SeatConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
            players: vec![SeatConfig::new("Player 1", ShipType::default())],
        }
    }
}

#[derive(Debug, Clone)]
struct Seat {
    name: String,
    ship: ShipType,
    score: u64,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: GameConfig,
    playfield: Playfield,
    clock: SimClock,
    phase: GamePhase,
    running: bool,
    paused: bool,
    /// Drop the next delta (the first one after a resume).
    skip_next_delta: bool,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    spawn_buffer: Vec<(ProjectileSpawn, Entity)>,
    events: Vec<GameEvent>,
    assets: AssetCatalog,

    // --- Player and session ---
    player: Player,
    seats: Vec<Seat>,
    active_seat: usize,
    taken_upgrades: Vec<UpgradeOption>,
    upgrade_options: Vec<UpgradeOption>,
    switch_countdown_ms: f64,
    stats: SessionStats,
    failure: Option<String>,

    // --- Progression ---
    progression: Progression,
    power_up_scheduler: PowerUpScheduler,
    stars: Vec<Star>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config. The engine
    /// starts in `Loading` until assets are supplied.
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let playfield = Playfield::new(config.game.playfield.width, config.game.playfield.height);

        let mut seats: Vec<Seat> = config
            .players
            .into_iter()
            .map(|seat| Seat {
                name: seat.name,
                ship: seat.ship,
                score: 0,
            })
            .collect();
        if seats.is_empty() {
            seats.push(Seat {
                name: "Player 1".to_string(),
                ship: ShipType::default(),
                score: 0,
            });
        }

        let stars = world_setup::make_stars(&mut rng, playfield);
        let power_up_scheduler = PowerUpScheduler::new(&config.game.power_ups, &mut rng);
        let player = Player::new(seats[0].ship, SpriteSheet::default(), playfield);

        Self {
            world: World::new(),
            config: config.game,
            playfield,
            clock: SimClock::default(),
            phase: GamePhase::Loading,
            running: false,
            paused: false,
            skip_next_delta: false,
            rng,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            spawn_buffer: Vec::new(),
            events: Vec::new(),
            assets: AssetCatalog::new(),
            player,
            seats,
            active_seat: 0,
            taken_upgrades: Vec::new(),
            upgrade_options: Vec::new(),
            switch_countdown_ms: 0.0,
            stats: SessionStats::default(),
            failure: None,
            progression: Progression::default(),
            power_up_scheduler,
            stars,
        }
    }

    /// Accept the session's sprite metadata. A valid catalog opens the
    /// initial upgrade menu; an invalid one ends the session.
    pub fn load_assets(&mut self, assets: AssetCatalog) -> SimResult<()> {
        if self.phase != GamePhase::Loading {
            warn!(phase = ?self.phase, "assets already loaded, ignoring");
            return Ok(());
        }
        if let Err(err) = assets.validate() {
            error!(%err, "asset load failed, session cannot start");
            self.failure = Some(err.to_string());
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: 0 });
            return Err(err);
        }

        self.assets = assets;
        self.player = self.build_player(self.seats[self.active_seat].ship);
        self.upgrade_options = upgrades::generate_options(1, &mut self.rng);
        self.phase = GamePhase::InitialUpgrade;
        info!(players = self.seats.len(), "assets loaded, awaiting initial upgrade");
        Ok(())
    }

    /// Let `update` advance the simulation.
    pub fn start(&mut self) {
        self.running = true;
        self.paused = false;
    }

    /// Stop advancing. Nothing is in flight, so there is nothing to unwind.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Freeze all simulation time. Delta does not accumulate while paused.
    pub fn pause(&mut self) {
        if !self.paused {
            debug!("paused");
        }
        self.paused = true;
    }

    /// Unfreeze. The first delta after resuming is discarded.
    pub fn resume(&mut self) {
        if self.paused {
            debug!("resumed");
            self.skip_next_delta = true;
        }
        self.paused = false;
    }

    /// Queue a player command for processing at the next update.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt_ms` milliseconds of host time.
    pub fn update<I: InputProvider + ?Sized>(&mut self, dt_ms: f64, input: &mut I) {
        self.events.clear();

        if input.is_action_triggered_once(Action::Pause) && self.phase == GamePhase::Playing {
            if self.paused {
                self.resume();
            } else {
                self.pause();
            }
        }
        self.process_commands();

        if !self.running || self.paused {
            return;
        }
        let dt = self.effective_delta(dt_ms);
        if dt <= 0.0 {
            return;
        }

        match self.phase {
            GamePhase::Playing => {
                self.run_systems(dt, input);
                self.clock.advance(dt);
                self.stats.total_game_time_ms += dt;
            }
            GamePhase::SwitchingPlayer => {
                self.switch_countdown_ms -= dt;
                if self.switch_countdown_ms <= 0.0 {
                    self.finish_switch();
                }
            }
            _ => {}
        }
    }

    /// Build the read-only view of the current state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            clock: self.clock,
            phase: self.phase,
            paused: self.paused,
            level: self.progression.level,
            wave: self.progression.wave,
            total_waves: self.progression.total_waves,
            boss_active: self.progression.boss_active,
            active_player: self.active_seat,
            player: self.player.view(),
            enemies: systems::snapshot::build_enemies(&self.world),
            projectiles: systems::snapshot::build_projectiles(&self.world),
            power_ups: systems::snapshot::build_power_ups(&self.world),
            stars: self.stars.clone(),
            upgrade_options: self.upgrade_options.clone(),
            stats: self.stats,
            results: self.results(),
            switch_countdown_ms: if self.phase == GamePhase::SwitchingPlayer {
                self.switch_countdown_ms.max(0.0)
            } else {
                0.0
            },
            failure: self.failure.clone(),
            events: self.events.clone(),
        }
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the simulation clock.
    pub fn clock(&self) -> SimClock {
        self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn wave(&self) -> u32 {
        self.progression.wave
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Current ship statistics, for the upgrade menu.
    pub fn player_stats(&self) -> ShipStats {
        self.player.stats
    }

    /// Upgrades on offer in the current menu phase.
    pub fn upgrade_options(&self) -> &[UpgradeOption] {
        &self.upgrade_options
    }

    /// Running session statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Frozen statistics, available once the game is over.
    pub fn final_stats(&self) -> Option<SessionStats> {
        (self.phase == GamePhase::GameOver).then_some(self.stats)
    }

    /// Per-player scores in turn order.
    pub fn results(&self) -> Vec<PlayerResult> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, seat)| PlayerResult {
                name: seat.name.clone(),
                ship: seat.ship,
                score: if i == self.active_seat {
                    self.player.score
                } else {
                    seat.score
                },
            })
            .collect()
    }

    /// Events produced by the last update.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Test hooks ---

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[cfg(test)]
    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    /// Spawn an enemy at a fixed position with stats for the current level.
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        archetype: EnemyArchetype,
        position: skyfire_core::types::Position,
    ) -> Entity {
        world_setup::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            archetype,
            position,
            &self.assets,
            &self.config,
            self.progression.level.max(1),
        )
    }

    #[cfg(test)]
    pub fn spawn_test_projectile(&mut self, spawn: ProjectileSpawn) -> Entity {
        world_setup::spawn_projectile(&mut self.world, spawn, None)
    }

    #[cfg(test)]
    pub fn spawn_test_power_up(
        &mut self,
        kind: skyfire_core::enums::PowerUpKind,
        position: skyfire_core::types::Position,
    ) -> Entity {
        world_setup::spawn_power_up_at(&mut self.world, kind, position)
    }

    /// Run only the collision passes, as the update would at step 7.
    #[cfg(test)]
    pub fn resolve_collisions(&mut self) -> CollisionReport {
        let ctx = self.collision_context();
        let report = systems::collision::run(&mut self.world, &mut self.player, &ctx, &mut self.events);
        self.record(&report);
        report
    }

    /// Spawn the rest of the current wave at once and destroy every enemy.
    /// Returns the number of kills.
    #[cfg(test)]
    pub fn clear_wave(&mut self) -> u32 {
        while let Some(token) = self.progression.queue.pop_front() {
            if let Ok(archetype) = token.parse::<EnemyArchetype>() {
                self.spawn_enemy(archetype);
            }
        }
        let enemies: Vec<Entity> = self
            .world
            .query::<&skyfire_core::components::Enemy>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        let ctx = self.collision_context();
        let mut kills = 0;
        for entity in enemies {
            if let Some((outcome, _)) =
                systems::collision::damage_enemy(&mut self.world, entity, f64::MAX, ctx.overflow)
            {
                if outcome.killed() {
                    kills += 1;
                }
            }
        }
        kills
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::ChooseShip { ship } => {
                if matches!(self.phase, GamePhase::Loading | GamePhase::InitialUpgrade) {
                    self.seats[self.active_seat].ship = ship;
                    self.player = self.build_player(ship);
                    debug!(?ship, "ship chosen");
                } else {
                    warn!(phase = ?self.phase, "ship can only be chosen before play starts");
                }
            }
            PlayerCommand::SelectUpgrade { index } => {
                let next_level = match self.phase {
                    GamePhase::InitialUpgrade => 1,
                    GamePhase::UpgradeMenu => self.progression.level + 1,
                    phase => {
                        warn!(?phase, index, "no upgrade menu open");
                        return;
                    }
                };
                let Some(upgrade) = self.upgrade_options.get(index).cloned() else {
                    warn!(index, offered = self.upgrade_options.len(), "upgrade index out of range");
                    return;
                };
                self.player.apply_upgrade(&upgrade);
                debug!(kind = ?upgrade.kind, value = upgrade.value, "upgrade applied");
                self.events.push(GameEvent::UpgradeApplied {
                    kind: upgrade.kind,
                    value: upgrade.value,
                });
                self.taken_upgrades.push(upgrade);
                self.upgrade_options.clear();
                self.begin_level(next_level);
            }
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
        }
    }

    fn effective_delta(&mut self, dt_ms: f64) -> f64 {
        if self.skip_next_delta {
            self.skip_next_delta = false;
            return 0.0;
        }
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0.0;
        }
        dt_ms.min(self.config.timing.max_delta_ms)
    }

    /// Run all systems in order.
    fn run_systems<I: InputProvider + ?Sized>(&mut self, dt: f64, input: &I) {
        // 1. Background
        systems::background::run(&mut self.stars, self.playfield, dt, &mut self.rng);
        // 2. Player: input, timers, continuous fire
        self.player.handle_input(input, self.playfield, dt);
        self.player.tick(dt, &mut self.events);
        if self.player.wants_to_fire() {
            for spawn in self.player.shoot(self.clock.elapsed_ms) {
                world_setup::spawn_projectile(&mut self.world, spawn, None);
            }
        }
        systems::projectiles::sync_player_beam(&mut self.world, &self.player);
        // 3. Falling power-ups
        systems::power_ups::run(&mut self.world, self.playfield, dt, &mut self.despawn_buffer);
        // 4. Timed power-up spawn
        if let Some(kind) = self
            .power_up_scheduler
            .tick(&self.config.power_ups, dt, &mut self.rng)
        {
            world_setup::spawn_power_up(&mut self.world, &mut self.rng, kind, self.playfield);
            debug!(?kind, "power-up spawned");
            self.events.push(GameEvent::PowerUpSpawned { kind });
        }
        // 5. Wave spawn
        self.spawn_from_queue(dt);
        // 6. Enemies, then projectiles
        let target = self.player.is_alive().then_some(self.player.body);
        systems::enemy_ai::run(
            &mut self.world,
            target,
            self.playfield,
            dt,
            &mut self.rng,
            &mut self.spawn_buffer,
            &mut self.despawn_buffer,
        );
        for (spawn, owner) in self.spawn_buffer.drain(..) {
            world_setup::spawn_projectile(&mut self.world, spawn, Some(owner));
        }
        systems::lifecycle::run(&mut self.world, dt);
        systems::projectiles::run(&mut self.world, &self.player, self.playfield, dt);
        // 7. Collisions
        let ctx = self.collision_context();
        let report = systems::collision::run(&mut self.world, &mut self.player, &ctx, &mut self.events);
        self.record(&report);
        // 8. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 9. Wave completion and boss defeat
        self.check_progression();
        // 10. Player defeat
        self.check_player_defeat();

        trace!(
            tick = self.clock.tick,
            entities = self.world.len(),
            hp = self.player.health.hp,
            "update complete"
        );
    }

    fn collision_context(&self) -> CollisionContext {
        CollisionContext {
            level: self.progression.level.max(1),
            overflow: self.config.combat.shield_overflow,
            contact_damage: self.config.combat.contact_damage,
            power_up_duration_ms: self.config.power_ups.duration_ms,
        }
    }

    fn record(&mut self, report: &CollisionReport) {
        self.stats.score += report.score;
        self.stats.enemies_destroyed += report.kills.len() as u32;
        self.stats.power_ups_collected += report.collected.len() as u32;
    }

    fn build_player(&self, ship: ShipType) -> Player {
        let mut player = Player::new(ship, self.assets.sheet(ship.sprite_key()), self.playfield);
        for upgrade in &self.taken_upgrades {
            player.apply_upgrade(upgrade);
        }
        player
    }

    fn begin_level(&mut self, level: u32) {
        self.progression
            .start_level(&self.config.waves, level, &mut self.rng, &mut self.events);
        self.stats.level = self.progression.level;
        self.phase = GamePhase::Playing;
    }

    fn spawn_enemy(&mut self, archetype: EnemyArchetype) -> Entity {
        let sheet = self.assets.sheet(archetype.sprite_key());
        let size = sheet.scaled(get_profile(archetype).scale);
        let position =
            world_setup::enemy_spawn_position(&mut self.rng, archetype, size, self.playfield);
        let entity = world_setup::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            archetype,
            position,
            &self.assets,
            &self.config,
            self.progression.level,
        );
        debug!(%archetype, level = self.progression.level, "enemy spawned");
        self.events.push(GameEvent::EnemySpawned { archetype });
        entity
    }

    /// Drain one wave token if due. Unknown names are skipped, never fatal.
    fn spawn_from_queue(&mut self, dt: f64) {
        let Some(token) = self.progression.next_token(&self.config.waves, dt) else {
            return;
        };
        match token.parse::<EnemyArchetype>() {
            Ok(archetype) if !archetype.is_boss() => {
                self.spawn_enemy(archetype);
            }
            Ok(_) => {
                warn!(name = %token, "boss requested from a wave queue, skipping");
                self.events.push(GameEvent::SpawnSkipped { name: token });
            }
            Err(err) => {
                warn!(%err, "skipping spawn");
                self.events.push(GameEvent::SpawnSkipped { name: token });
            }
        }
    }

    fn check_progression(&mut self) {
        if self.progression.boss_active {
            if let Some(boss) = self.progression.boss {
                if !self.world.contains(boss) {
                    self.boss_defeated();
                }
            }
            return;
        }

        let remaining = systems::snapshot::enemy_count(&self.world);
        let check = self.progression.check_wave_completion(
            remaining,
            &self.config.waves,
            &mut self.rng,
            &mut self.events,
        );
        if check == WaveCheck::SpawnBoss {
            let boss = self.spawn_enemy(EnemyArchetype::Boss);
            self.progression.boss = Some(boss);
            info!(level = self.progression.level, "boss spawned");
            self.events.push(GameEvent::BossSpawned {
                level: self.progression.level,
            });
        }
    }

    fn boss_defeated(&mut self) {
        let level = self.progression.level;
        info!(level, score = self.stats.score, "boss defeated");
        self.events.push(GameEvent::BossDefeated { level });
        self.progression.boss_active = false;
        self.progression.boss = None;
        systems::cleanup::clear_projectiles(&mut self.world, &mut self.despawn_buffer);
        self.upgrade_options = upgrades::generate_options(level, &mut self.rng);
        self.phase = GamePhase::UpgradeMenu;
    }

    fn check_player_defeat(&mut self) {
        if self.player.health.state != Lifecycle::Dead {
            return;
        }
        let seat = self.active_seat;
        self.seats[seat].score = self.player.score;
        info!(player = seat, score = self.player.score, "player defeated");
        self.events.push(GameEvent::PlayerDefeated { player: seat });

        if seat + 1 < self.seats.len() {
            self.phase = GamePhase::SwitchingPlayer;
            self.switch_countdown_ms = self.config.session.switch_countdown_ms;
        } else {
            self.phase = GamePhase::GameOver;
            self.stats.level = self.progression.level;
            info!(score = self.stats.score, level = self.stats.level, "game over");
            self.events.push(GameEvent::GameOver {
                score: self.stats.score,
            });
        }
    }

    /// Hand the ship to the next player: full HP at the spawn point, score
    /// zero, permanent upgrades kept.
    fn finish_switch(&mut self) {
        self.active_seat += 1;
        let ship = self.seats[self.active_seat].ship;
        if ship == self.player.ship {
            self.player.reset(self.playfield);
        } else {
            self.player = self.build_player(ship);
        }
        systems::cleanup::clear_projectiles(&mut self.world, &mut self.despawn_buffer);
        self.switch_countdown_ms = 0.0;
        self.phase = GamePhase::Playing;
        info!(player = self.active_seat, name = %self.seats[self.active_seat].name, "player switched");
        self.events.push(GameEvent::PlayerSwitched {
            player: self.active_seat,
        });
    }
}
