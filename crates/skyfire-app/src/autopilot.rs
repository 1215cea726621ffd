//! Built-in autopilot for headless runs.
//!
//! Fires constantly, lines up under the lowest enemy, sidesteps enemy shots
//! that are about to land, and takes upgrades by a fixed preference order.

use skyfire_core::commands::PlayerCommand;
use skyfire_core::enums::{Action, GamePhase, Lifecycle, Owner, UpgradeKind};
use skyfire_core::state::{GameStateSnapshot, UpgradeOption};
use skyfire_core::types::{Position, Rect};
use skyfire_sim::input::InputState;

/// Horizontal slack before the ship bothers to move.
const ALIGN_TOLERANCE: f64 = 8.0;
/// Enemy shots closer than this trigger a sidestep.
const DODGE_RADIUS: f64 = 90.0;

const UPGRADE_PREFERENCE: [UpgradeKind; 5] = [
    UpgradeKind::Hp,
    UpgradeKind::BulletDamage,
    UpgradeKind::FireRate,
    UpgradeKind::Speed,
    UpgradeKind::ProjectileSpeed,
];

#[derive(Debug, Default)]
pub struct Autopilot {
    input: InputState,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command to send while a menu is open.
    pub fn menu_command(&self, snapshot: &GameStateSnapshot) -> Option<PlayerCommand> {
        match snapshot.phase {
            GamePhase::InitialUpgrade | GamePhase::UpgradeMenu => {
                choose_upgrade(&snapshot.upgrade_options)
                    .map(|index| PlayerCommand::SelectUpgrade { index })
            }
            _ => None,
        }
    }

    /// Input for the next update, derived from the latest snapshot.
    pub fn next_input(&mut self, snapshot: &GameStateSnapshot) -> &mut InputState {
        self.input.release_all();
        if snapshot.phase != GamePhase::Playing || snapshot.player.state != Lifecycle::Alive {
            return &mut self.input;
        }

        let ship = Rect::from_parts(snapshot.player.position, snapshot.player.size).center();
        self.input.press(Action::Fire);

        if let Some(threat) = nearest_threat(snapshot, ship) {
            // Step away from the incoming shot.
            if threat.x >= ship.x {
                self.input.press(Action::MoveLeft);
            } else {
                self.input.press(Action::MoveRight);
            }
            return &mut self.input;
        }

        if let Some(target) = lowest_enemy(snapshot) {
            if target.x < ship.x - ALIGN_TOLERANCE {
                self.input.press(Action::MoveLeft);
            } else if target.x > ship.x + ALIGN_TOLERANCE {
                self.input.press(Action::MoveRight);
            }
        }
        &mut self.input
    }
}

/// Index of the most preferred upgrade on offer.
fn choose_upgrade(options: &[UpgradeOption]) -> Option<usize> {
    UPGRADE_PREFERENCE
        .iter()
        .find_map(|kind| options.iter().position(|o| o.kind == *kind))
        .or_else(|| (!options.is_empty()).then_some(0))
}

fn lowest_enemy(snapshot: &GameStateSnapshot) -> Option<Position> {
    snapshot
        .enemies
        .iter()
        .filter(|e| e.state == Lifecycle::Alive)
        .map(|e| Rect::from_parts(e.position, e.size).center())
        .max_by(|a, b| a.y.total_cmp(&b.y))
}

fn nearest_threat(snapshot: &GameStateSnapshot, ship: Position) -> Option<Position> {
    snapshot
        .projectiles
        .iter()
        .filter(|p| p.owner == Owner::Enemy)
        .map(|p| Rect::from_parts(p.position, p.size).center())
        .filter(|c| c.distance_to(&ship) < DODGE_RADIUS)
        .min_by(|a, b| a.distance_to(&ship).total_cmp(&b.distance_to(&ship)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfire_core::components::ProjectileKind;
    use skyfire_core::enums::EnemyArchetype;
    use skyfire_core::state::{EnemyView, ProjectileView};
    use skyfire_core::types::Size;
    use skyfire_sim::input::InputProvider;

    fn playing_snapshot() -> GameStateSnapshot {
        let mut snapshot = GameStateSnapshot {
            phase: GamePhase::Playing,
            ..Default::default()
        };
        snapshot.player.position = Position::new(368.0, 716.0);
        snapshot.player.size = Size::square(64.0);
        snapshot
    }

    fn enemy_at(x: f64, y: f64) -> EnemyView {
        EnemyView {
            id: 1,
            archetype: EnemyArchetype::Kamikaze,
            position: Position::new(x, y),
            size: Size::square(64.0),
            angle: 0.0,
            state: Lifecycle::Alive,
            frame: 0,
            hp: 20.0,
            max_hp: 20.0,
            shield_active: false,
            blast_radius: None,
        }
    }

    fn option(kind: UpgradeKind) -> UpgradeOption {
        UpgradeOption {
            kind,
            value: 1.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_prefers_hp_upgrade() {
        let mut snapshot = GameStateSnapshot {
            phase: GamePhase::UpgradeMenu,
            ..Default::default()
        };
        snapshot.upgrade_options = vec![
            option(UpgradeKind::Speed),
            option(UpgradeKind::ProjectileSpeed),
            option(UpgradeKind::Hp),
        ];
        let pilot = Autopilot::new();
        assert!(matches!(
            pilot.menu_command(&snapshot),
            Some(PlayerCommand::SelectUpgrade { index: 2 })
        ));
    }

    #[test]
    fn test_no_menu_command_while_playing() {
        let pilot = Autopilot::new();
        assert!(pilot.menu_command(&playing_snapshot()).is_none());
    }

    #[test]
    fn test_tracks_lowest_enemy() {
        let mut snapshot = playing_snapshot();
        snapshot.enemies = vec![enemy_at(600.0, 100.0), enemy_at(50.0, 300.0)];
        let mut pilot = Autopilot::new();
        let input = pilot.next_input(&snapshot);
        assert!(input.is_action_active(Action::Fire));
        assert!(input.is_action_active(Action::MoveLeft));
        assert!(!input.is_action_active(Action::MoveRight));
    }

    #[test]
    fn test_dodges_incoming_shot() {
        let mut snapshot = playing_snapshot();
        snapshot.enemies = vec![enemy_at(600.0, 100.0)];
        snapshot.projectiles = vec![ProjectileView {
            owner: Owner::Enemy,
            position: Position::new(410.0, 680.0),
            size: Size::new(6.0, 16.0),
            angle: 0.0,
            kind: ProjectileKind::Straight { spin: 0.0 },
        }];
        let mut pilot = Autopilot::new();
        let input = pilot.next_input(&snapshot);
        assert!(input.is_action_active(Action::MoveLeft));
    }

    #[test]
    fn test_idle_outside_play() {
        let snapshot = GameStateSnapshot::default();
        let mut pilot = Autopilot::new();
        let input = pilot.next_input(&snapshot);
        assert!(!input.is_action_active(Action::Fire));
    }
}
