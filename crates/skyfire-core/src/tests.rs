#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::collision::*;
    use crate::combat::*;
    use crate::commands::PlayerCommand;
    use crate::components::{Destruction, Health, Shield};
    use crate::config::GameConfig;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::SimError;
    use crate::events::GameEvent;
    use crate::state::GameStateSnapshot;
    use crate::types::{Position, Rect, SimClock};

    fn fresh(hp: f64) -> (Health, Destruction) {
        (new_health(hp), new_destruction())
    }

    fn shield_with(health: f64) -> Shield {
        let mut shield = Shield::default();
        activate_shield(&mut shield, health);
        shield
    }

    // ---- Collision ----

    #[test]
    fn test_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Rect::new(10.0, 0.0, 10.0, 10.0),
            Rect::new(-3.0, 2.0, 4.0, 50.0),
            Rect::new(2.0, 2.0, 1.0, 1.0),
            Rect::new(100.0, 100.0, 5.0, 5.0),
        ];
        for a in &rects {
            for b in &rects {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 4.0, 16.0);
        assert!(overlaps(&outer, &inner));
    }

    #[test]
    fn test_point_segment_distance() {
        let start = Position::new(0.0, 0.0);
        let end = Position::new(10.0, 0.0);
        assert_eq!(point_segment_distance_sq(Position::new(5.0, 3.0), start, end), 9.0);
        // Past the end, distance is to the end point.
        assert_eq!(point_segment_distance_sq(Position::new(13.0, 4.0), start, end), 25.0);
        // Degenerate segment.
        assert_eq!(point_segment_distance_sq(Position::new(3.0, 4.0), start, start), 25.0);
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(circle_overlaps_rect(Position::new(15.0, 5.0), 6.0, &rect));
        assert!(!circle_overlaps_rect(Position::new(20.0, 5.0), 6.0, &rect));
    }

    // ---- Damage ----

    #[test]
    fn test_damage_floors_at_zero() {
        for (hp, dmg) in [(100.0, 30.0), (20.0, 20.0), (10.0, 55.0), (1.0, 0.5)] {
            let (mut health, mut destruction) = fresh(hp);
            take_damage(&mut health, &mut destruction, None, dmg, ShieldOverflow::Discard);
            assert_eq!(health.hp, f64::max(0.0, hp - dmg));
        }
    }

    #[test]
    fn test_lethal_damage_enters_dying() {
        let (mut health, mut destruction) = fresh(20.0);
        destruction.frame = 4;
        let outcome = take_damage(&mut health, &mut destruction, None, 20.0, ShieldOverflow::Discard);
        assert_eq!(outcome, DamageOutcome::Killed);
        assert_eq!(health.state, Lifecycle::Dying);
        assert_eq!(destruction.frame, 0, "destruction restarts on entry");
    }

    #[test]
    fn test_damage_on_non_alive_is_noop() {
        let (mut health, mut destruction) = fresh(20.0);
        take_damage(&mut health, &mut destruction, None, 25.0, ShieldOverflow::Discard);
        let outcome = take_damage(&mut health, &mut destruction, None, 5.0, ShieldOverflow::Discard);
        assert_eq!(outcome, DamageOutcome::Ignored);
        assert_eq!(health.hp, 0.0);

        health.state = Lifecycle::Dead;
        let outcome = take_damage(&mut health, &mut destruction, None, 5.0, ShieldOverflow::Discard);
        assert_eq!(outcome, DamageOutcome::Ignored);
        assert_eq!(health.state, Lifecycle::Dead);
    }

    #[test]
    fn test_non_positive_damage_ignored() {
        let (mut health, mut destruction) = fresh(50.0);
        for amount in [0.0, -10.0, f64::NAN] {
            let outcome =
                take_damage(&mut health, &mut destruction, None, amount, ShieldOverflow::Discard);
            assert_eq!(outcome, DamageOutcome::Ignored);
        }
        assert_eq!(health.hp, 50.0);
    }

    // ---- Shields ----

    #[test]
    fn test_shield_absorbs_within_pool() {
        let (mut health, mut destruction) = fresh(100.0);
        let mut shield = shield_with(50.0);
        let outcome = take_damage(
            &mut health,
            &mut destruction,
            Some(&mut shield),
            30.0,
            ShieldOverflow::Discard,
        );
        assert_eq!(outcome, DamageOutcome::Absorbed);
        assert_eq!(shield.health, 20.0);
        assert!(shield.active);
        assert_eq!(health.hp, 100.0);
    }

    #[test]
    fn test_shield_break_discards_overflow() {
        let (mut health, mut destruction) = fresh(100.0);
        let mut shield = shield_with(20.0);
        shield.cooldown_ms = 500.0;
        take_damage(
            &mut health,
            &mut destruction,
            Some(&mut shield),
            30.0,
            ShieldOverflow::Discard,
        );
        assert!(!shield.active);
        assert_eq!(shield.cooldown_remaining_ms, 500.0);
        assert_eq!(health.hp, 100.0, "remainder must not reach hit points");
    }

    #[test]
    fn test_shield_break_carry_over() {
        let (mut health, mut destruction) = fresh(100.0);
        let mut shield = shield_with(20.0);
        let outcome = take_damage(
            &mut health,
            &mut destruction,
            Some(&mut shield),
            30.0,
            ShieldOverflow::CarryOver,
        );
        assert_eq!(outcome, DamageOutcome::Damaged);
        assert!(!shield.active);
        assert_eq!(health.hp, 90.0);
    }

    #[test]
    fn test_boss_shield_cycle() {
        let (mut health, mut destruction) = fresh(1200.0);
        let mut shield = triggered_shield(100.0, 150.0, 4000.0, 5000.0, 3000.0);
        let overflow = ShieldOverflow::Discard;

        take_damage(&mut health, &mut destruction, Some(&mut shield), 60.0, overflow);
        assert!(!shield.active);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 50.0, overflow);
        assert!(shield.active, "110 recent damage crosses the threshold");
        assert_eq!(health.hp, 1090.0);

        let outcome = take_damage(&mut health, &mut destruction, Some(&mut shield), 40.0, overflow);
        assert_eq!(outcome, DamageOutcome::Absorbed);
        assert_eq!(health.hp, 1090.0);

        tick_shield(&mut shield, 3999.0);
        assert!(shield.active);
        tick_shield(&mut shield, 1.0);
        assert!(!shield.active, "shield expires after its duration");

        // Cooldown blocks an immediate re-raise.
        take_damage(&mut health, &mut destruction, Some(&mut shield), 120.0, overflow);
        assert!(!shield.active);
        assert_eq!(health.hp, 970.0);

        tick_shield(&mut shield, 5000.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 110.0, overflow);
        assert!(shield.active, "shield raises again after the cooldown");
    }

    #[test]
    fn test_shield_needs_damage_above_threshold() {
        let (mut health, mut destruction) = fresh(1200.0);
        let mut shield = triggered_shield(100.0, 150.0, 4000.0, 5000.0, 3000.0);
        let overflow = ShieldOverflow::Discard;

        take_damage(&mut health, &mut destruction, Some(&mut shield), 100.0, overflow);
        assert!(!shield.active, "reaching the threshold is not enough");
        take_damage(&mut health, &mut destruction, Some(&mut shield), 1.0, overflow);
        assert!(shield.active);
    }

    #[test]
    fn test_recent_damage_expires_after_window() {
        let (mut health, mut destruction) = fresh(1200.0);
        let mut shield = triggered_shield(100.0, 150.0, 4000.0, 5000.0, 3000.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 60.0, ShieldOverflow::Discard);
        tick_shield(&mut shield, 3000.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 60.0, ShieldOverflow::Discard);
        assert!(!shield.active);
        assert_eq!(recent_damage(shield.trigger.as_ref().unwrap()), 60.0);
    }

    #[test]
    fn test_recent_damage_window_rolls() {
        let (mut health, mut destruction) = fresh(1200.0);
        let mut shield = triggered_shield(100.0, 150.0, 4000.0, 5000.0, 3000.0);
        let overflow = ShieldOverflow::Discard;

        // A burst late in one window and early in the next still counts.
        tick_shield(&mut shield, 2900.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 60.0, overflow);
        tick_shield(&mut shield, 200.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 60.0, overflow);
        assert!(shield.active, "120 damage within 200 ms raises the shield");
    }

    #[test]
    fn test_recent_damage_drops_oldest_hits() {
        let (mut health, mut destruction) = fresh(1200.0);
        let mut shield = triggered_shield(100.0, 150.0, 4000.0, 5000.0, 3000.0);
        let overflow = ShieldOverflow::Discard;

        take_damage(&mut health, &mut destruction, Some(&mut shield), 50.0, overflow);
        tick_shield(&mut shield, 2000.0);
        take_damage(&mut health, &mut destruction, Some(&mut shield), 40.0, overflow);
        tick_shield(&mut shield, 1500.0);
        // The first hit has aged out; only 40 + 40 remain.
        take_damage(&mut health, &mut destruction, Some(&mut shield), 40.0, overflow);
        assert!(!shield.active);
        assert_eq!(recent_damage(shield.trigger.as_ref().unwrap()), 80.0);
    }

    // ---- Animation ----

    #[test]
    fn test_destruction_takes_full_duration() {
        let (mut health, mut destruction) = fresh(10.0);
        take_damage(&mut health, &mut destruction, None, 10.0, ShieldOverflow::Discard);
        let duration = DESTRUCTION_FRAME_MS * DESTRUCTION_FRAME_COUNT as f64;

        let mut elapsed = 0.0;
        while !advance_destruction(&mut health, &mut destruction, 16.0) {
            elapsed += 16.0;
            assert_eq!(health.state, Lifecycle::Dying);
            assert!(elapsed < duration + 100.0, "destruction never finished");
        }
        elapsed += 16.0;
        assert_eq!(health.state, Lifecycle::Dead);
        assert!(elapsed >= duration);
    }

    #[test]
    fn test_destruction_ignores_alive() {
        let (mut health, mut destruction) = fresh(10.0);
        assert!(!advance_destruction(&mut health, &mut destruction, 1000.0));
        assert_eq!(health.state, Lifecycle::Alive);
    }

    #[test]
    fn test_sprite_frame_wraps() {
        let mut anim = new_sprite_animation(5);
        advance_sprite(&mut anim, ANIMATION_FRAME_MS * 7.0);
        assert_eq!(anim.frame, 2);

        let mut empty = new_sprite_animation(0);
        advance_sprite(&mut empty, 1000.0);
        assert_eq!(empty.frame, 0);
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut health = new_health(100.0);
        health.hp = 90.0;
        heal(&mut health, 20.0);
        assert_eq!(health.hp, 100.0);
    }

    // ---- Types ----

    #[test]
    fn test_clock_advance() {
        let mut clock = SimClock::default();
        clock.advance(16.0);
        clock.advance(20.0);
        assert_eq!(clock.tick, 2);
        assert_eq!(clock.elapsed_ms, 36.0);
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.center(), Position::new(25.0, 40.0));
        assert_eq!(Rect::centered(rect.center(), crate::types::Size::new(30.0, 40.0)), rect);
    }

    // ---- Names ----

    #[test]
    fn test_archetype_from_str() {
        assert_eq!(
            EnemyArchetype::from_str("Kamikaze").unwrap(),
            EnemyArchetype::Kamikaze
        );
        assert!(matches!(
            EnemyArchetype::from_str("dragon"),
            Err(SimError::UnknownEnemy(name)) if name == "dragon"
        ));
        for archetype in EnemyArchetype::WAVE {
            assert_eq!(EnemyArchetype::from_str(archetype.name()).unwrap(), archetype);
        }
    }

    #[test]
    fn test_power_up_names() {
        for kind in PowerUpKind::ALL {
            assert_eq!(PowerUpKind::from_str(kind.name()).unwrap(), kind);
        }
        assert!(PowerUpKind::from_str("laser").is_err());
    }

    #[test]
    fn test_ship_from_str() {
        assert_eq!(ShipType::from_str("tank").unwrap(), ShipType::Tank);
        assert!(matches!(ShipType::from_str("ufo"), Err(SimError::UnknownShip(_))));
    }

    #[test]
    fn test_power_up_tiers() {
        assert_eq!(PowerUpKind::of_rarity(Rarity::Common).count(), 2);
        assert_eq!(PowerUpKind::of_rarity(Rarity::Rare).count(), 2);
        assert_eq!(PowerUpKind::of_rarity(Rarity::Epic).count(), 3);
        assert!(!PowerUpKind::Heal.is_timed());
        assert!(PowerUpKind::Boost.is_timed());
    }

    // ---- Config ----

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.waves.enemies_per_wave, ENEMIES_PER_WAVE);
        assert_eq!(config.combat.shield_overflow, ShieldOverflow::Discard);
        assert_eq!(config.waves.spawn_weights.len(), 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [waves]
            enemies_per_wave = 3

            [combat]
            shield_overflow = "carry_over"
            "#,
        )
        .unwrap();
        assert_eq!(config.waves.enemies_per_wave, 3);
        assert_eq!(config.waves.waves_per_level, WAVES_PER_LEVEL);
        assert_eq!(config.combat.shield_overflow, ShieldOverflow::CarryOver);
        assert_eq!(config.playfield.width, PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GameConfig::from_toml_str("[playfield]\nwidth = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                field: "playfield.width",
                ..
            }
        ));
        assert!(matches!(
            GameConfig::from_toml_str("[waves\n"),
            Err(SimError::ConfigParse(_))
        ));
    }

    // ---- Serde ----

    #[test]
    fn test_command_serde() {
        let cmd = PlayerCommand::SelectUpgrade { index: 2 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("SelectUpgrade"));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, PlayerCommand::SelectUpgrade { index: 2 }));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut snapshot = GameStateSnapshot::default();
        snapshot.events.push(GameEvent::WaveStarted {
            level: 1,
            wave: 1,
            enemies: 5,
        });
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Loading);
        assert_eq!(back.events, snapshot.events);
    }
}
