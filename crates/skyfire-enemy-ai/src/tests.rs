#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use skyfire_core::components::{Body, ProjectileKind};
    use skyfire_core::constants::*;
    use skyfire_core::enums::{BossAttack, EnemyArchetype, Owner};
    use skyfire_core::types::{Playfield, Position, Size};

    use crate::fsm::*;
    use crate::profiles::get_profile;

    const DT: f64 = 50.0;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn make_context(
        archetype: EnemyArchetype,
        enemy_at: Position,
        player_at: Option<Position>,
    ) -> EnemyContext {
        let profile = get_profile(archetype);
        EnemyContext {
            archetype,
            body: Body::new(enemy_at, Size::square(DEFAULT_FRAME_SIZE * profile.scale)),
            speed: profile.speed,
            target: player_at.map(|p| Body::new(p, Size::square(64.0))),
            playfield: Playfield::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            dt_ms: DT,
        }
    }

    /// Run the FSM for `ticks` updates, feeding positions back in.
    fn run(
        ctx: &mut EnemyContext,
        state: &mut AiState,
        rng: &mut ChaCha8Rng,
        ticks: usize,
    ) -> Vec<EnemyUpdate> {
        let mut updates = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            let update = evaluate(ctx, state, rng);
            ctx.body.position = update.position;
            ctx.body.angle = update.angle;
            updates.push(update);
        }
        updates
    }

    #[test]
    fn test_kamikaze_closes_distance() {
        let mut rng = rng();
        let mut ctx = make_context(
            EnemyArchetype::Kamikaze,
            Position::new(100.0, 0.0),
            Some(Position::new(400.0, 700.0)),
        );
        let mut state = initial_state(EnemyArchetype::Kamikaze, &mut rng);
        let target = ctx.target_center().unwrap();
        let before = ctx.center().distance_to(&target);
        let updates = run(&mut ctx, &mut state, &mut rng, 10);
        assert!(ctx.center().distance_to(&target) < before);
        assert!(updates.iter().all(|u| u.spawns.is_empty()), "kamikaze never shoots");
    }

    #[test]
    fn test_kamikaze_speed_scales_with_delta() {
        let mut rng = rng();
        let ctx = make_context(
            EnemyArchetype::Kamikaze,
            Position::new(100.0, 0.0),
            Some(Position::new(100.0, 700.0)),
        );
        let mut state = AiState::Kamikaze;
        let update = evaluate(
            &EnemyContext {
                dt_ms: REFERENCE_FRAME_MS,
                ..ctx
            },
            &mut state,
            &mut rng,
        );
        assert!((update.position.y - KAMIKAZE_SPEED).abs() < 1e-9);
    }

    #[test]
    fn test_assault_holds_at_standoff() {
        let mut rng = rng();
        let player = Position::new(300.0, 600.0);
        let mut ctx = make_context(EnemyArchetype::Assault, Position::new(300.0, 0.0), Some(player));
        let mut state = initial_state(EnemyArchetype::Assault, &mut rng);
        run(&mut ctx, &mut state, &mut rng, 2000);
        let distance = ctx.center().distance_to(&ctx.target_center().unwrap());
        assert!((distance - ASSAULT_STANDOFF).abs() < 1e-6, "distance {}", distance);

        let held = ctx.body.position;
        run(&mut ctx, &mut state, &mut rng, 5);
        assert!(ctx.body.position.distance_to(&held) < 1e-6);
    }

    #[test]
    fn test_assault_fires_three_round_burst() {
        let mut rng = rng();
        let mut ctx = make_context(
            EnemyArchetype::Assault,
            Position::new(300.0, 100.0),
            Some(Position::new(300.0, 250.0)),
        );
        let mut state = initial_state(EnemyArchetype::Assault, &mut rng);
        // 3000 ms: initial cooldown, one burst, then the next cooldown.
        let updates = run(&mut ctx, &mut state, &mut rng, 60);
        let shots: Vec<usize> = updates
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.spawns.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(shots, vec![39, 42, 45]);

        let shot = &updates[39].spawns[0];
        assert_eq!(shot.projectile.owner, Owner::Enemy);
        assert_eq!(shot.projectile.damage, BLASTER_DAMAGE);
        assert!(shot.velocity.y > 0.0, "aimed down at the player");
    }

    #[test]
    fn test_tank_volley_targets_player() {
        let mut rng = rng();
        let player = Position::new(300.0, 600.0);
        let mut ctx = make_context(EnemyArchetype::Tank, Position::new(300.0, 100.0), Some(player));
        let mut state = initial_state(EnemyArchetype::Tank, &mut rng);
        let updates = run(&mut ctx, &mut state, &mut rng, 60);
        let volleys: Vec<&EnemyUpdate> = updates.iter().filter(|u| !u.spawns.is_empty()).collect();
        assert_eq!(volleys.len(), TANK_VOLLEYS as usize);

        let first = volleys[0];
        assert_eq!(first.spawns.len(), 4);
        let centre = ctx.target_center().unwrap();
        let direct = first
            .spawns
            .iter()
            .filter(|s| match s.projectile.kind {
                ProjectileKind::Grenade { target, .. } => target.distance_to(&centre) < 1e-9,
                _ => false,
            })
            .count();
        assert_eq!(direct, 2, "two grenades at the player, two flanking");
    }

    #[test]
    fn test_laser_full_cycle() {
        let mut rng = rng();
        let mut ctx = make_context(
            EnemyArchetype::Laser,
            Position::new(300.0, -80.0),
            Some(Position::new(600.0, 700.0)),
        );
        let mut state = initial_state(EnemyArchetype::Laser, &mut rng);
        let mut seen = vec![LaserPhase::Entering];
        let mut beams = 0;

        for _ in 0..2000 {
            let update = evaluate(&ctx, &mut state, &mut rng);
            ctx.body.position = update.position;
            beams += update
                .spawns
                .iter()
                .filter(|s| matches!(s.projectile.kind, ProjectileKind::Beam { .. }))
                .count();
            let AiState::Laser(laser) = state else {
                panic!("laser state lost");
            };
            if seen.last() != Some(&laser.phase) {
                seen.push(laser.phase);
            }
            if seen.len() >= 6 {
                break;
            }
        }

        assert_eq!(
            seen,
            vec![
                LaserPhase::Entering,
                LaserPhase::Idle,
                LaserPhase::Charging,
                LaserPhase::Firing,
                LaserPhase::Retreating,
                LaserPhase::Idle,
            ]
        );
        assert_eq!(beams, 1);
    }

    #[test]
    fn test_laser_beam_locks_angle_at_charge() {
        let mut rng = rng();
        let player = Position::new(300.0, 700.0);
        let mut ctx = make_context(EnemyArchetype::Laser, Position::new(300.0, 120.0), Some(player));
        let mut state = AiState::Laser(LaserState {
            phase: LaserPhase::Idle,
            timer_ms: 0.0,
            charge_ms: 0.0,
            angle: 0.0,
            retreat_target: None,
        });
        let charge_angle = ctx.center().angle_to(&ctx.target_center().unwrap());
        run(&mut ctx, &mut state, &mut rng, 1);

        // Player moves during the charge; the beam keeps the locked angle.
        ctx.target = Some(Body::new(Position::new(0.0, 300.0), Size::square(64.0)));
        let updates = run(&mut ctx, &mut state, &mut rng, 20);
        let beam = updates
            .iter()
            .flat_map(|u| u.spawns.iter())
            .next()
            .expect("beam fired");
        assert!(beam.anchored);
        match beam.projectile.kind {
            ProjectileKind::Beam { angle, width, .. } => {
                assert!((angle - charge_angle).abs() < 1e-9);
                assert_eq!(width, LASER_BEAM_WIDTH);
            }
            other => panic!("expected beam, got {:?}", other),
        }
    }

    #[test]
    fn test_boss_enters_then_roams_within_bounds() {
        let mut rng = rng();
        let mut ctx = make_context(
            EnemyArchetype::Boss,
            Position::new(300.0, -100.0),
            Some(Position::new(300.0, 700.0)),
        );
        let mut state = initial_state(EnemyArchetype::Boss, &mut rng);
        run(&mut ctx, &mut state, &mut rng, 200);
        let AiState::Boss(boss) = state else {
            panic!("boss state lost");
        };
        assert!(boss.entered);
        assert_eq!(ctx.body.position.y, BOSS_TARGET_Y);

        let max_x = PLAYFIELD_WIDTH - ctx.body.size.width;
        for update in run(&mut ctx, &mut state, &mut rng, 2000) {
            assert!(update.position.x >= 0.0 && update.position.x <= max_x);
            assert_eq!(update.position.y, BOSS_TARGET_Y);
        }
    }

    #[test]
    fn test_boss_attack_timer_keeps_running() {
        let mut rng = rng();
        let mut ctx = make_context(
            EnemyArchetype::Boss,
            Position::new(300.0, BOSS_TARGET_Y),
            Some(Position::new(300.0, 700.0)),
        );
        let mut state = initial_state(EnemyArchetype::Boss, &mut rng);
        if let AiState::Boss(boss) = &mut state {
            boss.entered = true;
        }

        // A full shield activation's worth of updates.
        let ticks = (BOSS_SHIELD_MS / DT) as usize;
        run(&mut ctx, &mut state, &mut rng, ticks);

        let AiState::Boss(boss) = state else {
            panic!("boss state lost");
        };
        assert!(boss.last_attack.is_some(), "an attack fired on schedule");
        let expected = BOSS_ATTACK_COOLDOWN_MS - (BOSS_SHIELD_MS - BOSS_ATTACK_COOLDOWN_MS);
        assert!((boss.attack_cooldown_ms - expected).abs() < 1e-9);
    }

    #[test]
    fn test_boss_orb_ring() {
        let mut rng = rng();
        let ctx = make_context(
            EnemyArchetype::Boss,
            Position::new(300.0, BOSS_TARGET_Y),
            Some(Position::new(300.0, 700.0)),
        );
        let AiState::Boss(mut boss) = initial_state(EnemyArchetype::Boss, &mut rng) else {
            panic!("expected boss state");
        };
        let mut spawns = Vec::new();
        launch_boss_attack(&ctx, &mut boss, BossAttack::OrbRing, &mut rng, &mut spawns);
        assert_eq!(spawns.len(), BOSS_ORB_COUNT as usize);
        for spawn in &spawns {
            let distance = spawn.body.center().distance_to(&ctx.center());
            assert!((distance - BOSS_ORB_RING_RADIUS).abs() < 1e-6);
            match spawn.projectile.kind {
                ProjectileKind::Straight { spin } => {
                    assert!((BOSS_ORB_MIN_SPIN..=BOSS_ORB_MAX_SPIN).contains(&spin))
                }
                other => panic!("expected straight orb, got {:?}", other),
            }
        }
        assert_eq!(boss.last_attack, Some(BossAttack::OrbRing));
    }

    #[test]
    fn test_boss_charged_orb_captures_target() {
        let mut rng = rng();
        let player = Position::new(100.0, 700.0);
        let ctx = make_context(EnemyArchetype::Boss, Position::new(300.0, BOSS_TARGET_Y), Some(player));
        let AiState::Boss(mut boss) = initial_state(EnemyArchetype::Boss, &mut rng) else {
            panic!("expected boss state");
        };
        let mut spawns = Vec::new();
        launch_boss_attack(&ctx, &mut boss, BossAttack::ChargedOrb, &mut rng, &mut spawns);
        assert_eq!(spawns.len(), 1);
        match spawns[0].projectile.kind {
            ProjectileKind::Charged { target, radius, max_radius, .. } => {
                assert_eq!(target, ctx.target_center().unwrap());
                assert!(radius < max_radius);
            }
            other => panic!("expected charged orb, got {:?}", other),
        }
        assert_eq!(spawns[0].velocity.speed(), 0.0, "charges in place");
    }

    #[test]
    fn test_boss_gun_spray_arms_timer() {
        let mut rng = rng();
        let ctx = make_context(
            EnemyArchetype::Boss,
            Position::new(300.0, BOSS_TARGET_Y),
            Some(Position::new(300.0, 700.0)),
        );
        let AiState::Boss(mut boss) = initial_state(EnemyArchetype::Boss, &mut rng) else {
            panic!("expected boss state");
        };
        let mut spawns = Vec::new();
        launch_boss_attack(&ctx, &mut boss, BossAttack::GunSpray, &mut rng, &mut spawns);
        assert!(spawns.is_empty());
        assert_eq!(boss.gun_remaining_ms, BOSS_GUN_MS);
    }

    #[test]
    fn test_faces_player() {
        let mut rng = rng();
        let ctx = make_context(
            EnemyArchetype::Kamikaze,
            Position::new(100.0, 0.0),
            Some(Position::new(100.0, 600.0)),
        );
        let update = evaluate(&ctx, &mut AiState::Kamikaze, &mut rng);
        // Directly below: atan2(dy, 0) - PI/2 = 0.
        assert!(update.angle.abs() < 1e-9);
    }

    #[test]
    fn test_no_target_drifts_without_attacking() {
        let mut rng = rng();
        let mut ctx = make_context(EnemyArchetype::Assault, Position::new(100.0, 100.0), None);
        let mut state = initial_state(EnemyArchetype::Assault, &mut rng);
        let updates = run(&mut ctx, &mut state, &mut rng, 100);
        assert!(ctx.body.position.y > 100.0);
        assert!(updates.iter().all(|u| u.spawns.is_empty()));
    }

    #[test]
    fn test_left_playfield_flag() {
        let mut rng = rng();
        let ctx = make_context(
            EnemyArchetype::Kamikaze,
            Position::new(100.0, PLAYFIELD_HEIGHT + 1.0),
            None,
        );
        let update = evaluate(&ctx, &mut AiState::Kamikaze, &mut rng);
        assert!(update.left_playfield);

        let ctx = make_context(EnemyArchetype::Kamikaze, Position::new(100.0, -50.0), None);
        let update = evaluate(&ctx, &mut AiState::Kamikaze, &mut rng);
        assert!(!update.left_playfield);
    }

    #[test]
    fn test_boss_profile_is_not_ramped() {
        assert!(!get_profile(EnemyArchetype::Boss).ramped);
        for archetype in EnemyArchetype::WAVE {
            assert!(get_profile(archetype).ramped);
        }
    }
}
