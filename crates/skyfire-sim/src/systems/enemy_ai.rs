//! Enemy AI system: moves living enemies and collects their attacks.
//!
//! Calls the per-archetype policies from skyfire-enemy-ai, then writes the
//! results back into ECS components.

use hecs::{Entity, World};
use rand::RngCore;
use tracing::error;

use skyfire_core::components::{Body, Enemy, Health, ProjectileSpawn};
use skyfire_core::enums::Lifecycle;
use skyfire_core::types::Playfield;

use skyfire_enemy_ai::fsm::{evaluate, AiState, EnemyContext};

/// Run every living enemy's policies. New projectiles are pushed onto
/// `spawns` together with the enemy that fired them. Enemies that fly off
/// the playfield are removed outright; they were never destroyed.
pub fn run(
    world: &mut World,
    player: Option<Body>,
    playfield: Playfield,
    dt_ms: f64,
    rng: &mut dyn RngCore,
    spawns: &mut Vec<(ProjectileSpawn, Entity)>,
    despawn_buffer: &mut Vec<Entity>,
) {
    for (entity, (enemy, body, health, state)) in
        world.query_mut::<(&Enemy, &mut Body, &mut Health, &mut AiState)>()
    {
        if health.state != Lifecycle::Alive {
            continue;
        }

        let ctx = EnemyContext {
            archetype: enemy.archetype,
            body: *body,
            speed: enemy.speed,
            target: player,
            playfield,
            dt_ms,
        };
        let update = evaluate(&ctx, state, rng);

        if !update.position.is_finite() || !update.angle.is_finite() {
            error!(?entity, archetype = %enemy.archetype, "non-finite enemy position, culling");
            health.state = Lifecycle::Dead;
            continue;
        }

        body.position = update.position;
        body.angle = update.angle;

        if update.left_playfield {
            despawn_buffer.push(entity);
            continue;
        }

        spawns.extend(update.spawns.into_iter().map(|spawn| (spawn, entity)));
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
