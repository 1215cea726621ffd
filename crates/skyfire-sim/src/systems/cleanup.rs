//! Cleanup system: removes dead enemies, spent projectiles and collected pickups.

use hecs::{Entity, World};

use skyfire_core::components::{DeathBlast, Enemy, Health, PowerUp, Projectile};
use skyfire_core::enums::Lifecycle;

use crate::systems::lifecycle::blast_finished;

/// Remove everything that is finished. Enemies stay until their destruction
/// animation and any death blast have both run out.
/// Uses a pre-allocated buffer to avoid per-update allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (_enemy, health, blast)) in
        world.query_mut::<(&Enemy, &Health, Option<&DeathBlast>)>()
    {
        if health.state == Lifecycle::Dead && blast_finished(blast) {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.destroyed {
            despawn_buffer.push(entity);
        }
    }

    for (entity, power_up) in world.query_mut::<&PowerUp>() {
        if power_up.collected {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Remove every projectile, e.g. when a boss falls or a turn ends.
pub fn clear_projectiles(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    despawn_buffer.extend(world.query_mut::<&Projectile>().into_iter().map(|(entity, _)| entity));
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
