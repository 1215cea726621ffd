//! Power-up system: falling pickups.

use hecs::{Entity, World};

use skyfire_core::components::{Body, PowerUp};
use skyfire_core::types::{frame_scale, Playfield};

/// Let pickups fall; those below the screen are queued for removal.
pub fn run(world: &mut World, playfield: Playfield, dt_ms: f64, despawn_buffer: &mut Vec<Entity>) {
    let scale = frame_scale(dt_ms);
    for (entity, (power_up, body)) in world.query_mut::<(&PowerUp, &mut Body)>() {
        body.position.y += power_up.fall_speed * scale;
        if body.position.y > playfield.height {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
