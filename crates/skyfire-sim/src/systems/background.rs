//! Background system: scrolls the star field.

use rand::Rng;

use skyfire_core::components::Star;
use skyfire_core::types::{frame_scale, Playfield};

use crate::world_setup::random_star;

/// Move stars down; stars leaving the bottom reappear at the top.
pub fn run<R: Rng + ?Sized>(stars: &mut [Star], playfield: Playfield, dt_ms: f64, rng: &mut R) {
    let scale = frame_scale(dt_ms);
    for star in stars.iter_mut() {
        star.position.y += star.speed * scale;
        if star.position.y > playfield.height {
            *star = random_star(rng, playfield, Some(0.0));
        }
    }
}
