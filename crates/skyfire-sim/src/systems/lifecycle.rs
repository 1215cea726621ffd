//! Lifecycle system: enemy animations, destruction, shields and death blasts.

use hecs::World;

use skyfire_core::combat;
use skyfire_core::components::{DeathBlast, Destruction, Enemy, Health, Shield, SpriteAnimation};
use skyfire_core::enums::Lifecycle;

pub fn run(world: &mut World, dt_ms: f64) {
    for (_entity, (_enemy, health, destruction, animation, shield, blast)) in world.query_mut::<(
        &Enemy,
        &mut Health,
        &mut Destruction,
        &mut SpriteAnimation,
        Option<&mut Shield>,
        Option<&mut DeathBlast>,
    )>() {
        match health.state {
            Lifecycle::Alive => combat::advance_sprite(animation, dt_ms),
            Lifecycle::Dying => {
                combat::advance_destruction(health, destruction, dt_ms);
            }
            Lifecycle::Dead => {}
        }

        if let Some(shield) = shield {
            combat::tick_shield(shield, dt_ms);
        }

        if let Some(blast) = blast {
            if blast.armed {
                blast.elapsed_ms += dt_ms;
            }
        }
    }
}

/// Radius of an armed blast, growing linearly to full size.
pub fn blast_radius(blast: &DeathBlast) -> f64 {
    if blast.duration_ms <= 0.0 {
        return blast.radius;
    }
    blast.radius * (blast.elapsed_ms / blast.duration_ms).clamp(0.0, 1.0)
}

/// Whether the blast is still expanding and may hit the player.
pub fn blast_live(blast: &DeathBlast) -> bool {
    blast.armed && !blast.landed && blast.elapsed_ms <= blast.duration_ms
}

/// Whether the blast (if any) no longer holds its owner in the world.
pub fn blast_finished(blast: Option<&DeathBlast>) -> bool {
    blast.map_or(true, |b| !b.armed || b.elapsed_ms >= b.duration_ms)
}
