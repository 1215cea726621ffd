//! Damage, shield and animation rules shared by every entity.
//!
//! These are the only functions allowed to change another entity's health.

use serde::{Deserialize, Serialize};

use crate::components::{Destruction, Health, RecentHit, Shield, ShieldTrigger, SpriteAnimation};
use crate::constants::*;
use crate::enums::{Lifecycle, ShieldOverflow};

/// Result of a single `take_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Target was not alive, or the amount was not positive.
    Ignored,
    /// Shield soaked the hit; hit points unchanged.
    Absorbed,
    /// Hit points reduced, target still alive.
    Damaged,
    /// Target transitioned from alive to dying on this call.
    Killed,
}

impl DamageOutcome {
    pub fn killed(&self) -> bool {
        matches!(self, DamageOutcome::Killed)
    }
}

pub fn new_health(max_hp: f64) -> Health {
    Health {
        hp: max_hp.max(0.0),
        max_hp: max_hp.max(0.0),
        state: Lifecycle::Alive,
    }
}

pub fn new_destruction() -> Destruction {
    Destruction {
        frame: 0,
        frame_count: DESTRUCTION_FRAME_COUNT,
        timer_ms: 0.0,
        frame_ms: DESTRUCTION_FRAME_MS,
    }
}

pub fn new_sprite_animation(frame_count: u32) -> SpriteAnimation {
    SpriteAnimation {
        frame: 0,
        frame_count: frame_count.max(1),
        timer_ms: 0.0,
        frame_ms: ANIMATION_FRAME_MS,
    }
}

/// Boss shield: raised by accumulated damage, timed, on a cooldown.
pub fn triggered_shield(
    threshold: f64,
    health: f64,
    duration_ms: f64,
    cooldown_ms: f64,
    window_ms: f64,
) -> Shield {
    Shield {
        active: false,
        health: 0.0,
        max_health: health,
        duration_ms: Some(duration_ms),
        remaining_ms: 0.0,
        cooldown_ms,
        cooldown_remaining_ms: 0.0,
        trigger: Some(ShieldTrigger {
            threshold,
            window_ms,
            recent_hits: Vec::new(),
        }),
    }
}

/// Apply `amount` damage, routing it through an active shield first.
///
/// No-op unless the target is alive. Hit points are floored at zero; reaching
/// zero moves the target to dying and restarts its destruction animation.
pub fn take_damage(
    health: &mut Health,
    destruction: &mut Destruction,
    mut shield: Option<&mut Shield>,
    amount: f64,
    overflow: ShieldOverflow,
) -> DamageOutcome {
    if health.state != Lifecycle::Alive || !amount.is_finite() || amount <= 0.0 {
        return DamageOutcome::Ignored;
    }

    let mut remaining = amount;
    if let Some(shield) = shield.as_deref_mut() {
        if shield.active {
            if shield.health > remaining {
                shield.health -= remaining;
                return DamageOutcome::Absorbed;
            }
            let excess = remaining - shield.health;
            shield.health = 0.0;
            shield.active = false;
            shield.remaining_ms = 0.0;
            shield.cooldown_remaining_ms = shield.cooldown_ms;
            match overflow {
                ShieldOverflow::Discard => return DamageOutcome::Absorbed,
                ShieldOverflow::CarryOver if excess <= 0.0 => return DamageOutcome::Absorbed,
                ShieldOverflow::CarryOver => remaining = excess,
            }
        }
    }

    health.hp = (health.hp - remaining).max(0.0);

    if let Some(shield) = shield {
        record_recent_damage(shield, remaining);
    }

    if health.hp <= 0.0 {
        health.state = Lifecycle::Dying;
        *destruction = Destruction {
            frame: 0,
            timer_ms: 0.0,
            ..*destruction
        };
        DamageOutcome::Killed
    } else {
        DamageOutcome::Damaged
    }
}

fn record_recent_damage(shield: &mut Shield, amount: f64) {
    let Some(trigger) = shield.trigger.as_mut() else {
        return;
    };
    trigger.recent_hits.push(RecentHit {
        amount,
        age_ms: 0.0,
    });
    if !shield.active
        && shield.cooldown_remaining_ms <= 0.0
        && recent_damage(trigger) > trigger.threshold
    {
        trigger.recent_hits.clear();
        shield.active = true;
        shield.health = shield.max_health;
        shield.remaining_ms = shield.duration_ms.unwrap_or(0.0);
    }
}

/// Damage taken within the trigger's rolling window.
pub fn recent_damage(trigger: &ShieldTrigger) -> f64 {
    trigger.recent_hits.iter().map(|hit| hit.amount).sum()
}

/// Raise a shield with a fresh pool. Used by the shield power-up.
pub fn activate_shield(shield: &mut Shield, health: f64) {
    shield.active = true;
    shield.health = health;
    shield.max_health = health;
    shield.remaining_ms = shield.duration_ms.unwrap_or(0.0);
}

/// Count down shield duration and cooldown, and age out old hits.
pub fn tick_shield(shield: &mut Shield, dt_ms: f64) {
    if shield.active {
        if shield.duration_ms.is_some() {
            shield.remaining_ms -= dt_ms;
            if shield.remaining_ms <= 0.0 {
                shield.active = false;
                shield.health = 0.0;
                shield.remaining_ms = 0.0;
                shield.cooldown_remaining_ms = shield.cooldown_ms;
            }
        }
    } else {
        shield.cooldown_remaining_ms = (shield.cooldown_remaining_ms - dt_ms).max(0.0);
    }

    if let Some(trigger) = shield.trigger.as_mut() {
        let window_ms = trigger.window_ms;
        for hit in &mut trigger.recent_hits {
            hit.age_ms += dt_ms;
        }
        trigger.recent_hits.retain(|hit| hit.age_ms < window_ms);
    }
}

/// Restore hit points, capped at max. Only affects living targets.
pub fn heal(health: &mut Health, amount: f64) {
    if health.state == Lifecycle::Alive && amount.is_finite() && amount > 0.0 {
        health.hp = (health.hp + amount).min(health.max_hp);
    }
}

/// Advance the destruction animation of a dying entity.
/// Returns true on the update the entity becomes dead.
pub fn advance_destruction(health: &mut Health, destruction: &mut Destruction, dt_ms: f64) -> bool {
    if health.state != Lifecycle::Dying {
        return false;
    }
    let frame_count = destruction.frame_count.max(1);
    destruction.timer_ms += dt_ms;
    while destruction.timer_ms >= destruction.frame_ms && destruction.frame < frame_count {
        destruction.timer_ms -= destruction.frame_ms;
        destruction.frame += 1;
    }
    if destruction.frame >= frame_count {
        destruction.frame = frame_count - 1;
        health.state = Lifecycle::Dead;
        return true;
    }
    false
}

/// Advance a looping animation; the frame index always wraps.
pub fn advance_sprite(animation: &mut SpriteAnimation, dt_ms: f64) {
    let frame_count = animation.frame_count.max(1);
    if animation.frame_ms <= 0.0 {
        animation.frame %= frame_count;
        return;
    }
    animation.timer_ms += dt_ms;
    if animation.timer_ms >= animation.frame_ms {
        let steps = (animation.timer_ms / animation.frame_ms).floor();
        animation.timer_ms -= steps * animation.frame_ms;
        animation.frame = (animation.frame + steps as u32) % frame_count;
    }
    animation.frame %= frame_count;
}
