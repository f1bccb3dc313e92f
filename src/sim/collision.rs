//! Collision and combat resolution
//!
//! Engagement is a horizontal overlap test between the hero's reach and
//! the creep's span. The rising edge stops the world and puts the creep
//! on the offensive; damage itself is event-driven. Creep hits land on
//! their clip's impact trigger frame, hero hits land on the attack
//! command that started the swing.

use crate::consts::*;
use crate::events::{GameEvent, SoundCue};
use crate::sim::clip::AnimState;
use crate::sim::state::{Creep, Hero, SimState};
use crate::sim::stats::rank_scaled;
use crate::sim::timer::PausableTimer;
use crate::config::OnHitModifier;

use rand::Rng;

/// Horizontal overlap predicate: the hero's effective reach must cross
/// the creep's left edge while the hero itself is not past the creep's
/// right edge.
pub fn overlaps(hero: &Hero, creep: &Creep) -> bool {
    hero.reach_x() >= creep.x && hero.x <= creep.right_edge()
}

/// Detect engagement edges and apply the locomotion coupling between
/// scroll state and the hero's idle/run animation. Dying creeps freeze
/// their collision flag; nothing re-triggers off a corpse.
pub(crate) fn resolve_engagement(state: &mut SimState) {
    if state.creep.is_dying || !state.creep.is_alive {
        return;
    }

    let colliding = overlaps(&state.hero, &state.creep);
    if colliding && !state.creep.is_colliding {
        // Engagement begins: world halts, creep goes on the attack
        state.creep.is_colliding = true;
        state.scroll.stop();
        let Creep { anim, clips, .. } = &mut state.creep;
        anim.set_state(clips, AnimState::Attack);
        log::debug!("engaged {} at x {:.0}", state.creep.kind, state.creep.x);
    } else if !colliding && state.creep.is_colliding {
        // Engagement ends: creep stands down; the world resumes unless
        // the hero is mid-swing (the swing's end restores it instead)
        state.creep.is_colliding = false;
        let Creep { anim, clips, .. } = &mut state.creep;
        anim.set_state(clips, AnimState::Idle);
        if !state.hero.is_attacking() {
            state.scroll.resume();
            let Hero { anim, clips, .. } = &mut state.hero;
            anim.set_state(clips, AnimState::Idle);
        }
    }

    // Locomotion coupling: engaged heroes stand, disengaged heroes run
    // while the world moves
    if state.creep.is_colliding && state.hero.anim.state == AnimState::Run {
        let Hero { anim, clips, .. } = &mut state.hero;
        anim.set_state(clips, AnimState::Idle);
    } else if !state.creep.is_colliding
        && state.hero.anim.state == AnimState::Idle
        && !state.scroll.is_stopped()
    {
        let Hero { anim, clips, .. } = &mut state.hero;
        anim.set_state(clips, AnimState::Run);
    }
}

/// Resolve the hero's attack command.
///
/// With a whole point of energy the swing costs 1, heals vampirism and,
/// only against a living colliding creep, deals damage. Without the
/// energy the swing still plays as a whiff, exchanging nothing. Whiffs
/// stop the world for the duration of the swing.
pub(crate) fn hero_attack_command(state: &mut SimState, events: &mut Vec<GameEvent>) {
    if state.hero.anim.inert || state.hero.anim.state == AnimState::Death {
        return; // tolerate input races against a fallen hero
    }
    let engaged =
        state.creep.is_colliding && state.creep.is_alive && !state.creep.is_dying;

    let powered = state.hero.stats.spend_energy(1.0);
    if powered {
        let vampirism = state.hero.stats.vampirism;
        state.hero.stats.apply_heal(vampirism);
    }

    // The swing animation plays either way; a repeat command mid-swing
    // restarts the clip and re-arms its triggers
    if state.hero.anim.state == AnimState::Attack {
        state.hero.anim.restart();
    } else {
        let Hero { anim, clips, .. } = &mut state.hero;
        anim.set_state(clips, AnimState::Attack);
    }

    if powered && engaged {
        let variant = state.rng.random_range(1..=HERO_HIT_SOUNDS);
        events.push(GameEvent::Sound(SoundCue::HeroHit { variant }));
        let damage = state.hero.stats.damage;
        state.creep.stats.apply_damage(damage);
        if state.creep.stats.is_dead() {
            kill_creep(state, events);
        }
    } else {
        if !engaged {
            state.scroll.stop();
        }
        events.push(GameEvent::Sound(SoundCue::HeroWhiff));
    }

    if powered && state.hero.stats.energy <= 0.0 {
        // Ran dry: regen halts until the cooldown elapses. A fresh
        // cooldown replaces any pending one.
        state.hero.stats.energy = 0.0;
        state.hero.stats.energy_regen = 0.0;
        state.mana_cooldown = Some(PausableTimer::new(MANA_COOLDOWN_MS));
        log::debug!("energy exhausted; regen resumes in {MANA_COOLDOWN_MS} ms");
    }
}

/// Creep death sequencing, in fixed order: credit the reward (at the
/// rank the creep was killed at), advance the kill counter / rank, then
/// request the respawn.
fn kill_creep(state: &mut SimState, events: &mut Vec<GameEvent>) {
    {
        let Creep { anim, clips, .. } = &mut state.creep;
        anim.set_state(clips, AnimState::Death);
    }
    state.creep.is_alive = false;
    state.creep.is_dying = true;
    events.push(GameEvent::Sound(SoundCue::CreepDeath));

    let reward = rank_scaled(
        state.creep.coins_earned,
        RANK_REWARD_EXPONENT,
        state.progression.rank,
    ) as u64;
    events.push(GameEvent::RewardEarned { amount: reward });

    let kill_number = state.progression.creep_number;
    if state.progression.record_kill() {
        log::info!("creep rank increased to {}", state.progression.rank);
        events.push(GameEvent::RankUp {
            rank: state.progression.rank,
        });
    }

    events.push(GameEvent::RespawnRequested);
    if state.respawn_delay.is_none() {
        state.respawn_delay = Some(PausableTimer::new(RESPAWN_DELAY_MS));
    }
    log::debug!(
        "creep {} destroyed (kill {} of {})",
        state.creep.kind,
        kill_number,
        state.progression.kills_to_rank,
    );
}

/// Creep wind-up trigger: purely audible.
pub(crate) fn creep_swing(state: &mut SimState, events: &mut Vec<GameEvent>) {
    if !state.creep.is_alive || state.creep.is_dying {
        return;
    }
    let variant = state.rng.random_range(0..CREEP_SWING_SOUNDS);
    events.push(GameEvent::Sound(SoundCue::CreepSwing { variant }));
}

/// Creep impact trigger: the hit lands if the engagement still holds.
pub(crate) fn creep_impact(state: &mut SimState, events: &mut Vec<GameEvent>) {
    if !state.creep.is_colliding || !state.creep.is_alive || state.creep.is_dying {
        return;
    }
    if state.hero.stats.is_dead() {
        return;
    }

    let damage = state.creep.stats.damage;
    state.hero.stats.apply_damage(damage);

    match state.creep.on_hit {
        OnHitModifier::None => {}
        OnHitModifier::Poison { duration_ms } => {
            // Each hit re-opens the no-heal window
            state.hero.stats.health_regen = 0.0;
            state.poison_window = Some(PausableTimer::new(duration_ms));
        }
        OnHitModifier::ManaBurn { amount, min_energy } => {
            if state.hero.stats.energy >= min_energy {
                state.hero.stats.energy = (state.hero.stats.energy - amount).max(0.0);
            }
        }
    }

    let variant = if state.creep.impact_variants > 0 {
        state.rng.random_range(0..state.creep.impact_variants)
    } else {
        0
    };
    events.push(GameEvent::Sound(SoundCue::CreepImpact { variant }));
}
