//! Entity resource model
//!
//! Health and energy are continuous values clamped to their maxima at
//! every mutation; gameplay rounds them where whole points matter
//! (attacks need a full point of energy, spawns floor the rank curve).
//! Regen rates carry a current/base split so temporary suppression
//! (poison, the empty-energy cooldown) can zero the current rate and
//! restore the base later.

use serde::{Deserialize, Serialize};

use crate::consts::DISPLAY_EASE_PER_MS;

/// Rank scaling curve: `floor(base ^ (exponent ^ rank))`.
///
/// An exponent tower, not a product: each rank multiplies the exponent
/// itself, so growth accelerates sharply in the late game.
pub fn rank_scaled(base: f64, exponent: f64, rank: u32) -> f64 {
    base.powf(exponent.powi(rank as i32)).floor()
}

/// Mutable resource state owned by one entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStats {
    pub max_health: f64,
    pub health: f64,
    /// Current health regen per second; zeroed while poisoned
    pub health_regen: f64,
    pub base_health_regen: f64,

    pub max_energy: f64,
    pub energy: f64,
    /// Current energy regen per second; zeroed during the mana cooldown
    pub energy_regen: f64,
    pub base_energy_regen: f64,

    pub damage: f64,
    /// Health gained per attack command
    pub vampirism: f64,

    /// Smoothed values for HUD bars; ease upward, snap downward
    pub display_health: f64,
    pub display_energy: f64,
}

impl EntityStats {
    pub fn new(
        max_health: f64,
        health_regen: f64,
        max_energy: f64,
        energy_regen: f64,
        damage: f64,
        vampirism: f64,
    ) -> Self {
        Self {
            max_health,
            health: max_health,
            health_regen,
            base_health_regen: health_regen,
            max_energy,
            energy: max_energy,
            energy_regen,
            base_energy_regen: energy_regen,
            damage,
            vampirism,
            display_health: max_health,
            display_energy: max_energy,
        }
    }

    /// Stats for an entity without resource economies (creeps): health
    /// and damage only, no energy, no regen.
    pub fn flat(max_health: f64, damage: f64) -> Self {
        Self::new(max_health, 0.0, 0.0, 0.0, damage, 0.0)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Reduce health, clamped at zero.
    pub fn apply_damage(&mut self, amount: f64) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Restore health, clamped at the maximum.
    pub fn apply_heal(&mut self, amount: f64) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// Spend energy if the full amount is available. On failure nothing
    /// is mutated.
    pub fn spend_energy(&mut self, amount: f64) -> bool {
        if self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Per-frame regeneration. Suppression flags come from the combat
    /// rules (attacking without a collision regenerates nothing); a dead
    /// entity never regenerates health.
    pub fn regen_tick(&mut self, dt_ms: f64, suppress_health: bool, suppress_energy: bool) {
        let dt_secs = dt_ms / 1000.0;
        if self.health > 0.0 && self.health < self.max_health && !suppress_health {
            self.health = (self.health + self.health_regen * dt_secs).min(self.max_health);
        }
        if self.energy < self.max_energy && !suppress_energy {
            self.energy = (self.energy + self.energy_regen * dt_secs).min(self.max_energy);
        }
    }

    /// Ease the HUD display values toward the real ones: gains animate,
    /// losses snap. Energy easing is skipped mid-swing so the bar does
    /// not crawl during an attack.
    pub fn ease_display(&mut self, dt_ms: f64, smooth_energy: bool) {
        if self.display_health < self.health {
            self.display_health += (self.health - self.display_health) * dt_ms * DISPLAY_EASE_PER_MS;
        } else {
            self.display_health = self.health;
        }
        if self.display_energy < self.energy && smooth_energy {
            self.display_energy += (self.energy - self.display_energy) * dt_ms * DISPLAY_EASE_PER_MS;
        } else {
            self.display_energy = self.energy;
        }
    }
}
