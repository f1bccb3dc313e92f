//! Scroll Brawl - a side-scrolling hero-vs-creep combat core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (combat, animation, timers, scroll)
//! - `config`: Entity and clip templates with load-time validation
//! - `events`: Outbound events for HUD/audio/persistence collaborators
//!
//! The host render loop drives the whole simulation through
//! [`sim::tick`], once per frame, with the elapsed delta in milliseconds.
//! Nothing here renders, plays audio, or touches the network; those
//! concerns consume the returned [`events::GameEvent`] list and the
//! read-only snapshots on [`sim::SimState`].

pub mod config;
pub mod events;
pub mod sim;

pub use config::{ConfigError, Registry};
pub use events::{GameEvent, SoundCue};

/// Game configuration constants
pub mod consts {
    /// Baseline frame delta at 60 Hz (ms), used by tests and defaults
    pub const FRAME_DT_MS: f64 = 1000.0 / 60.0;

    /// Cooldown after energy hits zero before regen resumes (ms)
    pub const MANA_COOLDOWN_MS: f64 = 2000.0;
    /// Delay before a replacement creep spawns (ms)
    pub const RESPAWN_DELAY_MS: f64 = 3000.0;
    /// Poison on-hit: health regen suppression window (ms)
    pub const POISON_WINDOW_MS: f64 = 1000.0;

    /// Kills required before the creep rank increases
    pub const KILLS_PER_RANK: u32 = 100;
    /// Exponent tower applied to creep health/damage per rank
    pub const RANK_STAT_EXPONENT: f64 = 1.15;
    /// Exponent tower applied to kill rewards per rank
    pub const RANK_REWARD_EXPONENT: f64 = 1.07;

    /// Hero world position (px from the left stage edge)
    pub const HERO_X: f32 = 40.0;
    /// Stage width; fresh creeps enter at this x (px)
    pub const STAGE_WIDTH: f32 = 1920.0;
    /// Default world scroll speed (px/sec)
    pub const BASE_SCROLL_SPEED: f32 = 240.0;

    /// Easing factor for the HUD bar interpolation (per ms)
    pub const DISPLAY_EASE_PER_MS: f64 = 0.005;

    /// Number of randomized hero hit sound variants
    pub const HERO_HIT_SOUNDS: u32 = 5;
    /// Number of randomized creep wind-up sound variants
    pub const CREEP_SWING_SOUNDS: u32 = 8;
}
