//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by the host's per-frame delta
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod clip;
pub mod collision;
pub mod scroll;
pub mod state;
pub mod stats;
pub mod tick;
pub mod timer;

pub use clip::{AnimState, AnimationRuntime, Clip, ClipSet, FrameRect};
pub use collision::overlaps;
pub use scroll::ScrollSpeed;
pub use state::{Creep, GamePhase, Hero, Progression, SimState};
pub use stats::{EntityStats, rank_scaled};
pub use tick::{SimContext, TickInput, tick};
pub use timer::PausableTimer;
