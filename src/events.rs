//! Outbound events raised by the simulation
//!
//! The core never plays audio, updates a HUD, or talks to a backend.
//! Instead every `tick` returns the events that fired during that frame
//! and collaborators dispatch them however they like (fire-and-forget;
//! the simulation never waits on a consumer).

/// Named gameplay event raised when a clip reaches one of its trigger
/// frames (e.g. `{13: Impact}` on a creep attack clip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    /// Wind-up moment of an attack clip; plays a whoosh
    Swing,
    /// Contact moment of an attack clip; resolves damage
    Impact,
}

/// A sound the audio collaborator should play.
///
/// Several files exist per cue; `variant` picks one at random per play,
/// using the simulation's seeded RNG so runs stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Hero attack that connected with a creep
    HeroHit { variant: u32 },
    /// Hero attack that hit nothing
    HeroWhiff,
    /// Creep wind-up at its swing trigger frame
    CreepSwing { variant: u32 },
    /// Creep contact at its impact trigger frame
    CreepImpact { variant: u32 },
    /// Creep death cry
    CreepDeath,
}

/// Everything the outside world may care about from one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Play a sound
    Sound(SoundCue),
    /// Credit the reward collaborator; already rank-scaled
    RewardEarned { amount: u64 },
    /// The creep rank increased (kill threshold reached)
    RankUp { rank: u32 },
    /// A creep died; a replacement should arrive after the respawn delay
    RespawnRequested,
    /// The respawn delay elapsed and a fresh creep entered the stage
    CreepSpawned { kind: String, rank: u32 },
    /// Hero health reached zero; the session is over
    GameOver,
}
