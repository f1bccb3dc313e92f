//! Simulation state and entity construction
//!
//! All state that must survive between frames lives here: the hero, the
//! current creep, the scroll coordinator, rank progression, the
//! per-purpose pausable timers and the seeded RNG.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{ConfigError, CreepTemplate, HeroTemplate, OnHitModifier, Registry};
use crate::consts::*;
use crate::sim::clip::{AnimState, AnimationRuntime, ClipSet, FrameRect};
use crate::sim::scroll::ScrollSpeed;
use crate::sim::stats::{EntityStats, rank_scaled};
use crate::sim::timer::PausableTimer;

/// Session phase. GameOver is terminal; ticks become no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// Creep rank progression, carried across creep instances.
#[derive(Debug, Clone)]
pub struct Progression {
    /// Current creep power tier; monotonically non-decreasing
    pub rank: u32,
    /// Rolling 1-based kill counter within the current rank cycle
    pub creep_number: u32,
    /// Kills needed per rank
    pub kills_to_rank: u32,
}

impl Progression {
    pub fn new() -> Self {
        Self {
            rank: 0,
            creep_number: 1,
            kills_to_rank: KILLS_PER_RANK,
        }
    }

    /// Record a kill. Returns whether the rank just increased; future
    /// spawns use the new rank, the killed creep's reward does not.
    pub fn record_kill(&mut self) -> bool {
        let ranked_up = self.creep_number == self.kills_to_rank;
        if ranked_up {
            self.rank += 1;
        }
        self.creep_number = (self.creep_number % self.kills_to_rank) + 1;
        ranked_up
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

/// The player-controlled entity. Fixed on the left edge of the stage;
/// its stats persist for the whole session.
#[derive(Debug, Clone)]
pub struct Hero {
    pub kind: String,
    pub level: u32,
    pub stats: EntityStats,
    pub clips: ClipSet,
    pub anim: AnimationRuntime,
    pub x: f32,
    pub width: f32,
    pub reach_fraction: f32,
}

impl Hero {
    pub fn from_template(template: &HeroTemplate) -> Result<Self, ConfigError> {
        let clips = ClipSet::from_templates(&template.kind, &template.clips)?;
        Ok(Self {
            kind: template.kind.clone(),
            level: template.level,
            stats: EntityStats::new(
                template.max_health,
                template.health_regen,
                template.max_energy,
                template.energy_regen,
                template.damage,
                template.vampirism,
            ),
            clips,
            anim: AnimationRuntime::new(AnimState::Run),
            x: HERO_X,
            width: template.width,
            reach_fraction: template.reach_fraction,
        })
    }

    /// Right edge of the hero's attack reach.
    pub fn reach_x(&self) -> f32 {
        self.x + self.reach_fraction * self.width
    }

    pub fn is_attacking(&self) -> bool {
        self.anim.state == AnimState::Attack
    }

    /// Sheet rectangle of the current frame, for drawing.
    pub fn frame_rect(&self) -> FrameRect {
        self.clips.clip_for(self.anim.state).frame_rect(self.anim.frame_index)
    }
}

/// The current opponent. Enters at the right edge, drifts left with the
/// world, and is replaced after death by the respawn timer.
#[derive(Debug, Clone)]
pub struct Creep {
    pub kind: String,
    pub stats: EntityStats,
    pub clips: ClipSet,
    pub anim: AnimationRuntime,
    pub x: f32,
    pub width: f32,
    /// Base reward per kill, before the per-rank curve
    pub coins_earned: f64,
    pub on_hit: OnHitModifier,
    pub impact_variants: u32,
    pub is_alive: bool,
    pub is_dying: bool,
    pub is_colliding: bool,
}

impl Creep {
    /// Build a fresh creep with health and damage scaled to `rank`.
    pub fn from_template(template: &CreepTemplate, rank: u32) -> Result<Self, ConfigError> {
        let clips = ClipSet::from_templates(&template.kind, &template.clips)?;
        let health = rank_scaled(template.health, RANK_STAT_EXPONENT, rank);
        let damage = rank_scaled(template.damage, RANK_STAT_EXPONENT, rank);
        Ok(Self {
            kind: template.kind.clone(),
            stats: EntityStats::flat(health, damage),
            clips,
            anim: AnimationRuntime::new(AnimState::Idle),
            x: STAGE_WIDTH,
            width: template.width,
            coins_earned: template.coins_earned,
            on_hit: template.on_hit,
            impact_variants: template.impact_variants,
            is_alive: true,
            is_dying: false,
            is_colliding: false,
        })
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Sheet rectangle of the current frame, for drawing.
    pub fn frame_rect(&self) -> FrameRect {
        self.clips.clip_for(self.anim.state).frame_rect(self.anim.frame_index)
    }
}

/// Complete simulation state, advanced by [`crate::sim::tick`].
#[derive(Debug, Clone)]
pub struct SimState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Accumulated simulated time (ms)
    pub time_ms: f64,
    pub hero: Hero,
    pub creep: Creep,
    pub scroll: ScrollSpeed,
    pub progression: Progression,
    /// Pending energy-regen cooldown; present only while regen is zeroed
    pub mana_cooldown: Option<PausableTimer>,
    /// Pending poison window; present only while health regen is zeroed
    pub poison_window: Option<PausableTimer>,
    /// Pending replacement-creep delay; at most one at a time
    pub respawn_delay: Option<PausableTimer>,
    registry: Registry,
    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Start a session: hero from its template, the roster's starting
    /// creep at rank 0, world scrolling at the default speed.
    pub fn new(registry: Registry, hero_kind: &str, seed: u64) -> Result<Self, ConfigError> {
        let hero = Hero::from_template(registry.hero(hero_kind)?)?;
        let starting = registry.starting_creep()?.to_string();
        let creep = Creep::from_template(registry.creep(&starting)?, 0)?;
        log::info!("session start: hero {hero_kind}, first creep {starting}, seed {seed}");
        Ok(Self {
            seed,
            phase: GamePhase::Running,
            time_ms: 0.0,
            hero,
            creep,
            scroll: ScrollSpeed::new(BASE_SCROLL_SPEED),
            progression: Progression::new(),
            mana_cooldown: None,
            poison_window: None,
            respawn_delay: None,
            registry,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Replace the current creep with a fresh one of the given type at
    /// the current rank.
    pub fn spawn_creep(&mut self, kind: &str) -> Result<(), ConfigError> {
        let template = self.registry.creep(kind)?;
        self.creep = Creep::from_template(template, self.progression.rank)?;
        log::info!(
            "spawned creep {kind} at rank {} ({} hp, {} dmg)",
            self.progression.rank,
            self.creep.stats.max_health,
            self.creep.stats.damage
        );
        Ok(())
    }

    /// Pick a random creep type unlocked at the hero's level.
    pub(crate) fn random_unlocked_creep(&mut self) -> String {
        let pool = self.registry.unlocked_creeps(self.hero.level);
        if pool.is_empty() {
            log::warn!("no creep unlocked at level {}; reusing current type", self.hero.level);
            return self.creep.kind.clone();
        }
        let index = self.rng.random_range(0..pool.len());
        pool[index].to_string()
    }

    /// Pause every active timer. The owner of the pause transition must
    /// call this; ticks gated by a paused context do not advance timers,
    /// but the timers themselves must still be marked so their own
    /// pause/resume accounting stays exact.
    pub fn pause(&mut self) {
        for timer in [&mut self.mana_cooldown, &mut self.poison_window, &mut self.respawn_delay]
            .into_iter()
            .flatten()
        {
            if timer.pause() {
                log::debug!("timer paused ({:.0} ms remaining)", timer.remaining_ms());
            }
        }
    }

    /// Resume every timer paused by [`SimState::pause`].
    pub fn resume(&mut self) {
        for timer in [&mut self.mana_cooldown, &mut self.poison_window, &mut self.respawn_delay]
            .into_iter()
            .flatten()
        {
            timer.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_ranks_up_at_threshold() {
        let mut progression = Progression {
            rank: 0,
            creep_number: 1,
            kills_to_rank: 3,
        };
        assert!(!progression.record_kill());
        assert!(!progression.record_kill());
        assert!(progression.record_kill());
        assert_eq!(progression.rank, 1);
        // Counter rolls back around to 1
        assert_eq!(progression.creep_number, 1);
        assert!(!progression.record_kill());
    }

    #[test]
    fn test_creep_spawn_scales_with_rank() {
        let registry = Registry::default_roster();
        let template = registry.creep("gnarl").unwrap();

        let rank0 = Creep::from_template(template, 0).unwrap();
        assert_eq!(rank0.stats.max_health, 10.0);
        assert_eq!(rank0.stats.health, 10.0);

        let rank1 = Creep::from_template(template, 1).unwrap();
        assert_eq!(rank1.stats.max_health, 14.0);
        assert_eq!(rank1.stats.damage, 3.0); // floor(3^1.15) = floor(3.54)
    }

    #[test]
    fn test_new_session_starts_running_against_first_creep() {
        let state = SimState::new(Registry::default_roster(), "vanguard", 7).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.creep.kind, "gnarl");
        assert_eq!(state.hero.anim.state, AnimState::Run);
        assert!(!state.scroll.is_stopped());
    }

    #[test]
    fn test_unknown_hero_kind_is_fatal() {
        let result = SimState::new(Registry::default_roster(), "paladin", 7);
        assert!(matches!(result, Err(ConfigError::UnknownEntity(_))));
    }

    #[test]
    fn test_pause_resume_touch_all_timers() {
        let mut state = SimState::new(Registry::default_roster(), "vanguard", 7).unwrap();
        state.mana_cooldown = Some(PausableTimer::new(2000.0));
        state.respawn_delay = Some(PausableTimer::new(3000.0));

        state.pause();
        assert!(state.mana_cooldown.as_ref().unwrap().is_paused());
        assert!(state.respawn_delay.as_ref().unwrap().is_paused());

        state.resume();
        assert!(!state.mana_cooldown.as_ref().unwrap().is_paused());
        assert!(!state.respawn_delay.as_ref().unwrap().is_paused());
    }
}
