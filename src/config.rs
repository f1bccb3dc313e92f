//! Entity and clip templates
//!
//! Templates are plain configuration data: base stats, sprite-sheet clip
//! layouts with trigger-frame maps, and per-type on-hit modifiers, keyed
//! by type name. The registry validates everything up front: a bad
//! trigger frame or a missing required clip is fatal at load time, never
//! at tick time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::TriggerEvent;

/// Fatal configuration problems, surfaced at registry load or entity
/// construction. Nothing else in the crate errors for control flow.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),
    #[error("entity {entity} is missing required clip \"{clip}\"")]
    MissingClip { entity: String, clip: &'static str },
    #[error("clip \"{clip}\" of {entity}: {reason}")]
    InvalidClip {
        entity: String,
        clip: String,
        reason: String,
    },
    #[error("no creep type is unlocked at level {0}")]
    EmptyRoster(u32),
    #[error("template parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One animation clip as configured: sheet layout, timing, loop flag and
/// the trigger-frame map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipTemplate {
    pub frame_width: u32,
    pub frame_height: u32,
    pub total_frames: u32,
    pub frames_per_row: u32,
    pub frame_interval_ms: f64,
    /// Looping clips wrap back to frame 0; non-looping clips hold
    #[serde(default)]
    pub looping: bool,
    /// Non-looping clips may end early (the hero swing settles several
    /// frames before the sheet runs out)
    #[serde(default)]
    pub end_frame: Option<u32>,
    /// Frame index -> named gameplay event, fired once per pass
    #[serde(default)]
    pub triggers: BTreeMap<u32, TriggerEvent>,
}

impl ClipTemplate {
    fn validate(&self, entity: &str, clip: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidClip {
            entity: entity.to_string(),
            clip: clip.to_string(),
            reason,
        };
        if self.total_frames == 0 {
            return Err(invalid("zero frames".into()));
        }
        if self.frames_per_row == 0 {
            return Err(invalid("zero frames per row".into()));
        }
        if self.frame_interval_ms <= 0.0 {
            return Err(invalid(format!(
                "non-positive frame interval {}",
                self.frame_interval_ms
            )));
        }
        if let Some(end) = self.end_frame
            && end >= self.total_frames
        {
            return Err(invalid(format!(
                "end frame {end} >= total frames {}",
                self.total_frames
            )));
        }
        for &frame in self.triggers.keys() {
            if frame >= self.total_frames {
                return Err(invalid(format!(
                    "trigger frame {frame} >= total frames {}",
                    self.total_frames
                )));
            }
        }
        Ok(())
    }
}

/// What landing a creep hit does to the hero besides raw damage.
///
/// Effects are data interpreted by the combat resolver, not behavior
/// captured in the template.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnHitModifier {
    #[default]
    None,
    /// Suppress hero health regen for a window after each hit
    Poison { duration_ms: f64 },
    /// Drain hero energy, but only while the hero holds at least
    /// `min_energy` (small reserves are spared)
    ManaBurn { amount: f64, min_energy: f64 },
}

/// Hero base stats and clips. Health and energy start at their maxima.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub kind: String,
    pub damage: f64,
    pub max_health: f64,
    pub health_regen: f64,
    pub max_energy: f64,
    pub energy_regen: f64,
    /// Health gained per attack command
    pub vampirism: f64,
    /// Hero progression level; gates which creep types can spawn
    #[serde(default)]
    pub level: u32,
    /// Sprite width in world px
    pub width: f32,
    /// Fraction of `width` that counts as attack reach in the collision
    /// predicate
    pub reach_fraction: f32,
    /// Requires "idle", "run" and "attack"; "death" is optional
    pub clips: BTreeMap<String, ClipTemplate>,
}

/// Creep base stats and clips; health and damage are rank-scaled at
/// spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreepTemplate {
    pub kind: String,
    /// Minimum hero level before this type enters the spawn pool
    pub unlocked_level: u32,
    pub damage: f64,
    pub health: f64,
    /// Base reward per kill, before the per-rank curve
    pub coins_earned: f64,
    /// Sprite width in world px
    pub width: f32,
    #[serde(default)]
    pub on_hit: OnHitModifier,
    /// How many impact sound files exist for this type
    #[serde(default = "default_impact_variants")]
    pub impact_variants: u32,
    /// Requires "idle", "attack" and "death"
    pub clips: BTreeMap<String, ClipTemplate>,
}

fn default_impact_variants() -> u32 {
    8
}

/// JSON document shape accepted by [`Registry::from_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDoc {
    pub heroes: Vec<HeroTemplate>,
    pub creeps: Vec<CreepTemplate>,
}

/// Validated template registry. Lookup by type name; lookups for names
/// that were never registered fail loudly rather than defaulting.
#[derive(Debug, Clone)]
pub struct Registry {
    heroes: BTreeMap<String, HeroTemplate>,
    creeps: BTreeMap<String, CreepTemplate>,
}

impl Registry {
    /// Build a registry, validating every clip and required clip slot.
    pub fn from_templates(
        heroes: Vec<HeroTemplate>,
        creeps: Vec<CreepTemplate>,
    ) -> Result<Self, ConfigError> {
        for hero in &heroes {
            for required in ["idle", "run", "attack"] {
                if !hero.clips.contains_key(required) {
                    return Err(ConfigError::MissingClip {
                        entity: hero.kind.clone(),
                        clip: required,
                    });
                }
            }
            for (name, clip) in &hero.clips {
                clip.validate(&hero.kind, name)?;
            }
        }
        for creep in &creeps {
            for required in ["idle", "attack", "death"] {
                if !creep.clips.contains_key(required) {
                    return Err(ConfigError::MissingClip {
                        entity: creep.kind.clone(),
                        clip: required,
                    });
                }
            }
            for (name, clip) in &creep.clips {
                clip.validate(&creep.kind, name)?;
            }
        }
        Ok(Self {
            heroes: heroes.into_iter().map(|h| (h.kind.clone(), h)).collect(),
            creeps: creeps.into_iter().map(|c| (c.kind.clone(), c)).collect(),
        })
    }

    /// Load and validate a registry from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: RegistryDoc = serde_json::from_str(json)?;
        Self::from_templates(doc.heroes, doc.creeps)
    }

    pub fn hero(&self, kind: &str) -> Result<&HeroTemplate, ConfigError> {
        self.heroes
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownEntity(kind.to_string()))
    }

    pub fn creep(&self, kind: &str) -> Result<&CreepTemplate, ConfigError> {
        self.creeps
            .get(kind)
            .ok_or_else(|| ConfigError::UnknownEntity(kind.to_string()))
    }

    /// Creep types available at the given hero level, in stable
    /// (alphabetical) order.
    pub fn unlocked_creeps(&self, level: u32) -> Vec<&str> {
        self.creeps
            .values()
            .filter(|c| c.unlocked_level <= level)
            .map(|c| c.kind.as_str())
            .collect()
    }

    /// The type a fresh session opens against: the lowest unlock level,
    /// name as tiebreak.
    pub fn starting_creep(&self) -> Result<&str, ConfigError> {
        self.creeps
            .values()
            .min_by_key(|c| (c.unlocked_level, c.kind.as_str()))
            .map(|c| c.kind.as_str())
            .ok_or(ConfigError::EmptyRoster(0))
    }

    /// The built-in roster: one hero and six creep types.
    pub fn default_roster() -> Self {
        let heroes = vec![HeroTemplate {
            kind: "vanguard".into(),
            damage: 1.0,
            max_health: 30.0,
            health_regen: 1.0,
            max_energy: 10.0,
            energy_regen: 1.0,
            vampirism: 0.0,
            level: 0,
            width: 260.0,
            reach_fraction: 0.4,
            clips: BTreeMap::from([
                ("run".into(), hero_clip(21, 7, 40.0, true, None)),
                ("idle".into(), hero_clip(35, 6, 40.0, true, None)),
                // The swing settles five frames before the sheet ends
                ("attack".into(), hero_clip(34, 6, 30.0, false, Some(29))),
            ]),
        }];

        let creeps = vec![
            CreepTemplate {
                kind: "gnarl".into(),
                unlocked_level: 0,
                damage: 3.0,
                health: 10.0,
                coins_earned: 1.0,
                width: 300.0,
                on_hit: OnHitModifier::None,
                impact_variants: 8,
                clips: creep_clips(
                    (52, 8, 20.0),
                    (29, 6, 30.0, 4, 13),
                    (29, 6, 40.0),
                ),
            },
            CreepTemplate {
                kind: "thistle".into(),
                unlocked_level: 1,
                damage: 2.0,
                health: 15.0,
                coins_earned: 1.0,
                width: 340.0,
                on_hit: OnHitModifier::None,
                impact_variants: 8,
                clips: creep_clips(
                    (24, 5, 40.0),
                    (27, 6, 30.0, 5, 11),
                    (28, 6, 30.0),
                ),
            },
            CreepTemplate {
                kind: "bruin".into(),
                unlocked_level: 2,
                damage: 1.0,
                health: 10.0,
                coins_earned: 1.0,
                width: 300.0,
                on_hit: OnHitModifier::None,
                impact_variants: 3,
                clips: creep_clips(
                    (27, 6, 40.0),
                    (21, 5, 20.0, 10, 11),
                    (24, 5, 30.0),
                ),
            },
            CreepTemplate {
                kind: "howler".into(),
                unlocked_level: 3,
                damage: 5.0,
                health: 5.0,
                coins_earned: 1.0,
                width: 280.0,
                on_hit: OnHitModifier::None,
                impact_variants: 3,
                clips: creep_clips(
                    (23, 5, 40.0),
                    (21, 7, 40.0, 6, 8),
                    (18, 6, 40.0),
                ),
            },
            CreepTemplate {
                kind: "marrow".into(),
                unlocked_level: 4,
                damage: 2.0,
                health: 7.0,
                coins_earned: 1.0,
                width: 300.0,
                on_hit: OnHitModifier::ManaBurn {
                    amount: 2.0,
                    min_energy: 2.0,
                },
                impact_variants: 8,
                clips: creep_clips(
                    (34, 5, 40.0),
                    (25, 5, 30.0, 5, 11),
                    (31, 8, 30.0),
                ),
            },
            CreepTemplate {
                kind: "wither".into(),
                unlocked_level: 5,
                damage: 2.0,
                health: 10.0,
                coins_earned: 1.0,
                width: 300.0,
                on_hit: OnHitModifier::Poison {
                    duration_ms: crate::consts::POISON_WINDOW_MS,
                },
                impact_variants: 8,
                clips: creep_clips(
                    (34, 5, 40.0),
                    (25, 5, 30.0, 5, 11),
                    (31, 8, 30.0),
                ),
            },
        ];

        // The literal roster above is covered by tests; validation
        // cannot fail for it.
        match Self::from_templates(heroes, creeps) {
            Ok(registry) => registry,
            Err(err) => unreachable!("default roster failed validation: {err}"),
        }
    }
}

fn hero_clip(
    total_frames: u32,
    frames_per_row: u32,
    frame_interval_ms: f64,
    looping: bool,
    end_frame: Option<u32>,
) -> ClipTemplate {
    ClipTemplate {
        frame_width: 512,
        frame_height: 512,
        total_frames,
        frames_per_row,
        frame_interval_ms,
        looping,
        end_frame,
        triggers: BTreeMap::new(),
    }
}

/// Creep clip triple: idle (frames, per-row, interval), attack with its
/// swing/impact trigger frames, death.
fn creep_clips(
    idle: (u32, u32, f64),
    attack: (u32, u32, f64, u32, u32),
    death: (u32, u32, f64),
) -> BTreeMap<String, ClipTemplate> {
    let sheet = |total_frames, frames_per_row, frame_interval_ms, looping, triggers| ClipTemplate {
        frame_width: 1024,
        frame_height: 1024,
        total_frames,
        frames_per_row,
        frame_interval_ms,
        looping,
        end_frame: None,
        triggers,
    };
    let (swing, impact) = (attack.3, attack.4);
    BTreeMap::from([
        ("idle".into(), sheet(idle.0, idle.1, idle.2, true, BTreeMap::new())),
        (
            "attack".into(),
            sheet(
                attack.0,
                attack.1,
                attack.2,
                true,
                BTreeMap::from([(swing, TriggerEvent::Swing), (impact, TriggerEvent::Impact)]),
            ),
        ),
        ("death".into(), sheet(death.0, death.1, death.2, false, BTreeMap::new())),
    ])
}
