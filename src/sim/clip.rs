//! Animation clips and per-entity animation state
//!
//! A [`Clip`] is the validated, immutable form of a
//! [`ClipTemplate`](crate::config::ClipTemplate): frame timing, loop
//! behavior and the trigger-frame map. [`AnimationRuntime`] is the
//! mutable per-entity side: which state is playing, which frame it is
//! on, and how much of the current frame interval has elapsed.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::config::{ClipTemplate, ConfigError};
use crate::events::TriggerEvent;

/// Discrete animation states. `Run` exists only for the hero; creeps
/// idle in place while the world scrolls past them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Run,
    Attack,
    Death,
}

impl AnimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Run => "run",
            AnimState::Attack => "attack",
            AnimState::Death => "death",
        }
    }
}

/// Source rectangle of one frame within its sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub origin: Vec2,
    pub size: Vec2,
}

/// A validated animation clip. Immutable after construction; entities
/// reference clips, they never mutate them.
#[derive(Debug, Clone)]
pub struct Clip {
    pub total_frames: u32,
    pub frames_per_row: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub frame_interval_ms: f64,
    pub looping: bool,
    /// Last meaningful frame; non-looping clips report completion once
    /// the play head sits here
    pub end_frame: u32,
    pub triggers: BTreeMap<u32, TriggerEvent>,
}

impl Clip {
    /// Build from a template, re-checking the template invariants so a
    /// clip constructed directly is as trustworthy as a registry one.
    pub fn from_template(entity: &str, name: &str, template: &ClipTemplate) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidClip {
            entity: entity.to_string(),
            clip: name.to_string(),
            reason,
        };
        if template.total_frames == 0 || template.frames_per_row == 0 {
            return Err(invalid("zero frames".into()));
        }
        if template.frame_interval_ms <= 0.0 {
            return Err(invalid("non-positive frame interval".into()));
        }
        let end_frame = template.end_frame.unwrap_or(template.total_frames - 1);
        if end_frame >= template.total_frames {
            return Err(invalid(format!(
                "end frame {end_frame} >= total frames {}",
                template.total_frames
            )));
        }
        for &frame in template.triggers.keys() {
            if frame >= template.total_frames {
                return Err(invalid(format!(
                    "trigger frame {frame} >= total frames {}",
                    template.total_frames
                )));
            }
        }
        Ok(Self {
            total_frames: template.total_frames,
            frames_per_row: template.frames_per_row,
            frame_width: template.frame_width,
            frame_height: template.frame_height,
            frame_interval_ms: template.frame_interval_ms,
            looping: template.looping,
            end_frame,
            triggers: template.triggers.clone(),
        })
    }

    /// Sheet rectangle for a frame, for the render collaborator.
    pub fn frame_rect(&self, frame: u32) -> FrameRect {
        let col = frame % self.frames_per_row;
        let row = frame / self.frames_per_row;
        FrameRect {
            origin: Vec2::new(
                (col * self.frame_width) as f32,
                (row * self.frame_height) as f32,
            ),
            size: Vec2::new(self.frame_width as f32, self.frame_height as f32),
        }
    }
}

/// The clips one entity can play, resolved and validated at
/// construction. `run` is hero-only; `death` is optional for the hero
/// (some hero sheets ship without one) and required for creeps.
#[derive(Debug, Clone)]
pub struct ClipSet {
    pub idle: Clip,
    pub run: Option<Clip>,
    pub attack: Clip,
    pub death: Option<Clip>,
}

impl ClipSet {
    pub fn from_templates(
        entity: &str,
        clips: &BTreeMap<String, ClipTemplate>,
    ) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<Clip, ConfigError> {
            let template = clips.get(name).ok_or(ConfigError::MissingClip {
                entity: entity.to_string(),
                clip: name,
            })?;
            Clip::from_template(entity, name, template)
        };
        let optional = |name: &str| -> Result<Option<Clip>, ConfigError> {
            clips
                .get(name)
                .map(|t| Clip::from_template(entity, name, t))
                .transpose()
        };
        Ok(Self {
            idle: required("idle")?,
            run: optional("run")?,
            attack: required("attack")?,
            death: optional("death")?,
        })
    }

    /// Clip for a state. States are only entered when their clip exists,
    /// so the idle fallback here is unreachable in practice.
    pub fn clip_for(&self, state: AnimState) -> &Clip {
        match state {
            AnimState::Idle => &self.idle,
            AnimState::Run => self.run.as_ref().unwrap_or(&self.idle),
            AnimState::Attack => &self.attack,
            AnimState::Death => self.death.as_ref().unwrap_or(&self.idle),
        }
    }

    pub fn has(&self, state: AnimState) -> bool {
        match state {
            AnimState::Idle | AnimState::Attack => true,
            AnimState::Run => self.run.is_some(),
            AnimState::Death => self.death.is_some(),
        }
    }
}

/// Result of advancing an animation one frame-interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipProgress {
    /// A non-looping clip reached its end this tick
    pub completed: bool,
}

/// Mutable animation state owned by one entity.
#[derive(Debug, Clone)]
pub struct AnimationRuntime {
    pub state: AnimState,
    pub frame_index: u32,
    pub frame_time_ms: f64,
    /// Set once a death clip lands on its final frame; the entity then
    /// ignores all further animation and control input
    pub inert: bool,
}

impl AnimationRuntime {
    pub fn new(state: AnimState) -> Self {
        Self {
            state,
            frame_index: 0,
            frame_time_ms: 0.0,
            inert: false,
        }
    }

    /// Switch state, restarting the clip and re-arming its triggers.
    /// Death is terminal: once there (or inert) no switch is honored,
    /// so stray control calls on dead entities are harmless no-ops.
    pub fn set_state(&mut self, clips: &ClipSet, state: AnimState) {
        if self.inert || self.state == AnimState::Death {
            return;
        }
        if !clips.has(state) {
            // No sheet for this state (hero death): hold the current
            // frame and go permanently inert instead.
            if state == AnimState::Death {
                self.state = AnimState::Death;
                self.inert = true;
            }
            return;
        }
        self.state = state;
        self.frame_index = 0;
        self.frame_time_ms = 0.0;
    }

    /// Restart the current clip from frame zero (attack -> attack).
    pub fn restart(&mut self) {
        if self.inert {
            return;
        }
        self.frame_index = 0;
        self.frame_time_ms = 0.0;
    }

    /// Advance by the frame delta: at most one frame per tick, firing
    /// the trigger mapped to a newly reached frame exactly once per
    /// pass.
    pub fn advance(
        &mut self,
        clips: &ClipSet,
        dt_ms: f64,
        fired: &mut Vec<TriggerEvent>,
    ) -> ClipProgress {
        let mut progress = ClipProgress::default();
        if self.inert {
            return progress;
        }
        let clip = clips.clip_for(self.state);
        self.frame_time_ms += dt_ms;
        if self.frame_time_ms <= clip.frame_interval_ms {
            return progress;
        }
        self.frame_time_ms = 0.0;

        if self.state == AnimState::Death {
            // Death clips clamp at their last frame and latch inert there
            if self.frame_index < clip.total_frames - 1 {
                self.frame_index += 1;
                if self.frame_index == clip.total_frames - 1 {
                    self.inert = true;
                }
            }
            return progress;
        }

        if clip.looping {
            self.frame_index = (self.frame_index + 1) % clip.total_frames;
            if let Some(&event) = clip.triggers.get(&self.frame_index) {
                fired.push(event);
            }
        } else if self.frame_index < clip.end_frame {
            self.frame_index += 1;
            if let Some(&event) = clip.triggers.get(&self.frame_index) {
                fired.push(event);
            }
        } else {
            progress.completed = true;
        }
        progress
    }
}
