//! Animation intents handed to the visual collaborator.
//!
//! The state machine never drives sprites itself; it latches the latest
//! intent and facing, and the frame tick forwards them to an
//! [`AnimationSink`] once per frame.

use std::fmt;

/// Symbolic animation names understood by the visual collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    /// Standing still.
    Idle,
    /// Walking or running.
    Walk,
    /// Sprinting after a sustained run.
    LongRun,
    /// Skidding against the held direction.
    Turn,
    /// Regular jump.
    Jump,
    /// Jump launched from a long run.
    HighJump,
    /// Spinning jump.
    SpinJump,
    /// Falling.
    Fall,
    /// Crouching, or curled up mid-air.
    Crouch,
    /// Sliding down a slope.
    Slide,
}

impl Animation {
    /// Name of the animation clip.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Walk => "Walk",
            Self::LongRun => "LongRun",
            Self::Turn => "Turn",
            Self::Jump => "Jump",
            Self::HighJump => "HighJump",
            Self::SpinJump => "SpinJump",
            Self::Fall => "Fall",
            Self::Crouch => "Crouch",
            Self::Slide => "Slide",
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which clip to play and, for locomotion clips, how fast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationIntent {
    /// Clip to play.
    pub animation: Animation,
    /// Playback speed derived from the current speed, if any.
    pub speed: Option<f32>,
}

impl AnimationIntent {
    /// Clip played at its authored speed.
    #[must_use]
    pub const fn plain(animation: Animation) -> Self {
        Self {
            animation,
            speed: None,
        }
    }

    /// Clip played at `speed`.
    #[must_use]
    pub const fn with_speed(animation: Animation, speed: f32) -> Self {
        Self {
            animation,
            speed: Some(speed),
        }
    }
}

impl Default for AnimationIntent {
    fn default() -> Self {
        Self::plain(Animation::Idle)
    }
}

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Facing negative x; sprites are mirrored.
    Left,
    /// Facing positive x.
    #[default]
    Right,
}

impl Facing {
    /// Whether a sprite authored facing right must be mirrored.
    #[must_use]
    pub const fn flip_h(self) -> bool {
        matches!(self, Self::Left)
    }

    /// Facing implied by the sign of `x`, or `None` for zero.
    #[must_use]
    pub fn from_x(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Self::Right)
        } else if x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Visual collaborator receiving one intent per frame.
pub trait AnimationSink: Send {
    /// Plays (or keeps playing) the given clip.
    fn play(&mut self, intent: AnimationIntent);
    /// Mirrors the sprite to match `facing`.
    fn face(&mut self, facing: Facing);
}
