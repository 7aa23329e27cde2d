//! Input doubles and sample builders.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use tortellini::input::{ButtonState, InputSample, InputSource};

/// Clonable input source; every clone reads the same sample.
///
/// Hand one clone to the player and keep another to steer it.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use tortellini::input::InputSource;
/// use test_utils::{Sample, SharedInput};
///
/// let steering = SharedInput::default();
/// let mut source = steering.clone();
/// steering.set(Sample::towards(1.0, 0.0).build());
/// assert_eq!(source.sample().direction, Vec2::X);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedInput {
    sample: Arc<Mutex<InputSample>>,
}

impl SharedInput {
    /// Source starting with `sample`.
    pub fn new(sample: InputSample) -> Self {
        Self {
            sample: Arc::new(Mutex::new(sample)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InputSample> {
        self.sample.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the sample read on the next tick.
    pub fn set(&self, sample: InputSample) {
        *self.lock() = sample;
    }

    /// Edits the sample read on the next tick.
    pub fn update(&self, edit: impl FnOnce(&mut InputSample)) {
        edit(&mut self.lock());
    }

    /// Sample the next tick will read.
    pub fn current(&self) -> InputSample {
        *self.lock()
    }
}

impl InputSource for SharedInput {
    fn sample(&mut self) -> InputSample {
        self.current()
    }
}

/// Builder for [`InputSample`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sample(InputSample);

impl Sample {
    /// Nothing held.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Stick held at `(x, y)`.
    pub fn towards(x: f32, y: f32) -> Self {
        Self(InputSample {
            direction: Vec2::new(x, y),
            ..InputSample::default()
        })
    }

    /// Right held.
    pub fn right() -> Self {
        Self::towards(1.0, 0.0)
    }

    /// Left held.
    pub fn left() -> Self {
        Self::towards(-1.0, 0.0)
    }

    /// Down held.
    pub fn down() -> Self {
        Self::towards(0.0, -1.0)
    }

    /// Run held.
    pub fn running(mut self) -> Self {
        self.0.run = ButtonState::held();
        self
    }

    /// Jump pressed on this tick.
    pub fn jump_pressed(mut self) -> Self {
        self.0.jump = ButtonState::pressed();
        self
    }

    /// Jump held since an earlier tick.
    pub fn jump_held(mut self) -> Self {
        self.0.jump = ButtonState::held();
        self
    }

    /// Spin jump pressed on this tick.
    pub fn spin_pressed(mut self) -> Self {
        self.0.alt_jump = ButtonState::pressed();
        self
    }

    /// The finished sample.
    pub fn build(self) -> InputSample {
        self.0
    }
}

impl From<Sample> for InputSample {
    fn from(sample: Sample) -> Self {
        sample.build()
    }
}
