//! Normalised per-tick input.
//!
//! The core never polls devices. A host produces one [`InputSample`] per
//! physics tick through an [`InputSource`]; [`BoundInput`] is a ready-made
//! source that turns named actions polled from any [`RawActions`] backend
//! into samples, deriving the edge-triggered `just_pressed` flags itself.

use glam::Vec2;

/// Held and just-pressed flags for one logical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// The button is down this tick.
    pub held: bool,
    /// The button went from released to held on this tick.
    pub just_pressed: bool,
}

impl ButtonState {
    /// Pressed on this very tick.
    #[must_use]
    pub const fn pressed() -> Self {
        Self {
            held: true,
            just_pressed: true,
        }
    }

    /// Held since an earlier tick.
    #[must_use]
    pub const fn held() -> Self {
        Self {
            held: true,
            just_pressed: false,
        }
    }

    /// Not held.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            held: false,
            just_pressed: false,
        }
    }

    /// Derives the state for this tick from the previous tick's `held` flag.
    #[must_use]
    pub const fn from_edges(was_held: bool, is_held: bool) -> Self {
        Self {
            held: is_held,
            just_pressed: is_held && !was_held,
        }
    }
}

/// Input for one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSample {
    /// Horizontal (`x`, right positive) and vertical (`y`, up positive) axes.
    pub direction: Vec2,
    /// Primary jump.
    pub jump: ButtonState,
    /// Spin jump.
    pub alt_jump: ButtonState,
    /// Primary run.
    pub run: ButtonState,
    /// Secondary run.
    pub alt_run: ButtonState,
}

impl InputSample {
    /// Either jump button is held.
    #[must_use]
    pub const fn jump_held(&self) -> bool {
        self.jump.held || self.alt_jump.held
    }

    /// Either run button is held.
    #[must_use]
    pub const fn run_held(&self) -> bool {
        self.run.held || self.alt_run.held
    }

    /// Copy with each axis forced into `[-1, 1]` and non-finite axes zeroed.
    #[must_use]
    pub fn clamped(self) -> Self {
        let axis = |value: f32| {
            if value.is_finite() {
                value.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        Self {
            direction: Vec2::new(axis(self.direction.x), axis(self.direction.y)),
            ..self
        }
    }
}

/// Produces one [`InputSample`] per physics tick.
pub trait InputSource: Send {
    /// Samples input for the tick about to run.
    fn sample(&mut self) -> InputSample;
}

impl InputSource for InputSample {
    fn sample(&mut self) -> InputSample {
        *self
    }
}

impl<F> InputSource for F
where
    F: FnMut() -> InputSample + Send,
{
    fn sample(&mut self) -> InputSample {
        self()
    }
}

/// Host-side view of named input actions.
pub trait RawActions: Send {
    /// Analogue strength of `action` in `[0, 1]`.
    fn strength(&self, action: &str) -> f32;
    /// Whether `action` is currently down.
    fn is_pressed(&self, action: &str) -> bool;
}

/// Names of the eight actions one player reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBindings {
    /// Up axis.
    pub up: String,
    /// Down axis.
    pub down: String,
    /// Left axis.
    pub left: String,
    /// Right axis.
    pub right: String,
    /// Jump button.
    pub jump: String,
    /// Spin-jump button.
    pub alt_jump: String,
    /// Run button.
    pub run: String,
    /// Secondary run button.
    pub alt_run: String,
}

impl ActionBindings {
    /// Generates `p{n}_up`, `p{n}_jump`, and so on for player `n`.
    ///
    /// # Examples
    /// ```
    /// use tortellini::input::ActionBindings;
    /// let bindings = ActionBindings::for_player(2);
    /// assert_eq!(bindings.jump, "p2_jump");
    /// assert_eq!(bindings.alt_run, "p2_altrun");
    /// ```
    #[must_use]
    pub fn for_player(player: u8) -> Self {
        let name = |suffix: &str| format!("p{player}_{suffix}");
        Self {
            up: name("up"),
            down: name("down"),
            left: name("left"),
            right: name("right"),
            jump: name("jump"),
            alt_jump: name("altjump"),
            run: name("run"),
            alt_run: name("altrun"),
        }
    }
}

/// [`InputSource`] reading a [`RawActions`] backend through [`ActionBindings`].
#[derive(Debug, Clone)]
pub struct BoundInput<R> {
    actions: R,
    bindings: ActionBindings,
    last: InputSample,
}

impl<R: RawActions> BoundInput<R> {
    /// Binds `actions` with the given names.
    pub fn new(actions: R, bindings: ActionBindings) -> Self {
        Self {
            actions,
            bindings,
            last: InputSample::default(),
        }
    }

    /// Borrows the backend, e.g. to feed it new device state.
    pub fn actions_mut(&mut self) -> &mut R {
        &mut self.actions
    }

    fn button(&self, action: &str, was_held: bool) -> ButtonState {
        ButtonState::from_edges(was_held, self.actions.is_pressed(action))
    }
}

impl<R: RawActions> InputSource for BoundInput<R> {
    fn sample(&mut self) -> InputSample {
        let b = &self.bindings;
        let direction = Vec2::new(
            self.actions.strength(&b.right) - self.actions.strength(&b.left),
            self.actions.strength(&b.up) - self.actions.strength(&b.down),
        );
        let sample = InputSample {
            direction,
            jump: self.button(&b.jump, self.last.jump.held),
            alt_jump: self.button(&b.alt_jump, self.last.alt_jump.held),
            run: self.button(&b.run, self.last.run.held),
            alt_run: self.button(&b.alt_run, self.last.alt_run.held),
        }
        .clamped();
        self.last = sample;
        sample
    }
}
