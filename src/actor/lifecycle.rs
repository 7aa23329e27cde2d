//! Current/previous state bookkeeping and the two clocks.

/// Which state an actor is in, which it left last, and for how long.
///
/// `lifetime` only ever grows; `elapsed_in_state` restarts from zero on
/// every state entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifecycle<S> {
    current: S,
    previous: S,
    elapsed_in_state: f32,
    lifetime: f32,
}

impl<S: Copy> Lifecycle<S> {
    /// Starts in `default`, which also counts as the previous state.
    #[must_use]
    pub const fn new(default: S) -> Self {
        Self {
            current: default,
            previous: default,
            elapsed_in_state: 0.0,
            lifetime: 0.0,
        }
    }

    /// State whose hooks currently run.
    #[must_use]
    pub const fn current(&self) -> S {
        self.current
    }

    /// State exited most recently.
    #[must_use]
    pub const fn previous(&self) -> S {
        self.previous
    }

    /// Time since the current state was entered.
    #[must_use]
    pub const fn elapsed_in_state(&self) -> f32 {
        self.elapsed_in_state
    }

    /// Time since the actor was created.
    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.lifetime += dt;
        self.elapsed_in_state += dt;
    }

    pub(crate) fn install(&mut self, next: S) {
        self.previous = self.current;
        self.current = next;
        self.elapsed_in_state = 0.0;
    }
}
