//! The four lifecycle hooks making up one state's behaviour.

use super::{Actor, TransitionError};

/// Behaviour of one state of actor `A`.
///
/// Hooks are only ever invoked by the lifecycle driver in [`crate::actor`],
/// at most once per tick each. Every hook defaults to doing nothing.
pub trait ActorState<A: Actor>: Sync {
    /// Runs right after the state is installed.
    ///
    /// Returning a state redirects into it within the same tick; the
    /// driver follows redirects iteratively and bounds the chain.
    fn on_enter(&self, actor: &mut A) -> Option<A::State> {
        let _ = actor;
        None
    }

    /// Runs on every render frame while the state is current.
    fn on_process(&self, actor: &mut A, dt: f32) {
        let _ = (actor, dt);
    }

    /// Runs on every physics tick while the state is current.
    ///
    /// This is the only hook allowed to call [`crate::actor::change_state`].
    /// Transitions take effect immediately, so a later request in the same
    /// hook overrides an earlier one.
    ///
    /// # Errors
    /// Propagates [`TransitionError`] from any transition it requests.
    fn on_physics_process(&self, actor: &mut A, dt: f32) -> Result<(), TransitionError> {
        let _ = (actor, dt);
        Ok(())
    }

    /// Runs right before the state is replaced.
    fn on_exit(&self, actor: &mut A) {
        let _ = actor;
    }
}
