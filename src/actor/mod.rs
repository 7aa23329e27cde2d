//! Generic actor lifecycle: state hooks, transitions, and tick ordering.
//!
//! An [`Actor`] names its closed set of states and maps each one to a
//! static [`ActorState`] behaviour. The free functions in this module drive
//! those behaviours:
//!
//! - [`start`] fires the default state's enter hook once, before any tick.
//! - [`change_state`] runs exit, records the previous state, installs the new
//!   one, restarts the in-state timer, then runs enter.
//! - [`physics_step`] advances both clocks before any hook runs, so an enter
//!   hook sees an elapsed time of zero while the first physics hook already
//!   sees `dt`.
//! - [`frame_step`] only runs the per-frame hooks.
//!
//! Enter hooks redirect by returning a state rather than recursing into
//! [`change_state`]; redirects are followed in a loop capped at
//! [`MAX_CHAINED_TRANSITIONS`] so a cycle surfaces as a
//! [`TransitionError`] instead of a stack overflow.

mod lifecycle;
mod state;

use std::fmt;

use log::{debug, error, trace};
use thiserror::Error;

use crate::MAX_CHAINED_TRANSITIONS;

pub use lifecycle::Lifecycle;
pub use state::ActorState;

/// Failure raised while changing state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Enter hooks kept redirecting past the allowed chain length.
    #[error("state change exceeded {limit} chained redirects: {}", .trail.join(" -> "))]
    ChainLimit {
        /// Maximum number of redirects followed.
        limit: usize,
        /// States entered, in order, ending with the rejected redirect.
        trail: Vec<String>,
    },
}

/// An entity driven by per-tick lifecycle hooks.
///
/// Besides the state hooks, an actor may run its own work around them. The
/// physics order is: clocks, [`Actor::physics_pre_process`], the current
/// state's physics hook, [`Actor::integrate`], then
/// [`Actor::physics_post_process`].
pub trait Actor: Sized + 'static {
    /// Closed set of state identifiers.
    type State: Copy + Eq + fmt::Debug;

    /// Lifecycle bookkeeping.
    fn lifecycle(&self) -> &Lifecycle<Self::State>;

    /// Mutable lifecycle bookkeeping.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self::State>;

    /// Behaviour implementing `state`.
    fn behaviour(state: Self::State) -> &'static dyn ActorState<Self>;

    /// Runs before the state's physics hook, e.g. to sample input.
    fn physics_pre_process(&mut self, _dt: f32) {}

    /// Runs after the state's physics hook, e.g. gravity and contact clamping.
    fn integrate(&mut self, _dt: f32) {}

    /// Runs last in the physics tick, e.g. friction and speed limits.
    fn physics_post_process(&mut self, _dt: f32) {}

    /// Runs before the state's frame hook.
    fn process(&mut self, _dt: f32) {}

    /// Runs after the state's frame hook.
    fn post_process(&mut self, _dt: f32) {}
}

/// Fires the enter hook of the state the actor was created in.
///
/// # Errors
/// Returns [`TransitionError::ChainLimit`] when enter hooks redirect in a
/// cycle.
pub fn start<A: Actor>(actor: &mut A) -> Result<(), TransitionError> {
    debug!("starting in {:?}", actor.lifecycle().current());
    settle(actor)
}

/// Moves `actor` into `next`, following any enter-hook redirects.
///
/// # Errors
/// Returns [`TransitionError::ChainLimit`] after more than
/// [`MAX_CHAINED_TRANSITIONS`] redirects; the actor is then left in the last
/// state whose enter hook ran.
pub fn change_state<A: Actor>(actor: &mut A, next: A::State) -> Result<(), TransitionError> {
    let current = actor.lifecycle().current();
    A::behaviour(current).on_exit(actor);
    actor.lifecycle_mut().install(next);
    debug!("{current:?} -> {next:?}");
    settle(actor)
}

/// Enters the current state and keeps going while enter hooks redirect.
fn settle<A: Actor>(actor: &mut A) -> Result<(), TransitionError> {
    let mut trail = vec![actor.lifecycle().current()];
    loop {
        let entered = actor.lifecycle().current();
        let Some(redirect) = A::behaviour(entered).on_enter(actor) else {
            return Ok(());
        };
        trail.push(redirect);
        if trail.len() > MAX_CHAINED_TRANSITIONS + 1 {
            error!("runaway state redirects: {trail:?}");
            return Err(TransitionError::ChainLimit {
                limit: MAX_CHAINED_TRANSITIONS,
                trail: trail.iter().map(|state| format!("{state:?}")).collect(),
            });
        }
        trace!("{entered:?} redirected to {redirect:?}");
        A::behaviour(entered).on_exit(actor);
        actor.lifecycle_mut().install(redirect);
    }
}

/// Runs one physics tick's worth of hooks.
///
/// # Errors
/// Propagates [`TransitionError`] from transitions requested by the state.
pub fn physics_step<A: Actor>(actor: &mut A, dt: f32) -> Result<(), TransitionError> {
    debug_assert!(dt.is_finite() && dt >= 0.0, "invalid physics delta {dt}");
    actor.lifecycle_mut().advance(dt);
    actor.physics_pre_process(dt);
    let current = actor.lifecycle().current();
    A::behaviour(current).on_physics_process(actor, dt)?;
    actor.integrate(dt);
    actor.physics_post_process(dt);
    Ok(())
}

/// Runs one render frame's worth of hooks. Never runs physics hooks.
pub fn frame_step<A: Actor>(actor: &mut A, dt: f32) {
    actor.process(dt);
    let current = actor.lifecycle().current();
    A::behaviour(current).on_process(actor, dt);
    actor.post_process(dt);
}
