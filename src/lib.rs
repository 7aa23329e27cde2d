#![cfg_attr(docsrs, feature(doc_cfg))]
//! Per-tick actor simulation core for a 2.5D platformer.
//!
//! The crate provides a generic actor lifecycle ([`actor`]) and specialises
//! it into a nine-state platforming [`Player`]. Hosts own the clocks, the
//! collision solver, input devices, and sprites; the core only consumes an
//! [`InputSample`] per tick, hands a resolved velocity to a
//! [`MovementSolver`], and publishes animation intents.
pub mod actor;
pub mod config;
pub mod constants;
pub mod contact;
pub mod input;
pub mod lerp;
pub mod logging;
pub mod motion;
pub mod player;
pub mod solver;
pub mod spawner;
pub mod speed_limit;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use actor::{Actor, ActorState, Lifecycle, TransitionError};
pub use config::{ConfigError, LocomotionTuning, PhysicsTuning};
pub use contact::{BodyShape, ContactInfo, MoveRequest, MoveResult, MovementSolver};
pub use input::{ButtonState, InputSample, InputSource};
pub use lerp::{clamped_lerp, ClampedLerp};
pub use logging::init as init_logging;
pub use motion::MotionIntegrator;
pub use player::{Animation, AnimationIntent, AnimationSink, Facing, Locomotion, Player};
pub use solver::FlatGround;
pub use spawner::{PlayerForm, PlayerSpawner, SpawnError};
pub use speed_limit::SpeedLimiter;
pub use vector_math::{angle_from_up_degrees, direction_or_zero, sign};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use tortellini::prelude::*;
    //!
    //! let on_floor = ContactInfo::grounded(UP);
    //! let mut player = Player::new(LocomotionTuning::default(), BodyShape::Big, on_floor)?;
    //! player.physics_tick(1.0 / 60.0, &mut FlatGround::default())?;
    //! # Ok::<(), TransitionError>(())
    //! ```

    pub use crate::BodyShape;
    pub use crate::ButtonState;
    pub use crate::ContactInfo;
    pub use crate::FlatGround;
    pub use crate::InputSample;
    pub use crate::Locomotion;
    pub use crate::LocomotionTuning;
    pub use crate::MovementSolver;
    pub use crate::Player;
    pub use crate::TransitionError;
    pub use crate::UP;
}
