//! Default tuning constants for the locomotion core.
//!
//! Forces, accelerations, frictions, and gravity are per-tick velocity
//! increments. Speeds are in world units per second. Times are in seconds.
//! [`crate::config::LocomotionTuning::default`] is assembled from these values.

use glam::{Vec2, Vec3};

/// World "up". Floor angles are measured against this vector.
pub const UP: Vec3 = Vec3::Y;

/// Gravity added to the velocity on every airborne tick.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -2.0, 0.0);
/// Downward probe handed to the solver while ground snapping is enabled.
pub const SNAP_VECTOR: Vec3 = Vec3::new(0.0, -0.3, 0.0);
/// Steepest surface (radians) the solver still reports as floor.
pub const FLOOR_MAX_ANGLE: f32 = 0.9;
/// Time taken to ease a horizontal speed down to a newly lowered cap.
pub const SPEED_SMOOTHING_DURATION: f32 = 0.5;

/// Per-tick acceleration while walking.
pub const WALK_ACCELERATION: f32 = 2.0;
/// Horizontal speed cap while walking.
pub const WALK_SPEED: f32 = 7.4;
/// Per-tick acceleration while running.
pub const RUN_ACCELERATION: f32 = 2.0;
/// Horizontal speed cap while running.
pub const RUN_SPEED: f32 = 12.8;
/// Per-tick acceleration during a long run.
pub const LONG_RUN_ACCELERATION: f32 = 2.0;
/// Horizontal speed cap during a long run.
pub const LONG_RUN_SPEED: f32 = 18.2;
/// Time spent running before the long run kicks in.
pub const LONG_RUN_TIME: f32 = 1.0;

/// Jump impulse from a standstill.
pub const IDLE_JUMP_FORCE: f32 = 25.0;
/// Standing jump launched straight out of a crouch.
pub const CROUCH_JUMP_FORCE: f32 = 27.0;
/// Jump impulse while moving at walking pace.
pub const WALK_JUMP_FORCE: f32 = 27.6;
/// Jump impulse when faster than the run cap.
pub const LONG_RUN_JUMP_FORCE: f32 = 30.0;
/// Longest time a held jump button keeps adding lift.
pub const MAX_JUMP_SUSTAIN_TIME: f32 = 0.45;
/// Fraction of gravity still felt while a jump is being sustained.
pub const JUMP_SUSTAIN_GRAVITY_MULTIPLIER: f32 = 0.55;
/// Per-tick horizontal acceleration while airborne.
pub const AIR_HORIZONTAL_ACCELERATION: f32 = 1.5;

/// Vertical input below this value counts as holding down.
pub const CROUCH_INPUT_THRESHOLD: f32 = -0.5;
/// Floor angle (degrees) from which crouching turns into a slide.
pub const SLIDE_MIN_ANGLE: f32 = 5.0;
/// Downhill acceleration while sliding.
pub const SLIDE_ACCELERATION: f32 = 1.4;
/// Horizontal speed cap while sliding.
pub const SLIDE_SPEED: f32 = 12.8;
/// Diagonal impulse granted by jumping while stuck in a crouch.
pub const CROUCH_BOOST_FORCE: Vec2 = Vec2::new(6.0, 6.0);
/// Sideways nudge applied while crouched under low geometry.
pub const CROUCH_SHUFFLE_STEP: f32 = 0.8;
/// Height probed above a crouching body before it may stand up.
pub const HEADROOM_PROBE: f32 = 0.5;

/// Friction on the floor outside of crouch and slide.
pub const FLOOR_FRICTION: f32 = 1.0;
/// Friction while airborne.
pub const AIR_FRICTION: f32 = 0.4;
/// Friction while crouching or sliding.
pub const SLIDE_FRICTION: f32 = 0.4;

/// Horizontal speed under which an actor counts as standing still.
pub const MOVING_THRESHOLD: f32 = 0.5;

/// Upper bound on enter-hook redirects followed by a single state change.
pub const MAX_CHAINED_TRANSITIONS: usize = 8;
