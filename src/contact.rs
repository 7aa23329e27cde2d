//! Contract with the external movement solver.
//!
//! The solver owns shape sweeps and collision resolution. This crate only
//! hands it a resolved velocity once per physics tick and reads back the
//! moved transform plus the contact flags for the next tick.

use glam::{Affine3A, Vec3};

use crate::UP;

/// Floor, wall, and ceiling contact reported after a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Standing on a surface flatter than the floor angle limit.
    pub on_floor: bool,
    /// Touching a wall.
    pub on_wall: bool,
    /// Touching a ceiling.
    pub on_ceiling: bool,
    /// Normal of the floor under the body, [`UP`] while airborne.
    pub floor_normal: Vec3,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self::airborne()
    }
}

impl ContactInfo {
    /// No contact at all.
    #[must_use]
    pub const fn airborne() -> Self {
        Self {
            on_floor: false,
            on_wall: false,
            on_ceiling: false,
            floor_normal: UP,
        }
    }

    /// Standing on a floor with the given normal.
    #[must_use]
    pub const fn grounded(floor_normal: Vec3) -> Self {
        Self {
            on_floor: true,
            on_wall: false,
            on_ceiling: false,
            floor_normal,
        }
    }
}

/// Which of the body's two collision shapes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyShape {
    /// Short shape used while crouching, sliding, or curled up mid-air.
    Small,
    /// Full-height shape.
    #[default]
    Big,
}

/// One sweep-and-slide request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    /// Transform the sweep starts from.
    pub transform: Affine3A,
    /// Velocity in units per second; the z component is always zero.
    pub velocity: Vec3,
    /// Downward probe keeping the body glued to small steps, when snapping.
    pub snap: Option<Vec3>,
    /// Up direction used to tell floors from walls.
    pub up: Vec3,
    /// Normal of the last floor stood on, [`UP`] until one is found.
    pub floor_normal: Vec3,
    /// Steepest floor, in radians.
    pub floor_max_angle: f32,
    /// Active collision shape.
    pub shape: BodyShape,
    /// Tick length in seconds.
    pub dt: f32,
}

/// Result of a sweep-and-slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Transform after the move.
    pub transform: Affine3A,
    /// Contact observed at the end of the move.
    pub contact: ContactInfo,
}

/// External collision solver.
pub trait MovementSolver {
    /// Sweeps the body along `request.velocity * request.dt` and slides along
    /// whatever it hits.
    fn move_and_slide(&mut self, request: &MoveRequest) -> MoveResult;

    /// Reports whether moving `shape` from `from` by `motion` would collide.
    ///
    /// Solvers without overlap queries may keep the default, which reports
    /// free space everywhere.
    fn test_move(&self, shape: BodyShape, from: Affine3A, motion: Vec3) -> bool {
        let _ = (shape, from, motion);
        false
    }
}
