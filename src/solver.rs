//! A deterministic stand-in for the host's collision solver.
//!
//! [`FlatGround`] models a single infinite floor plane with optional side
//! walls and a ceiling. It is what the demo binary and the scenario tests
//! move players over; real hosts plug in their own [`MovementSolver`].

use glam::{Affine3A, Vec3};

use crate::contact::{BodyShape, ContactInfo, MoveRequest, MoveResult, MovementSolver};
use crate::UP;

/// Body height of each collision shape, measured up from the body origin.
#[must_use]
pub const fn shape_height(shape: BodyShape) -> f32 {
    match shape {
        BodyShape::Small => 1.0,
        BodyShape::Big => 2.0,
    }
}

/// A horizontal floor at `floor_height`, optionally boxed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    /// Height of the floor plane.
    pub floor_height: f32,
    /// Normal reported while standing on the floor; tilt it to fake a slope.
    pub floor_normal: Vec3,
    /// Left and right wall positions.
    pub walls: Option<(f32, f32)>,
    /// Height of the ceiling.
    pub ceiling: Option<f32>,
}

impl FlatGround {
    /// Open level floor.
    #[must_use]
    pub const fn level(floor_height: f32) -> Self {
        Self {
            floor_height,
            floor_normal: UP,
            walls: None,
            ceiling: None,
        }
    }

    /// Same floor, reporting `floor_normal` as the contact normal.
    #[must_use]
    pub const fn tilted(self, floor_normal: Vec3) -> Self {
        Self {
            floor_normal,
            ..self
        }
    }

    /// Same floor between walls at `left` and `right`.
    #[must_use]
    pub const fn walled(self, left: f32, right: f32) -> Self {
        Self {
            walls: Some((left, right)),
            ..self
        }
    }

    /// Same floor under a ceiling at `height`.
    #[must_use]
    pub const fn covered(self, height: f32) -> Self {
        Self {
            ceiling: Some(height),
            ..self
        }
    }

    fn hits_wall(&self, x: f32) -> bool {
        self.walls.is_some_and(|(left, right)| x <= left || x >= right)
    }

    fn hits_ceiling(&self, shape: BodyShape, y: f32) -> bool {
        self.ceiling.is_some_and(|height| y + shape_height(shape) >= height)
    }
}

impl Default for FlatGround {
    fn default() -> Self {
        Self::level(0.0)
    }
}

impl MovementSolver for FlatGround {
    fn move_and_slide(&mut self, request: &MoveRequest) -> MoveResult {
        let start = Vec3::from(request.transform.translation);
        let mut target = start + request.velocity * request.dt;
        let mut contact = ContactInfo::airborne();

        if let Some((left, right)) = self.walls {
            if self.hits_wall(target.x) {
                target.x = target.x.clamp(left, right);
                contact.on_wall = true;
            }
        }

        if let Some(height) = self.ceiling {
            if self.hits_ceiling(request.shape, target.y) {
                target.y = height - shape_height(request.shape);
                contact.on_ceiling = true;
            }
        }

        let gap = target.y - self.floor_height;
        let snapped = request
            .snap
            .is_some_and(|probe| request.velocity.y <= 0.0 && gap <= probe.y.abs());
        if gap <= 0.0 || snapped {
            target.y = self.floor_height;
            contact.on_floor = true;
            contact.floor_normal = self.floor_normal;
        }

        let mut transform = request.transform;
        transform.translation = target.into();
        MoveResult { transform, contact }
    }

    fn test_move(&self, shape: BodyShape, from: Affine3A, motion: Vec3) -> bool {
        let to = Vec3::from(from.translation) + motion;
        self.hits_wall(to.x) || self.hits_ceiling(shape, to.y)
    }
}
