//! A movement solver whose answers the test scripts.

use glam::{Affine3A, Vec3};
use tortellini::contact::{BodyShape, ContactInfo, MoveRequest, MoveResult, MovementSolver};

/// Unit floor normal tilted `degrees` away from up, facing `+x`.
///
/// # Examples
/// ```
/// use test_utils::slope_normal;
/// let flat = slope_normal(0.0);
/// assert!((flat.y - 1.0).abs() < 1e-6);
/// ```
pub fn slope_normal(degrees: f32) -> Vec3 {
    let radians = degrees.to_radians();
    Vec3::new(radians.sin(), radians.cos(), 0.0)
}

/// Solver reporting a test-controlled contact.
///
/// Moves integrate the translation by `velocity * dt` and ignore geometry.
/// Overlap probes are answered by the three `*_blocked` flags depending on
/// whether the probe starts at, right of, or left of the body.
#[derive(Clone, Debug)]
pub struct ScriptedSolver {
    /// Contact returned by every move.
    pub contact: ContactInfo,
    /// Probes straight up from the body collide.
    pub above_blocked: bool,
    /// Probes starting right of the body collide.
    pub right_blocked: bool,
    /// Probes starting left of the body collide.
    pub left_blocked: bool,
    position: Vec3,
    requests: Vec<MoveRequest>,
}

impl ScriptedSolver {
    /// Solver reporting `contact` with free space everywhere.
    pub fn new(contact: ContactInfo) -> Self {
        Self {
            contact,
            above_blocked: false,
            right_blocked: false,
            left_blocked: false,
            position: Vec3::ZERO,
            requests: Vec::new(),
        }
    }

    /// Standing on level ground.
    pub fn grounded() -> Self {
        Self::new(ContactInfo::grounded(Vec3::Y))
    }

    /// Standing on a slope tilted `degrees` from level.
    pub fn on_slope(degrees: f32) -> Self {
        Self::new(ContactInfo::grounded(slope_normal(degrees)))
    }

    /// No contact.
    pub fn airborne() -> Self {
        Self::new(ContactInfo::airborne())
    }

    /// Blocks probes above and to both sides.
    pub fn wedge(&mut self) {
        self.above_blocked = true;
        self.right_blocked = true;
        self.left_blocked = true;
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> &[MoveRequest] {
        &self.requests
    }

    /// Number of moves requested.
    pub fn moves(&self) -> usize {
        self.requests.len()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<&MoveRequest> {
        self.requests.last()
    }
}

impl MovementSolver for ScriptedSolver {
    fn move_and_slide(&mut self, request: &MoveRequest) -> MoveResult {
        self.requests.push(*request);
        self.position = Vec3::from(request.transform.translation) + request.velocity * request.dt;
        let mut transform = request.transform;
        transform.translation = self.position.into();
        MoveResult {
            transform,
            contact: self.contact,
        }
    }

    fn test_move(&self, _shape: BodyShape, from: Affine3A, _motion: Vec3) -> bool {
        let offset = from.translation.x - self.position.x;
        if offset > f32::EPSILON {
            self.right_blocked
        } else if offset < -f32::EPSILON {
            self.left_blocked
        } else {
            self.above_blocked
        }
    }
}
