//! Velocity integration around the external movement solver.
//!
//! States push forces into a [`MotionIntegrator`] during their physics hook.
//! The integrator then applies gravity and contact clamping, and finally
//! hands the resolved velocity to the [`MovementSolver`] exactly once.
//!
//! All forces and gravity are per-tick velocity increments; only the solver
//! scales velocity by the tick length.

use glam::{Affine3A, Vec2, Vec3};
use log::warn;

use crate::config::PhysicsTuning;
use crate::contact::{BodyShape, ContactInfo, MoveRequest, MoveResult, MovementSolver};
use crate::vector_math::{direction_or_zero, sign};
use crate::UP;

/// Velocity and contact bookkeeping for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionIntegrator {
    velocity: Vec3,
    previous_velocity: Vec3,
    contact: ContactInfo,
    floor_normal: Vec3,
    snap_to_ground: bool,
    physics: PhysicsTuning,
}

impl MotionIntegrator {
    /// Creates an integrator at rest and airborne.
    #[must_use]
    pub fn new(physics: PhysicsTuning) -> Self {
        Self {
            velocity: Vec3::ZERO,
            previous_velocity: Vec3::ZERO,
            contact: ContactInfo::airborne(),
            floor_normal: UP,
            snap_to_ground: true,
            physics,
        }
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity handed to the solver on the previous tick.
    #[must_use]
    pub const fn previous_velocity(&self) -> Vec3 {
        self.previous_velocity
    }

    /// Contact reported by the last solver call.
    #[must_use]
    pub const fn contact(&self) -> ContactInfo {
        self.contact
    }

    /// Last floor normal seen while grounded.
    #[must_use]
    pub const fn floor_normal(&self) -> Vec3 {
        self.floor_normal
    }

    /// Whether the next move probes downwards to stay on the ground.
    #[must_use]
    pub const fn snap_to_ground(&self) -> bool {
        self.snap_to_ground
    }

    /// Integration parameters.
    #[must_use]
    pub const fn physics(&self) -> &PhysicsTuning {
        &self.physics
    }

    /// Enables or disables ground snapping for subsequent moves.
    pub fn set_snap_to_ground(&mut self, snap: bool) {
        self.snap_to_ground = snap;
    }

    /// Overwrites the horizontal velocity component.
    pub fn set_velocity_x(&mut self, velocity_x: f32) {
        self.velocity.x = velocity_x;
    }

    /// Replaces the velocity and contact and forgets the previous tick, as
    /// on spawn.
    ///
    /// `contact` is what the host knows about the spawn point; it stands in
    /// for the result of a previous move until the first real one. Non-finite
    /// velocity components are dropped to zero and `z` is pinned to zero.
    pub fn reset(&mut self, velocity: Vec3, contact: ContactInfo) {
        let planar = if velocity.is_finite() {
            Vec3::new(velocity.x, velocity.y, 0.0)
        } else {
            warn!("discarding non-finite spawn velocity {velocity:?}");
            Vec3::ZERO
        };
        self.velocity = planar;
        self.previous_velocity = planar;
        self.contact = contact;
        self.floor_normal = if contact.on_floor {
            contact.floor_normal
        } else {
            UP
        };
    }

    /// Adds `force` to the horizontal and vertical velocity components.
    ///
    /// Repeated calls within a tick accumulate. A non-finite force is
    /// rejected so it cannot poison later ticks.
    pub fn apply_force_2d(&mut self, force: Vec2) {
        if !force.is_finite() {
            warn!("ignoring non-finite force {force:?}");
            return;
        }
        self.velocity.x += force.x;
        self.velocity.y += force.y;
    }

    /// Adds a force of magnitude `speed` along `direction`.
    ///
    /// The direction is normalised first; a degenerate direction applies no
    /// force at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use glam::Vec2;
    /// use tortellini::config::PhysicsTuning;
    /// use tortellini::motion::MotionIntegrator;
    ///
    /// let mut motion = MotionIntegrator::new(PhysicsTuning::default());
    /// motion.apply_force_towards(Vec2::new(0.0, 10.0), 0.9);
    /// motion.apply_force_towards(Vec2::ZERO, 50.0);
    /// assert!((motion.velocity().y - 0.9).abs() < 1e-6);
    /// ```
    pub fn apply_force_towards(&mut self, direction: Vec2, speed: f32) {
        self.apply_force_2d(direction_or_zero(direction) * speed);
    }

    /// Applies gravity and wall/ceiling clamping for this tick.
    ///
    /// Runs after the state's physics hook and before the post-process, using
    /// the contact from the previous move.
    pub fn integrate(&mut self) {
        let gravity = self.physics.gravity;
        if !self.contact.on_floor || !self.snap_to_ground {
            self.velocity += gravity;
        } else {
            let bias = gravity.y.abs();
            self.velocity.y = self.velocity.y.clamp(-bias, bias);
        }

        // Pushing into a wall must not build up speed.
        if self.contact.on_wall && sign(self.velocity.x) == sign(self.previous_velocity.x) {
            self.velocity.x = 0.0;
        }
        if self.contact.on_ceiling && sign(self.velocity.y) == sign(self.previous_velocity.y) {
            self.velocity.y = 0.0;
        }

        self.velocity.z = 0.0;
    }

    /// Hands the resolved velocity to the solver and records the outcome.
    pub fn move_body(
        &mut self,
        solver: &mut dyn MovementSolver,
        transform: Affine3A,
        shape: BodyShape,
        dt: f32,
    ) -> MoveResult {
        let request = MoveRequest {
            transform,
            velocity: self.velocity,
            snap: self.snap_to_ground.then_some(self.physics.snap_vector),
            up: UP,
            floor_normal: self.floor_normal,
            floor_max_angle: self.physics.floor_max_angle,
            shape,
            dt,
        };
        let result = solver.move_and_slide(&request);
        self.contact = result.contact;
        if result.contact.on_floor {
            self.floor_normal = result.contact.floor_normal;
        }
        self.previous_velocity = self.velocity;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    struct Recorder {
        requests: Vec<MoveRequest>,
        contact: ContactInfo,
    }

    impl MovementSolver for Recorder {
        fn move_and_slide(&mut self, request: &MoveRequest) -> MoveResult {
            self.requests.push(*request);
            MoveResult {
                transform: request.transform,
                contact: self.contact,
            }
        }
    }

    #[fixture]
    fn motion() -> MotionIntegrator {
        MotionIntegrator::new(PhysicsTuning::default())
    }

    fn settle(motion: &mut MotionIntegrator, contact: ContactInfo) {
        let mut solver = Recorder {
            requests: Vec::new(),
            contact,
        };
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Big, 1.0 / 60.0);
    }

    #[rstest]
    fn airborne_bodies_gain_gravity(mut motion: MotionIntegrator) {
        motion.integrate();
        motion.integrate();
        assert_relative_eq!(motion.velocity().y, -4.0);
    }

    #[rstest]
    #[case::landing(-20.0, -2.0)]
    #[case::bias_kept(-1.0, -1.0)]
    #[case::upward(6.0, 2.0)]
    fn grounded_snapping_clamps_vertical(
        mut motion: MotionIntegrator,
        #[case] vy: f32,
        #[case] expected: f32,
    ) {
        settle(&mut motion, ContactInfo::grounded(UP));
        motion.apply_force_2d(Vec2::new(0.0, vy));
        motion.integrate();
        assert_relative_eq!(motion.velocity().y, expected);
    }

    #[rstest]
    fn grounded_without_snap_still_falls(mut motion: MotionIntegrator) {
        settle(&mut motion, ContactInfo::grounded(UP));
        motion.set_snap_to_ground(false);
        motion.apply_force_2d(Vec2::new(0.0, 25.0));
        motion.integrate();
        assert_relative_eq!(motion.velocity().y, 23.0);
    }

    #[rstest]
    fn wall_push_is_cancelled_but_rebound_is_kept(mut motion: MotionIntegrator) {
        let wall = ContactInfo {
            on_wall: true,
            ..ContactInfo::grounded(UP)
        };
        motion.apply_force_2d(Vec2::new(5.0, 0.0));
        settle(&mut motion, wall);

        motion.integrate();
        assert_eq!(motion.velocity().x, 0.0);

        motion.apply_force_2d(Vec2::new(-3.0, 0.0));
        motion.integrate();
        assert_eq!(motion.velocity().x, -3.0);
    }

    #[rstest]
    fn ceiling_bump_stops_upward_motion(mut motion: MotionIntegrator) {
        let ceiling = ContactInfo {
            on_ceiling: true,
            ..ContactInfo::airborne()
        };
        motion.apply_force_2d(Vec2::new(0.0, 20.0));
        settle(&mut motion, ceiling);
        motion.integrate();
        assert_eq!(motion.velocity().y, 0.0);
    }

    #[rstest]
    fn non_finite_force_is_ignored(mut motion: MotionIntegrator) {
        motion.apply_force_2d(Vec2::new(1.0, 0.0));
        motion.apply_force_2d(Vec2::new(f32::NAN, 3.0));
        motion.apply_force_towards(Vec2::new(f32::INFINITY, 0.0), 4.0);
        assert_eq!(motion.velocity(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[rstest]
    fn snap_probe_follows_flag(mut motion: MotionIntegrator) {
        let mut solver = Recorder {
            requests: Vec::new(),
            contact: ContactInfo::grounded(UP),
        };
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Big, 0.1);
        motion.set_snap_to_ground(false);
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Small, 0.1);

        let snaps: Vec<_> = solver.requests.iter().map(|r| r.snap).collect();
        assert_eq!(snaps, vec![Some(PhysicsTuning::default().snap_vector), None]);
        assert_eq!(solver.requests.last().map(|r| r.shape), Some(BodyShape::Small));
    }

    #[rstest]
    fn floor_normal_survives_leaving_the_floor(mut motion: MotionIntegrator) {
        let slope = Vec3::new(0.2, 1.0, 0.0).normalize();
        settle(&mut motion, ContactInfo::grounded(slope));
        settle(&mut motion, ContactInfo::airborne());
        assert_eq!(motion.floor_normal(), slope);
        assert_eq!(motion.contact().floor_normal, UP);
    }

    #[rstest]
    fn floor_normal_is_passed_to_the_next_move(mut motion: MotionIntegrator) {
        let slope = Vec3::new(0.3, 1.0, 0.0).normalize();
        let mut solver = Recorder {
            requests: Vec::new(),
            contact: ContactInfo::grounded(slope),
        };
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Big, 0.1);
        solver.contact = ContactInfo::airborne();
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Big, 0.1);
        motion.move_body(&mut solver, Affine3A::IDENTITY, BodyShape::Big, 0.1);

        let hints: Vec<_> = solver.requests.iter().map(|r| r.floor_normal).collect();
        assert_eq!(hints, vec![UP, slope, slope]);
        assert!(solver.requests.iter().all(|r| r.up == UP));
    }

    #[rstest]
    fn reset_pins_z_and_rejects_nan(mut motion: MotionIntegrator) {
        motion.reset(Vec3::new(3.0, 1.0, 9.0), ContactInfo::airborne());
        assert_eq!(motion.velocity(), Vec3::new(3.0, 1.0, 0.0));
        motion.reset(Vec3::new(f32::NAN, 0.0, 0.0), ContactInfo::airborne());
        assert_eq!(motion.velocity(), Vec3::ZERO);
    }

    #[rstest]
    fn reset_seeds_the_contact(mut motion: MotionIntegrator) {
        let slope = Vec3::new(0.2, 1.0, 0.0).normalize();
        motion.reset(Vec3::ZERO, ContactInfo::grounded(slope));
        assert!(motion.contact().on_floor);
        assert_eq!(motion.floor_normal(), slope);

        // Seeded ground is snapped to rather than fallen through.
        motion.integrate();
        assert_relative_eq!(motion.velocity().y, 0.0);

        motion.reset(Vec3::ZERO, ContactInfo::airborne());
        assert_eq!(motion.floor_normal(), UP);
        motion.integrate();
        assert_relative_eq!(motion.velocity().y, -2.0);
    }
}
