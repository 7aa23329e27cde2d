//! Small numeric helpers shared by the integrator and the state machine.
//!
//! Every helper here refuses to emit a non-finite value: a single NaN in the
//! velocity would poison every later tick.
use glam::{Vec2, Vec3};

use crate::UP;

/// Three-way sign: `-1.0`, `0.0`, or `1.0`.
///
/// Unlike [`f32::signum`], zero (of either sign) and NaN map to `0.0`, so a
/// resting velocity never "matches" a direction.
///
/// # Examples
/// ```
/// use tortellini::vector_math::sign;
/// assert_eq!(sign(-3.5), -1.0);
/// assert_eq!(sign(0.0), 0.0);
/// assert_eq!(sign(-0.0), 0.0);
/// ```
#[must_use]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Returns the unit vector pointing along `direction`.
///
/// Zero-length, near-zero, or non-finite directions yield [`Vec2::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use tortellini::vector_math::direction_or_zero;
/// let unit = direction_or_zero(Vec2::new(3.0, 4.0));
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.y - 0.8).abs() < 1e-6);
///
/// assert_eq!(direction_or_zero(Vec2::ZERO), Vec2::ZERO);
/// assert_eq!(direction_or_zero(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
/// ```
#[must_use]
pub fn direction_or_zero(direction: Vec2) -> Vec2 {
    if !direction.is_finite() || direction.length_squared() <= f32::EPSILON * f32::EPSILON {
        return Vec2::ZERO;
    }
    direction.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Angle in degrees between a floor normal and world [`UP`].
///
/// The dot product is clamped into `[-1, 1]` before `acos` so rounding on a
/// nearly flat floor cannot produce NaN. Degenerate normals read as flat.
#[must_use]
pub fn angle_from_up_degrees(normal: Vec3) -> f32 {
    let Some(unit) = normal.try_normalize() else {
        return 0.0;
    };
    unit.dot(UP).clamp(-1.0, 1.0).acos().to_degrees()
}
