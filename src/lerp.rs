//! Linear interpolation clamped to the `[0, 1]` progress domain.
//!
//! Progress values at or below zero return the start value exactly and
//! values at or above one return the end value exactly, so smoothing curves
//! settle on their target without floating-point drift.

use glam::{Vec2, Vec3};

/// Interpolation whose progress is clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use tortellini::lerp::ClampedLerp;
/// assert_eq!(20.0_f32.clamped_lerp(10.0, 0.5), 15.0);
/// assert_eq!(20.0_f32.clamped_lerp(10.0, 7.0), 10.0);
/// ```
pub trait ClampedLerp: Sized {
    /// Interpolates from `self` towards `to` by progress `t`.
    #[must_use]
    fn clamped_lerp(self, to: Self, t: f32) -> Self;
}

/// Maps `t` onto one of the two endpoints when it leaves the open interval.
///
/// NaN compares false against both bounds, so it is routed to the start.
fn endpoint(t: f32) -> Option<bool> {
    if t >= 1.0 {
        Some(true)
    } else if t > 0.0 {
        None
    } else {
        Some(false)
    }
}

impl ClampedLerp for f32 {
    fn clamped_lerp(self, to: Self, t: f32) -> Self {
        match endpoint(t) {
            Some(true) => to,
            Some(false) => self,
            None => self + (to - self) * t,
        }
    }
}

impl ClampedLerp for Vec2 {
    fn clamped_lerp(self, to: Self, t: f32) -> Self {
        match endpoint(t) {
            Some(true) => to,
            Some(false) => self,
            None => self + (to - self) * t,
        }
    }
}

impl ClampedLerp for Vec3 {
    fn clamped_lerp(self, to: Self, t: f32) -> Self {
        match endpoint(t) {
            Some(true) => to,
            Some(false) => self,
            None => self + (to - self) * t,
        }
    }
}

/// Free-function form of [`ClampedLerp::clamped_lerp`].
#[must_use]
pub fn clamped_lerp<T: ClampedLerp>(from: T, to: T, t: f32) -> T {
    from.clamped_lerp(to, t)
}
