//! Time-based smoothing of a changing horizontal speed cap.
//!
//! Lowering the cap does not clamp the speed on the spot. Instead the speed
//! eases from whatever it was when the cap changed down to the new cap over a
//! fixed duration. The clock driving the easing is the actor's lifetime, not
//! its time-in-state, so the easing survives unrelated state changes.

use crate::lerp::ClampedLerp;
use crate::vector_math::sign;

/// Smoothed upper bound on horizontal speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimiter {
    limit: f32,
    started_at: f32,
    start_speed: f32,
    duration: f32,
}

impl SpeedLimiter {
    /// Creates a limiter whose smoothing starts at lifetime zero from rest.
    #[must_use]
    pub const fn new(limit: f32, duration: f32) -> Self {
        Self::with_start(limit, duration, 0.0, 0.0)
    }

    /// Creates a limiter already easing from `start_speed` since `started_at`.
    #[must_use]
    pub const fn with_start(limit: f32, duration: f32, started_at: f32, start_speed: f32) -> Self {
        Self {
            limit,
            started_at,
            start_speed,
            duration,
        }
    }

    /// Current cap.
    #[must_use]
    pub const fn limit(&self) -> f32 {
        self.limit
    }

    /// Lifetime stamp of the last cap change.
    #[must_use]
    pub const fn started_at(&self) -> f32 {
        self.started_at
    }

    /// Absolute speed observed when the cap last changed.
    #[must_use]
    pub const fn start_speed(&self) -> f32 {
        self.start_speed
    }

    /// Installs a new cap and restarts the smoothing clock.
    ///
    /// Re-setting the current cap is a no-op and leaves the clock untouched.
    /// Returns whether the cap changed.
    #[expect(
        clippy::float_cmp,
        reason = "Caps are copied from tuning values, so identity is exact equality."
    )]
    pub fn set_limit(&mut self, limit: f32, lifetime: f32, speed: f32) -> bool {
        if limit == self.limit {
            return false;
        }
        self.limit = limit;
        self.started_at = lifetime;
        self.start_speed = speed.abs();
        true
    }

    /// Returns `velocity_x` eased towards the cap when it exceeds it.
    ///
    /// Speeds under the cap pass through unchanged; the sign of the input is
    /// always preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use tortellini::speed_limit::SpeedLimiter;
    /// let mut limiter = SpeedLimiter::new(30.0, 0.5);
    /// limiter.set_limit(10.0, 0.0, 20.0);
    /// assert_eq!(limiter.apply(-20.0, 0.25), -15.0);
    /// assert_eq!(limiter.apply(-20.0, 0.5), -10.0);
    /// assert_eq!(limiter.apply(4.0, 0.1), 4.0);
    /// ```
    #[must_use]
    pub fn apply(&self, velocity_x: f32, lifetime: f32) -> f32 {
        if velocity_x.abs() <= self.limit {
            return velocity_x;
        }
        let progress = self.progress(lifetime);
        self.start_speed.clamped_lerp(self.limit, progress) * sign(velocity_x)
    }

    fn progress(&self, lifetime: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (lifetime - self.started_at) / self.duration
    }
}
