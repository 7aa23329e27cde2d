//! Locomotion tuning and its JSON loader.
//!
//! Every field has a default taken from [`crate::constants`], and missing
//! fields in a JSON document fall back to those defaults, so a tuning file
//! only needs to list what it changes.
//!
//! ```
//! use tortellini::config::LocomotionTuning;
//! let tuning = LocomotionTuning::from_json_str(r#"{ "walk_speed": 6.0 }"#).unwrap();
//! assert_eq!(tuning.walk_speed, 6.0);
//! assert_eq!(tuning.run_speed, tortellini::RUN_SPEED);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AIR_FRICTION, AIR_HORIZONTAL_ACCELERATION, CROUCH_BOOST_FORCE, CROUCH_INPUT_THRESHOLD,
    CROUCH_JUMP_FORCE, CROUCH_SHUFFLE_STEP, FLOOR_FRICTION, FLOOR_MAX_ANGLE, GRAVITY,
    HEADROOM_PROBE, IDLE_JUMP_FORCE, JUMP_SUSTAIN_GRAVITY_MULTIPLIER, LONG_RUN_ACCELERATION,
    LONG_RUN_JUMP_FORCE, LONG_RUN_SPEED, LONG_RUN_TIME, MAX_JUMP_SUSTAIN_TIME, MOVING_THRESHOLD,
    RUN_ACCELERATION, RUN_SPEED, SLIDE_ACCELERATION, SLIDE_FRICTION, SLIDE_MIN_ANGLE, SLIDE_SPEED,
    SNAP_VECTOR, SPEED_SMOOTHING_DURATION, WALK_ACCELERATION, WALK_JUMP_FORCE, WALK_SPEED,
};

/// Errors raised while loading or validating a tuning document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tuning file could not be read.
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid tuning JSON.
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside the range the simulation can work with.
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Integration parameters shared by every state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Per-tick gravity increment.
    pub gravity: Vec3,
    /// Downward probe passed to the solver while snapping to the ground.
    pub snap_vector: Vec3,
    /// Steepest floor the solver should accept, in radians.
    pub floor_max_angle: f32,
    /// Time taken to ease speed down to a lowered cap.
    pub speed_smoothing_duration: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            snap_vector: SNAP_VECTOR,
            floor_max_angle: FLOOR_MAX_ANGLE,
            speed_smoothing_duration: SPEED_SMOOTHING_DURATION,
        }
    }
}

/// Movement parameters for the locomotion state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    /// Integration parameters.
    pub physics: PhysicsTuning,
    /// Per-tick acceleration while walking.
    pub walk_acceleration: f32,
    /// Speed cap while walking.
    pub walk_speed: f32,
    /// Per-tick acceleration while running.
    pub run_acceleration: f32,
    /// Speed cap while running.
    pub run_speed: f32,
    /// Per-tick acceleration during a long run.
    pub long_run_acceleration: f32,
    /// Speed cap during a long run.
    pub long_run_speed: f32,
    /// Running time after which a run becomes a long run.
    pub long_run_time: f32,
    /// Jump impulse from a standstill.
    pub idle_jump_force: f32,
    /// Jump impulse from a standstill straight out of a crouch.
    pub crouch_jump_force: f32,
    /// Jump impulse when moving faster than [`Self::moving_threshold`].
    pub walk_jump_force: f32,
    /// Jump impulse when moving faster than the run cap.
    pub long_run_jump_force: f32,
    /// Longest time a held jump keeps adding lift.
    pub max_jump_sustain_time: f32,
    /// Fraction of gravity felt while a jump is sustained.
    pub jump_sustain_gravity_multiplier: f32,
    /// Per-tick horizontal acceleration in the air.
    pub air_horizontal_acceleration: f32,
    /// Vertical input below this value means "down".
    pub crouch_input_threshold: f32,
    /// Floor angle in degrees from which a crouch becomes a slide.
    pub slide_min_angle: f32,
    /// Downhill acceleration while sliding.
    pub slide_acceleration: f32,
    /// Speed cap while sliding.
    pub slide_speed: f32,
    /// Impulse granted by jumping while wedged in a crouch.
    pub crouch_boost_force: Vec2,
    /// Sideways nudge while crouched under low geometry.
    pub crouch_shuffle_step: f32,
    /// Height probed before standing up from a crouch.
    pub headroom_probe: f32,
    /// Floor friction outside crouch and slide.
    pub floor_friction: f32,
    /// Air friction.
    pub air_friction: f32,
    /// Friction while crouching or sliding.
    pub slide_friction: f32,
    /// Horizontal speed under which the actor counts as still.
    pub moving_threshold: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            walk_acceleration: WALK_ACCELERATION,
            walk_speed: WALK_SPEED,
            run_acceleration: RUN_ACCELERATION,
            run_speed: RUN_SPEED,
            long_run_acceleration: LONG_RUN_ACCELERATION,
            long_run_speed: LONG_RUN_SPEED,
            long_run_time: LONG_RUN_TIME,
            idle_jump_force: IDLE_JUMP_FORCE,
            crouch_jump_force: CROUCH_JUMP_FORCE,
            walk_jump_force: WALK_JUMP_FORCE,
            long_run_jump_force: LONG_RUN_JUMP_FORCE,
            max_jump_sustain_time: MAX_JUMP_SUSTAIN_TIME,
            jump_sustain_gravity_multiplier: JUMP_SUSTAIN_GRAVITY_MULTIPLIER,
            air_horizontal_acceleration: AIR_HORIZONTAL_ACCELERATION,
            crouch_input_threshold: CROUCH_INPUT_THRESHOLD,
            slide_min_angle: SLIDE_MIN_ANGLE,
            slide_acceleration: SLIDE_ACCELERATION,
            slide_speed: SLIDE_SPEED,
            crouch_boost_force: CROUCH_BOOST_FORCE,
            crouch_shuffle_step: CROUCH_SHUFFLE_STEP,
            headroom_probe: HEADROOM_PROBE,
            floor_friction: FLOOR_FRICTION,
            air_friction: AIR_FRICTION,
            slide_friction: SLIDE_FRICTION,
            moving_threshold: MOVING_THRESHOLD,
        }
    }
}

impl LocomotionTuning {
    /// Parses and validates a JSON tuning document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reads, parses, and validates a JSON tuning file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the same errors as [`Self::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that every value is usable by the simulation.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !physics.gravity.is_finite() {
            return Err(invalid("physics.gravity", "must be finite"));
        }
        if !physics.snap_vector.is_finite() {
            return Err(invalid("physics.snap_vector", "must be finite"));
        }
        if !physics.speed_smoothing_duration.is_finite() || physics.speed_smoothing_duration <= 0.0
        {
            return Err(invalid(
                "physics.speed_smoothing_duration",
                "must be finite and positive",
            ));
        }
        require_finite("physics.floor_max_angle", physics.floor_max_angle)?;
        require_finite("crouch_boost_force", self.crouch_boost_force.x)?;
        require_finite("crouch_boost_force", self.crouch_boost_force.y)?;

        for (field, value) in [
            ("walk_acceleration", self.walk_acceleration),
            ("walk_speed", self.walk_speed),
            ("run_acceleration", self.run_acceleration),
            ("run_speed", self.run_speed),
            ("long_run_acceleration", self.long_run_acceleration),
            ("long_run_speed", self.long_run_speed),
            ("long_run_time", self.long_run_time),
            ("idle_jump_force", self.idle_jump_force),
            ("crouch_jump_force", self.crouch_jump_force),
            ("walk_jump_force", self.walk_jump_force),
            ("long_run_jump_force", self.long_run_jump_force),
            ("max_jump_sustain_time", self.max_jump_sustain_time),
            ("air_horizontal_acceleration", self.air_horizontal_acceleration),
            ("slide_acceleration", self.slide_acceleration),
            ("slide_speed", self.slide_speed),
            ("crouch_shuffle_step", self.crouch_shuffle_step),
            ("headroom_probe", self.headroom_probe),
            ("floor_friction", self.floor_friction),
            ("air_friction", self.air_friction),
            ("slide_friction", self.slide_friction),
            ("moving_threshold", self.moving_threshold),
        ] {
            require_non_negative(field, value)?;
        }

        require_range(
            "jump_sustain_gravity_multiplier",
            self.jump_sustain_gravity_multiplier,
            0.0,
            1.0,
        )?;
        require_range(
            "crouch_input_threshold",
            self.crouch_input_threshold,
            -1.0,
            1.0,
        )?;
        require_range("slide_min_angle", self.slide_min_angle, 0.0, 180.0)
    }
}

const fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn require_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(invalid(field, "is outside its allowed range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_validate() {
        assert!(LocomotionTuning::default().validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let tuning = LocomotionTuning::from_json_str(
            r#"{ "long_run_time": 2.0, "physics": { "gravity": [0.0, -3.0, 0.0] } }"#,
        )
        .expect("partial tuning parses");
        assert_eq!(tuning.long_run_time, 2.0);
        assert_eq!(tuning.physics.gravity, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(tuning.physics.snap_vector, SNAP_VECTOR);
        assert_eq!(tuning.walk_speed, WALK_SPEED);
    }

    #[rstest]
    #[case::negative_speed(r#"{ "walk_speed": -1.0 }"#, "walk_speed")]
    #[case::multiplier(r#"{ "jump_sustain_gravity_multiplier": 1.5 }"#, "jump_sustain_gravity_multiplier")]
    #[case::threshold(r#"{ "crouch_input_threshold": -2.0 }"#, "crouch_input_threshold")]
    #[case::smoothing(r#"{ "physics": { "speed_smoothing_duration": 0.0 } }"#, "physics.speed_smoothing_duration")]
    #[case::slide_angle(r#"{ "slide_min_angle": 270.0 }"#, "slide_min_angle")]
    fn out_of_range_values_are_rejected(#[case] json: &str, #[case] expected_field: &str) {
        match LocomotionTuning::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid `{expected_field}`, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LocomotionTuning::from_json_str("{ walk_speed: ").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LocomotionTuning::from_path("/definitely/not/here/tuning.json")
            .expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here/tuning.json"));
    }
}
