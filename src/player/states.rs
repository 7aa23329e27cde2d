//! Behaviour of each [`Locomotion`] state.
//!
//! Physics hooks evaluate their checks in order and switch state on the spot,
//! so a later check sees the state an earlier one installed and may replace
//! it. The force at the end of each hook is applied regardless.

use glam::Vec2;

use super::{Animation, AnimationIntent, Facing, Launch, Locomotion, Player};
use crate::actor::{ActorState, TransitionError};
use crate::contact::BodyShape;
use crate::vector_math::sign;

/// Extra animation speed per locomotion clip.
const WALK_STRIDE_BONUS: f32 = 5.0;
const RUN_STRIDE_BONUS: f32 = 7.0;
const LONG_RUN_STRIDE_BONUS: f32 = 10.0;

pub(super) struct Stand;
pub(super) struct Walk;
pub(super) struct Run;
pub(super) struct LongRun;
pub(super) struct Jump;
pub(super) struct SpinJump;
pub(super) struct Fall;
pub(super) struct Crouch;
pub(super) struct Slide;

impl ActorState<Player> for Stand {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.motion.set_snap_to_ground(true);
        None
    }

    fn on_process(&self, player: &mut Player, _dt: f32) {
        let speed = player.motion.velocity().x.abs();
        if speed > player.tuning.moving_threshold {
            player.play(AnimationIntent::with_speed(
                Animation::Walk,
                speed + WALK_STRIDE_BONUS,
            ));
        } else {
            player.play_plain(Animation::Idle);
        }
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if player.input.direction.x != 0.0 {
            player.switch(Locomotion::Walk)?;
        }
        player.check_fall()?;
        player.check_jump()?;
        player.check_crouch()
    }
}

impl ActorState<Player> for Walk {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.cap_speed(player.tuning.walk_speed);
        player.motion.set_snap_to_ground(true);
        None
    }

    fn on_process(&self, player: &mut Player, _dt: f32) {
        player.play_stride(Animation::Walk, WALK_STRIDE_BONUS);
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if player.input.direction.x == 0.0 {
            player.switch(Locomotion::Stand)?;
        }
        if player.input.run_held() {
            player.switch(Locomotion::Run)?;
        }
        player.check_fall()?;
        player.check_jump()?;
        player.check_crouch()?;
        player.push_horizontal(player.tuning.walk_acceleration);
        Ok(())
    }
}

impl ActorState<Player> for Run {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.cap_speed(player.tuning.run_speed);
        player.motion.set_snap_to_ground(true);
        None
    }

    fn on_process(&self, player: &mut Player, _dt: f32) {
        player.play_stride(Animation::Walk, RUN_STRIDE_BONUS);
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if player.input.direction.x == 0.0 {
            player.switch(Locomotion::Stand)?;
        }
        if !player.input.run_held() {
            player.switch(Locomotion::Walk)?;
        }
        if player.lifecycle.elapsed_in_state() > player.tuning.long_run_time {
            player.switch(Locomotion::LongRun)?;
        }
        player.check_fall()?;
        player.check_jump()?;
        player.check_crouch()?;
        player.push_horizontal(player.tuning.run_acceleration);
        Ok(())
    }
}

impl ActorState<Player> for LongRun {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.play_plain(Animation::LongRun);
        player.cap_speed(player.tuning.long_run_speed);
        player.motion.set_snap_to_ground(true);
        None
    }

    fn on_process(&self, player: &mut Player, _dt: f32) {
        player.play_stride(Animation::LongRun, LONG_RUN_STRIDE_BONUS);
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        let held_x = player.input.direction.x;
        if held_x == 0.0 {
            player.switch(Locomotion::Stand)?;
        }
        let reversed = sign(player.motion.velocity().x) != sign(held_x);
        if !player.input.run_held() || reversed {
            player.switch(Locomotion::Walk)?;
        }
        player.check_fall()?;
        player.check_jump()?;
        player.check_crouch()?;
        player.push_horizontal(player.tuning.long_run_acceleration);
        Ok(())
    }
}

/// Shared physics of both jump flavours.
fn rise(player: &mut Player) -> Result<(), TransitionError> {
    if player.on_floor() {
        player.switch(Locomotion::Stand)?;
    }
    let expired = player.lifecycle.elapsed_in_state() > player.tuning.max_jump_sustain_time;
    if !player.input.jump_held() || expired {
        player.switch(Locomotion::Fall)?;
    }
    player.cap_air_speed();
    if matches!(
        player.lifecycle.current(),
        Locomotion::Jump | Locomotion::SpinJump
    ) {
        player.sustain_jump();
    }
    player.push_horizontal(player.tuning.air_horizontal_acceleration);
    Ok(())
}

impl ActorState<Player> for Jump {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.motion.set_snap_to_ground(false);
        match player.launch() {
            Launch::Sprinting => player.play_plain(Animation::HighJump),
            Launch::Moving | Launch::Standing => player.play_plain(Animation::Jump),
            Launch::Crouched => {
                player.play_plain(Animation::Crouch);
                player.set_shape(BodyShape::Small);
            }
        }
        None
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        rise(player)
    }

    fn on_exit(&self, player: &mut Player) {
        player.restore_shape();
    }
}

impl ActorState<Player> for SpinJump {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.motion.set_snap_to_ground(false);
        player.play_plain(Animation::SpinJump);
        player.launch();
        None
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        rise(player)
    }
}

impl ActorState<Player> for Fall {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        if player.holding_down() {
            player.play_plain(Animation::Crouch);
            player.set_shape(BodyShape::Small);
        } else if player.lifecycle.previous() == Locomotion::SpinJump {
            player.play_plain(Animation::SpinJump);
        } else {
            player.play_plain(Animation::Fall);
        }
        player.motion.set_snap_to_ground(false);
        None
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if player.on_floor() {
            player.settle_on_floor()?;
        }
        player.cap_air_speed();
        player.push_horizontal(player.tuning.air_horizontal_acceleration);
        Ok(())
    }

    fn on_exit(&self, player: &mut Player) {
        player.restore_shape();
    }
}

impl ActorState<Player> for Crouch {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.motion.set_snap_to_ground(true);
        if player.on_slope() {
            return Some(Locomotion::Slide);
        }
        player.play_plain(Animation::Crouch);
        player.set_shape(BodyShape::Small);
        None
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if player.on_slope() {
            return player.switch(Locomotion::Slide);
        }

        let headroom = player.headroom;
        let step = player.tuning.crouch_shuffle_step;
        if headroom.above {
            if !player.holding_down() {
                player.switch(Locomotion::Stand)?;
            }
            player.check_jump()?;
        } else if headroom.right {
            player.motion.apply_force_2d(Vec2::new(step, 0.0));
        } else if headroom.left {
            player.motion.apply_force_2d(Vec2::new(-step, 0.0));
        } else if player.input.jump.just_pressed || player.input.alt_jump.just_pressed {
            let boost = player.tuning.crouch_boost_force;
            player
                .motion
                .apply_force_2d(Vec2::new(boost.x * player.input.direction.x, boost.y));
        }
        player.check_fall()
    }

    fn on_exit(&self, player: &mut Player) {
        player.restore_shape();
    }
}

impl ActorState<Player> for Slide {
    fn on_enter(&self, player: &mut Player) -> Option<Locomotion> {
        player.cap_speed(player.tuning.slide_speed);
        player.motion.set_snap_to_ground(true);
        player.play_plain(Animation::Slide);
        player.set_shape(BodyShape::Small);
        player.auto_facing = false;
        None
    }

    fn on_process(&self, player: &mut Player, _dt: f32) {
        if let Some(facing) = Facing::from_x(player.motion.velocity().x) {
            player.facing = facing;
        }
    }

    fn on_physics_process(&self, player: &mut Player, _dt: f32) -> Result<(), TransitionError> {
        if !player.on_slope() {
            player.settle_on_floor()?;
        }
        player.check_fall()?;
        player.check_jump()?;
        let downhill = sign(player.motion.contact().floor_normal.x);
        player
            .motion
            .apply_force_2d(Vec2::new(downhill * player.tuning.slide_acceleration, 0.0));
        Ok(())
    }

    fn on_exit(&self, player: &mut Player) {
        player.auto_facing = true;
        player.restore_shape();
    }
}
