//! Scenario tests driving a player through its locomotion states.
//!
//! Each scenario steers a [`Player`] with a [`SharedInput`] over a
//! [`ScriptedSolver`], so the contact the player sees on every tick is under
//! the test's control.

use approx::assert_relative_eq;
use glam::Vec3;
use rstest::rstest;
use test_utils::{Sample, ScriptedSolver, SharedInput};
use tortellini::lerp::ClampedLerp;
use tortellini::{
    Animation, BodyShape, ContactInfo, Locomotion, LocomotionTuning, Player, GRAVITY,
    LONG_RUN_JUMP_FORCE, WALK_JUMP_FORCE,
};

const DT: f32 = 1.0 / 60.0;

struct Rig {
    player: Player,
    input: SharedInput,
    solver: ScriptedSolver,
}

impl Rig {
    /// A fresh standing player placed on whatever floor `solver` reports.
    fn standing_on(solver: ScriptedSolver) -> Self {
        let input = SharedInput::default();
        let mut player = Player::new(LocomotionTuning::default(), BodyShape::Big, solver.contact)
            .expect("player should start");
        player.set_input_source(Box::new(input.clone()));
        assert_eq!(player.state(), Locomotion::Stand);
        Self {
            player,
            input,
            solver,
        }
    }

    fn hold(&self, sample: Sample) {
        self.input.set(sample.build());
    }

    fn tick(&mut self) {
        self.player
            .physics_tick(DT, &mut self.solver)
            .expect("tick should not run away");
    }

    fn tick_until(&mut self, target: Locomotion) {
        for _ in 0..240 {
            if self.player.state() == target {
                return;
            }
            self.tick();
        }
        panic!("never reached {target}, stuck in {}", self.player.state());
    }
}

/// Number of ticks after which the accumulated state timer exceeds `limit`.
fn ticks_to_exceed(limit: f32) -> usize {
    let mut elapsed = 0.0_f32;
    let mut ticks = 0;
    while elapsed <= limit {
        elapsed += DT;
        ticks += 1;
    }
    ticks
}

/// Drives a fresh player into a grounded `target` and returns the input that
/// keeps it there.
fn drive_into(target: Locomotion) -> (Rig, Sample) {
    let (hold, slope) = match target {
        Locomotion::Stand => (Sample::neutral(), 0.0),
        Locomotion::Walk => (Sample::right(), 0.0),
        Locomotion::Run | Locomotion::LongRun => (Sample::right().running(), 0.0),
        Locomotion::Crouch => (Sample::down(), 0.0),
        Locomotion::Slide => (Sample::down(), 20.0),
        airborne => panic!("{airborne} is not a grounded state"),
    };
    let mut rig = Rig::standing_on(ScriptedSolver::on_slope(slope));
    rig.hold(hold);
    rig.tick_until(target);
    (rig, hold)
}

#[test]
fn holding_right_walks_from_the_first_tick() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    assert_relative_eq!(rig.player.lifecycle().lifetime(), 0.0);
    rig.hold(Sample::right());
    for tick in 0..10 {
        rig.tick();
        assert_eq!(rig.player.state(), Locomotion::Walk, "tick {tick}");
    }
    assert!(rig.player.velocity().x > 0.0);
}

#[test]
fn dropped_in_player_falls_before_it_lands() {
    let mut rig = Rig::standing_on(ScriptedSolver::airborne());
    rig.solver.contact = ContactInfo::grounded(Vec3::Y);
    rig.hold(Sample::right());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Fall);
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Stand);
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Walk);
}

#[test]
fn running_turns_into_long_run_once_the_timer_passes() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.hold(Sample::right().running());
    rig.tick_until(Locomotion::Run);

    let crossing = ticks_to_exceed(rig.player.tuning().long_run_time);
    for _ in 1..crossing {
        rig.tick();
        assert_eq!(rig.player.state(), Locomotion::Run);
    }
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::LongRun);
    assert_relative_eq!(
        rig.player.speed_limit().limit(),
        rig.player.tuning().long_run_speed
    );
}

#[test]
fn held_jump_gives_out_after_the_sustain_window() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.solver.contact = ContactInfo::airborne();
    rig.hold(Sample::neutral().jump_pressed());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Jump);

    rig.hold(Sample::neutral().jump_held());
    let crossing = ticks_to_exceed(rig.player.tuning().max_jump_sustain_time);
    for _ in 1..crossing {
        rig.tick();
        assert_eq!(rig.player.state(), Locomotion::Jump);
    }
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Fall);
}

#[test]
fn releasing_jump_early_falls_on_the_next_tick() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.solver.contact = ContactInfo::airborne();
    rig.hold(Sample::neutral().jump_pressed());
    rig.tick();
    rig.hold(Sample::neutral());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Fall);
    assert!(rig.player.velocity().y > 0.0, "momentum carries on upwards");
}

#[test]
fn crouching_on_a_slope_slides_in_the_same_tick() {
    let mut rig = Rig::standing_on(ScriptedSolver::on_slope(20.0));
    rig.hold(Sample::down());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Slide);
    assert_eq!(rig.player.previous_state(), Locomotion::Crouch);
    assert_eq!(rig.player.shape(), BodyShape::Small);

    rig.tick();
    assert!(rig.player.velocity().x > 0.0, "slides down the +x slope");
}

#[test]
fn gentle_slopes_only_crouch() {
    let mut rig = Rig::standing_on(ScriptedSolver::on_slope(3.0));
    rig.hold(Sample::down());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Crouch);
}

#[rstest]
#[case::stand(Locomotion::Stand)]
#[case::walk(Locomotion::Walk)]
#[case::run(Locomotion::Run)]
#[case::long_run(Locomotion::LongRun)]
#[case::crouch(Locomotion::Crouch)]
#[case::slide(Locomotion::Slide)]
fn losing_the_floor_falls(#[case] state: Locomotion) {
    let (mut rig, hold) = drive_into(state);
    rig.solver.contact = ContactInfo::airborne();
    rig.tick();
    assert_eq!(rig.player.state(), state, "{hold:?} keeps the state");

    rig.hold(Sample::neutral());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Fall);
}

#[rstest]
#[case::stand(Locomotion::Stand)]
#[case::walk(Locomotion::Walk)]
#[case::run(Locomotion::Run)]
#[case::long_run(Locomotion::LongRun)]
#[case::crouch(Locomotion::Crouch)]
#[case::slide(Locomotion::Slide)]
fn losing_the_floor_never_stays_grounded(#[case] state: Locomotion) {
    let (mut rig, hold) = drive_into(state);
    rig.solver.contact = ContactInfo::airborne();
    rig.tick();

    rig.hold(hold.jump_pressed());
    rig.tick();
    assert!(
        matches!(rig.player.state(), Locomotion::Fall | Locomotion::Jump),
        "{state} ended in {}",
        rig.player.state()
    );
}

#[rstest]
#[case::standing(Sample::neutral(), 4)]
#[case::walking(Sample::right(), 12)]
#[case::crouching(Sample::down(), 6)]
fn every_tick_moves_the_body_once(#[case] hold: Sample, #[case] ticks: usize) {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    let before = rig.solver.moves();
    rig.hold(hold);
    for _ in 0..ticks {
        rig.tick();
    }
    assert_eq!(rig.solver.moves(), before + ticks);
}

#[test]
fn snap_follows_the_state() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.tick();
    let standing = rig.solver.last_request().expect("standing moved the body");
    assert_eq!(
        standing.snap,
        Some(rig.player.tuning().physics.snap_vector)
    );

    rig.hold(Sample::neutral().jump_pressed());
    rig.tick();
    let jumping = rig.solver.last_request().expect("jump moved the body");
    assert_eq!(jumping.snap, None);
    assert!(jumping.velocity.y > 0.0);
}

#[test]
fn dropping_from_long_run_eases_down_to_walk_speed() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.hold(Sample::right().running());
    rig.tick_until(Locomotion::LongRun);
    for _ in 0..40 {
        rig.tick();
    }
    let tuning = rig.player.tuning().clone();
    assert_relative_eq!(rig.player.velocity().x, tuning.long_run_speed);

    rig.hold(Sample::right());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Walk);
    assert_relative_eq!(rig.player.velocity().x, tuning.long_run_speed);

    let mut last = rig.player.velocity().x;
    for _ in 0..15 {
        rig.tick();
        let vx = rig.player.velocity().x;
        let limiter = rig.player.speed_limit();
        let progress = (rig.player.lifecycle().lifetime() - limiter.started_at())
            / tuning.physics.speed_smoothing_duration;
        let expected = limiter.start_speed().clamped_lerp(limiter.limit(), progress);
        assert_relative_eq!(vx, expected, epsilon = 1e-4);
        assert!(vx < last, "speed keeps easing down");
        last = vx;
    }

    for _ in 0..30 {
        rig.tick();
    }
    assert_relative_eq!(rig.player.velocity().x, tuning.walk_speed);
}

#[test]
fn pushing_into_a_wall_does_not_build_speed() {
    let mut rig = Rig::standing_on(ScriptedSolver::grounded());
    rig.hold(Sample::right());
    for _ in 0..5 {
        rig.tick();
    }
    rig.solver.contact = ContactInfo {
        on_wall: true,
        ..ContactInfo::grounded(Vec3::Y)
    };
    rig.tick();
    rig.tick();
    assert_relative_eq!(rig.player.velocity().x, 0.0);
    for _ in 0..10 {
        rig.tick();
        assert!(rig.player.velocity().x <= rig.player.tuning().walk_acceleration);
    }
}

#[rstest]
#[case::walking(Locomotion::Walk, Sample::right(), 20, Animation::Jump)]
#[case::long_running(Locomotion::LongRun, Sample::right().running(), 20, Animation::HighJump)]
fn jumping_on_the_move_launches_harder(
    #[case] from: Locomotion,
    #[case] hold: Sample,
    #[case] extra_ticks: usize,
    #[case] animation: Animation,
) {
    let (mut rig, _) = drive_into(from);
    for _ in 0..extra_ticks {
        rig.tick();
    }
    assert_eq!(rig.player.state(), from);
    let speed = rig.player.velocity().x;
    let before = rig.player.velocity().y;

    rig.hold(hold.jump_pressed());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::Jump);
    assert_eq!(rig.player.animation().animation, animation);

    let tuning = rig.player.tuning();
    let force = if speed > tuning.run_speed {
        tuning.long_run_jump_force
    } else {
        tuning.walk_jump_force
    };
    assert!(speed > tuning.moving_threshold);
    assert_relative_eq!(
        rig.player.velocity().y,
        before + force + tuning.physics.gravity.y,
        epsilon = 1e-4
    );
}

#[rstest]
#[case::walking(Locomotion::Walk, Sample::right(), WALK_JUMP_FORCE)]
#[case::long_running(Locomotion::LongRun, Sample::right().running(), LONG_RUN_JUMP_FORCE)]
fn spin_jumping_on_the_move_uses_the_same_tiers(
    #[case] from: Locomotion,
    #[case] hold: Sample,
    #[case] force: f32,
) {
    let (mut rig, _) = drive_into(from);
    for _ in 0..20 {
        rig.tick();
    }
    let before = rig.player.velocity().y;

    rig.hold(hold.spin_pressed());
    rig.tick();
    assert_eq!(rig.player.state(), Locomotion::SpinJump);
    assert_eq!(rig.player.animation().animation, Animation::SpinJump);
    assert_relative_eq!(
        rig.player.velocity().y,
        before + force + GRAVITY.y,
        epsilon = 1e-4
    );
}
