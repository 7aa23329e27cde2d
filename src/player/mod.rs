//! Platform locomotion: the nine-state player built on [`crate::actor`].
//!
//! A [`Player`] owns its lifecycle, a [`MotionIntegrator`], and a
//! [`SpeedLimiter`]. Each physics tick it samples input, runs the current
//! state's physics hook (which may change state any number of times, the
//! last request winning), integrates gravity, applies friction and the speed
//! cap, and finally calls the movement solver exactly once.
//!
//! ```
//! use glam::Vec2;
//! use tortellini::config::LocomotionTuning;
//! use tortellini::contact::{BodyShape, ContactInfo};
//! use tortellini::input::InputSample;
//! use tortellini::player::{Locomotion, Player};
//! use tortellini::solver::FlatGround;
//! use tortellini::UP;
//!
//! let on_floor = ContactInfo::grounded(UP);
//! let mut player = Player::new(LocomotionTuning::default(), BodyShape::Big, on_floor)?;
//! let walk_right = InputSample { direction: Vec2::X, ..InputSample::default() };
//! player.set_input_source(Box::new(walk_right));
//! let mut ground = FlatGround::level(0.0);
//!
//! player.physics_tick(1.0 / 60.0, &mut ground)?;
//! assert_eq!(player.state(), Locomotion::Walk);
//! # Ok::<(), tortellini::actor::TransitionError>(())
//! ```

mod animation;
mod states;

use std::fmt;

use glam::{Affine3A, Vec2, Vec3};
use log::{trace, warn};

use crate::actor::{self, Actor, ActorState, Lifecycle, TransitionError};
use crate::config::LocomotionTuning;
use crate::contact::{BodyShape, ContactInfo, MovementSolver};
use crate::input::{InputSample, InputSource};
use crate::motion::MotionIntegrator;
use crate::speed_limit::SpeedLimiter;
use crate::vector_math::{angle_from_up_degrees, sign};

pub use animation::{Animation, AnimationIntent, AnimationSink, Facing};

/// Locomotion states of a [`Player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locomotion {
    /// Standing on the floor.
    Stand,
    /// Walking.
    Walk,
    /// Running with the run button held.
    Run,
    /// Running for longer than the long-run time.
    LongRun,
    /// Rising from a regular jump.
    Jump,
    /// Rising from a spin jump.
    SpinJump,
    /// Airborne without jump lift.
    Fall,
    /// Crouching on flat ground.
    Crouch,
    /// Sliding down a slope.
    Slide,
}

impl Locomotion {
    /// Every state, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Stand,
        Self::Walk,
        Self::Run,
        Self::LongRun,
        Self::Jump,
        Self::SpinJump,
        Self::Fall,
        Self::Crouch,
        Self::Slide,
    ];

    /// Human-readable state name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stand => "Stand",
            Self::Walk => "Walk",
            Self::Run => "Run",
            Self::LongRun => "LongRun",
            Self::Jump => "Jump",
            Self::SpinJump => "SpinJump",
            Self::Fall => "Fall",
            Self::Crouch => "Crouch",
            Self::Slide => "Slide",
        }
    }

    /// Whether the state expects floor contact.
    #[must_use]
    pub const fn is_grounded(self) -> bool {
        !matches!(self, Self::Jump | Self::SpinJump | Self::Fall)
    }
}

impl fmt::Display for Locomotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of the overlap probes taken while crouched under low geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Headroom {
    above: bool,
    right: bool,
    left: bool,
}

impl Default for Headroom {
    fn default() -> Self {
        Self {
            above: true,
            right: true,
            left: true,
        }
    }
}

/// Which impulse a jump was launched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Launch {
    Sprinting,
    Moving,
    Crouched,
    Standing,
}

/// A platforming actor driven by the locomotion state machine.
pub struct Player {
    lifecycle: Lifecycle<Locomotion>,
    motion: MotionIntegrator,
    limiter: SpeedLimiter,
    tuning: LocomotionTuning,
    input_source: Option<Box<dyn InputSource>>,
    input: InputSample,
    headroom: Headroom,
    transform: Affine3A,
    shape: BodyShape,
    default_shape: BodyShape,
    facing: Facing,
    auto_facing: bool,
    animation: AnimationIntent,
    visuals: Option<Box<dyn AnimationSink>>,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("lifecycle", &self.lifecycle)
            .field("motion", &self.motion)
            .field("limiter", &self.limiter)
            .field("input", &self.input)
            .field("transform", &self.transform)
            .field("shape", &self.shape)
            .field("facing", &self.facing)
            .field("animation", &self.animation)
            .field("has_input_source", &self.input_source.is_some())
            .field("has_visuals", &self.visuals.is_some())
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Creates a player at the origin, at rest, standing.
    ///
    /// `initial_contact` is the contact at the spawn point. The first tick
    /// treats it as the result of a previous move, so a player placed on the
    /// floor is grounded from its very first tick while
    /// [`ContactInfo::airborne`] drops it in from above.
    ///
    /// The player has no input source or animation sink yet; until one is
    /// bound it reads neutral input and only latches animation intents.
    ///
    /// # Errors
    /// Returns [`TransitionError`] if entering the initial state fails.
    pub fn new(
        tuning: LocomotionTuning,
        default_shape: BodyShape,
        initial_contact: ContactInfo,
    ) -> Result<Self, TransitionError> {
        let limiter = SpeedLimiter::new(tuning.walk_speed, tuning.physics.speed_smoothing_duration);
        let mut motion = MotionIntegrator::new(tuning.physics);
        motion.reset(Vec3::ZERO, initial_contact);
        let mut player = Self {
            lifecycle: Lifecycle::new(Locomotion::Stand),
            motion,
            limiter,
            tuning,
            input_source: None,
            input: InputSample::default(),
            headroom: Headroom::default(),
            transform: Affine3A::IDENTITY,
            shape: default_shape,
            default_shape,
            facing: Facing::default(),
            auto_facing: true,
            animation: AnimationIntent::default(),
            visuals: None,
        };
        actor::start(&mut player)?;
        Ok(player)
    }

    /// Binds collaborators and places the player, as when it is spawned.
    ///
    /// The lifecycle restarts in [`Locomotion::Stand`] with both clocks at
    /// zero, and the speed cap eases from the carried speed down to the walk
    /// cap. `contact` seeds the first tick as in [`Self::new`]. Missing
    /// collaborators are logged and the player keeps running without them.
    ///
    /// # Errors
    /// Returns [`TransitionError`] if entering the initial state fails.
    pub fn setup_actor(
        &mut self,
        input: Option<Box<dyn InputSource>>,
        transform: Affine3A,
        velocity: Vec3,
        contact: ContactInfo,
        visuals: Option<Box<dyn AnimationSink>>,
        facing: Facing,
    ) -> Result<(), TransitionError> {
        if input.is_none() {
            warn!("player set up without an input source; reading neutral input");
        }
        if visuals.is_none() {
            warn!("player set up without an animation sink; intents will not be forwarded");
        }
        self.input_source = input;
        self.visuals = visuals;
        self.input = InputSample::default();
        self.headroom = Headroom::default();
        self.transform = transform;
        self.motion.reset(velocity, contact);
        self.shape = self.default_shape;
        self.facing = facing;
        self.auto_facing = true;
        self.animation = AnimationIntent::default();
        self.lifecycle = Lifecycle::new(Locomotion::Stand);
        self.limiter = SpeedLimiter::with_start(
            self.tuning.walk_speed,
            self.tuning.physics.speed_smoothing_duration,
            0.0,
            self.motion.velocity().x.abs(),
        );
        actor::start(self)
    }

    /// Replaces the input source.
    pub fn set_input_source(&mut self, input: Box<dyn InputSource>) {
        self.input_source = Some(input);
    }

    /// Replaces the animation sink.
    pub fn set_animation_sink(&mut self, visuals: Box<dyn AnimationSink>) {
        self.visuals = Some(visuals);
    }

    /// Moves the player without simulating, e.g. to respawn it.
    pub fn set_transform(&mut self, transform: Affine3A) {
        self.transform = transform;
    }

    /// Detaches the input source and animation sink so another player can
    /// take them over.
    pub fn take_handles(
        &mut self,
    ) -> (Option<Box<dyn InputSource>>, Option<Box<dyn AnimationSink>>) {
        (self.input_source.take(), self.visuals.take())
    }

    /// Runs one physics tick and moves the body through `solver`.
    ///
    /// The solver's [`MovementSolver::move_and_slide`] is called exactly once
    /// per successful tick.
    ///
    /// # Errors
    /// Returns [`TransitionError`] when a state change runs away; the body is
    /// not moved on that tick.
    pub fn physics_tick(
        &mut self,
        dt: f32,
        solver: &mut dyn MovementSolver,
    ) -> Result<ContactInfo, TransitionError> {
        self.headroom = self.probe_headroom(&*solver);
        actor::physics_step(self, dt)?;
        let result = self.motion.move_body(solver, self.transform, self.shape, dt);
        self.transform = result.transform;
        Ok(result.contact)
    }

    /// Runs one render frame and forwards the latest intent and facing.
    pub fn frame_tick(&mut self, dt: f32) {
        actor::frame_step(self, dt);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> Locomotion {
        self.lifecycle.current()
    }

    /// State exited most recently.
    #[must_use]
    pub const fn previous_state(&self) -> Locomotion {
        self.lifecycle.previous()
    }

    /// Lifecycle clocks and states.
    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle<Locomotion> {
        &self.lifecycle
    }

    /// Current velocity in units per second.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.motion.velocity()
    }

    /// Contact from the last move.
    #[must_use]
    pub const fn contact(&self) -> ContactInfo {
        self.motion.contact()
    }

    /// Velocity integration state.
    #[must_use]
    pub const fn motion(&self) -> &MotionIntegrator {
        &self.motion
    }

    /// Horizontal speed cap.
    #[must_use]
    pub const fn speed_limit(&self) -> &SpeedLimiter {
        &self.limiter
    }

    /// Movement parameters.
    #[must_use]
    pub const fn tuning(&self) -> &LocomotionTuning {
        &self.tuning
    }

    /// Input sampled on the last physics tick.
    #[must_use]
    pub const fn input(&self) -> &InputSample {
        &self.input
    }

    /// Body transform after the last move.
    #[must_use]
    pub const fn transform(&self) -> Affine3A {
        self.transform
    }

    /// Active collision shape.
    #[must_use]
    pub const fn shape(&self) -> BodyShape {
        self.shape
    }

    /// Collision shape of this player's form.
    #[must_use]
    pub const fn default_shape(&self) -> BodyShape {
        self.default_shape
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether facing follows the held direction.
    #[must_use]
    pub const fn auto_facing(&self) -> bool {
        self.auto_facing
    }

    /// Latest animation intent.
    #[must_use]
    pub const fn animation(&self) -> AnimationIntent {
        self.animation
    }

    fn probe_headroom(&self, solver: &dyn MovementSolver) -> Headroom {
        if self.lifecycle.current() != Locomotion::Crouch || self.default_shape == BodyShape::Small
        {
            return Headroom::default();
        }
        let lift = Vec3::new(0.0, self.tuning.headroom_probe, 0.0);
        let step = Vec3::new(self.tuning.crouch_shuffle_step, 0.0, 0.0);
        let clear = |offset: Vec3| {
            let from = Affine3A::from_translation(offset) * self.transform;
            !solver.test_move(self.shape, from, lift)
        };
        Headroom {
            above: clear(Vec3::ZERO),
            right: clear(step),
            left: clear(-step),
        }
    }

    fn on_floor(&self) -> bool {
        self.motion.contact().on_floor
    }

    fn holding_down(&self) -> bool {
        self.input.direction.y < self.tuning.crouch_input_threshold
    }

    fn floor_angle(&self) -> f32 {
        angle_from_up_degrees(self.motion.contact().floor_normal)
    }

    fn on_slope(&self) -> bool {
        self.floor_angle() >= self.tuning.slide_min_angle
    }

    /// Velocity is at rest or points the way the stick is held.
    fn moving_with_input(&self) -> bool {
        let vx = self.motion.velocity().x;
        vx == 0.0 || sign(vx) == sign(self.input.direction.x)
    }

    fn cap_speed(&mut self, limit: f32) {
        let lifetime = self.lifecycle.lifetime();
        let speed = self.motion.velocity().x;
        if self.limiter.set_limit(limit, lifetime, speed) {
            trace!("speed cap {limit} from {} at {lifetime}", speed.abs());
        }
    }

    /// Re-derives the cap while airborne so a cap earned on the ground is
    /// kept for as long as run stays held.
    fn cap_air_speed(&mut self) {
        let run = self.input.run_held();
        let limit = if run && self.limiter.limit() >= self.tuning.long_run_speed {
            self.tuning.long_run_speed
        } else if run {
            self.tuning.run_speed
        } else {
            self.tuning.walk_speed
        };
        self.cap_speed(limit);
    }

    fn push_horizontal(&mut self, acceleration: f32) {
        self.motion
            .apply_force_2d(Vec2::new(self.input.direction.x * acceleration, 0.0));
    }

    /// Applies the take-off impulse tiered by horizontal speed.
    fn launch(&mut self) -> Launch {
        let speed = self.motion.velocity().x.abs();
        let tuning = &self.tuning;
        let (launch, force) = if speed > tuning.run_speed {
            (Launch::Sprinting, tuning.long_run_jump_force)
        } else if speed > tuning.moving_threshold {
            (Launch::Moving, tuning.walk_jump_force)
        } else if self.lifecycle.previous() == Locomotion::Crouch {
            (Launch::Crouched, tuning.crouch_jump_force)
        } else {
            (Launch::Standing, tuning.idle_jump_force)
        };
        self.motion.apply_force_2d(Vec2::new(0.0, force));
        launch
    }

    /// Lift that reduces gravity to the sustain fraction while jump is held.
    fn sustain_jump(&mut self) {
        let physics = self.motion.physics();
        let lift = physics.gravity.y.abs() * (1.0 - self.tuning.jump_sustain_gravity_multiplier);
        self.motion.apply_force_towards(Vec2::Y, lift);
    }

    fn play(&mut self, intent: AnimationIntent) {
        self.animation = intent;
    }

    fn play_plain(&mut self, animation: Animation) {
        self.play(AnimationIntent::plain(animation));
    }

    /// Plays a locomotion clip sped up with velocity, or `Turn` when skidding.
    fn play_stride(&mut self, animation: Animation, bonus: f32) {
        if self.moving_with_input() {
            let speed = self.motion.velocity().x.abs() + bonus;
            self.play(AnimationIntent::with_speed(animation, speed));
        } else {
            self.play_plain(Animation::Turn);
        }
    }

    fn set_shape(&mut self, shape: BodyShape) {
        self.shape = shape;
    }

    fn restore_shape(&mut self) {
        self.shape = self.default_shape;
    }

    fn switch(&mut self, next: Locomotion) -> Result<(), TransitionError> {
        actor::change_state(self, next)
    }

    fn check_fall(&mut self) -> Result<(), TransitionError> {
        if !self.on_floor() {
            self.switch(Locomotion::Fall)?;
        }
        Ok(())
    }

    fn check_jump(&mut self) -> Result<(), TransitionError> {
        if self.input.jump.just_pressed {
            self.switch(Locomotion::Jump)?;
        } else if self.input.alt_jump.just_pressed {
            self.switch(Locomotion::SpinJump)?;
        }
        Ok(())
    }

    fn check_crouch(&mut self) -> Result<(), TransitionError> {
        if self.on_floor() && self.holding_down() {
            self.switch(Locomotion::Crouch)?;
        }
        Ok(())
    }

    /// Crouch when still holding down, otherwise stand.
    fn settle_on_floor(&mut self) -> Result<(), TransitionError> {
        if self.holding_down() {
            self.switch(Locomotion::Crouch)
        } else {
            self.switch(Locomotion::Stand)
        }
    }

    fn friction(&self) -> f32 {
        match self.lifecycle.current() {
            Locomotion::Crouch | Locomotion::Slide => self.tuning.slide_friction,
            _ if self.on_floor() => self.tuning.floor_friction,
            _ => self.tuning.air_friction,
        }
    }
}

impl Actor for Player {
    type State = Locomotion;

    fn lifecycle(&self) -> &Lifecycle<Locomotion> {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Locomotion> {
        &mut self.lifecycle
    }

    fn behaviour(state: Locomotion) -> &'static dyn ActorState<Self> {
        match state {
            Locomotion::Stand => &states::Stand,
            Locomotion::Walk => &states::Walk,
            Locomotion::Run => &states::Run,
            Locomotion::LongRun => &states::LongRun,
            Locomotion::Jump => &states::Jump,
            Locomotion::SpinJump => &states::SpinJump,
            Locomotion::Fall => &states::Fall,
            Locomotion::Crouch => &states::Crouch,
            Locomotion::Slide => &states::Slide,
        }
    }

    fn physics_pre_process(&mut self, _dt: f32) {
        self.input = self
            .input_source
            .as_mut()
            .map_or_else(InputSample::default, |source| source.sample().clamped());
    }

    fn integrate(&mut self, _dt: f32) {
        self.motion.integrate();
    }

    fn physics_post_process(&mut self, _dt: f32) {
        let vx = self.motion.velocity().x;
        let slowed = (vx.abs() - self.friction()).max(0.0) * sign(vx);
        let limited = self.limiter.apply(slowed, self.lifecycle.lifetime());
        self.motion.set_velocity_x(limited);
    }

    fn post_process(&mut self, _dt: f32) {
        if self.auto_facing {
            if let Some(facing) = Facing::from_x(self.input.direction.x) {
                self.facing = facing;
            }
        }
        if let Some(visuals) = self.visuals.as_mut() {
            visuals.play(self.animation);
            visuals.face(self.facing);
        }
    }
}
