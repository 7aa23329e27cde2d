//! Player slot that swaps between forms.
//!
//! Each form comes with its own tuning and collision shape. Swapping builds
//! a fresh [`Player`] for the new form and hands it the old one's transform,
//! velocity, contact, facing, input source, and animation sink, so the change is
//! seamless apart from the state machine restarting in
//! [`Locomotion::Stand`](crate::player::Locomotion::Stand).
//!
//! Form profiles are loaded through a [`FormLoader`] and kept in a
//! [`FormCache`] owned by the spawner, so each form is loaded at most once per
//! slot and nothing is shared between slots.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use glam::{Affine3A, Vec3};
use hashbrown::HashMap;
use log::{debug, info};
use thiserror::Error;

use crate::actor::TransitionError;
use crate::config::{ConfigError, LocomotionTuning};
use crate::contact::{BodyShape, ContactInfo};
use crate::input::InputSource;
use crate::player::{AnimationSink, Facing, Player};

/// Errors raised while spawning or swapping a player.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The form's tuning could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The new player could not enter its initial state.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Power-up forms a player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerForm {
    /// Short form.
    Small,
    /// Full-height form.
    Big,
}

impl PlayerForm {
    /// Lower-case name, also the stem of the form's tuning file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Big => "big",
        }
    }

    /// The other form.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Small => Self::Big,
            Self::Big => Self::Small,
        }
    }

    /// Collision shape a player of this form stands in.
    #[must_use]
    pub const fn default_shape(self) -> BodyShape {
        match self {
            Self::Small => BodyShape::Small,
            Self::Big => BodyShape::Big,
        }
    }
}

impl fmt::Display for PlayerForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a form changes about a player.
#[derive(Debug, Clone, PartialEq)]
pub struct FormProfile {
    /// Movement parameters.
    pub tuning: LocomotionTuning,
    /// Collision shape outside crouch and slide.
    pub default_shape: BodyShape,
}

/// Source of form profiles.
pub trait FormLoader: Send {
    /// Loads the profile for `form`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the profile cannot be read or is invalid.
    fn load(&self, form: PlayerForm) -> Result<FormProfile, ConfigError>;
}

/// Default tuning for every form; only the collision shape differs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinForms;

impl FormLoader for BuiltinForms {
    fn load(&self, form: PlayerForm) -> Result<FormProfile, ConfigError> {
        Ok(FormProfile {
            tuning: LocomotionTuning::default(),
            default_shape: form.default_shape(),
        })
    }
}

/// Reads `<dir>/<form>.json` tuning documents.
#[derive(Debug, Clone)]
pub struct JsonFormLoader {
    dir: PathBuf,
}

impl JsonFormLoader {
    /// Loader reading tuning files from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the tuning file for `form`.
    #[must_use]
    pub fn path_for(&self, form: PlayerForm) -> PathBuf {
        self.dir.join(format!("{form}.json"))
    }
}

impl FormLoader for JsonFormLoader {
    fn load(&self, form: PlayerForm) -> Result<FormProfile, ConfigError> {
        let tuning = LocomotionTuning::from_path(self.path_for(form))?;
        Ok(FormProfile {
            tuning,
            default_shape: form.default_shape(),
        })
    }
}

/// Loads each form once and hands out shared profiles afterwards.
pub struct FormCache {
    loader: Box<dyn FormLoader>,
    profiles: HashMap<PlayerForm, Arc<FormProfile>>,
}

impl fmt::Debug for FormCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCache")
            .field("profiles", &self.profiles)
            .finish_non_exhaustive()
    }
}

impl FormCache {
    /// Empty cache backed by `loader`.
    #[must_use]
    pub fn new(loader: Box<dyn FormLoader>) -> Self {
        Self {
            loader,
            profiles: HashMap::new(),
        }
    }

    /// Profile for `form`, loading it on first use.
    ///
    /// # Errors
    /// Returns the loader's [`ConfigError`]; failed loads are not cached.
    pub fn get(&mut self, form: PlayerForm) -> Result<Arc<FormProfile>, ConfigError> {
        if let Some(profile) = self.profiles.get(&form) {
            return Ok(Arc::clone(profile));
        }
        debug!("loading {form} form profile");
        let profile = Arc::new(self.loader.load(form)?);
        self.profiles.insert(form, Arc::clone(&profile));
        Ok(profile)
    }

    /// Whether `form` has already been loaded.
    #[must_use]
    pub fn is_loaded(&self, form: PlayerForm) -> bool {
        self.profiles.contains_key(&form)
    }
}

/// One player slot and the form it is currently in.
#[derive(Debug)]
pub struct PlayerSpawner {
    player_number: u8,
    form: PlayerForm,
    cache: FormCache,
    player: Player,
}

impl PlayerSpawner {
    /// Spawns player `player_number` in `initial_form` at `spawn_transform`.
    ///
    /// The player is dropped in airborne and lands on its first move.
    ///
    /// # Errors
    /// Returns [`SpawnError`] when the form cannot be loaded or the player
    /// cannot start.
    pub fn new(
        player_number: u8,
        initial_form: PlayerForm,
        spawn_transform: Affine3A,
        loader: Box<dyn FormLoader>,
        input: Option<Box<dyn InputSource>>,
        visuals: Option<Box<dyn AnimationSink>>,
    ) -> Result<Self, SpawnError> {
        let mut cache = FormCache::new(loader);
        let profile = cache.get(initial_form)?;
        let mut player = Player::new(
            profile.tuning.clone(),
            profile.default_shape,
            ContactInfo::airborne(),
        )?;
        player.setup_actor(
            input,
            spawn_transform,
            Vec3::ZERO,
            ContactInfo::airborne(),
            visuals,
            Facing::default(),
        )?;
        info!("player {player_number} spawned as {initial_form}");
        Ok(Self {
            player_number,
            form: initial_form,
            cache,
            player,
        })
    }

    /// Swaps to `form`, carrying motion and collaborators over.
    ///
    /// Returns `false` without touching the player when already in `form`.
    ///
    /// # Errors
    /// Returns [`SpawnError`] when the form cannot be loaded or the new player
    /// cannot start; the current player is kept in that case.
    pub fn set_form(&mut self, form: PlayerForm) -> Result<bool, SpawnError> {
        if form == self.form {
            return Ok(false);
        }
        info!("player {} changing form to {form}", self.player_number);
        let profile = self.cache.get(form)?;
        let old = &mut self.player;
        let contact = old.contact();
        let mut next = Player::new(profile.tuning.clone(), profile.default_shape, contact)?;

        let (input, visuals) = old.take_handles();
        let transform = old.transform();
        let velocity = old.velocity();
        let facing = old.facing();
        if let Err(err) = next.setup_actor(input, transform, velocity, contact, visuals, facing) {
            let (input_back, visuals_back) = next.take_handles();
            if let Some(input_source) = input_back {
                old.set_input_source(input_source);
            }
            if let Some(sink) = visuals_back {
                old.set_animation_sink(sink);
            }
            return Err(err.into());
        }

        self.player = next;
        self.form = form;
        Ok(true)
    }

    /// Swaps to the other form.
    ///
    /// # Errors
    /// Same as [`Self::set_form`].
    pub fn toggle_form(&mut self) -> Result<bool, SpawnError> {
        self.set_form(self.form.toggled())
    }

    /// Slot number.
    #[must_use]
    pub const fn player_number(&self) -> u8 {
        self.player_number
    }

    /// Current form.
    #[must_use]
    pub const fn form(&self) -> PlayerForm {
        self.form
    }

    /// Current player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Current player, mutably, e.g. to tick it.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Profiles loaded so far.
    #[must_use]
    pub const fn cache(&self) -> &FormCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSample;
    use crate::player::Locomotion;
    use crate::solver::FlatGround;
    use glam::Vec2;
    use rstest::{fixture, rstest};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        loads: Arc<AtomicUsize>,
    }

    impl FormLoader for Counting {
        fn load(&self, form: PlayerForm) -> Result<FormProfile, ConfigError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            BuiltinForms.load(form)
        }
    }

    #[fixture]
    fn loads() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn spawner(loads: &Arc<AtomicUsize>) -> PlayerSpawner {
        let walk_right = InputSample {
            direction: Vec2::X,
            ..InputSample::default()
        };
        PlayerSpawner::new(
            1,
            PlayerForm::Small,
            Affine3A::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            Box::new(Counting {
                loads: Arc::clone(loads),
            }),
            Some(Box::new(walk_right)),
            None,
        )
        .expect("spawn")
    }

    #[rstest]
    fn spawns_in_the_initial_form(loads: Arc<AtomicUsize>) {
        let slot = spawner(&loads);
        assert_eq!(slot.form(), PlayerForm::Small);
        assert_eq!(slot.player().shape(), BodyShape::Small);
        assert_eq!(slot.player().transform().translation.x, 2.0);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn swapping_carries_motion_and_restarts_lifecycle(loads: Arc<AtomicUsize>) {
        let mut slot = spawner(&loads);
        let mut ground = FlatGround::level(0.0);
        for _ in 0..10 {
            slot.player_mut()
                .physics_tick(1.0 / 60.0, &mut ground)
                .expect("tick");
        }
        let before = slot.player().velocity();
        let at = slot.player().transform();
        let contact = slot.player().contact();
        assert_eq!(slot.player().state(), Locomotion::Walk);
        assert!(contact.on_floor);

        assert!(slot.set_form(PlayerForm::Big).expect("swap"));
        let player = slot.player();
        assert_eq!(player.state(), Locomotion::Stand);
        assert_eq!(player.lifecycle().lifetime(), 0.0);
        assert_eq!(player.shape(), BodyShape::Big);
        assert_eq!(player.velocity(), before);
        assert_eq!(player.transform(), at);
        assert_eq!(player.speed_limit().start_speed(), before.x.abs());
        assert_eq!(player.contact(), contact);

        // The input source moved over with the swap, and the floor did too.
        slot.player_mut()
            .physics_tick(1.0 / 60.0, &mut ground)
            .expect("tick");
        assert_eq!(slot.player().input().direction, Vec2::X);
        assert_eq!(slot.player().state(), Locomotion::Walk);
    }

    #[rstest]
    fn forms_are_loaded_once(loads: Arc<AtomicUsize>) {
        let mut slot = spawner(&loads);
        assert!(!slot.set_form(PlayerForm::Small).expect("same form"));
        slot.toggle_form().expect("to big");
        slot.toggle_form().expect("back to small");
        slot.toggle_form().expect("big again");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert!(slot.cache().is_loaded(PlayerForm::Big));
    }

    #[test]
    fn missing_tuning_file_is_a_config_error() {
        let loader = JsonFormLoader::new("/definitely/not/a/forms/dir");
        let err = PlayerSpawner::new(
            2,
            PlayerForm::Big,
            Affine3A::IDENTITY,
            Box::new(loader),
            None,
            None,
        )
        .expect_err("no tuning file");
        assert!(matches!(err, SpawnError::Config(ConfigError::Io { .. })));
    }

    #[test]
    fn json_forms_read_per_form_files() {
        let dir = std::env::temp_dir().join(format!("tortellini-forms-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let loader = JsonFormLoader::new(&dir);
        std::fs::write(loader.path_for(PlayerForm::Big), r#"{ "walk_speed": 5.0 }"#)
            .expect("write tuning");

        let profile = loader.load(PlayerForm::Big).expect("load big");
        assert_eq!(profile.tuning.walk_speed, 5.0);
        assert_eq!(profile.default_shape, BodyShape::Big);
        assert!(loader.load(PlayerForm::Small).is_err());

        std::fs::remove_dir_all(&dir).expect("remove temp dir");
    }
}
