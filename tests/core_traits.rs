//! Compile-time guards on which core types can be copied or shared.
use static_assertions::{assert_impl_all, assert_not_impl_any};
use tortellini::{
    InputSample, Locomotion, LocomotionTuning, Player, PlayerSpawner, SpawnError, SpeedLimiter,
};

assert_impl_all!(Player: Send, std::fmt::Debug);
assert_impl_all!(PlayerSpawner: Send);
assert_impl_all!(SpawnError: std::error::Error, Send, Sync);
assert_impl_all!(Locomotion: Copy, Eq, std::hash::Hash);
assert_impl_all!(InputSample: Copy, Default);
assert_impl_all!(SpeedLimiter: Copy);

// Players own their collaborators, so they are neither duplicated nor shared.
assert_not_impl_any!(Player: Clone, Sync);
// Tuning is shared through `Arc` by the form cache rather than copied.
assert_not_impl_any!(LocomotionTuning: Copy);
