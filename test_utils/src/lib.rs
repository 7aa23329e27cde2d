//! Shared doubles for tortellini's integration tests.
//!
//! [`SharedInput`] lets a test rewrite the input a player samples between
//! ticks, [`ScriptedSolver`] reports whatever contact the test dictates while
//! recording every move request, and [`Sample`] builds input samples.

pub mod input;
pub mod solver;

pub use input::{Sample, SharedInput};
pub use solver::{slope_normal, ScriptedSolver};
