//! Decision Engine.
//!
//! Stateless rule scoring over an indicator-augmented series. Only the last
//! two rows and the trailing volume average are consulted.

pub mod rules;

pub use rules::{analyze, decide, score, trailing_volume_average, Scorecard};
