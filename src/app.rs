//! Screen model for the translator front ends.

pub mod state;

pub use state::{render, ScreenState};
