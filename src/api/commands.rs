//! Command modules driven by the front ends.
//!
//! - `screen`: the translator screen (translation, languages, background)
//! - `settings`: settings inspection and credential storage

pub mod screen;
pub mod settings;
