//! Companion board for Next Station: draw routes on a board between stations
//! and keep score on a reactive score pad.

pub mod components;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod render;
pub mod score;
pub mod session;
pub mod state;
pub mod util;
