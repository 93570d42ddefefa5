//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the mounted screen with ratatui and maps crossterm
//! key events onto [`crate::application::App`] actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
