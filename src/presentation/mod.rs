//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! handles keyboard and paste input, and renders the two-pane editor.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
