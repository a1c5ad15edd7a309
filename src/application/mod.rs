//! Application layer managing state and the submission workflow.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the submission state machine, the toast queue used as notification sink,
//! and the state the terminal front end renders.

pub mod controller;
pub mod notifications;
pub mod state;

pub use controller::*;
pub use notifications::*;
pub use state::*;
