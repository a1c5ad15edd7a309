//! kating.AI - Terminal Client Library
//!
//! A terminal client that turns raw text into formal academic phrasing via a
//! remote rewriting service, within a free-tier word quota.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
