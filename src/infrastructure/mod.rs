//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client for the rewriting service, the
//! system clipboard, the background request worker, logging setup and
//! command-line settings.

pub mod clipboard;
pub mod config;
pub mod http;
pub mod logging;
pub mod worker;

pub use clipboard::*;
pub use config::*;
pub use http::*;
pub use logging::*;
pub use worker::*;
