//! Shared types, configuration, and utilities for the Tilt services.
//!
//! Tilt tracks a user's exposure to politically leaning content and, once a
//! per-user leaning count crosses a threshold, surfaces counter content to
//! balance that exposure. This crate carries the concerns every Tilt crate
//! needs: the unified error taxonomy, the JSON configuration file, and
//! structured logging setup.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result, ResultExt};
