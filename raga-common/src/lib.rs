//! # raga-bgm Common Library
//!
//! Shared code for the raga-bgm binaries:
//! - Error types
//! - TOML bootstrap configuration and setting resolution
//! - Tracing subscriber initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
