#![deny(unused)]
//! Core types and traits for Radny AI.
//!
//! Shared vocabulary of the workspace: the intent and tool-result types the
//! engine passes around, the completion and tool-handler traits the other
//! crates implement, error handling, configuration, and test doubles.

pub mod config;
pub mod error;
pub mod mocks;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
