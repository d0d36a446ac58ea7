//! Application layer: commands, views and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod commands;
pub mod error;
pub mod error_ext;
pub mod services;
pub mod views;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, TomlResultExt};
