//! Configuration loader and schema types.
//!
//! This module exposes the settings schema (queue capacity, startup modes,
//! player timing, display and logging) and helpers to load it from the
//! environment and an optional TOML file.

mod load;
mod schema;

pub use load::{MAX_QUEUE_LENGTH, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
