//! Configuration management.
//!
//! Layered loading (defaults, config file, `CODELENS__*` environment) plus the
//! typed structures every other module reads from.

mod loader;
mod structs;

pub use loader::{get_config_dir, get_config_path, load_config, load_config_from};
pub use structs::*;

#[cfg(test)]
mod tests;
