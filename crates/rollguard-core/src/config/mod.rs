//! Configuration loading

mod loader;

pub use loader::{RollguardConfig, CONFIG_FILE_NAMES};
