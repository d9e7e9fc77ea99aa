//! Type definitions for rollguard configuration

mod config_types;

pub use config_types::*;
