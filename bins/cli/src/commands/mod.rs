//! CLI command handlers.

pub mod config;
pub mod validate;

pub use config::{run_config_check, run_config_show};
pub use validate::{QuerySource, ValidateCommandInput, run_validate};
