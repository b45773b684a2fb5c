//! # opsdeck Database
//!
//! The `runScript` action: executes SQL scripts kept in object storage
//! against MySQL hosts, one batch of records at a time.
//!
//! For each record the action
//!
//! 1. validates the required fields and resolves the port,
//! 2. fetches the script into a scoped local copy,
//! 3. recovers the database password from its encrypted form,
//! 4. streams the script into the `mysql` client,
//! 5. removes the local copy and emits the output record.
//!
//! A failing record never stops the batch; its failure is reported in its
//! own output record and in the batch's aggregate error.
//!
//! ```rust,no_run
//! use opsdeck_action::ActionRegistry;
//! use opsdeck_database::{DatabaseConfig, DatabasePlugin};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_file("/etc/opsdeck/database.toml")?.with_env_overrides()?;
//! let mut registry = ActionRegistry::new();
//! registry.register_plugin(&DatabasePlugin::new(config));
//!
//! let action = registry.get_action_by_name("runScript")?;
//! let outcome = action
//!     .dispatch(serde_json::json!({"inputs": []}))
//!     .await?;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod action;
pub mod config;
pub mod model;
pub mod plugin;
pub mod runner;
pub mod validate;

pub use action::{RUN_SCRIPT, RunScriptAction};
pub use config::{ConfigError, DatabaseConfig, StorageConfig};
pub use model::{RunScriptInput, RunScriptInputs, RunScriptOutput, RunScriptOutputs};
pub use plugin::DatabasePlugin;
pub use runner::{ConnectionTarget, MysqlRunner, ScriptRunner, ScriptSource};
pub use validate::{DEFAULT_PORT, ValidatedInput, validate};
