//! Plugin wiring

use std::sync::Arc;

use opsdeck_action::{ActionRegistry, Plugin};
use opsdeck_resource::EndpointFetcher;

use crate::action::RunScriptAction;
use crate::config::DatabaseConfig;
use crate::runner::MysqlRunner;

/// Contributes the database actions (`runScript`).
#[derive(Debug, Clone, Default)]
pub struct DatabasePlugin {
    config: DatabaseConfig,
}

impl DatabasePlugin {
    /// Create the plugin from its configuration.
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Build the `runScript` action with production collaborators.
    pub fn run_script_action(&self) -> RunScriptAction {
        let config = &self.config;
        let fetcher =
            EndpointFetcher::new(config.storage.settings.clone(), config.scratch_dir.clone());
        let runner = MysqlRunner::new(config.client_command.clone());

        RunScriptAction::new(Arc::new(fetcher), Arc::new(runner))
            .with_access_keys(config.storage.keys.clone())
            .with_default_port(config.default_port)
    }
}

impl Plugin for DatabasePlugin {
    fn name(&self) -> &str {
        "database"
    }

    fn register(&self, registry: &mut ActionRegistry) {
        registry.register(self.run_script_action());
    }
}
