//! The `runScript` action

use std::sync::Arc;

use async_trait::async_trait;
use opsdeck_action::{Action, ActionError, ActionMetadata, ActionResult, Outcome};
use opsdeck_credential::{AesGcmCodec, CredentialCodec};
use opsdeck_resource::{AccessKeys, ResourceFetcher};
use tracing::Instrument;

use crate::model::{RunScriptInput, RunScriptInputs, RunScriptOutput, RunScriptOutputs};
use crate::runner::ScriptRunner;
use crate::validate::{DEFAULT_PORT, validate};

/// Registry key of the action.
pub const RUN_SCRIPT: &str = "runScript";

/// Runs SQL scripts fetched from remote storage against MySQL hosts.
///
/// Each input record goes through validate, fetch, decrypt and run. Every
/// record yields exactly one output, in input order, whatever happened to
/// it. The fetched copy of the script is removed before the record's output
/// is produced.
pub struct RunScriptAction {
    metadata: ActionMetadata,
    fetcher: Arc<dyn ResourceFetcher>,
    runner: Arc<dyn ScriptRunner>,
    codec: Arc<dyn CredentialCodec>,
    access_keys: AccessKeys,
    default_port: u16,
}

impl RunScriptAction {
    /// Build the action around its collaborators.
    ///
    /// Uses [`AesGcmCodec`], no storage access keys and port 3306; see the
    /// `with_*` methods.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, runner: Arc<dyn ScriptRunner>) -> Self {
        Self {
            metadata: ActionMetadata::new(
                RUN_SCRIPT,
                "Run database script",
                "Execute a SQL script from object storage against a MySQL host",
            )
            .with_category("database"),
            fetcher,
            runner,
            codec: Arc::new(AesGcmCodec),
            access_keys: AccessKeys::default(),
            default_port: DEFAULT_PORT,
        }
    }

    /// Replace the credential codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn CredentialCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Keys used to authenticate artifact fetches.
    #[must_use]
    pub fn with_access_keys(mut self, keys: AccessKeys) -> Self {
        self.access_keys = keys;
        self
    }

    /// Port applied to records that carry none.
    #[must_use]
    pub fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Execute one record. Always returns a complete output; the error is
    /// returned alongside when the record failed.
    pub async fn run_one(&self, input: &RunScriptInput) -> (RunScriptOutput, Option<ActionError>) {
        let span = tracing::info_span!("run_script", guid = %input.guid, host = %input.host);
        let result = self.try_run(input).instrument(span).await;

        let error = result.err();
        let detail = error.as_ref().map(ToString::to_string).unwrap_or_default();
        let output = RunScriptOutput {
            guid: input.guid.clone(),
            result: ActionResult::from_error(error.as_ref()),
            detail,
            call_back_parameter: input.call_back_parameter.clone(),
        };
        (output, error)
    }

    async fn try_run(&self, input: &RunScriptInput) -> Result<String, ActionError> {
        let valid = validate(input, self.default_port).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected input");
        })?;

        let artifact = self
            .fetcher
            .fetch(&valid.endpoint, &self.access_keys)
            .await
            .map_err(|e| {
                tracing::error!(
                    endpoint = %valid.endpoint,
                    transient = e.is_transient(),
                    error = %e,
                    "artifact fetch failed"
                );
                ActionError::fetch(&valid.endpoint, e.reason())
            })?;

        let password = self
            .codec
            .recover(&valid.guid, &valid.seed, &valid.password)
            .map_err(|e| {
                tracing::error!(error = %e, "password recovery failed");
                ActionError::decryption(e.to_string())
            })?;

        let script = tokio::fs::File::open(artifact.path()).await.map_err(|e| {
            ActionError::execution(format!("failed to open fetched script: {e}"), "")
        })?;

        let output = self
            .runner
            .run(&valid.target, &password, Box::new(script))
            .await?;
        artifact.release();

        tracing::info!(bytes = output.len(), "script executed");
        Ok(output)
    }

    /// Execute every record in order.
    ///
    /// Never stops early. The returned error is the last per-record error,
    /// if any; it does not say which record failed, callers inspect each
    /// output's result code for that.
    pub async fn run_batch(&self, inputs: &RunScriptInputs) -> Outcome<RunScriptOutputs> {
        let mut outputs = Vec::with_capacity(inputs.inputs.len());
        let mut last_error = None;

        for input in &inputs.inputs {
            let (output, error) = self.run_one(input).await;
            if error.is_some() {
                last_error = error;
            }
            outputs.push(output);
        }

        let failed = outputs.iter().filter(|o| !o.result.code.is_success()).count();
        tracing::info!(
            action = RUN_SCRIPT,
            total = outputs.len(),
            failed,
            "batch finished"
        );
        Outcome::with_error(RunScriptOutputs { outputs }, last_error)
    }
}

impl std::fmt::Debug for RunScriptAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunScriptAction")
            .field("metadata", &self.metadata)
            .field("access_keys", &self.access_keys)
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Action for RunScriptAction {
    type Input = RunScriptInputs;
    type Output = RunScriptOutputs;

    fn metadata(&self) -> &ActionMetadata {
        &self.metadata
    }

    fn read_param(&self, raw: serde_json::Value) -> Result<Self::Input, ActionError> {
        serde_json::from_value(raw).map_err(|e| ActionError::invalid_param(e.to_string()))
    }

    async fn execute(&self, input: Self::Input) -> Outcome<Self::Output> {
        self.run_batch(&input).await
    }
}
