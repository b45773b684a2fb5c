//! Script execution against a database through its command-line client

use std::process::Stdio;

use async_trait::async_trait;
use opsdeck_action::ActionError;
use opsdeck_credential::SecureString;
use tokio::io::AsyncRead;
use tokio::process::Command;

/// Default client binary.
pub const DEFAULT_CLIENT: &str = "/usr/bin/mysql";

/// Environment variable the client reads its password from.
const PASSWORD_ENV: &str = "MYSQL_PWD";

/// Script content streamed into the client's stdin.
pub type ScriptSource = Box<dyn AsyncRead + Send + Unpin>;

/// Where a script runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Default schema; empty means none.
    pub database: String,
}

impl ConnectionTarget {
    /// Client arguments for this target. Never includes the password.
    pub fn client_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--host={}", self.host),
            format!("--port={}", self.port),
            format!("--user={}", self.user),
        ];
        if !self.database.is_empty() {
            args.push(format!("--database={}", self.database));
        }
        args
    }
}

/// Executes a script against a database and returns its captured output.
///
/// Implementations must never put `password` into returned text, whether
/// output or error.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run `script` against `target`.
    async fn run(
        &self,
        target: &ConnectionTarget,
        password: &SecureString,
        script: ScriptSource,
    ) -> Result<String, ActionError>;
}

/// Runs scripts through the `mysql` command-line client.
///
/// The command is a vector so wrappers such as `docker exec -i db mysql`
/// can be configured. The password is handed over in `MYSQL_PWD`, never on
/// the command line.
#[derive(Debug, Clone)]
pub struct MysqlRunner {
    command: Vec<String>,
}

impl Default for MysqlRunner {
    fn default() -> Self {
        Self {
            command: vec![DEFAULT_CLIENT.to_owned()],
        }
    }
}

impl MysqlRunner {
    /// Use `command` (program followed by fixed leading arguments).
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Configured command.
    pub fn command(&self) -> &[String] {
        &self.command
    }
}

#[async_trait]
impl ScriptRunner for MysqlRunner {
    async fn run(
        &self,
        target: &ConnectionTarget,
        password: &SecureString,
        mut script: ScriptSource,
    ) -> Result<String, ActionError> {
        let (program, fixed_args) = self
            .command
            .split_first()
            .ok_or_else(|| ActionError::execution("client command is empty", ""))?;

        let mut child = Command::new(program)
            .args(fixed_args)
            .args(target.client_args())
            .env(PASSWORD_ENV, password.expose())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ActionError::execution(format!("failed to launch '{program}': {e}"), ""))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ActionError::execution("failed to capture client stdin", ""))?;

        // stdin must close for the client to finish, so feed and collect together
        let feed = async move {
            let copied = tokio::io::copy(&mut script, &mut stdin).await;
            drop(stdin);
            copied
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output
            .map_err(|e| ActionError::execution(format!("failed to wait for client: {e}"), ""))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = password.scrub(&combined);

        if !output.status.success() {
            tracing::error!(
                host = %target.host,
                status = %output.status,
                "script execution failed"
            );
            return Err(ActionError::execution(
                format!("client {}", output.status),
                combined,
            ));
        }

        match fed {
            Ok(bytes) => tracing::debug!(host = %target.host, bytes, "script streamed"),
            // the client may stop reading early and still exit cleanly
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::warn!(host = %target.host, "client closed stdin before the script ended");
            }
            Err(e) => {
                return Err(ActionError::execution(
                    format!("failed to stream script: {e}"),
                    combined,
                ));
            }
        }

        Ok(combined)
    }
}
