//! Input record validation

use opsdeck_action::ActionError;

use crate::model::RunScriptInput;
use crate::runner::ConnectionTarget;

/// Port used when the input carries none.
pub const DEFAULT_PORT: u16 = 3306;

/// An input record that passed validation, with defaults applied.
#[derive(Clone)]
pub struct ValidatedInput {
    /// Correlation id.
    pub guid: String,
    /// Key-derivation seed.
    pub seed: String,
    /// Encrypted password.
    pub password: String,
    /// Artifact reference.
    pub endpoint: String,
    /// Connection target with the port resolved.
    pub target: ConnectionTarget,
}

impl std::fmt::Debug for ValidatedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatedInput")
            .field("guid", &self.guid)
            .field("endpoint", &self.endpoint)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, ActionError> {
    if value.trim().is_empty() {
        return Err(ActionError::validation(format!("{field} is empty")));
    }
    Ok(value)
}

/// Check required fields in order (Host, Guid, Seed, UserName, Password,
/// EndPoint) and resolve the port.
///
/// The first missing field is reported. Whitespace-only counts as missing.
/// Values are kept as sent: `guid` and `seed` feed key derivation, so they
/// must match the tokens the password was sealed with.
///
/// # Errors
///
/// [`ActionError::Validation`] naming the offending field.
pub fn validate(input: &RunScriptInput, default_port: u16) -> Result<ValidatedInput, ActionError> {
    let host = require(&input.host, "Host")?;
    let guid = require(&input.guid, "Guid")?;
    let seed = require(&input.seed, "Seed")?;
    let user = require(&input.user_name, "UserName")?;
    let password = require(&input.password, "Password")?;
    let endpoint = require(&input.endpoint, "EndPoint")?;

    let port = match input.port.trim() {
        "" => default_port,
        raw => raw
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ActionError::validation(format!("Port is invalid: {raw}")))?,
    };

    Ok(ValidatedInput {
        guid: guid.to_owned(),
        seed: seed.to_owned(),
        password: password.to_owned(),
        endpoint: endpoint.to_owned(),
        target: ConnectionTarget {
            host: host.to_owned(),
            port,
            user: user.to_owned(),
            database: input.database_name.trim().to_owned(),
        },
    })
}
