//! Logger configuration

mod presets;

use std::str::FromStr;

use serde::Deserialize;

use crate::error::LogError;

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive string, e.g. `info,opsdeck_database=debug`.
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Destination.
    pub writer: Writer,
    /// Display toggles.
    pub display: DisplayConfig,
    /// Global fields attached to a root span.
    pub fields: Fields,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::default(),
            writer: Writer::default(),
            display: DisplayConfig::default(),
            fields: Fields::default(),
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human-oriented.
    Pretty,
    /// Single-line, human-oriented.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(LogError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Writer {
    /// Standard error.
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
    /// libtest's captured output.
    Test,
}

/// Display toggles for the fmt layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DisplayConfig {
    /// ANSI colors.
    pub colors: bool,
    /// Timestamps.
    pub time: bool,
    /// Module target.
    pub target: bool,
    /// Source file and line.
    pub source: bool,
    /// Thread ids.
    pub thread_ids: bool,
    /// JSON only: put event fields at the top level.
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            time: true,
            target: true,
            source: false,
            thread_ids: false,
            flatten: false,
        }
    }
}

/// Global fields describing the running process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Fields {
    /// Service name.
    pub service: Option<String>,
    /// Deployment environment.
    pub env: Option<String>,
    /// Service version.
    pub version: Option<String>,
}

impl Fields {
    /// Read `OPSDECK_SERVICE`, `OPSDECK_ENV` and `OPSDECK_VERSION` through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service: lookup("OPSDECK_SERVICE"),
            env: lookup("OPSDECK_ENV"),
            version: lookup("OPSDECK_VERSION"),
        }
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.env.is_none() && self.version.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case("COMPACT", Format::Compact)]
    #[case(" json ", Format::Json)]
    fn format_from_str(#[case] raw: &str, #[case] expected: Format) {
        assert_eq!(raw.parse::<Format>().unwrap(), expected);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(matches!("xml".parse::<Format>(), Err(LogError::Config(_))));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config =
            serde_json::from_value(serde_json::json!({"level": "debug", "format": "json"}))
                .unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.writer, Writer::Stderr);
        assert!(config.fields.is_empty());
    }
}
