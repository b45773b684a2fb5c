//! Logger builder implementation

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter, TestWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DisplayConfig, Format, Writer};
use crate::error::{LogError, LogResult};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger's root span entered.
///
/// The global subscriber itself stays installed for the process lifetime.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber.
    ///
    /// # Errors
    ///
    /// [`LogError::Filter`] when the level does not parse,
    /// [`LogError::AlreadyInitialized`] when a subscriber is already set.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))?;

        let registry = Registry::default().with(filter);
        let layer = match self.config.writer {
            Writer::Stderr => fmt_layer(self.config.format, &self.config.display, std::io::stderr),
            Writer::Stdout => fmt_layer(self.config.format, &self.config.display, std::io::stdout),
            Writer::Test => fmt_layer(self.config.format, &self.config.display, TestWriter::new()),
        };
        registry
            .with(layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        let fields = &self.config.fields;
        let root_span = (!fields.is_empty()).then(|| {
            tracing::info_span!(
                "app",
                service = fields.service.as_deref().unwrap_or(""),
                env = fields.env.as_deref().unwrap_or(""),
                version = fields.version.as_deref().unwrap_or("")
            )
            .entered()
        });

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}

fn fmt_layer<S, W>(format: Format, display: &DisplayConfig, writer: W) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(display.colors)
        .with_target(display.target)
        .with_file(display.source)
        .with_line_number(display.source)
        .with_thread_ids(display.thread_ids);

    match (format, display.time) {
        (Format::Pretty, true) => base.pretty().boxed(),
        (Format::Pretty, false) => base.pretty().without_time().boxed(),
        (Format::Compact, true) => base.compact().boxed(),
        (Format::Compact, false) => base.compact().without_time().boxed(),
        (Format::Json, time) => {
            let json = base
                .json()
                .flatten_event(display.flatten)
                .with_current_span(true)
                .with_span_list(false);
            if time { json.boxed() } else { json.without_time().boxed() }
        }
    }
}
