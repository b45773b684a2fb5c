//! # opsdeck Action System
//!
//! Uniform calling convention for operational actions.
//!
//! An action decodes an opaque JSON request ([`Action::read_param`]),
//! executes it ([`Action::execute`]) and returns its complete output plus
//! one aggregate error signal ([`Outcome`]). Per-item success or failure
//! lives in each item's [`ActionResult`], never in the aggregate error.
//!
//! ## Core Types
//!
//! - [`Action`] — typed decode/execute contract
//! - [`ActionHandler`] — type-erased JSON handler stored in the registry
//! - [`ActionRegistry`] — explicit name → handler map built at startup
//! - [`Plugin`] — packaging unit that registers actions
//! - [`ActionError`] — per-item failure kinds
//! - [`ActionResult`] / [`ResultCode`] — per-item result object
//! - [`Outcome`] — output plus aggregate error

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Typed action trait.
pub mod action;
/// Error types for per-item failures.
pub mod error;
/// Type-erased handler and the typed → erased adapter.
pub mod handler;
/// Static action descriptors.
pub mod metadata;
/// Plugin registration hook.
pub mod plugin;
/// Action registry for lookup by name.
pub mod registry;
/// Result codes, per-item results and batch outcomes.
pub mod result;

// ── Public re-exports ───────────────────────────────────────────────────────

pub use action::Action;
pub use error::{ActionError, ErrorKind};
pub use handler::{ActionAdapter, ActionHandler};
pub use metadata::ActionMetadata;
pub use plugin::Plugin;
pub use registry::{ActionRegistry, RegistryError};
pub use result::{ActionResult, CallBackParameter, Outcome, ResultCode};
