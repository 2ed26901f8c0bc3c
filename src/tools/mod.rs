//! # Tool dispatch
//!
//! A fixed catalog of tools, each with a JSON input schema, co-indexed with
//! an async handler. Calls flow catalog lookup -> schema validation ->
//! handler under a deadline -> response envelope.

pub mod catalog;
pub mod dispatcher;
pub mod envelope;
pub mod handlers;
pub mod registry;
pub mod schema;

pub use catalog::ToolDescriptor;
pub use dispatcher::{Dispatcher, FailureKind, ToolRequest, ToolResult};
pub use envelope::CallToolResult;
pub use registry::ConfigurationError;

use crate::config::Config;

/// The dispatcher for the full tool catalog.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher, ConfigurationError> {
    Dispatcher::new(catalog::catalog(), handlers::all(), config.tool_timeout)
}
