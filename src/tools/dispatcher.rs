// src/tools/dispatcher.rs

use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::tools::{
    catalog::ToolDescriptor,
    registry::{ConfigurationError, Handler, HandlerRegistry},
    schema,
};
use crate::AppState;

/// A named tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ToolNotFound,
    ValidationFailure,
    HandlerFailure,
    TimeoutFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Failure { kind: FailureKind, message: String },
}

impl ToolResult {
    fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ToolResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success(_))
    }
}

/// Routes tool calls through validation and a per-call deadline.
pub struct Dispatcher {
    catalog: Vec<ToolDescriptor>,
    registry: HandlerRegistry,
    timeout: Duration,
    listing: Value,
}

impl Dispatcher {
    pub fn new(
        catalog: Vec<ToolDescriptor>,
        handlers: Vec<(&'static str, Handler)>,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let registry = HandlerRegistry::build(&catalog, handlers)?;
        let listing = json!({ "tools": catalog });
        Ok(Self {
            catalog,
            registry,
            timeout,
            listing,
        })
    }

    pub fn catalog(&self) -> &[ToolDescriptor] {
        &self.catalog
    }

    /// The `tools/list` result; identical on every call.
    pub fn listing(&self) -> &Value {
        &self.listing
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one tool call to exactly one result.
    pub async fn dispatch(&self, state: AppState, request: ToolRequest) -> ToolResult {
        let started = Instant::now();
        let name = request.name.clone();
        let result = self.run(state, request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            ToolResult::Success(_) => info!(tool = %name, elapsed_ms, "tool call succeeded"),
            ToolResult::Failure { kind, message } => warn!(
                tool = %name,
                kind = ?kind,
                elapsed_ms,
                "tool call failed: {}",
                message
            ),
        }
        result
    }

    async fn run(&self, state: AppState, request: ToolRequest) -> ToolResult {
        let Some(tool) = self.registry.get(&request.name) else {
            return ToolResult::failure(
                FailureKind::ToolNotFound,
                format!("unknown tool {}", request.name),
            );
        };

        let arguments = match request.arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        if let Err(e) = schema::validate(&tool.descriptor.input_schema, &arguments) {
            return ToolResult::failure(FailureKind::ValidationFailure, e.to_string());
        }

        // Expiry drops the handler future, cancelling any in-flight request.
        match tokio::time::timeout(self.timeout, (tool.handler)(state, arguments)).await {
            Err(_) => ToolResult::failure(FailureKind::TimeoutFailure, "operation timed out"),
            Ok(Err(e)) => ToolResult::failure(FailureKind::HandlerFailure, format!("{:#}", e)),
            Ok(Ok(payload)) => ToolResult::Success(payload),
        }
    }
}
