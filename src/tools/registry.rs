// src/tools/registry.rs

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::tools::catalog::ToolDescriptor;
use crate::AppState;

/// Async tool implementation. Arguments are already validated against the
/// tool's schema and are always a JSON object.
pub type Handler =
    Arc<dyn Fn(AppState, Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Wraps an `async fn(AppState, Value) -> anyhow::Result<Value>` as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(AppState, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |state, args| Box::pin(f(state, args)))
}

/// Catalog and handler set disagree. Fatal at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("tool '{0}' is listed more than once in the catalog")]
    DuplicateDescriptor(String),
    #[error("tool '{0}' has more than one handler")]
    DuplicateHandler(String),
    #[error("tool '{0}' is cataloged but has no handler")]
    MissingHandler(String),
    #[error("handler '{0}' has no catalog entry")]
    UnlistedHandler(String),
}

pub struct RegisteredTool {
    pub descriptor: ToolDescriptor,
    pub handler: Handler,
}

/// Name -> (descriptor, handler). Built once, read-only afterwards.
pub struct HandlerRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl HandlerRegistry {
    /// Pairs every descriptor with exactly one handler and vice versa.
    pub fn build(
        catalog: &[ToolDescriptor],
        handlers: Vec<(&'static str, Handler)>,
    ) -> Result<Self, ConfigurationError> {
        let mut by_name: HashMap<&'static str, Handler> = HashMap::with_capacity(handlers.len());
        for (name, handler) in handlers {
            if by_name.insert(name, handler).is_some() {
                return Err(ConfigurationError::DuplicateHandler(name.to_string()));
            }
        }

        let mut tools = HashMap::with_capacity(catalog.len());
        for descriptor in catalog {
            if tools.contains_key(&descriptor.name) {
                return Err(ConfigurationError::DuplicateDescriptor(descriptor.name.clone()));
            }
            let handler = by_name
                .remove(descriptor.name.as_str())
                .ok_or_else(|| ConfigurationError::MissingHandler(descriptor.name.clone()))?;
            tools.insert(
                descriptor.name.clone(),
                RegisteredTool {
                    descriptor: descriptor.clone(),
                    handler,
                },
            );
        }

        if let Some(unlisted) = by_name.keys().min() {
            return Err(ConfigurationError::UnlistedHandler(unlisted.to_string()));
        }

        Ok(Self { tools })
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
