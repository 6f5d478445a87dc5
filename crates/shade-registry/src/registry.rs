//! The tool registry
//!
//! Holds descriptors in registration order behind a single-writer,
//! multi-reader lock. Listing and lookups share the read side; `register`
//! takes the write side. `invoke` only holds the lock long enough to clone
//! the descriptor, so handlers of concurrent calls never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::ToolDescriptor;
use crate::error::{
    BoxError, HandlerPanicked, HandlerTimeout, InvokeError, RegistryError, Result, ValidationError,
};
use crate::handler::Arguments;
use crate::policy::{DefaultPolicy, RegistrationPolicy, Verdict};

/// One entry of the listing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolListing {
    pub name: String,
    /// Always the rendered description, covert payload included
    pub description: String,
    pub input_schema: Value,
}

/// How a successful registration landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// New name, appended at the end
    Inserted,
    /// Existing name, replaced at its original position
    Replaced,
}

#[derive(Default)]
struct Entries {
    order: Vec<String>,
    tools: HashMap<String, Arc<ToolDescriptor>>,
}

/// Name-keyed tool registry
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shade_registry::{Arguments, BoxError, ParamSchema, ParamType, ToolDescriptor,
///     ToolRegistry, ToolSpec, handler_fn};
///
/// let registry = ToolRegistry::new();
/// let spec = ToolSpec::new("echo", "Echo the input")
///     .schema(ParamSchema::new().required("text", ParamType::String, "Text to echo"));
/// registry
///     .register(ToolDescriptor::new(spec, handler_fn(|args: Arguments| async move {
///         Ok::<_, BoxError>(json!(args.str("text")?))
///     })))
///     .unwrap();
///
/// assert_eq!(registry.list()[0].name, "echo");
/// ```
pub struct ToolRegistry {
    entries: RwLock<Entries>,
    policy: Box<dyn RegistrationPolicy>,
    timeout: Option<Duration>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ToolRegistry {
    /// Registry with the default policy: silent overwrite, no unrestricted tools
    pub fn new() -> Self {
        Self::with_policy(DefaultPolicy::default())
    }

    pub fn with_policy(policy: impl RegistrationPolicy + 'static) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            policy: Box::new(policy),
            timeout: None,
        }
    }

    /// Bound every handler execution; a stalled handler becomes a handler error
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Register a descriptor under its name.
    ///
    /// Under the default policy a second registration under the same name
    /// silently replaces the first, keeping the first one's position.
    pub fn register(&self, descriptor: ToolDescriptor) -> Result<Registration> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let name = descriptor.name().to_string();

        let existing = entries.tools.get(&name).map(Arc::as_ref);
        if let Verdict::Reject(reason) = self.policy.review(&descriptor, existing) {
            tracing::info!(tool = %name, %reason, "Tool registration rejected");
            return Err(RegistryError::Rejected { name, reason });
        }

        let covert = descriptor.hidden_payload().is_some();
        let replaced = entries
            .tools
            .insert(name.clone(), Arc::new(descriptor))
            .is_some();

        if replaced {
            tracing::debug!(tool = %name, covert, "Tool replaced");
            Ok(Registration::Replaced)
        } else {
            tracing::debug!(tool = %name, covert, "Tool registered");
            entries.order.push(name);
            Ok(Registration::Inserted)
        }
    }

    /// The listing surface, in registration order
    pub fn list(&self) -> Vec<ToolListing> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .order
            .iter()
            .filter_map(|name| entries.tools.get(name))
            .map(|d| ToolListing {
                name: d.name().to_string(),
                description: d.rendered_description().to_string(),
                input_schema: d.schema().to_json_schema(),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<ToolDescriptor>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.tools.contains_key(name)
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.clone()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up, validate and run a tool.
    ///
    /// `null` arguments are treated as an empty object. Arguments the schema
    /// does not declare are logged and passed through.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Value,
    ) -> std::result::Result<Value, InvokeError> {
        tracing::debug!(tool = %name, "Invocation received");

        let descriptor = self.get(name).ok_or_else(|| {
            tracing::debug!(tool = %name, "Lookup failed");
            InvokeError::ToolNotFound {
                name: name.to_string(),
            }
        })?;

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(ValidationError {
                    malformed: true,
                    ..Default::default()
                }
                .into());
            }
        };

        let validation = descriptor.schema().validate(&arguments);
        if !validation.unexpected.is_empty() {
            tracing::warn!(
                tool = %name,
                unexpected = ?validation.unexpected,
                "Arguments not declared by the schema"
            );
        }
        if let Some(err) = validation.into_error() {
            tracing::debug!(tool = %name, %err, "Validation failed");
            return Err(err.into());
        }

        // Own task, so a panicking handler surfaces as a JoinError here
        let handler = descriptor.handler();
        let mut task = tokio::spawn(async move { handler.call(Arguments::new(arguments)).await });
        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    task.abort();
                    Ok(Err(HandlerTimeout(limit).into()))
                }
            },
            None => task.await,
        };
        let outcome = joined.unwrap_or_else(|err| Err(join_failure(err)));

        match outcome {
            Ok(value) => {
                tracing::debug!(tool = %name, "Invocation responded");
                Ok(value)
            }
            Err(cause) => {
                tracing::debug!(tool = %name, %cause, "Handler failed");
                Err(InvokeError::Handler {
                    name: name.to_string(),
                    cause,
                })
            }
        }
    }
}

fn join_failure(err: tokio::task::JoinError) -> BoxError {
    if !err.is_panic() {
        return Box::new(err);
    }
    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    Box::new(HandlerPanicked(message))
}
