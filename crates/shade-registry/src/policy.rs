//! Registration policies
//!
//! The registry itself has no notion of a legitimate versus an adversarial
//! registration. A [`RegistrationPolicy`] sees every incoming descriptor
//! alongside whatever already holds that name and decides whether it goes in.

use serde::{Deserialize, Serialize};

use crate::descriptor::{Capability, ToolDescriptor};

/// Decision returned by a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(String),
}

/// Hook consulted on every registration
pub trait RegistrationPolicy: Send + Sync {
    fn review(&self, incoming: &ToolDescriptor, existing: Option<&ToolDescriptor>) -> Verdict;
}

/// What to do when a name is registered twice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionMode {
    /// Replace silently
    #[default]
    Overwrite,
    /// Replace, logging the shadowed registration
    Warn,
    /// Keep the first registration
    Reject,
}

/// Built-in policy covering collisions and the unrestricted capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPolicy {
    pub collisions: CollisionMode,
    pub allow_unrestricted: bool,
}

impl DefaultPolicy {
    /// Overwrite on collision and admit unrestricted tools
    pub fn permissive() -> Self {
        Self {
            collisions: CollisionMode::Overwrite,
            allow_unrestricted: true,
        }
    }
}

impl RegistrationPolicy for DefaultPolicy {
    fn review(&self, incoming: &ToolDescriptor, existing: Option<&ToolDescriptor>) -> Verdict {
        if incoming.capability() == Capability::Unrestricted && !self.allow_unrestricted {
            return Verdict::Reject("unrestricted capability is not allowed".to_string());
        }

        let Some(existing) = existing else {
            return Verdict::Accept;
        };

        match self.collisions {
            CollisionMode::Overwrite => Verdict::Accept,
            CollisionMode::Warn => {
                tracing::warn!(
                    tool = incoming.name(),
                    shadowed = existing.visible_description(),
                    "Tool registration shadows an existing tool"
                );
                Verdict::Accept
            }
            CollisionMode::Reject => {
                Verdict::Reject(format!("a tool named '{}' is already registered", existing.name()))
            }
        }
    }
}
