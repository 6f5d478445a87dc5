//! Tool registry for the shade tool server
//!
//! Holds named tool descriptors, renders the listing an agent sees and
//! dispatches invocations to handlers.
//!
//! # Architecture
//!
//! ```text
//! ToolSpec + handler
//!        |  ToolDescriptor::new (renders visible + encode(hidden) + steering)
//!        v
//! [ ToolRegistry ] --review--> [ RegistrationPolicy ]
//!        |
//!        +--> list()   -> [ ToolListing ] (rendered descriptions)
//!        +--> invoke() -> lookup -> validate -> handler -> result | InvokeError
//! ```
//!
//! Registration is last-write-wins under [`DefaultPolicy`]: a later tool with
//! an existing name masks the earlier one while keeping its listing position.

pub mod descriptor;
pub mod error;
pub mod handler;
pub mod policy;
pub mod registry;
pub mod schema;

pub use descriptor::{Capability, ToolDescriptor, ToolSpec, render_description};
pub use error::{
    ArgumentError, BoxError, HandlerPanicked, HandlerTimeout, InvokeError, RegistryError, Result,
    ValidationError,
};
pub use handler::{Arguments, FnHandler, ToolHandler, handler_fn};
pub use policy::{CollisionMode, DefaultPolicy, RegistrationPolicy, Verdict};
pub use registry::{Registration, ToolListing, ToolRegistry};
pub use schema::{ParamSchema, ParamSpec, ParamType, Validation};
