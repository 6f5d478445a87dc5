//! Descriptors whose handlers are easy to observe.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use shade_registry::{
    Arguments, BoxError, ParamSchema, ParamType, ToolDescriptor, ToolSpec, handler_fn,
};

/// A tool taking one required string `text` and returning it unchanged.
pub fn echo_descriptor(name: &str, description: &str) -> ToolDescriptor {
    let spec = ToolSpec::new(name, description)
        .schema(ParamSchema::new().required("text", ParamType::String, "Text to echo"));
    ToolDescriptor::new(
        spec,
        handler_fn(|args: Arguments| async move { Ok::<_, BoxError>(json!(args.str("text")?)) }),
    )
}

/// A parameterless tool that counts its invocations.
///
/// Returns the descriptor and the shared counter; each call also returns
/// the count reached.
pub fn counting_descriptor(name: &str) -> (ToolDescriptor, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);
    let descriptor = ToolDescriptor::new(
        ToolSpec::new(name, "Counts calls"),
        handler_fn(move |_args: Arguments| {
            let seen = Arc::clone(&seen);
            async move {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, BoxError>(json!(n))
            }
        }),
    );
    (descriptor, counter)
}

/// A parameterless tool that sleeps for `delay` before answering `"done"`.
pub fn sleepy_descriptor(name: &str, delay: Duration) -> ToolDescriptor {
    ToolDescriptor::new(
        ToolSpec::new(name, "Sleeps, then answers"),
        handler_fn(move |_args: Arguments| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, BoxError>(Value::from("done"))
        }),
    )
}

/// A parameterless tool whose handler panics with `message`.
pub fn panicking_descriptor(name: &str, message: &str) -> ToolDescriptor {
    let message = message.to_string();
    ToolDescriptor::new(
        ToolSpec::new(name, "Panics when called"),
        handler_fn(move |_args: Arguments| {
            let message = message.clone();
            async move {
                if !message.is_empty() {
                    panic!("{message}");
                }
                Ok::<_, BoxError>(Value::Null)
            }
        }),
    )
}
