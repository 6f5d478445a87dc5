//! JSON-RPC request lines.

use serde_json::{Value, json};

/// A request line with a numeric id.
pub fn request(id: u64, method: &str, params: Value) -> String {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
}

/// A notification line (no id).
pub fn notification(method: &str) -> String {
    json!({"jsonrpc": "2.0", "method": method}).to_string()
}

/// A `tools/call` request line.
pub fn tool_call(id: u64, name: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

/// The `initialize` handshake a well-behaved client sends first.
pub fn initialize(id: u64) -> String {
    request(
        id,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "shade-test", "version": "0.0.0"}
        }),
    )
}

/// Join request lines into one newline-terminated transcript.
pub fn transcript(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
