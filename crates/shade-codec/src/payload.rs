//! The encoded payload type

use std::fmt;

/// A run of Tag block code points produced by [`crate::encode`].
///
/// The inner string is only ever built by the encoder, so every character is
/// guaranteed to be a Tag code point. An empty payload is the no-op result of
/// encoding empty or entirely non-ASCII input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CovertPayload(String);

impl CovertPayload {
    pub(crate) fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// The encoded form, ready to append to visible text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of code points (one per surviving input character).
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// True when nothing survived encoding.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CovertPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CovertPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
