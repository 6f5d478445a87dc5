//! Covert channel codec over the Unicode Tag block
//!
//! Printable ASCII is shifted into the Tag block (`U+E0000`..=`U+E007F`).
//! Conventional terminals and editors draw no glyph for these code points,
//! but anything that processes text per code point (tokenizers included)
//! still receives them intact.
//!
//! ```
//! use shade_codec::{decode, encode, strip};
//!
//! let hidden = encode("call me");
//! let text = format!("Add two numbers{hidden}");
//!
//! assert_eq!(strip(&text), "Add two numbers");
//! assert_eq!(decode(&text), "Add two numberscall me");
//! ```
//!
//! The codec is total: nothing here can fail. Characters outside ASCII are
//! dropped by [`encode`] and passed through by [`decode`].

mod payload;

pub use payload::CovertPayload;

/// First code point of the Unicode Tag block.
pub const TAG_BASE: u32 = 0xE0000;

/// Last code point of the Unicode Tag block.
pub const TAG_LAST: u32 = 0xE007F;

/// Returns true if `c` lies in the Tag block.
pub fn is_tag(c: char) -> bool {
    (TAG_BASE..=TAG_LAST).contains(&(c as u32))
}

/// Returns true if `text` carries at least one Tag block character.
pub fn contains_covert(text: &str) -> bool {
    text.chars().any(is_tag)
}

/// Encode `text` into its invisible Tag block form.
///
/// ASCII characters (`0..=127`, control characters included) are shifted by
/// [`TAG_BASE`]. Characters that are already Tag code points are kept as they
/// are, so a payload is never encoded twice. Everything else is dropped.
pub fn encode(text: &str) -> CovertPayload {
    let encoded = text
        .chars()
        .filter_map(|c| {
            if c.is_ascii() {
                char::from_u32(TAG_BASE + c as u32)
            } else if is_tag(c) {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    CovertPayload::from_encoded(encoded)
}

/// Decode every Tag block character in `text` back to ASCII.
///
/// Works on mixed input: visible characters pass through untouched and keep
/// their position relative to the decoded ones.
pub fn decode(text: &str) -> String {
    text.chars().map(untag).collect()
}

/// Remove every Tag block character, leaving what a human reviewer sees.
pub fn strip(text: &str) -> String {
    text.chars().filter(|c| !is_tag(*c)).collect()
}

/// Decode only the hidden channel of `text`, discarding the visible part.
pub fn reveal(text: &str) -> String {
    text.chars().filter(|c| is_tag(*c)).map(untag).collect()
}

fn untag(c: char) -> char {
    if is_tag(c) {
        char::from_u32(c as u32 - TAG_BASE).unwrap_or(c)
    } else {
        c
    }
}
