//! Byte-budgeted message truncation.

use std::borrow::Cow;

/// Maximum number of message bytes kept in a record (marker excluded).
pub const MAX_MESSAGE_BYTES: usize = 4096;

/// Appended to a message that was cut.
pub const TRUNCATION_MARKER: &str = " ... [truncated]";

/// Cut `message` to at most `max_bytes` bytes on a UTF-8 character boundary.
///
/// Messages that fit are returned borrowed and unchanged. Longer ones are cut at
/// the largest boundary not past `max_bytes` and get [`TRUNCATION_MARKER`] appended.
pub fn truncate_utf8(message: &str, max_bytes: usize) -> Cow<'_, str> {
    if message.len() <= max_bytes {
        return Cow::Borrowed(message);
    }

    // Index 0 is always a boundary, so this terminates.
    let mut cut = max_bytes;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }

    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&message[..cut]);
    out.push_str(TRUNCATION_MARKER);
    Cow::Owned(out)
}
