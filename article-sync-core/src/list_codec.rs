//! Comma-separated text <-> ordered list of strings.

/// Separator written between list items.
pub const SEPARATOR: &str = ", ";

/// Returned when list text cannot be split at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not decode list: {0}")]
pub struct ListDecodeError(pub String);

pub fn encode(items: &[String]) -> String {
    items.join(SEPARATOR)
}

/// Splits on `,` and trims each item.
///
/// Blank input is an empty list. Stray separators are kept as empty items
/// (`"a,,b"` gives three items); callers must tolerate that.
pub fn decode(text: &str) -> Result<Vec<String>, ListDecodeError> {
    if text.contains('\0') {
        return Err(ListDecodeError("embedded NUL byte".into()));
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(text.split(',').map(|item| item.trim().to_string()).collect())
}
