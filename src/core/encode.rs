//! Escaping for double-quoted `KEY="VALUE"` assignments.

/// `raw` without one trailing `\n` or `\r\n`.
pub fn strip_terminator(raw: &str) -> &str {
    raw.strip_suffix("\r\n")
        .or_else(|| raw.strip_suffix('\n'))
        .unwrap_or(raw)
}

/// Whether `raw` still spans several lines once its trailing terminator is
/// dropped. Such a value cannot be written as a single assignment line.
pub fn is_multiline(raw: &str) -> bool {
    strip_terminator(raw).contains(['\r', '\n'])
}

/// Escape a raw value for embedding between double quotes.
///
/// Strips one trailing line terminator, then doubles every backslash and
/// escapes every double quote. Backslashes go first so the escapes added for
/// quotes are not doubled again.
pub fn encode(raw: &str) -> String {
    strip_terminator(raw)
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Reverse [`encode`] by undoing the two substitutions in opposite order.
pub fn decode(encoded: &str) -> String {
    encoded.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Render one environment-file assignment line.
pub fn assignment(key: &str, raw: &str) -> String {
    format!("{}=\"{}\"", key, encode(raw))
}

/// Split a `KEY="VALUE"` line into its key and decoded value.
///
/// Unquoted values are returned as-is.
pub fn parse_assignment(line: &str) -> Option<(&str, String)> {
    let (key, value) = line.split_once('=')?;
    let value = match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => decode(inner),
        None => value.to_string(),
    };
    Some((key, value))
}
