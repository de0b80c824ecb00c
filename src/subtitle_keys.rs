/*!
 * Derived text keys for subtitle sets.
 *
 * A subtitle set is identified by its base key (the file stem). The host
 * looks texts up through two namespaced forms:
 * - full key: `PDASubtitleLib_<base>`, the combined text of the set
 * - line key: `PDASubtitleLib_<base>_<index>`, one cue by zero-based index
 *
 * These strings are part of the host integration and must not change.
 */

// @const: Namespace prefix shared by every derived key
pub const KEY_PREFIX: &str = "PDASubtitleLib_";

/// Full key for the combined text of a set
pub fn full_key(base_key: &str) -> String {
    format!("{}{}", KEY_PREFIX, base_key)
}

/// Key for the cue at `index` of a set
pub fn line_key(base_key: &str, index: usize) -> String {
    format!("{}{}_{}", KEY_PREFIX, base_key, index)
}

/// Remove the namespace prefix, returning the key unchanged when absent.
///
/// On a line key this yields `<base>_<index>`, not the bare base key.
pub fn strip_prefix(key: &str) -> &str {
    key.strip_prefix(KEY_PREFIX).unwrap_or(key)
}

pub fn has_prefix(key: &str) -> bool {
    key.starts_with(KEY_PREFIX)
}

/// Split a line key into its base key and index
pub fn parse_line_key(key: &str) -> Option<(&str, usize)> {
    let rest = key.trim().strip_prefix(KEY_PREFIX)?;
    let (base, index) = rest.rsplit_once('_')?;
    if base.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, index.parse().ok()?))
}

/// True for keys shaped like `line_key(base, i)`
pub fn is_line_key(key: &str) -> bool {
    parse_line_key(key).is_some()
}
