//! Bracket-path parsing for field names.
//!
//! A field name such as `user[addresses][][city]:string` splits into a key
//! path (`user`, `addresses`, append, `city`) and an optional type suffix.
//!
//! Rules:
//! - Every `[` starts a new key and every `]` is dropped, so the nested form
//!   `a[b[c]]` yields the same keys as the flat form `a[b][c]`
//! - A leading `[` is ignored: `[foo][bar]` is `foo[bar]`
//! - An empty segment (`a[]`) is the append key
//! - The type suffix is whatever follows the last `:`, unless that text still
//!   contains a bracket (then the colon belongs to a key)

use core::fmt;

use crate::error::{Error, Result};

/// One segment of a key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Object property, or an array index when numeric keys are indices.
    Named(String),
    /// The empty segment: push onto (or continue) the enclosing sequence.
    Append,
}

impl Key {
    pub fn named(s: impl Into<String>) -> Self {
        Key::Named(s.into())
    }

    pub fn is_append(&self) -> bool {
        matches!(self, Key::Append)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::Named(s) => s,
            Key::Append => "",
        }
    }

    /// The key as a sequence index, if it is all ASCII digits.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Named(s) => parse_index(s),
            Key::Append => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Key::Append
        } else {
            Key::Named(s.to_string())
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        if s.is_empty() { Key::Append } else { Key::Named(s) }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type KeyPath = Vec<Key>;

/// Result of [`parse_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub keys: KeyPath,
    /// `None` when the name has no suffix; `Some("")` for a trailing bare colon.
    pub type_name: Option<String>,
}

/// Parse a field name into its key path and optional type suffix.
pub fn parse_path(name: &str) -> Result<ParsedName> {
    if name.is_empty() {
        return Err(Error::invalid_argument("field name must be a non-empty string"));
    }
    let (base, type_name) = split_type(name);
    Ok(ParsedName {
        keys: split_keys(base),
        type_name: type_name.map(str::to_string),
    })
}

/// Split `name:type` at the last colon that is outside every bracket.
pub fn split_type(name: &str) -> (&str, Option<&str>) {
    match name.rfind(':') {
        Some(idx) => {
            let suffix = &name[idx + 1..];
            if suffix.contains(['[', ']']) {
                (name, None)
            } else {
                (&name[..idx], Some(suffix))
            }
        }
        None => (name, None),
    }
}

/// Split a name without type suffix into keys.
pub fn split_keys(name: &str) -> KeyPath {
    let mut keys: KeyPath = name
        .split('[')
        .map(|token| Key::from(token.replace(']', "")))
        .collect();
    if keys.first().is_some_and(Key::is_append) {
        keys.remove(0);
    }
    keys
}

/// Render keys back in flat bracket notation: `a[b][]`.
pub fn format_path(keys: &[Key]) -> String {
    let mut out = String::new();
    for (i, key) in keys.iter().enumerate() {
        if i == 0 {
            out.push_str(key.as_str());
        } else {
            out.push('[');
            out.push_str(key.as_str());
            out.push(']');
        }
    }
    out
}

/// `^[0-9]+$` as a `usize`.
pub(crate) fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[&str]) -> KeyPath {
        list.iter().map(|s| Key::from(*s)).collect()
    }

    #[test]
    fn test_split_keys_flat() {
        assert_eq!(split_keys("foo"), keys(&["foo"]));
        assert_eq!(split_keys("[foo]"), keys(&["foo"]));
        assert_eq!(split_keys("foo[inn][bar]"), keys(&["foo", "inn", "bar"]));
        assert_eq!(split_keys("foo[inn][bar][0]"), keys(&["foo", "inn", "bar", "0"]));
    }

    #[test]
    fn test_split_keys_append() {
        assert_eq!(split_keys("arr[][bar]"), keys(&["arr", "", "bar"]));
        assert_eq!(split_keys("arr[][][bar]"), keys(&["arr", "", "", "bar"]));
        assert_eq!(split_keys("arr[][bar][]"), keys(&["arr", "", "bar", ""]));
        assert_eq!(split_keys("[]"), keys(&[""]));
    }

    #[test]
    fn test_split_keys_nested() {
        assert_eq!(split_keys("foo[inn[bar]]"), keys(&["foo", "inn", "bar"]));
        assert_eq!(split_keys("foo[inn[bar[0]]]"), keys(&["foo", "inn", "bar", "0"]));
        assert_eq!(split_keys("[foo[inn[bar[0]]]]"), keys(&["foo", "inn", "bar", "0"]));
        assert_eq!(split_keys("foo[arr[]]"), keys(&["foo", "arr", ""]));
        assert_eq!(split_keys("foo[bar[arr[]]]"), keys(&["foo", "bar", "arr", ""]));
    }

    #[test]
    fn test_split_type() {
        assert_eq!(split_type("foo"), ("foo", None));
        assert_eq!(split_type("foo:boolean"), ("foo", Some("boolean")));
        assert_eq!(split_type("foo[bar]:null"), ("foo[bar]", Some("null")));
        assert_eq!(split_type("foo[my::key]:string"), ("foo[my::key]", Some("string")));
        assert_eq!(split_type("foo[my:key]"), ("foo[my:key]", None));
        assert_eq!(split_type("foo:"), ("foo", Some("")));
        assert_eq!(split_type("notype::foobar"), ("notype:", Some("foobar")));
    }

    #[test]
    fn test_parse_path() {
        let parsed = parse_path("a:number").unwrap();
        assert_eq!(parsed.keys, keys(&["a"]));
        assert_eq!(parsed.type_name.as_deref(), Some("number"));

        let parsed = parse_path("a[]").unwrap();
        assert_eq!(parsed.keys, vec![Key::named("a"), Key::Append]);
        assert_eq!(parsed.type_name, None);
    }

    #[test]
    fn test_parse_path_rejects_empty() {
        assert!(matches!(parse_path(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&keys(&["a", "", "b"])), "a[][b]");
        assert_eq!(format_path(&keys(&["a"])), "a");
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("007"), Some(7));
        assert_eq!(parse_index("1st"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index(""), None);
    }
}
