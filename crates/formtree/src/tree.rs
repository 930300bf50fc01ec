//! Deep insertion of values along a key path.
//!
//! Intermediate containers are created on demand; the kind of each one is
//! decided by the key that follows it:
//! - an append key asks for a sequence
//! - an all-digit key asks for a sequence only when
//!   `use_int_keys_as_array_index` is on, otherwise it is a map key
//! - anything else asks for a map
//!
//! A slot holding the wrong kind is replaced by an empty container of the
//! right kind. Nothing is merged back; the previous content is gone.

use crate::error::{Error, Result};
use crate::options::Options;
use crate::path::{Key, format_path, parse_index};
use crate::value::{Map, Value};

/// Largest sequence index accepted from a key.
pub const MAX_ARRAY_INDEX: usize = 100_000;

/// Most keys accepted in one path. Trees are dropped and converted
/// recursively, so nesting has to stay bounded.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Map,
    Sequence,
}

impl ChildKind {
    fn for_next_key(next: &Key, options: &Options) -> Self {
        if next.is_append() || (options.use_int_keys_as_array_index && next.as_index().is_some()) {
            ChildKind::Sequence
        } else {
            ChildKind::Map
        }
    }

    fn empty(self) -> Value {
        match self {
            ChildKind::Map => Value::Object(Map::new()),
            ChildKind::Sequence => Value::Array(Vec::new()),
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ChildKind::Map, Value::Object(_)) | (ChildKind::Sequence, Value::Array(_))
        )
    }

    fn name(self) -> &'static str {
        match self {
            ChildKind::Map => "map",
            ChildKind::Sequence => "sequence",
        }
    }
}

/// Set `value` in `root` at `keys`, creating intermediate containers.
///
/// A single key assigns (named) or pushes (append) directly. With more keys,
/// an append key continues the last element of the sequence when that element
/// is a container that does not yet hold the rest of the path, and starts a
/// new element otherwise.
///
/// Paths longer than [`MAX_DEPTH`] keys are rejected.
pub fn deep_set(root: &mut Value, keys: &[Key], value: Value, options: &Options) -> Result<()> {
    if keys.is_empty() {
        return Err(Error::invalid_argument("keys must contain at least one element"));
    }
    if keys.len() > MAX_DEPTH {
        return Err(Error::invalid_argument(format!(
            "key path has {} keys, more than the maximum of {MAX_DEPTH}",
            keys.len()
        )));
    }
    if !root.is_container() {
        return Err(Error::invalid_argument(format!(
            "cannot set '{}' inside a {}; expected a map or sequence",
            format_path(keys),
            root.kind_name()
        )));
    }

    let mut current = root;
    let mut keys = keys;
    while let Some((key, tail)) = keys.split_first() {
        let Some(next) = tail.first() else {
            return assign(current, key, value);
        };

        let slot = child_slot(current, key, tail)?;
        let kind = ChildKind::for_next_key(next, options);
        if !kind.matches(slot) {
            if !matches!(slot, Value::Null) {
                tracing::debug!(
                    key = %key,
                    from = slot.kind_name(),
                    to = kind.name(),
                    "replacing value with an empty container"
                );
            }
            *slot = kind.empty();
        }
        current = slot;
        keys = tail;
    }
    Ok(())
}

/// Follow `keys` from `value` and return what sits at the end.
///
/// An append key never resolves. A primitive reached before the keys run out
/// is returned as-is, so the path counts as occupied.
pub fn deep_get<'a>(value: &'a Value, keys: &[Key]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        if current.is_primitive() {
            break;
        }
        current = match key {
            Key::Append => return None,
            Key::Named(k) => current.get(k)?,
        };
    }
    Some(current)
}

fn assign(root: &mut Value, key: &Key, value: Value) -> Result<()> {
    match (root, key) {
        (Value::Array(items), Key::Append) => items.push(value),
        (Value::Array(items), Key::Named(k)) => *index_slot(items, k)? = value,
        (Value::Object(map), Key::Named(k)) => {
            map.insert(k.as_str(), value);
        }
        (Value::Object(_), Key::Append) => return Err(append_on_map()),
        (other, _) => {
            return Err(Error::invalid_argument(format!(
                "cannot set '{key}' inside a {}",
                other.kind_name()
            )));
        }
    }
    Ok(())
}

fn child_slot<'a>(root: &'a mut Value, key: &Key, tail: &[Key]) -> Result<&'a mut Value> {
    match (root, key) {
        (Value::Array(items), Key::Append) => {
            let continue_last = items
                .last()
                .is_some_and(|last| last.is_container() && deep_get(last, tail).is_none());
            if !continue_last {
                items.push(Value::Null);
            }
            let idx = items.len() - 1;
            Ok(&mut items[idx])
        }
        (Value::Array(items), Key::Named(k)) => index_slot(items, k),
        (Value::Object(map), Key::Named(k)) => Ok(map.slot(k)),
        (Value::Object(_), Key::Append) => Err(append_on_map()),
        (other, _) => Err(Error::invalid_argument(format!(
            "cannot descend into '{key}' of a {}",
            other.kind_name()
        ))),
    }
}

/// Slot at index `k`, padding the sequence with nulls up to it.
fn index_slot<'a>(items: &'a mut Vec<Value>, k: &str) -> Result<&'a mut Value> {
    let idx = parse_index(k).ok_or_else(|| {
        Error::invalid_argument(format!("key '{k}' is not a valid index into a sequence"))
    })?;
    if idx > MAX_ARRAY_INDEX {
        return Err(Error::invalid_argument(format!(
            "sequence index {idx} exceeds the maximum of {MAX_ARRAY_INDEX}"
        )));
    }
    if idx >= items.len() {
        items.resize(idx + 1, Value::Null);
    }
    Ok(&mut items[idx])
}

fn append_on_map() -> Error {
    Error::invalid_argument("append key '[]' used on a map; it needs a sequence")
}
