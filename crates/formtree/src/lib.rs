#![doc = include_str!("../README.md")]

pub mod coerce;
pub mod error;
pub mod field;
pub mod options;
pub mod path;
pub mod tree;
pub mod value;

pub use crate::coerce::{Coercer, Coercion, TypeFn, TypeRegistry, coerce_value};
pub use crate::error::{Error, Result};
pub use crate::field::Field;
pub use crate::options::{Options, PostParseFn, VALID_OPTIONS};
pub use crate::path::{Key, KeyPath, ParsedName, parse_path, split_keys, split_type};
pub use crate::tree::{deep_get, deep_set};
pub use crate::value::{Map, Value};

use crate::path::format_path;

/// Build a tree from `fields`, starting from an empty map.
pub fn build_tree(fields: &[Field], options: &Options) -> Result<Value> {
    build_tree_with_root(Value::empty_object(), fields, options)
}

/// Build a tree into a caller-chosen root (map or sequence).
///
/// Fields are applied strictly in order. The first error aborts the whole
/// build and the partially built root is dropped.
pub fn build_tree_with_root(mut root: Value, fields: &[Field], options: &Options) -> Result<Value> {
    if !root.is_container() {
        return Err(Error::invalid_argument(format!(
            "root must be a map or sequence, found {}",
            root.kind_name()
        )));
    }
    let coercer = Coercer::new(options);
    for field in fields {
        insert_field(&mut root, field, &coercer, options)?;
    }
    Ok(root)
}

fn insert_field(root: &mut Value, field: &Field, coercer: &Coercer<'_>, options: &Options) -> Result<()> {
    if field.name.is_empty() {
        return Err(Error::invalid_argument("field name must be a non-empty string"));
    }
    let annotated = field.value_type.as_deref().is_some_and(|t| !t.is_empty());
    let (base, suffix) = if options.disable_colon_types || annotated {
        (field.name.as_str(), None)
    } else {
        split_type(&field.name)
    };
    let keys = split_keys(base);

    let resolved = coercer.resolve_type(field, suffix);
    let Some(value) = coercer.coerce_as(field, resolved)? else {
        tracing::debug!(field = %field.name, type_name = resolved.name, "skipping field");
        return Ok(());
    };
    if value.is_falsy() && coercer.should_skip_falsy(field, base, resolved.name) {
        tracing::debug!(field = %field.name, "skipping falsy value");
        return Ok(());
    }

    tracing::trace!(path = %format_path(&keys), type_name = resolved.name, "inserting value");
    deep_set(root, &keys, value, options)
}

/// Read a JSON field list and return the tree as JSON.
#[cfg(feature = "serde")]
pub fn build_tree_from_json(input: &str, options: &Options) -> Result<serde_json::Value> {
    let fields = field::fields_from_json(input)?;
    Ok(build_tree(&fields, options)?.to_json())
}
