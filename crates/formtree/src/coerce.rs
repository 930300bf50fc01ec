//! Type coercion of raw field strings.
//!
//! The effective type of a field is, in order: its annotation, its `:type`
//! suffix, then `Options::default_type`. Types are looked up in a
//! [`TypeRegistry`], which starts from the built-ins and can be extended or
//! overridden by name.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::options::Options;
use crate::value::Value;

/// Signature of a caller-supplied coercion: raw value and the field it came from.
pub type TypeFn = Arc<dyn Fn(&str, &Field) -> Value + Send + Sync>;

/// Literals that coerce to `false` under `boolean` and to `null` under `null`.
pub const FALSY_LITERALS: [&str; 5] = ["false", "null", "undefined", "", "0"];

#[derive(Clone)]
pub enum Coercion {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
    Skip,
    Custom(TypeFn),
}

impl Coercion {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &Field) -> Value + Send + Sync + 'static,
    {
        Coercion::Custom(Arc::new(f))
    }

    /// `Ok(None)` means the field is skipped.
    pub fn apply(&self, raw: &str, field: &Field) -> Result<Option<Value>> {
        let value = match self {
            Coercion::String => Value::String(raw.to_string()),
            Coercion::Number => Value::Number(js_number(raw)),
            Coercion::Boolean => Value::Bool(!FALSY_LITERALS.contains(&raw)),
            Coercion::Null => {
                if FALSY_LITERALS.contains(&raw) {
                    Value::Null
                } else {
                    Value::String(raw.to_string())
                }
            }
            Coercion::Array | Coercion::Object => {
                let parsed: serde_json::Value = serde_json::from_str(raw)?;
                Value::from(parsed)
            }
            Coercion::Skip => return Ok(None),
            Coercion::Custom(f) => f(raw, field),
        };
        Ok(Some(value))
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::String => f.write_str("String"),
            Coercion::Number => f.write_str("Number"),
            Coercion::Boolean => f.write_str("Boolean"),
            Coercion::Null => f.write_str("Null"),
            Coercion::Array => f.write_str("Array"),
            Coercion::Object => f.write_str("Object"),
            Coercion::Skip => f.write_str("Skip"),
            Coercion::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Ordered map of type name to coercion.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: Vec<(String, Coercion)>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// `string, number, boolean, null, array, object, skip`
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("string", Coercion::String);
        registry.register("number", Coercion::Number);
        registry.register("boolean", Coercion::Boolean);
        registry.register("null", Coercion::Null);
        registry.register("array", Coercion::Array);
        registry.register("object", Coercion::Object);
        registry.register("skip", Coercion::Skip);
        registry
    }

    /// Add `name`, or replace it in place if already registered.
    pub fn register(&mut self, name: impl Into<String>, coercion: Coercion) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = coercion,
            None => self.entries.push((name, coercion)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, coercion: Coercion) -> Self {
        self.register(name, coercion);
        self
    }

    /// Layer every entry of `other` over this registry.
    pub fn extend(&mut self, other: &TypeRegistry) {
        for (name, coercion) in &other.entries {
            self.register(name.clone(), coercion.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Coercion> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Type resolved for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedType<'a> {
    pub name: &'a str,
    /// Came from an annotation or suffix rather than the default.
    pub explicit: bool,
}

/// Coerces fields against the registry merged from one [`Options`].
pub struct Coercer<'a> {
    options: &'a Options,
    registry: TypeRegistry,
}

impl<'a> Coercer<'a> {
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            registry: options.type_registry(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Annotation, then suffix, then the configured default. Empty names fall through.
    pub fn resolve_type<'t>(&'t self, field: &'t Field, suffix: Option<&'t str>) -> ResolvedType<'t> {
        match field
            .value_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(suffix.filter(|t| !t.is_empty()))
        {
            Some(name) => ResolvedType { name, explicit: true },
            None => ResolvedType {
                name: &self.options.default_type,
                explicit: false,
            },
        }
    }

    /// Coerce `field.value`; `suffix` is the type already split from its name.
    pub fn coerce(&self, field: &Field, suffix: Option<&str>) -> Result<Option<Value>> {
        let resolved = self.resolve_type(field, suffix);
        self.coerce_as(field, resolved)
    }

    pub fn coerce_as(&self, field: &Field, resolved: ResolvedType<'_>) -> Result<Option<Value>> {
        let raw = field.value.as_str();
        let value = if !resolved.explicit && self.options.legacy_parsing() {
            self.legacy_parse(raw)
        } else {
            let coercion = self.registry.get(resolved.name).ok_or_else(|| Error::InvalidType {
                type_name: resolved.name.to_string(),
                field: field.name.clone(),
                valid: self.registry.names().map(str::to_string).collect(),
            })?;
            match coercion.apply(raw, field)? {
                Some(v) => v,
                None => return Ok(None),
            }
        };
        let value = match (&self.options.post_parse, resolved.explicit) {
            (Some(post), false) => post(value, &field.name),
            _ => value,
        };
        Ok(Some(value))
    }

    fn legacy_parse(&self, raw: &str) -> Value {
        if self.options.parses_numbers() && is_numeric(raw) {
            return Value::Number(js_number(raw));
        }
        if self.options.parses_booleans() && (raw == "true" || raw == "false") {
            return Value::Bool(raw == "true");
        }
        if self.options.parses_nulls() && raw == "null" {
            return Value::Null;
        }
        Value::String(raw.to_string())
    }

    /// Whether a falsy coerced value of `field` is dropped.
    pub fn should_skip_falsy(&self, field: &Field, base_name: &str, type_name: &str) -> bool {
        if let Some(skip) = field.skip_falsy {
            return skip;
        }
        let fields = &self.options.skip_falsy_for_fields;
        if fields.iter().any(|f| f == base_name || *f == field.name) {
            return true;
        }
        self.options.skip_falsy_for_types.iter().any(|t| t == type_name)
    }
}

/// Coerce a standalone raw value. `Ok(None)` means skip.
pub fn coerce_value(raw: &str, type_name: Option<&str>, options: &Options) -> Result<Option<Value>> {
    let field = Field::new(String::new(), raw);
    Coercer::new(options).coerce(&field, type_name)
}

/// JavaScript `Number(str)`: NaN instead of an error for non-numeric text.
pub fn js_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }
    // f64::from_str also takes "inf"/"nan", which Number() does not
    if s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        s.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * radix as f64 + d as f64,
            None => return f64::NAN,
        }
    }
    acc
}

/// Non-blank text whose numeric value is finite.
pub fn is_numeric(raw: &str) -> bool {
    !raw.trim().is_empty() && js_number(raw).is_finite()
}
