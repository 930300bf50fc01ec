use std::fmt;
use std::sync::Arc;

use crate::coerce::{Coercion, TypeRegistry};
#[cfg(feature = "serde")]
use crate::error::{Error, Result};
use crate::field::Field;
use crate::value::Value;

/// Post-processing hook applied to values that had no explicit type.
/// Receives the coerced value and the full field name.
pub type PostParseFn = Arc<dyn Fn(Value, &str) -> Value + Send + Sync>;

/// Option names accepted by [`Options::from_json`].
pub const VALID_OPTIONS: &[&str] = &[
    "defaultType",
    "defaultTypes",
    "customTypes",
    "useNumericKeysAsArrayIndex",
    "skipFalsyForTypes",
    "skipFalsyForFields",
    "disableSuffixTypeParsing",
    "parseNumbers",
    "parseBooleans",
    "parseNulls",
    "parseAll",
    "postParseFunction",
];

/// Recognized options whose values are functions.
#[cfg(feature = "serde")]
const FUNCTION_OPTIONS: &[&str] = &["defaultTypes", "customTypes", "postParseFunction"];

#[derive(Clone)]
pub struct Options {
    /// Type used when neither an annotation nor a `:type` suffix names one.
    pub default_type: String,
    /// Base registry (the built-in types unless replaced).
    pub default_types: TypeRegistry,
    /// Layered over `default_types`; same-named entries replace the base.
    pub custom_types: TypeRegistry,
    /// Treat all-digit keys as sequence indices instead of map keys.
    /// Indices above [`MAX_ARRAY_INDEX`](crate::tree::MAX_ARRAY_INDEX) are
    /// rejected with [`Error::InvalidArgument`](crate::Error::InvalidArgument).
    pub use_int_keys_as_array_index: bool,
    pub skip_falsy_for_types: Vec<String>,
    pub skip_falsy_for_fields: Vec<String>,
    /// Keep `name:type` names whole instead of splitting off the type.
    pub disable_colon_types: bool,
    pub parse_numbers: bool,
    pub parse_booleans: bool,
    pub parse_nulls: bool,
    pub parse_all: bool,
    pub post_parse: Option<PostParseFn>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_type: String::from("string"),
            default_types: TypeRegistry::builtin(),
            custom_types: TypeRegistry::empty(),
            use_int_keys_as_array_index: false,
            skip_falsy_for_types: Vec::new(),
            skip_falsy_for_fields: Vec::new(),
            disable_colon_types: false,
            parse_numbers: false,
            parse_booleans: false,
            parse_nulls: false,
            parse_all: false,
            post_parse: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("default_type", &self.default_type)
            .field("default_types", &self.default_types)
            .field("custom_types", &self.custom_types)
            .field("use_int_keys_as_array_index", &self.use_int_keys_as_array_index)
            .field("skip_falsy_for_types", &self.skip_falsy_for_types)
            .field("skip_falsy_for_fields", &self.skip_falsy_for_fields)
            .field("disable_colon_types", &self.disable_colon_types)
            .field("parse_numbers", &self.parse_numbers)
            .field("parse_booleans", &self.parse_booleans)
            .field("parse_nulls", &self.parse_nulls)
            .field("parse_all", &self.parse_all)
            .field("post_parse", &self.post_parse.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_type(mut self, type_name: impl Into<String>) -> Self {
        self.default_type = type_name.into();
        self
    }

    pub fn with_default_types(mut self, registry: TypeRegistry) -> Self {
        self.default_types = registry;
        self
    }

    /// Register a custom coercion function under `name`.
    pub fn with_custom_type<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &Field) -> Value + Send + Sync + 'static,
    {
        self.custom_types.register(name, Coercion::custom(f));
        self
    }

    pub fn with_int_keys_as_array_index(mut self, enabled: bool) -> Self {
        self.use_int_keys_as_array_index = enabled;
        self
    }

    pub fn with_skip_falsy_for_type(mut self, type_name: impl Into<String>) -> Self {
        self.skip_falsy_for_types.push(type_name.into());
        self
    }

    pub fn with_skip_falsy_for_field(mut self, field_name: impl Into<String>) -> Self {
        self.skip_falsy_for_fields.push(field_name.into());
        self
    }

    pub fn with_colon_types_disabled(mut self, disabled: bool) -> Self {
        self.disable_colon_types = disabled;
        self
    }

    pub fn with_post_parse<F>(mut self, f: F) -> Self
    where
        F: Fn(Value, &str) -> Value + Send + Sync + 'static,
    {
        self.post_parse = Some(Arc::new(f));
        self
    }

    pub(crate) fn parses_numbers(&self) -> bool {
        self.parse_all || self.parse_numbers
    }

    pub(crate) fn parses_booleans(&self) -> bool {
        self.parse_all || self.parse_booleans
    }

    pub(crate) fn parses_nulls(&self) -> bool {
        self.parse_all || self.parse_nulls
    }

    /// Any of the opportunistic `parse*` flags is on.
    pub fn legacy_parsing(&self) -> bool {
        self.parses_numbers() || self.parses_booleans() || self.parses_nulls()
    }

    /// The effective registry: `default_types` with `custom_types` layered on top.
    pub fn type_registry(&self) -> TypeRegistry {
        let mut registry = self.default_types.clone();
        registry.extend(&self.custom_types);
        registry
    }

    /// Build options from a JSON configuration object.
    ///
    /// Unknown keys fail with [`Error::InvalidOption`]. Function-valued keys
    /// are recognized but cannot be expressed as data.
    #[cfg(feature = "serde")]
    pub fn from_json(config: &serde_json::Value) -> Result<Self> {
        let map = match config {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::Message(format!(
                    "options must be a JSON object, found {}",
                    Value::from(other.clone()).kind_name()
                )));
            }
        };
        for key in map.keys() {
            if !VALID_OPTIONS.contains(&key.as_str()) {
                return Err(Error::InvalidOption {
                    option: key.clone(),
                    valid: VALID_OPTIONS.iter().map(|s| s.to_string()).collect(),
                });
            }
            if FUNCTION_OPTIONS.contains(&key.as_str()) {
                return Err(Error::Message(format!(
                    "option '{key}' takes functions and can only be set programmatically"
                )));
            }
        }
        let cfg: OptionsConfig = serde_json::from_value(config.clone())?;
        let defaults = Self::default();
        Ok(Self {
            default_type: cfg.default_type.unwrap_or(defaults.default_type),
            use_int_keys_as_array_index: cfg.use_numeric_keys_as_array_index,
            skip_falsy_for_types: cfg.skip_falsy_for_types,
            skip_falsy_for_fields: cfg.skip_falsy_for_fields,
            disable_colon_types: cfg.disable_suffix_type_parsing,
            parse_numbers: cfg.parse_numbers,
            parse_booleans: cfg.parse_booleans,
            parse_nulls: cfg.parse_nulls,
            parse_all: cfg.parse_all,
            ..defaults
        })
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OptionsConfig {
    default_type: Option<String>,
    use_numeric_keys_as_array_index: bool,
    skip_falsy_for_types: Vec<String>,
    skip_falsy_for_fields: Vec<String>,
    disable_suffix_type_parsing: bool,
    parse_numbers: bool,
    parse_booleans: bool,
    parse_nulls: bool,
    parse_all: bool,
}
