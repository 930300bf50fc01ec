/// One input record: a bracket-named field and its raw string value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Field {
    pub name: String,
    pub value: String,
    /// Side-channel type annotation; wins over a `:type` suffix in the name.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", default, skip_serializing_if = "Option::is_none")
    )]
    pub value_type: Option<String>,
    /// Per-field falsy-skip override; wins over the global options.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub skip_falsy: Option<bool>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_type: None,
            skip_falsy: None,
        }
    }

    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    pub fn with_skip_falsy(mut self, skip: bool) -> Self {
        self.skip_falsy = Some(skip);
        self
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Field {
    fn from((name, value): (N, V)) -> Self {
        Field::new(name, value)
    }
}

/// A field written either as a `[name, value]` pair or as a full object.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Pair(String, String),
    Full(Field),
}

/// Parse a JSON array of fields, each a `[name, value]` pair or an object
/// with `name`, `value` and optional `type` / `skipFalsy`.
#[cfg(feature = "serde")]
pub fn fields_from_json(input: &str) -> crate::error::Result<Vec<Field>> {
    let reprs: Vec<FieldRepr> = serde_json::from_str(input)?;
    Ok(collect_fields(reprs))
}

/// Like [`fields_from_json`] for an already parsed JSON value.
#[cfg(feature = "serde")]
pub fn fields_from_value(input: serde_json::Value) -> crate::error::Result<Vec<Field>> {
    let reprs: Vec<FieldRepr> = serde_json::from_value(input)?;
    Ok(collect_fields(reprs))
}

#[cfg(feature = "serde")]
fn collect_fields(reprs: Vec<FieldRepr>) -> Vec<Field> {
    reprs
        .into_iter()
        .map(|repr| match repr {
            FieldRepr::Pair(name, value) => Field::new(name, value),
            FieldRepr::Full(field) => field,
        })
        .collect()
}
