//! Tree value model.
//!
//! Numbers follow JavaScript semantics: a single IEEE double that may be NaN
//! or infinite. Those survive in the tree and only collapse to `null` when
//! the tree is converted to JSON.

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn empty_object() -> Self {
        Value::Object(Map::new())
    }

    pub fn empty_array() -> Self {
        Value::Array(Vec::new())
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_container()
    }

    /// `""`, `0`, `false`, `null` and NaN. Empty arrays and objects are not falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => *n == 0.0 || n.is_nan(),
            Value::String(s) => s.is_empty(),
            Value::Array(_) | Value::Object(_) => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "sequence",
            Value::Object(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a child by key: a property of a map, or an index of a sequence.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => crate::path::parse_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value` the way `JSON.stringify` would:
    /// non-finite numbers become `null`, integral numbers become integers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
        }
    }
}

fn safe_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if let Some(i) = safe_integer(n) {
        return serde_json::Value::from(i);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

/// String-keyed map that remembers insertion order for output but compares
/// equal regardless of it.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<(String, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.position(key) {
            Some(i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Insert or overwrite in place; returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(core::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Slot for `key`, created as `Null` when missing.
    pub fn slot(&mut self, key: &str) -> &mut Value {
        let idx = match self.position(key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), Value::Null));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match safe_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None if n.is_finite() => serializer.serialize_f64(*n),
                None => serializer.serialize_unit(),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        assert!(Value::Null.is_falsy());
        assert!(Value::Bool(false).is_falsy());
        assert!(Value::Number(0.0).is_falsy());
        assert!(Value::Number(-0.0).is_falsy());
        assert!(Value::Number(f64::NAN).is_falsy());
        assert!(Value::from("").is_falsy());

        assert!(!Value::from("0").is_falsy());
        assert!(!Value::Number(1.5).is_falsy());
        assert!(!Value::empty_array().is_falsy());
        assert!(!Value::empty_object().is_falsy());
    }

    #[test]
    fn json_numbers_follow_stringify() {
        assert_eq!(Value::Number(10.0).to_json(), json!(10));
        assert_eq!(Value::Number(10.5).to_json(), json!(10.5));
        assert_eq!(Value::Number(-0.0).to_json(), json!(0));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
    }

    #[test]
    fn map_equality_ignores_order() {
        let a: Map = vec![("x".to_string(), Value::from("1")), ("y".to_string(), Value::from("2"))]
            .into_iter()
            .collect();
        let b: Map = vec![("y".to_string(), Value::from("2")), ("x".to_string(), Value::from("1"))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn from_json_roundtrip() {
        let src = json!({"a": [1, 2.5, "x", null, true], "b": {}});
        assert_eq!(Value::from(src.clone()).to_json(), src);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_matches_to_json() {
        let mut map = Map::new();
        map.insert("nan", Value::Number(f64::NAN));
        map.insert("neg_zero", Value::Number(-0.0));
        map.insert("inf", Value::Number(f64::NEG_INFINITY));
        map.insert("half", Value::Number(0.5));
        map.insert("big", Value::Number(1e300));
        map.insert("list", Value::Array(vec![Value::Null, Value::Bool(true), Value::from("s")]));
        let v = Value::Object(map);

        let serialized = serde_json::to_value(&v).unwrap();
        assert_eq!(serialized, v.to_json());
        assert_eq!(serialized["nan"], json!(null));
        assert_eq!(serialized["neg_zero"], json!(0));
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            serde_json::to_string(&v.to_json()).unwrap()
        );
    }

    #[test]
    fn get_indexes_sequences() {
        let v = Value::Array(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(v.get("1"), Some(&Value::from("b")));
        assert_eq!(v.get("x"), None);
    }
}
