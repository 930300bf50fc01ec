use formtree::{Key, Options};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Use wee_alloc as the global allocator for smaller WASM binary size
#[cfg(feature = "size_opt")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Maximum input size in bytes (10 MB)
const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn check_size(input: &str) -> Result<(), String> {
    if input.len() > MAX_INPUT_SIZE {
        return Err(format!(
            "Input exceeds maximum size limit of {} bytes",
            MAX_INPUT_SIZE
        ));
    }
    Ok(())
}

fn parse_options(options_json: &str) -> Result<Options, String> {
    if options_json.trim().is_empty() {
        return Ok(Options::default());
    }
    let config: Value =
        serde_json::from_str(options_json).map_err(|e| format!("Invalid options JSON: {}", e))?;
    Options::from_json(&config).map_err(|e| e.to_string())
}

/// Build a tree from a JSON field list (`[name, value]` pairs or
/// `{name, value, type?, skipFalsy?}` objects). `options_json` may be empty.
#[wasm_bindgen]
pub fn fields_to_json(fields_json: &str, options_json: &str, pretty: bool) -> Result<String, String> {
    check_size(fields_json)?;
    let options = parse_options(options_json)?;
    let tree = formtree::build_tree_from_json(fields_json, &options).map_err(|e| e.to_string())?;
    if pretty {
        serde_json::to_string_pretty(&tree).map_err(|e| format!("JSON encoding error: {}", e))
    } else {
        serde_json::to_string(&tree).map_err(|e| format!("JSON encoding error: {}", e))
    }
}

/// Same as [`fields_to_json`] but takes and returns plain JS values.
#[wasm_bindgen]
pub fn fields_to_object(fields: JsValue, options_json: &str) -> Result<JsValue, JsValue> {
    let fields: Value = serde_wasm_bindgen::from_value(fields)?;
    let options = parse_options(options_json).map_err(|e| JsValue::from_str(&e))?;
    let fields = formtree::field::fields_from_value(fields).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let tree = formtree::build_tree(&fields, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(tree.serialize(&serializer)?)
}

/// Split a field name into `{"keys": [...], "type": "..." | null}`.
/// Append keys are reported as empty strings.
#[wasm_bindgen]
pub fn parse_path_json(name: &str) -> Result<String, String> {
    check_size(name)?;
    let parsed = formtree::parse_path(name).map_err(|e| e.to_string())?;
    let keys: Vec<&str> = parsed.keys.iter().map(Key::as_str).collect();
    let out = serde_json::json!({ "keys": keys, "type": parsed.type_name });
    serde_json::to_string(&out).map_err(|e| format!("JSON encoding error: {}", e))
}

/// Get the version of the formtree bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_to_json_simple() {
        let out = fields_to_json(r#"[["a[x]", "1"], ["a[y]:number", "2"]]"#, "", false).unwrap();
        assert_eq!(out, r#"{"a":{"x":"1","y":2}}"#);
    }

    #[test]
    fn test_fields_to_json_with_options() {
        let out = fields_to_json(
            r#"[["foo[0]", "a"], ["foo[1]", "b"]]"#,
            r#"{"useNumericKeysAsArrayIndex": true}"#,
            false,
        )
        .unwrap();
        assert_eq!(out, r#"{"foo":["a","b"]}"#);
    }

    #[test]
    fn test_invalid_option() {
        let err = fields_to_json("[]", r#"{"nope": 1}"#, false).unwrap_err();
        assert!(err.starts_with("invalid option 'nope'"));
    }

    #[test]
    fn test_invalid_type() {
        let err = fields_to_json(r#"[["b1:kaka", "x"]]"#, "", false).unwrap_err();
        assert!(err.contains("invalid type kaka"));
    }

    #[test]
    fn test_parse_path_json() {
        let out = parse_path_json("foo[][bar]:number").unwrap();
        assert_eq!(out, r#"{"keys":["foo","","bar"],"type":"number"}"#);
        let out = parse_path_json("plain").unwrap();
        assert_eq!(out, r#"{"keys":["plain"],"type":null}"#);
        assert!(parse_path_json("").is_err());
    }

    #[test]
    fn test_deep_field_name_is_an_error() {
        let fields = serde_json::json!([[format!("a{}", "[]".repeat(1_000_000)), "x"]]).to_string();
        assert!(fields.len() < MAX_INPUT_SIZE);
        let err = fields_to_json(&fields, "", false).unwrap_err();
        assert!(err.contains("more than the maximum"));
    }

    #[test]
    fn test_fields_to_json_size_limit() {
        let large = "x".repeat(MAX_INPUT_SIZE + 1);
        let result = fields_to_json(&large, "", false);
        assert!(
            result
                .unwrap_err()
                .contains("Input exceeds maximum size limit")
        );
    }
}
