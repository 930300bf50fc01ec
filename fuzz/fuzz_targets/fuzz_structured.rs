#![no_main]
use arbitrary::Arbitrary;
use formtree::{Field, Options, Value, build_tree, build_tree_with_root};
use libfuzzer_sys::{arbitrary, fuzz_target};

const KEYS: &[&str] = &["", "0", "1", "7", "a", "b", "name", "1st"];
const TYPES: &[&str] = &["", "string", "number", "boolean", "null", "array", "object", "skip"];
const VALUES: &[&str] = &["", "0", "1", "-2.5", "true", "false", "null", "[]", "{}", "[1,2]", "text"];

#[derive(Arbitrary, Debug)]
struct FuzzField {
    root: u8,
    path: Vec<u8>,
    type_choice: Option<u8>,
    value: u8,
    skip_falsy: Option<bool>,
}

impl FuzzField {
    fn to_field(&self) -> Field {
        let mut name = KEYS[self.root as usize % KEYS.len()].to_string();
        if name.is_empty() {
            name.push('f');
        }
        for k in self.path.iter().take(6) {
            name.push('[');
            name.push_str(KEYS[*k as usize % KEYS.len()]);
            name.push(']');
        }
        if let Some(t) = self.type_choice {
            name.push(':');
            name.push_str(TYPES[t as usize % TYPES.len()]);
        }
        let mut field = Field::new(name, VALUES[self.value as usize % VALUES.len()]);
        field.skip_falsy = self.skip_falsy;
        field
    }
}

#[derive(Arbitrary, Debug)]
struct Input {
    fields: Vec<FuzzField>,
    index_mode: bool,
    parse_all: bool,
}

fuzz_target!(|input: Input| {
    let fields: Vec<Field> = input.fields.iter().take(64).map(FuzzField::to_field).collect();
    let options = Options {
        parse_all: input.parse_all,
        ..Options::default()
    }
    .with_int_keys_as_array_index(input.index_mode);

    if let Ok(tree) = build_tree(&fields, &options) {
        assert!(tree.is_container());
        let _ = tree.to_json();
    }
    let _ = build_tree_with_root(Value::empty_array(), &fields, &options);
});
