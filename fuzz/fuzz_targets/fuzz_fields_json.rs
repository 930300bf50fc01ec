#![no_main]
use formtree::{Options, build_tree_from_json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = build_tree_from_json(s, &Options::default());
        let _ = build_tree_from_json(s, &Options::default().with_int_keys_as_array_index(true));
    }
});
