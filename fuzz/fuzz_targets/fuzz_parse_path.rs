#![no_main]
use formtree::{parse_path, split_keys};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(parsed) = parse_path(s) {
            // flat and nested bracket forms split the same way
            let flat = parsed
                .keys
                .iter()
                .map(|k| format!("[{}]", k.as_str()))
                .collect::<String>();
            if !parsed.keys.iter().any(|k| k.as_str().contains(['[', ']'])) {
                assert_eq!(split_keys(&flat), parsed.keys);
            }
        }
    }
});
