use formtree::{Key, parse_path, split_keys};

fn keys(list: &[&str]) -> Vec<Key> {
    list.iter().map(|s| Key::from(*s)).collect()
}

#[test]
fn plain_names_are_single_keys() {
    for name in ["foo", "Numeric 0", "with space", "a.b.c", "x-y"] {
        let parsed = parse_path(name).unwrap();
        assert_eq!(parsed.keys, vec![Key::named(name)]);
        assert_eq!(parsed.type_name, None);
    }
}

#[test]
fn flat_and_nested_brackets_agree() {
    let flat = parse_path("a[b][c]").unwrap();
    let nested = parse_path("a[b[c]]").unwrap();
    assert_eq!(flat.keys, keys(&["a", "b", "c"]));
    assert_eq!(flat, nested);
}

#[test]
fn append_keys() {
    assert_eq!(parse_path("a[]").unwrap().keys, vec![Key::named("a"), Key::Append]);
    assert_eq!(
        parse_path("a[][][]").unwrap().keys,
        vec![Key::named("a"), Key::Append, Key::Append, Key::Append]
    );
}

#[test]
fn type_suffix() {
    let parsed = parse_path("a:number").unwrap();
    assert_eq!(parsed.keys, keys(&["a"]));
    assert_eq!(parsed.type_name.as_deref(), Some("number"));

    let parsed = parse_path("b3[out]:skip").unwrap();
    assert_eq!(parsed.keys, keys(&["b3", "out"]));
    assert_eq!(parsed.type_name.as_deref(), Some("skip"));

    let parsed = parse_path("foo[my::key]:string").unwrap();
    assert_eq!(parsed.keys, keys(&["foo", "my::key"]));
    assert_eq!(parsed.type_name.as_deref(), Some("string"));
}

#[test]
fn colon_inside_brackets_is_part_of_key() {
    let parsed = parse_path("foo[a:b]").unwrap();
    assert_eq!(parsed.keys, keys(&["foo", "a:b"]));
    assert_eq!(parsed.type_name, None);
}

#[test]
fn explicit_empty_type_differs_from_no_type() {
    assert_eq!(parse_path("foo:").unwrap().type_name.as_deref(), Some(""));
    assert_eq!(parse_path("foo").unwrap().type_name, None);
}

#[test]
fn leading_bracket_is_dropped() {
    assert_eq!(split_keys("[foo][bar]"), split_keys("foo[bar]"));
}
