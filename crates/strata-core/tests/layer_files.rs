//! Stack tests driven by JSON5 layer and options files.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use strata_core::{LayeredStack, StackError, StackOptions};
use tempfile::tempdir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Files appended first take precedence over later ones.
#[test]
fn earlier_files_shadow_later_files() {
    let temp = tempdir().expect("tempdir");
    let overrides = temp.path().join("overrides.json5");
    let defaults = temp.path().join("defaults").join("base.json5");
    write_json5(&overrides, "{ replacement: 'override', // local\n }");
    write_json5(
        &defaults,
        "{ replacement: 'default', retries: 3, nested: { b: 1, a: 2 } }",
    );

    let mut stack = LayeredStack::new(StackOptions::new().with_layers(0));
    stack.add_layer_from_path(&overrides).expect("overrides");
    stack.add_layer_from_path(&defaults).expect("defaults");

    assert_eq!(stack.len(), 2);
    assert_eq!(stack.get("replacement"), Some(&json!("override")));
    assert_eq!(stack.get("retries"), Some(&json!(3)));
    assert_eq!(stack.count(), 3);
}

#[test]
fn options_file_configures_stack() {
    let temp = tempdir().expect("tempdir");
    let options_path = temp.path().join("options.json5");
    write_json5(&options_path, "{ caseSensitive: false, layers: 2 }");

    let options = StackOptions::load_from_path(&options_path).expect("options");
    let mut stack = LayeredStack::new(options);
    stack.set_in(1, "Region", "eu").expect("set");

    assert_eq!(stack.len(), 2);
    assert_eq!(stack.get("REGION"), Some(&json!("eu")));
}

/// Same merged content from differently shaped stacks hashes the same.
#[test]
fn file_stack_and_inline_stack_share_fingerprint() {
    let temp = tempdir().expect("tempdir");
    let top = temp.path().join("top.json5");
    let bottom = temp.path().join("bottom.json5");
    write_json5(&top, "{ name: 'svc' }");
    write_json5(&bottom, "{ name: 'ignored', port: 8080 }");

    let mut from_files = LayeredStack::new(StackOptions::new().with_layers(0));
    from_files.add_layer_from_path(&top).expect("top");
    from_files.add_layer_from_path(&bottom).expect("bottom");

    let mut inline = LayeredStack::default();
    inline
        .set("port", 8080)
        .expect("set")
        .set("name", "svc")
        .expect("set");

    assert_eq!(from_files.hash(), inline.hash());
}

#[test]
fn rejected_file_leaves_stack_untouched() {
    let temp = tempdir().expect("tempdir");
    let bad = temp.path().join("bad.json5");
    write_json5(&bad, "'just a string'");

    let mut stack = LayeredStack::default();
    stack.set("kept", 1).expect("set");
    let before = stack.hash();

    let err = stack.add_layer_from_path(&bad).unwrap_err();
    assert!(matches!(err, StackError::NotAMapping(_)));
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.hash(), before);
}
