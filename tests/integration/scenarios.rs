use std::fs;
use tbx::{
    apply, apply_to_file, enclosing_block, enclosing_string, shrink, Boundary, DispatchError,
    Engine, LanguageTable, Pick,
};
use tempfile::TempDir;

fn parse(source: &str, language: &str) -> tbx::Tree {
    tbx::parse(source, language, &LanguageTable::builtin()).unwrap()
}

#[test]
fn string_under_cursor_in_javascript() {
    let tree = parse("(\"String contents\")", "javascript");

    let string = enclosing_string(&tree, 5, Pick::Outermost).unwrap();
    assert_eq!(string.start, Some(1));
    assert_eq!(string.end, Some(18));
    assert_eq!(
        shrink(Boundary::new(1, 18)).unwrap(),
        Boundary::new(2, 17)
    );
}

#[test]
fn invalid_javascript_is_a_parse_failure() {
    let err = tbx::parse("not valid js +++", "javascript", &LanguageTable::builtin())
        .unwrap_err();
    assert!(matches!(err, DispatchError::ParseFailure { .. }));
    assert!(err.to_string().contains("javascript"));
}

#[test]
fn unknown_language_never_reaches_a_grammar() {
    let err = tbx::parse("puts 'hi'", "ruby", &LanguageTable::builtin()).unwrap_err();
    match err {
        DispatchError::UnsupportedLanguage { language, .. } => assert_eq!(language, "ruby"),
        other => panic!("expected UnsupportedLanguage, got {other:?}"),
    }
}

#[test]
fn json_string_offsets_come_from_location_record() {
    let tree = parse("{\"a\": \"x\"}", "json");

    let string = enclosing_string(&tree, 6, Pick::Outermost).unwrap();
    assert_eq!((string.start, string.end), (Some(6), Some(9)));
    assert_eq!(string.kind, "string");
}

#[test]
fn nested_objects_resolve_outermost_first() {
    let tree = parse("({ a: { b: 1 } })", "javascript");

    let outer = enclosing_block(&tree, 8, Pick::Outermost).unwrap();
    assert_eq!((outer.start, outer.end), (Some(1), Some(16)));

    let inner = enclosing_block(&tree, 8, Pick::Innermost).unwrap();
    assert_eq!((inner.start, inner.end), (Some(6), Some(14)));
}

#[test]
fn bare_braces_nest_as_blocks() {
    let tree = parse("{ a: { b: 1 } }", "javascript");

    let outer = enclosing_block(&tree, 8, Pick::Outermost).unwrap();
    assert_eq!((outer.start, outer.end), (Some(0), Some(15)));

    let inner = enclosing_block(&tree, 8, Pick::Innermost).unwrap();
    assert_eq!((inner.start, inner.end), (Some(5), Some(13)));
}

#[test]
fn template_substitution_resolves_to_the_template() {
    let tree = parse("`a${\"b\"}c`", "javascript");

    let string = enclosing_string(&tree, 5, Pick::Outermost).unwrap();
    assert_eq!((string.start, string.end), (Some(0), Some(10)));

    let inner = enclosing_string(&tree, 5, Pick::Innermost).unwrap();
    assert_eq!((inner.start, inner.end), (Some(4), Some(7)));
}

#[test]
fn offsets_count_utf16_code_units() {
    let engine = Engine::default();
    let source = "😀('x')";

    assert_eq!(
        engine.string_boundary(source, "javascript", 4).unwrap(),
        Some(Boundary::new(3, 6))
    );

    let batch = engine
        .replace_string_contents(source, "javascript", 4, "é")
        .unwrap();
    assert_eq!(apply(source, &batch).unwrap(), "😀('é')");
}

#[test]
fn typescript_and_tsx_share_the_script_pipeline() {
    let engine = Engine::default();

    let source = "function f(): string { return \"a\"; }";
    let block = engine
        .block_boundary(source, "typescript", 25, Pick::Outermost)
        .unwrap();
    assert_eq!(block, Some(Boundary::new(21, 36)));

    let jsx = "const el = <div>{\"a\"}</div>;";
    assert!(engine
        .string_boundary(jsx, "typescriptreact", 18)
        .unwrap()
        .is_some());
}

#[test]
fn lenient_script_parsing() {
    let engine = Engine::default();
    for source in [
        "return \"x\";",
        "await fetch(\"x\");",
        "if (a) { import(\"x\"); }",
    ] {
        assert!(
            engine.parse(source, "javascript").is_ok(),
            "expected {source:?} to parse"
        );
    }
}

#[test]
fn configured_prefixes_route_to_their_family() {
    let config = tbx::load_from_str("[languages]\ndata = [\"geojson\"]\n").unwrap();
    let engine = Engine::from_config(&config);

    let contents = engine
        .string_contents("{\"type\": \"Point\"}", "geojson", 12)
        .unwrap();
    assert_eq!(contents, Some(Boundary::new(10, 15)));
}

#[test]
fn block_edit_round_trip_through_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.js");
    let source = "function run() {\n  if (ok) {\n    go();\n  }\n}\n";
    fs::write(&path, source).unwrap();

    let engine = Engine::default();
    let cursor = source.find("go").unwrap();
    let batch = engine
        .delete_block_contents(source, "javascript", cursor, Pick::Innermost)
        .unwrap();
    let updated = apply_to_file(&path, &batch).unwrap();

    assert_eq!(updated, "function run() {\n  if (ok) {}\n}\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), updated);
}

#[test]
fn json_values_replaced_under_several_cursors() {
    let source = "{\"a\": \"x\", \"b\": \"y\"}";
    let engine = Engine::default();

    // a cursor on the comma after a value selects nothing
    assert_eq!(engine.string_boundary(source, "json", 9).unwrap(), None);

    let batch = engine
        .replace_string_contents_at(source, "json", &[17, 7, 9], "z")
        .unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(apply(source, &batch).unwrap(), "{\"a\": \"z\", \"b\": \"z\"}");
}
