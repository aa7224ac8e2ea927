#[cfg(test)]
use super::*;
use crate::Value;
use std::collections::HashMap;

fn parse(input: &str) -> Result<StructNode, DlError> {
    let mut parser = Parser::new("test.dl", input);
    parser.parse_document()
}

fn parse_ok(input: &str) -> StructNode {
    let doc = parse(input).expect("Failed to parse document");
    println!("--- Parsed Document ---\n{}", doc);
    doc
}

fn parse_errors(input: &str) -> Vec<DlError> {
    match parse(input) {
        Err(DlError::ParseFailure { errors, .. }) => {
            for err in &errors {
                println!("{}", err);
            }
            errors
        }
        other => panic!("Expected a ParseFailure, got {:?}", other),
    }
}

#[test]
fn test_field_vs_child_disambiguation() {
    let doc = parse_ok("a 5;");
    assert_eq!(doc.get::<f64>("a"), Ok(5.0));
    assert!(!doc.contains_type("a"));

    let doc = parse_ok("a 5 { };");
    assert!(!doc.contains_field("a"));
    let children = doc.children("a");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].own_value(), Some(&Value::from(5.0)));
    assert_eq!(children[0].field_count(), 0);
    assert_eq!(children[0].child_count(), 0);
}

#[test]
fn test_parser_basic_document() {
    let input = r#"
// a house
name "Cottage";
floors 2;

Room "Kitchen"
{
    size [4, 5.5];
    Chair { legs 4; }
    Chair { legs 3; }
    Table { }
}

Room "Hall" { }
"#;

    let doc = parse_ok(input);

    assert_eq!(doc.get::<String>("name"), Ok("Cottage".to_string()));
    assert_eq!(doc.get::<u32>("floors"), Ok(2));

    let rooms = doc.children("Room");
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].own::<String>(), Ok("Kitchen".to_string()));
    assert_eq!(rooms[1].own::<String>(), Ok("Hall".to_string()));

    let kitchen = &rooms[0];
    assert_eq!(kitchen.get::<Vec<f64>>("size"), Ok(vec![4.0, 5.5]));
    assert_eq!(kitchen.children("Chair").len(), 2);
    assert_eq!(kitchen.children("Chair")[1].get::<i32>("legs"), Ok(3));
    assert_eq!(kitchen.children("Table").len(), 1);
    assert_eq!(kitchen.child_types().collect::<Vec<_>>(), vec!["Chair", "Table"]);
}

#[test]
fn test_arrays_and_negative_numbers() {
    let doc = parse_ok(r#"nums [1, -2.5, 3]; strs ["a", "b"]; neg -4; own [7, 8] { }"#);

    assert_eq!(doc.get::<Vec<f64>>("nums"), Ok(vec![1.0, -2.5, 3.0]));
    assert_eq!(doc.get::<Vec<String>>("strs"), Ok(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(doc.get::<f64>("neg"), Ok(-4.0));
    assert_eq!(doc.children("own")[0].own_value(), Some(&Value::from(vec![7.0, 8.0])));
}

#[test]
fn test_mixed_array_is_rejected() {
    let errors = parse_errors(r#"mixed ["a", 1];"#);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_syntax());
}

#[test]
fn test_archetype_binds_right_aligned() {
    let doc = parse_ok(
        r#"
.P(x, y, z);
P(1, 2);
P(4, 5, 6);
"#,
    );

    let points = doc.children("P");
    assert_eq!(points.len(), 2);
    assert!(!points[0].contains_field("x"));
    assert_eq!(points[0].get::<f64>("y"), Ok(1.0));
    assert_eq!(points[0].get::<f64>("z"), Ok(2.0));
    assert_eq!(points[1].get::<Vec<f64>>("x"), Ok(vec![4.0]));
}

#[test]
fn test_archetype_too_many_values() {
    let errors = parse_errors(".P(x, y, z);\nP(1, 2, 3, 4);");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_semantic());
    assert!(matches!(
        &errors[0],
        DlError::TooManyValues { name, expected: 3, found: 4, line: 2, .. } if name == "P"
    ));
}

#[test]
fn test_undeclared_archetype() {
    let errors = parse_errors("Q(1);");
    assert!(matches!(&errors[0], DlError::UndeclaredArchetype { name, .. } if name == "Q"));
}

#[test]
fn test_archetype_redeclaration_overwrites() {
    let mut parser = Parser::new("test.dl", ".P(a);\n.P(b, c);\nP(1);");
    let doc = parser.parse_document().expect("Failed to parse document");

    assert_eq!(parser.archetypes().len(), 1);
    assert_eq!(
        parser.archetypes().params("P"),
        Some(&["b".to_string(), "c".to_string()][..])
    );
    assert_eq!(doc.children("P")[0].get::<f64>("c"), Ok(1.0));
    assert!(!doc.children("P")[0].contains_field("b"));
}

#[test]
fn test_inheritance_copies_fields_and_children() {
    let doc = parse_ok(
        r#"
Base "k1" { f 1; Sub { g 2; } }
Derived : Base "k1";
Derived "mine" : Base "k1" { h 3; }
"#,
    );

    let derived = doc.children("Derived");
    assert_eq!(derived.len(), 2);

    assert_eq!(derived[0].own_value(), None);
    assert_eq!(derived[0].get::<f64>("f"), Ok(1.0));
    assert_eq!(derived[0].children("Sub")[0].get::<f64>("g"), Ok(2.0));

    assert_eq!(derived[1].own::<String>(), Ok("mine".to_string()));
    assert_eq!(derived[1].get::<f64>("f"), Ok(1.0));
    assert_eq!(derived[1].get::<f64>("h"), Ok(3.0));

    // the base is untouched
    assert!(!doc.children("Base")[0].contains_field("h"));
}

#[test]
fn test_inheritance_target_not_found() {
    let errors = parse_errors("Base \"k1\" { f 1; }\nOther : Base \"missing\";");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        DlError::InheritanceTargetNotFound { type_name, value, .. } => {
            assert_eq!(type_name, "Base");
            assert_eq!(value, "missing");
        }
        other => panic!("Expected InheritanceTargetNotFound, got {:?}", other),
    }
    assert!(errors[0].to_string().contains("Base missing"));
}

#[test]
fn test_inheritance_only_sees_enclosing_struct() {
    let errors = parse_errors("Base \"k\" { f 1; }\nOuter { D : Base \"k\"; }");
    assert!(matches!(errors[0], DlError::InheritanceTargetNotFound { .. }));
}

#[test]
fn test_inheritance_picks_latest_match() {
    let doc = parse_ok(
        r#"
Base "k" { f 1; }
Base "k" { f 2; }
D : Base "k";
"#,
    );
    assert_eq!(doc.children("D")[0].get::<f64>("f"), Ok(2.0));
}

#[test]
fn test_inheritance_then_archetype() {
    let doc = parse_ok(
        r#"
.Item(name, count);
Item "base" { weight 2; count 1; }
Item "x" : Item "base" ("apple", 3);
"#,
    );

    let items = doc.children("Item");
    assert_eq!(items.len(), 2);
    let x = &items[1];
    assert_eq!(x.own::<String>(), Ok("x".to_string()));
    assert_eq!(x.get::<f64>("weight"), Ok(2.0));
    assert_eq!(x.get::<String>("name"), Ok("apple".to_string()));
    assert_eq!(x.get::<f64>("count"), Ok(3.0));
}

#[test]
fn test_inheritance_matches_by_canonical_value() {
    let doc = parse_ok("Base 5 { f 1; }\nD : Base \"5\";");
    assert_eq!(doc.children("D")[0].get::<f64>("f"), Ok(1.0));
}

#[test]
fn test_multiple_errors_are_aggregated() {
    let errors = parse_errors("a 5 6;\nb 1;\nc [1, \"x\"];\nd 2;");

    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(DlError::is_syntax));
    assert!(matches!(errors[0], DlError::SyntaxError { line: 1, column: 5, .. }));
    assert!(matches!(errors[1], DlError::SyntaxError { line: 3, column: 7, .. }));
}

#[test]
fn test_recovery_inside_struct_body() {
    let input = r#"
Room {
    width 5 6;
    height 3;
}
Room2 : Room "nope";
"#;

    let errors = parse_errors(input);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].is_syntax());
    assert!(matches!(errors[1], DlError::InheritanceTargetNotFound { .. }));
}

#[test]
fn test_stray_tokens_at_top_level() {
    let errors = parse_errors("} ; a 1;");
    assert_eq!(errors.len(), 1);

    let errors = parse_errors("Room { 5; b 1; }");
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_unexpected_eof() {
    let errors = parse_errors("Room { a 1;");
    assert!(matches!(errors[0], DlError::UnexpectedEof { .. }));

    let errors = parse_errors("a");
    assert!(matches!(errors[0], DlError::UnexpectedEof { .. }));
}

#[test]
fn test_lexical_error_ends_parse_but_keeps_earlier_errors() {
    let errors = parse_errors("a 5 6;\nb \"unterminated");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].is_syntax());
    assert!(matches!(errors[1], DlError::UnclosedString { line: 2, .. }));
}

#[test]
fn test_parse_failure_display_lists_every_message() {
    let err = parse("a 5 6;\nc [1, \"x\"];").unwrap_err();
    let text = err.to_string();
    println!("{}", text);
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("test.dl"));
}

#[test]
fn test_parse_into_merges_with_existing_tree() {
    let mut target = StructNode::new();
    target.put_field("keep", 1.0);
    target.add_child("Room").put_field("w", 2.0);

    let mut parser = Parser::new("merge.dl", "add 2; Room { w 3; }");
    parser.parse_into(&mut target).expect("Failed to parse into target");

    assert_eq!(target.get::<f64>("keep"), Ok(1.0));
    assert_eq!(target.get::<f64>("add"), Ok(2.0));
    assert_eq!(target.children("Room").len(), 2);
}

#[test]
fn test_empty_and_comment_only_sources() {
    assert_eq!(parse_ok(""), StructNode::new());
    assert_eq!(parse_ok("// nothing\n/* at all */"), StructNode::new());
}

#[test]
fn test_includes_are_spliced_into_the_parse() {
    let mut sources = HashMap::new();
    sources.insert("common.dl".to_string(), ".Pt(x, y);\nshared 7;".to_string());

    let mut parser = Parser::with_resolver("main.dl", "#include \"common.dl\"\nPt(1, 2);", &sources);
    let doc = parser.parse_document().expect("Failed to parse with include");

    assert_eq!(doc.get::<f64>("shared"), Ok(7.0));
    assert_eq!(doc.children("Pt")[0].get::<f64>("x"), Ok(1.0));
    assert_eq!(doc.children("Pt")[0].get::<f64>("y"), Ok(2.0));
}

#[test]
fn test_errors_in_includes_name_the_included_source() {
    let mut sources = HashMap::new();
    sources.insert("common.dl".to_string(), "bad 1 2;".to_string());

    let mut parser = Parser::with_resolver("main.dl", "ok 1;\n#include \"common.dl\"", &sources);
    let err = parser.parse_document().unwrap_err();
    match &err.errors()[0] {
        DlError::SyntaxError { source, line, .. } => {
            assert_eq!(source, "common.dl");
            assert_eq!(*line, 1);
        }
        other => panic!("Expected a SyntaxError, got {:?}", other),
    }
}

#[test]
fn test_missing_include_is_reported() {
    let errors = parse_errors("#include \"gone.dl\"\na 1;");
    assert!(matches!(&errors[0], DlError::MissingInclude { path, .. } if path == "gone.dl"));
}

#[test]
fn test_resolver_io_failure_is_not_aggregated() {
    let failing = |_: &str, path: &str| -> Result<Option<crate::resolver::Included>, DlError> {
        Err(DlError::file_error("disk on fire".into(), path.to_string()))
    };
    let mut parser = Parser::with_resolver("main.dl", "a 1 2;\n#include \"x.dl\"", &failing);
    assert!(matches!(parser.parse_document(), Err(DlError::FileError { .. })));
}

fn nested(depth: usize) -> String {
    "a {".repeat(depth) + &"}".repeat(depth)
}

#[test]
fn test_nesting_up_to_the_limit_is_accepted() {
    let doc = parse(&nested(MAX_NESTING)).expect("Failed to parse nesting at the limit");

    let mut node = &doc;
    let mut depth = 0;
    while let Some(child) = node.children("a").first() {
        node = child;
        depth += 1;
    }
    assert_eq!(depth, MAX_NESTING);
}

#[test]
fn test_nesting_past_the_limit_is_reported() {
    let errors = parse_errors(&nested(MAX_NESTING + 1));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], DlError::SyntaxError { code: Some(203), .. }));

    // parsing continues after the over-deep block
    let errors = parse_errors(&(nested(MAX_NESTING + 1) + " b 1; c 2 3;"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_very_deep_nesting_fails_without_exhausting_the_stack() {
    let input = nested(50_000);
    match Parser::new("deep.dl", &input).parse_document() {
        Err(DlError::ParseFailure { errors, .. }) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].is_syntax());
        }
        other => panic!("Expected a ParseFailure, got {:?}", other.map(|_| ())),
    }
}
