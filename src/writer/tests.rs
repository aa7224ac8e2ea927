#[cfg(test)]
use super::*;
use crate::parser::Parser;

fn reparse(text: &str) -> StructNode {
    Parser::new("written.dl", text)
        .parse_document()
        .expect("Failed to re-parse written output")
}

#[test]
fn test_number_formatting() {
    let mut tree = StructNode::new();
    tree.put_field("whole", 3.0);
    tree.put_field("half", 3.5);
    tree.put_field("neg", -2.0);

    let text = to_string(&tree);
    println!("{}", text);
    assert_eq!(text, "whole 3;\nhalf 3.5;\nneg -2;\n");

    let back = reparse(&text);
    assert_eq!(back.raw_value("whole"), Some(&Value::from(3.0)));
    assert_eq!(back.raw_value("half"), Some(&Value::from(3.5)));
    assert_eq!(back.get::<f64>("neg"), Ok(-2.0));
}

#[test]
fn test_struct_layout() {
    let mut tree = StructNode::new();
    tree.put_field("name", "House");
    let room = tree.add_child("Room");
    room.set_own_value(Some(Value::from("Kitchen")));
    room.put_field("size", vec![4.0, 5.5]);
    room.add_child("Chair").put_field("legs", 4.0);

    let expected = "name \"House\";\n\
                    Room \"Kitchen\"\n\
                    {\n\
                    \tsize [4, 5.5];\n\
                    \tChair\n\
                    \t{\n\
                    \t\tlegs 4;\n\
                    \t}\n\
                    \n\
                    }\n\
                    \n";
    assert_eq!(to_string(&tree), expected);
}

#[test]
fn test_empty_values() {
    let mut tree = StructNode::new();
    tree.put_field("nums", Value::NumberArray(Vec::new()));
    tree.put_field("strs", Value::StringArray(Vec::new()));
    tree.push_child("Empty", StructNode::with_value(Value::StringArray(Vec::new())));

    let text = to_string(&tree);
    assert_eq!(text, "nums 0;\nstrs \"\";\nEmpty\n{\n}\n\n");

    let back = reparse(&text);
    assert_eq!(back.get::<f64>("nums"), Ok(0.0));
    assert_eq!(back.get::<String>("strs"), Ok(String::new()));
    assert_eq!(back.children("Empty")[0].own_value(), None);
}

#[test]
fn test_string_escaping() {
    assert_eq!(quote("plain"), "\"plain\"");
    assert_eq!(quote("a \"q\" \\ b"), "\"a \\\"q\\\" \\\\ b\"");
    assert_eq!(quote("tab\tnl\n"), "\"tab\\tnl\\n\"");
    assert_eq!(quote("\u{1}"), "\"\\u0001\"");

    let mut tree = StructNode::new();
    tree.put_field("text", "line1\nline2\t\"quoted\" \\ \u{7f} \u{0}");
    let back = reparse(&to_string(&tree));
    assert_eq!(back.get_value("text"), tree.get_value("text"));
}

#[test]
fn test_references_are_written_resolved() {
    let mut tree = StructNode::new();
    tree.put_field("base", 7.0);
    tree.put_field("alias", Value::reference("base"));
    tree.put_field("dangling", Value::reference("nowhere"));

    let text = to_string(&tree);
    assert_eq!(text, "base 7;\nalias 7;\n");
}

#[test]
fn test_round_trip_of_parsed_document() {
    let input = r#"
.Pt(x, y);
title "Map \"one\"";
scale [1, 2.25, -3];
Layer "ground"
{
    tiles ["grass", "water"];
    Pt(1, 2);
    Pt(3, 4) { label "corner"; }
    Tree 5 { }
}
Layer "sky" { }
Layer { depth 2; }
Light { power 0.5; }
"#;

    let tree = Parser::new("map.dl", input)
        .parse_document()
        .expect("Failed to parse map");
    let text = to_string(&tree);
    println!("--- Written ---\n{}", text);

    let back = reparse(&text);
    assert_eq!(back, tree);
    assert_eq!(to_string(&back), text);
}

#[test]
fn test_write_to_sink_and_file() {
    let mut tree = StructNode::new();
    tree.put_field("a", 1.0);

    let mut sink = Vec::new();
    write(&tree, &mut sink).expect("Failed to write to buffer");
    assert_eq!(String::from_utf8(sink).expect("Output is not UTF-8"), "a 1;\n");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("out.dl");
    write_file(&tree, &path).expect("Failed to write file");
    assert_eq!(std::fs::read_to_string(&path).expect("Failed to read back"), "a 1;\n");
}

#[test]
fn test_write_file_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing").join("out.dl");
    let err = write_file(&StructNode::new(), &path).unwrap_err();
    assert!(matches!(err, DlError::FileError { .. }));
}

#[test]
fn test_display_uses_writer() {
    let mut node = StructNode::new();
    node.put_field("k", "v");
    assert_eq!(node.to_string(), "k \"v\";\n");
}

#[test]
fn test_non_finite_numbers_are_rejected() {
    let mut tree = StructNode::new();
    tree.put_field("x", f64::NAN);

    // display output keeps the value visible
    assert_eq!(to_string(&tree), "x NaN;\n");

    let err = try_to_string(&tree).unwrap_err();
    println!("{}", err);
    assert!(matches!(err, DlError::TypeError { code: Some(408), .. }));

    let mut sink: Vec<u8> = Vec::new();
    assert!(write(&tree, &mut sink).is_err());
    assert!(sink.is_empty());

    let mut tree = StructNode::new();
    tree.add_child("Deep")
        .push_child("Deeper", StructNode::with_value(vec![1.0, f64::INFINITY]));
    assert!(matches!(try_to_string(&tree), Err(DlError::TypeError { .. })));

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bad.dl");
    assert!(write_file(&tree, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_deep_tree_round_trips() {
    let depth = crate::parser::MAX_NESTING;
    let mut tree = StructNode::new();
    let mut node = &mut tree;
    for level in 0..depth {
        node = node.add_child("Level");
        node.put_field("n", level as f64);
    }

    let text = try_to_string(&tree).expect("Failed to write deep tree");
    assert_eq!(text.matches('{').count(), depth);
    assert!(text.contains(&format!("{}n {};", "\t".repeat(depth), depth - 1)));

    let back = reparse(&text);
    assert_eq!(back, tree);
}
