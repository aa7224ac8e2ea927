// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::ast::StructNode;
use crate::value::format_number;
use crate::{DlError, Value};

/// Work item of the explicit-stack walk in [`to_string`].
enum Step<'a> {
    Body(&'a StructNode, usize),
    Open(&'a str, &'a StructNode, usize),
    Close(usize),
}

/// Render a tree as DataLang source text.
///
/// The root's fields and children are written without a wrapper. Every
/// nested struct is written as
///
/// ```text
/// Type value
/// {
///     field value;
/// }
///
/// ```
///
/// indented with one tab per nesting level. Parsing the output yields a tree
/// equal to `tree`, provided every number is finite. `NaN` and infinities
/// are rendered as Rust prints them and do not parse back; use
/// [`try_to_string`] to have them rejected.
pub fn to_string(tree: &StructNode) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Body(tree, 0)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Body(node, depth) => {
                write_fields(&mut out, node, depth);
                let children: Vec<(&str, &StructNode)> = node
                    .child_groups()
                    .flat_map(|(type_name, list)| list.iter().map(move |child| (type_name, child)))
                    .collect();
                for (type_name, child) in children.into_iter().rev() {
                    stack.push(Step::Open(type_name, child, depth));
                }
            }
            Step::Open(type_name, node, depth) => {
                write_header(&mut out, type_name, node, depth);
                stack.push(Step::Close(depth));
                stack.push(Step::Body(node, depth + 1));
            }
            Step::Close(depth) => {
                indent(&mut out, depth);
                out.push_str("}\n\n");
            }
        }
    }
    out
}

/// Like [`to_string`], but fails with a `TypeError` when the tree holds a
/// number the grammar cannot express (`NaN` or an infinity).
pub fn try_to_string(tree: &StructNode) -> Result<String, DlError> {
    check_finite(tree)?;
    Ok(to_string(tree))
}

/// Serialize `tree` into `sink`. I/O failures surface as `FileError`.
pub fn write<W: Write>(tree: &StructNode, sink: &mut W) -> Result<(), DlError> {
    let text = try_to_string(tree)?;
    sink.write_all(text.as_bytes())
        .and_then(|_| sink.flush())
        .map_err(|e| DlError::FileError {
            message: format!("Failed to write DataLang output: {}", e),
            path: String::new(),
            hint: None,
            code: Some(304),
        })
}

/// Serialize `tree` to the file at `path`, replacing any existing content.
pub fn write_file<P: AsRef<Path>>(tree: &StructNode, path: P) -> Result<(), DlError> {
    let path = path.as_ref();
    let text = try_to_string(tree)?;
    fs::write(path, text).map_err(|e| {
        DlError::file_error(
            format!("Failed to write file: {}", e),
            path.to_string_lossy().to_string(),
        )
    })?;
    debug!("wrote DataLang tree to '{}'", path.display());
    Ok(())
}

fn check_finite(tree: &StructNode) -> Result<(), DlError> {
    let non_finite = |value: &Value| match value {
        Value::NumberArray(v) => v.iter().copied().find(|n| !n.is_finite()),
        _ => None,
    };

    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        let own = node.own_value().and_then(non_finite).map(|n| ("own value".to_string(), n));
        let field = node
            .fields()
            .find_map(|(name, value)| non_finite(value).map(|n| (format!("field '{}'", name), n)));

        if let Some((what, n)) = own.or(field) {
            return Err(DlError::type_error(
                format!("Cannot write {} of {}: DataLang has no literal for it", n, what),
                "Replace NaN and infinite numbers before writing",
                408,
            ));
        }
        stack.extend(node.child_groups().flat_map(|(_, list)| list.iter()));
    }
    Ok(())
}

fn write_fields(out: &mut String, node: &StructNode, depth: usize) {
    for (name, raw) in node.fields() {
        // references are written as the value they point to
        let value = match raw {
            Value::Reference(_) => match node.get_value(name) {
                Some(v) => v,
                None => {
                    debug!("skipping field '{}': reference does not resolve", name);
                    continue;
                }
            },
            v => v,
        };
        indent(out, depth);
        out.push_str(name);
        out.push(' ');
        out.push_str(&render_field(value));
        out.push_str(";\n");
    }
}

fn write_header(out: &mut String, type_name: &str, node: &StructNode, depth: usize) {
    indent(out, depth);
    out.push_str(type_name);
    if let Some(own) = node.own_value().and_then(render_own) {
        out.push(' ');
        out.push_str(&own);
    }
    out.push('\n');

    indent(out, depth);
    out.push_str("{\n");
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

/// Fields always need a value token, so empty arrays get a placeholder.
fn render_field(value: &Value) -> String {
    match value {
        Value::NumberArray(v) if v.is_empty() => "0".to_string(),
        Value::StringArray(v) if v.is_empty() => "\"\"".to_string(),
        v => render_value(v),
    }
}

/// Own values are optional in the grammar: empty ones and references are left out.
fn render_own(value: &Value) -> Option<String> {
    match value {
        Value::Reference(_) => None,
        v if v.is_empty() => None,
        v => Some(render_value(v)),
    }
}

fn render_value(value: &Value) -> String {
    let parts: Vec<String> = match value {
        Value::NumberArray(v) => v.iter().map(|n| format_number(*n)).collect(),
        Value::StringArray(v) => v.iter().map(|s| quote(s)).collect(),
        Value::Reference(name) => vec![name.clone()],
    };
    if parts.len() == 1 {
        parts.into_iter().next().unwrap_or_default()
    } else {
        format!("[{}]", parts.join(", "))
    }
}

/// Double-quote a string, escaping what the lexer would otherwise misread.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
