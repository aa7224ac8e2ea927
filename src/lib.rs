// Author: Dustin Pilgrim
// License: MIT

//! DataLang: a small structured-data language with nested typed structs,
//! inheritance by value and positional archetypes.
//!
//! ```
//! let tree = datalang::parse_str(
//!     "inline.dl",
//!     r#"
//!     .Point(x, y);
//!     Base "origin" { z 0; }
//!     Point "a" : Base "origin" (1, 2);
//!     "#,
//! )
//! .unwrap();
//!
//! let a = &tree.children("Point")[0];
//! assert_eq!(a.get::<i32>("x").unwrap(), 1);
//! assert_eq!(a.get::<i32>("z").unwrap(), 0);
//! ```

pub mod ast;
pub mod error;
pub mod export;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod resolver;
pub mod value;
pub mod writer;

use std::io::{Read, Write};

pub use ast::StructNode;
pub use error::DlError;
pub use reader::DlReader;
pub use resolver::{FsResolver, IncludeResolver, Included, NoIncludes};
pub use value::Value;

/// Parse a stream into a new tree, resolving includes on the filesystem.
pub fn parse<R: Read>(source_name: &str, input: R) -> Result<StructNode, DlError> {
    DlReader::new().read(source_name, input)
}

pub fn parse_str(source_name: &str, text: &str) -> Result<StructNode, DlError> {
    DlReader::new().read_str(source_name, text)
}

/// Parse a stream and merge it into `target` at root level.
pub fn parse_into<R: Read>(source_name: &str, input: R, target: &mut StructNode) -> Result<(), DlError> {
    DlReader::new().apply(source_name, input, target)
}

/// Serialize a tree as DataLang text.
pub fn write<W: Write>(tree: &StructNode, sink: &mut W) -> Result<(), DlError> {
    writer::write(tree, sink)
}
