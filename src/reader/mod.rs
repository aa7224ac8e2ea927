// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::ast::StructNode;
use crate::parser::Parser;
use crate::resolver::{FsResolver, IncludeResolver};
use crate::DlError;

/// Entry point for reading DataLang sources.
///
/// A reader owns the resolver used for `#include` directives. Every call
/// runs a fresh parser, so archetypes declared by one source are not visible
/// to the next.
///
/// # Examples
/// ```
/// use datalang::DlReader;
///
/// let reader = DlReader::new();
/// let tree = reader.read_str("inline.dl", "Room \"Kitchen\" { width 4; }").unwrap();
/// assert_eq!(tree.children("Room")[0].get::<u32>("width").unwrap(), 4);
/// ```
pub struct DlReader {
    resolver: Box<dyn IncludeResolver>,
}

impl Default for DlReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DlReader {
    /// Reader that resolves includes on the filesystem.
    pub fn new() -> Self {
        Self::with_resolver(FsResolver::new())
    }

    pub fn with_resolver<R: IncludeResolver + 'static>(resolver: R) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Parse a byte stream into a brand-new tree.
    pub fn read<R: Read>(&self, source_name: &str, input: R) -> Result<StructNode, DlError> {
        let text = read_source(source_name, input)?;
        self.read_str(source_name, &text)
    }

    pub fn read_str(&self, source_name: &str, text: &str) -> Result<StructNode, DlError> {
        let mut tree = StructNode::new();
        self.apply_str(source_name, text, &mut tree)?;
        Ok(tree)
    }

    /// Parse a byte stream and merge it into `target` at root level.
    pub fn apply<R: Read>(&self, source_name: &str, input: R, target: &mut StructNode) -> Result<(), DlError> {
        let text = read_source(source_name, input)?;
        self.apply_str(source_name, &text, target)
    }

    pub fn apply_str(&self, source_name: &str, text: &str, target: &mut StructNode) -> Result<(), DlError> {
        debug!("reading DataLang source '{}'", source_name);
        let mut parser = Parser::with_resolver(source_name, text, self.resolver.as_ref());
        parser.parse_into(target)
    }

    /// Read a file. The path doubles as the source name, so relative
    /// includes resolve next to it.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<StructNode, DlError> {
        let mut tree = StructNode::new();
        self.apply_file(path, &mut tree)?;
        Ok(tree)
    }

    pub fn apply_file<P: AsRef<Path>>(&self, path: P, target: &mut StructNode) -> Result<(), DlError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DlError::FileError {
            message: format!("Failed to read file: {}", e),
            path: path.to_string_lossy().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(301),
        })?;
        let name = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.apply_str(&name.to_string_lossy(), &text, target)
    }

    /// Read `primary`, or `fallback` when `primary` cannot be read.
    ///
    /// Parse failures in `primary` are returned as-is; only file errors
    /// trigger the fallback.
    pub fn read_file_with_fallback<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        primary: P,
        fallback: Q,
    ) -> Result<StructNode, DlError> {
        let (primary, fallback) = (primary.as_ref(), fallback.as_ref());
        match self.read_file(primary) {
            Err(DlError::FileError { .. }) => {
                debug!(
                    "'{}' unavailable, falling back to '{}'",
                    primary.display(),
                    fallback.display()
                );
                self.read_file(fallback).map_err(|e| match e {
                    DlError::FileError { message, .. } => DlError::FileError {
                        message: format!(
                            "Failed to read primary path '{}' or fallback path '{}': {}",
                            primary.display(),
                            fallback.display(),
                            message
                        ),
                        path: format!("{} (fallback: {})", primary.display(), fallback.display()),
                        hint: Some("Check that at least one of the files exists".into()),
                        code: Some(303),
                    },
                    other => other,
                })
            }
            result => result,
        }
    }
}

fn read_source<R: Read>(source_name: &str, mut input: R) -> Result<String, DlError> {
    let mut text = String::new();
    input.read_to_string(&mut text).map_err(|e| DlError::FileError {
        message: format!("Failed to read source: {}", e),
        path: source_name.to_string(),
        hint: None,
        code: Some(301),
    })?;
    Ok(text)
}
