// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use crate::ast::StructNode;
use crate::reader::DlReader;
use crate::DlError;

/// Export a DataLang tree to pretty-printed JSON.
///
/// Every struct becomes an object with up to three keys:
/// - `value`: the own value, omitted when the struct has none
/// - `fields`: field name to value
/// - `structs`: child type name to an array of structs, in declaration order
///
/// Single-element values become JSON scalars, longer ones arrays, and
/// references `{"ref": "name"}`.
///
/// # Examples
/// ```
/// use datalang::{export, DlReader};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tree = DlReader::new().read_str("inline.dl", "size [2, 3];")?;
/// let json = export::to_json(&tree)?;
/// assert!(json.contains("\"size\""));
/// # Ok(())
/// # }
/// ```
pub fn to_json(tree: &StructNode) -> Result<String, DlError> {
    serde_json::to_string_pretty(tree).map_err(|e| {
        DlError::type_error(
            format!("Failed to serialize tree to JSON: {}", e),
            "Check the tree for values JSON cannot represent",
            407,
        )
    })
}

/// Export a DataLang file directly to JSON.
///
/// Convenience function that reads, parses, and exports in one call.
/// Includes resolve relative to the file.
///
/// # Errors
/// Returns error if the file doesn't exist or contains invalid DataLang.
pub fn export_dl_file<P: AsRef<Path>>(path: P) -> Result<String, DlError> {
    let tree = DlReader::new().read_file(path)?;
    to_json(&tree)
}
