// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::DlError;

/// A nested source handed back by an [`IncludeResolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct Included {
    /// Stream name used in error positions and for cycle detection.
    pub name: String,
    pub text: String,
}

/// Looks up the target of an `#include "path"` directive.
///
/// `Ok(None)` means the resource does not exist and is reported as a
/// lexical error naming the path. `Err` aborts the parse immediately.
pub trait IncludeResolver {
    fn resolve_include(&self, current_source: &str, path: &str) -> Result<Option<Included>, DlError>;
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve_include(&self, _current_source: &str, _path: &str) -> Result<Option<Included>, DlError> {
        Ok(None)
    }
}

/// In-memory sources keyed by include path.
impl IncludeResolver for HashMap<String, String> {
    fn resolve_include(&self, _current_source: &str, path: &str) -> Result<Option<Included>, DlError> {
        Ok(self.get(path).map(|text| Included {
            name: path.to_string(),
            text: text.clone(),
        }))
    }
}

impl<F> IncludeResolver for F
where
    F: Fn(&str, &str) -> Result<Option<Included>, DlError>,
{
    fn resolve_include(&self, current_source: &str, path: &str) -> Result<Option<Included>, DlError> {
        self(current_source, path)
    }
}

/// Filesystem resolver.
///
/// Relative paths resolve against `base_dir` when set, otherwise against the
/// directory of the including stream. `~/` expands to the home directory.
#[derive(Debug, Clone, Default)]
pub struct FsResolver {
    base_dir: Option<PathBuf>,
}

impl FsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: Some(base_dir.as_ref().to_path_buf()),
        }
    }
}

impl IncludeResolver for FsResolver {
    fn resolve_include(&self, current_source: &str, path: &str) -> Result<Option<Included>, DlError> {
        let base_dir = match &self.base_dir {
            Some(dir) => Some(dir.as_path()),
            None => Path::new(current_source)
                .parent()
                .filter(|p| !p.as_os_str().is_empty()),
        };
        let resolved = resolve_include_path(path, base_dir)?;

        if !resolved.exists() {
            debug!("include '{}' resolved to missing file '{}'", path, resolved.display());
            return Ok(None);
        }

        let text = fs::read_to_string(&resolved).map_err(|e| DlError::FileError {
            message: format!("Failed to read included file: {}", e),
            path: resolved.to_string_lossy().to_string(),
            hint: Some("Check that the included file is readable".into()),
            code: Some(302),
        })?;

        // names are canonical: one name per file
        let name = fs::canonicalize(&resolved).unwrap_or(resolved);

        Ok(Some(Included {
            name: name.to_string_lossy().to_string(),
            text,
        }))
    }
}

/// Expand "~/" and resolve relative paths against base_dir.
pub fn resolve_include_path(raw_path: &str, base_dir: Option<&Path>) -> Result<PathBuf, DlError> {
    let mut p = if let Some(rest) = raw_path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| DlError::FileError {
            message: "Could not determine home directory for ~ expansion".into(),
            path: raw_path.to_string(),
            hint: Some("Set HOME or use an absolute path in #include".into()),
            code: Some(300),
        })?;
        home.join(rest)
    } else {
        PathBuf::from(raw_path)
    };

    if p.is_relative() {
        if let Some(base) = base_dir {
            p = base.join(p);
        }
    }
    Ok(p)
}
