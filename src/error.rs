// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// The main error type for DataLang lexing, parsing, conversion and I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum DlError {
    /// Raised when a string literal is not closed.
    UnclosedString {
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a `/* ... */` comment runs to end of input.
    UnclosedComment {
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised for characters that cannot start any token.
    UnexpectedCharacter {
        character: char,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    InvalidNumber {
        lexeme: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    InvalidEscape {
        sequence: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// The include resolver had nothing for the requested path.
    MissingInclude {
        path: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    IncludeCycle {
        path: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    SyntaxError {
        message: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    UnexpectedEof {
        message: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    UndeclaredArchetype {
        name: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    TooManyValues {
        name: String,
        expected: usize,
        found: usize,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    InheritanceTargetNotFound {
        type_name: String,
        value: String,
        source: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised when a value cannot be converted to the requested type.
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Read or write failure on an underlying stream. Never aggregated.
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Every lexical, syntax and semantic error recorded during one parse.
    ParseFailure {
        source: String,
        errors: Vec<DlError>,
    },
}

impl DlError {
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            DlError::UnclosedString { .. }
                | DlError::UnclosedComment { .. }
                | DlError::UnexpectedCharacter { .. }
                | DlError::InvalidNumber { .. }
                | DlError::InvalidEscape { .. }
                | DlError::MissingInclude { .. }
                | DlError::IncludeCycle { .. }
        )
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, DlError::SyntaxError { .. } | DlError::UnexpectedEof { .. })
    }

    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            DlError::UndeclaredArchetype { .. }
                | DlError::TooManyValues { .. }
                | DlError::InheritanceTargetNotFound { .. }
        )
    }

    /// The recorded errors of a `ParseFailure`, or this error alone.
    pub fn errors(&self) -> &[DlError] {
        match self {
            DlError::ParseFailure { errors, .. } => errors,
            other => std::slice::from_ref(other),
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            DlError::UnclosedString { code, .. }
            | DlError::UnclosedComment { code, .. }
            | DlError::UnexpectedCharacter { code, .. }
            | DlError::InvalidNumber { code, .. }
            | DlError::InvalidEscape { code, .. }
            | DlError::MissingInclude { code, .. }
            | DlError::IncludeCycle { code, .. }
            | DlError::SyntaxError { code, .. }
            | DlError::UnexpectedEof { code, .. }
            | DlError::UndeclaredArchetype { code, .. }
            | DlError::TooManyValues { code, .. }
            | DlError::InheritanceTargetNotFound { code, .. }
            | DlError::TypeError { code, .. }
            | DlError::FileError { code, .. } => *code,
            DlError::ParseFailure { .. } => None,
        }
    }

    /// Helper for file-related errors when reading or writing DataLang sources.
    pub fn file_error(message: String, path: String) -> Self {
        DlError::FileError {
            message,
            path,
            hint: Some("Check file path and permissions".into()),
            code: Some(300),
        }
    }

    pub fn type_error(message: String, hint: &str, code: u32) -> Self {
        DlError::TypeError {
            message,
            hint: Some(hint.into()),
            code: Some(code),
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for DlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DlError::UnclosedString { source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Unclosed string literal at {}:{}{}",
                    source, line, column, suffix(hint, code)),
            DlError::UnclosedComment { source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Unclosed block comment at {}:{}{}",
                    source, line, column, suffix(hint, code)),
            DlError::UnexpectedCharacter { character, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Unexpected character '{}' at {}:{}{}",
                    source, character.escape_default(), line, column, suffix(hint, code)),
            DlError::InvalidNumber { lexeme, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Invalid number '{}' at {}:{}{}",
                    source, lexeme, line, column, suffix(hint, code)),
            DlError::InvalidEscape { sequence, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Invalid escape sequence '{}' at {}:{}{}",
                    source, sequence, line, column, suffix(hint, code)),
            DlError::MissingInclude { path, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Included resource '{}' not found at {}:{}{}",
                    source, path, line, column, suffix(hint, code)),
            DlError::IncludeCycle { path, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Include of '{}' at {}:{} would include itself{}",
                    source, path, line, column, suffix(hint, code)),
            DlError::SyntaxError { message, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Syntax Error at {}:{}: {}{}",
                    source, line, column, message, suffix(hint, code)),
            DlError::UnexpectedEof { message, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Unexpected end of input at {}:{}: {}{}",
                    source, line, column, message, suffix(hint, code)),
            DlError::UndeclaredArchetype { name, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Archetype '{}' was not declared, at {}:{}{}",
                    source, name, line, column, suffix(hint, code)),
            DlError::TooManyValues { name, expected, found, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Archetype '{}' takes {} values (or less), {} provided, at {}:{}{}",
                    source, name, expected, found, line, column, suffix(hint, code)),
            DlError::InheritanceTargetNotFound { type_name, value, source, line, column, hint, code } =>
                write!(f, "[DL] ({}) Inherited struct {} {} can't be found, at {}:{}{}",
                    source, type_name, value, line, column, suffix(hint, code)),
            DlError::TypeError { message, hint, code } =>
                write!(f, "[DL] Type Error: {}{}", message, suffix(hint, code)),
            DlError::FileError { message, path, hint, code } =>
                write!(f, "[DL] File Error '{}': {}{}", path, message, suffix(hint, code)),
            DlError::ParseFailure { errors, .. } => {
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DlError {}
