// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::DlError;
use crate::resolver::{IncludeResolver, NoIncludes};

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Ident(String),
    String(String),
    Number(f64),

    // --- structure ---
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // --- symbols ---
    Semicolon,
    Colon,
    Comma,
    Dot,
    Minus,

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::String(s) => write!(f, "string \"{}\"", s.escape_default()),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Colon => f.write_str("':'"),
            Token::Comma => f.write_str("','"),
            Token::Dot => f.write_str("'.'"),
            Token::Minus => f.write_str("'-'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Where a token started: stream name plus 1-based line and column.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub source: Rc<str>,
    pub line: usize,
    pub column: usize,
}

/// One input stream on the include stack.
struct Source {
    name: Rc<str>,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Source {
    fn new(name: &str, text: &str) -> Self {
        Source {
            name: Rc::from(name),
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Tokenizer over a stack of sources. `#include "path"` directives push a
/// nested source; when it runs dry the outer source resumes.
pub struct Lexer<'r> {
    sources: Vec<Source>,
    resolver: &'r dyn IncludeResolver,
    token_start: Position,
}

static NO_INCLUDES: NoIncludes = NoIncludes;

impl<'r> Lexer<'r> {
    /// A lexer that reports every include as missing.
    pub fn new(name: &str, input: &str) -> Lexer<'static> {
        Lexer::with_resolver(name, input, &NO_INCLUDES)
    }

    pub fn with_resolver(name: &str, input: &str, resolver: &'r dyn IncludeResolver) -> Self {
        debug!("opening source '{}'", name);
        let source = Source::new(name, input);
        let token_start = Position {
            source: Rc::clone(&source.name),
            line: 1,
            column: 1,
        };
        Lexer {
            sources: vec![source],
            resolver,
            token_start,
        }
    }

    /// Start of the most recently returned token.
    pub fn position(&self) -> &Position {
        &self.token_start
    }

    pub fn line(&self) -> usize {
        self.token_start.line
    }

    pub fn column(&self) -> usize {
        self.token_start.column
    }

    pub fn source_name(&self) -> &str {
        &self.token_start.source
    }

    /// Number of streams currently open, the main one included.
    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    pub fn next_token(&mut self) -> Result<Token, DlError> {
        tokenizer::next_token(self)
    }
}
