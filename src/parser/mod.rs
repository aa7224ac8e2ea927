// Author: Dustin Pilgrim
// License: MIT

use log::{debug, trace};

use crate::ast::StructNode;
use crate::lexer::{Lexer, Position, Token};
use crate::resolver::IncludeResolver;
use crate::DlError;

mod archetype;
mod inherit;
mod statement;
mod value;

pub use archetype::ArchetypeTable;

/// Deepest struct nesting a parse accepts.
pub const MAX_NESTING: usize = 128;

/// A struct being populated. It is attached to its parent when closed.
struct Scope {
    type_name: String,
    node: StructNode,
}

/// Recursive-descent parser for one DataLang source (plus its includes).
///
/// Syntax errors are recorded and parsing resumes at the next statement
/// boundary; semantic errors are recorded in place. Everything recorded is
/// returned together as a single `DlError::ParseFailure`.
pub struct Parser<'r> {
    lexer: Lexer<'r>,
    peek: Token,
    peek_pos: Position,
    root: StructNode,
    scopes: Vec<Scope>,
    archetypes: ArchetypeTable,
    errors: Vec<DlError>,
}

impl<'r> Parser<'r> {
    /// A parser whose includes always fail with `MissingInclude`.
    pub fn new(name: &str, input: &str) -> Parser<'static> {
        Parser::from_lexer(Lexer::new(name, input))
    }

    pub fn with_resolver(name: &str, input: &str, resolver: &'r dyn IncludeResolver) -> Self {
        Parser::from_lexer(Lexer::with_resolver(name, input, resolver))
    }

    fn from_lexer(lexer: Lexer<'r>) -> Self {
        let peek_pos = lexer.position().clone();
        Self {
            lexer,
            peek: Token::Eof,
            peek_pos,
            root: StructNode::new(),
            scopes: Vec::new(),
            archetypes: ArchetypeTable::default(),
            errors: Vec::new(),
        }
    }

    /// Parse into a brand-new tree.
    pub fn parse_document(&mut self) -> Result<StructNode, DlError> {
        let mut root = StructNode::new();
        self.parse_into(&mut root)?;
        Ok(root)
    }

    /// Parse and merge the result into `target` at root level.
    ///
    /// On failure `target` still holds whatever was built, but it must not be
    /// treated as valid.
    pub fn parse_into(&mut self, target: &mut StructNode) -> Result<(), DlError> {
        self.root = std::mem::take(target);
        let result = self.bump().and_then(|_| statement::parse_program(self));
        self.unwind(0);
        *target = std::mem::take(&mut self.root);

        match result {
            Ok(()) => {}
            Err(e @ DlError::FileError { .. }) => return Err(e),
            Err(e) => self.record(e),
        }

        debug!(
            "parsed '{}' with {} error(s)",
            self.lexer.position().source,
            self.errors.len()
        );

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DlError::ParseFailure {
                source: self.lexer.position().source.to_string(),
                errors: std::mem::take(&mut self.errors),
            })
        }
    }

    pub fn archetypes(&self) -> &ArchetypeTable {
        &self.archetypes
    }

    // --- token handling ---

    pub(crate) fn bump(&mut self) -> Result<Token, DlError> {
        let next = self.lexer.next_token()?;
        self.peek_pos = self.lexer.position().clone();
        Ok(std::mem::replace(&mut self.peek, next))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.peek
    }

    pub(crate) fn at(&self, token: &Token) -> bool {
        self.peek == *token
    }

    pub(crate) fn expect(&mut self, expected: Token) -> Result<Token, DlError> {
        if self.peek != expected {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.bump()
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<String, DlError> {
        match self.peek {
            Token::Ident(_) => match self.bump()? {
                Token::Ident(name) => Ok(name),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected(what)),
        }
    }

    /// Syntax error for the token under the cursor.
    pub(crate) fn unexpected(&self, expected: &str) -> DlError {
        let pos = &self.peek_pos;
        match &self.peek {
            Token::Eof => DlError::UnexpectedEof {
                message: format!("Expected {}", expected),
                source: pos.source.to_string(),
                line: pos.line,
                column: pos.column,
                hint: Some("Check for a missing '}' or ';'".into()),
                code: Some(201),
            },
            tok => DlError::SyntaxError {
                message: format!("Expected {}, got {}", expected, tok),
                source: pos.source.to_string(),
                line: pos.line,
                column: pos.column,
                hint: None,
                code: Some(202),
            },
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.peek_pos.clone()
    }

    pub(crate) fn record(&mut self, err: DlError) {
        debug!("recorded error: {}", err);
        self.errors.push(err);
    }

    // --- scope stack ---

    /// Opens a child struct. Fails with a syntax error past [`MAX_NESTING`].
    pub(crate) fn open(&mut self, type_name: String) -> Result<(), DlError> {
        if self.scopes.len() >= MAX_NESTING {
            let pos = &self.peek_pos;
            return Err(DlError::SyntaxError {
                message: format!("Struct '{}' is nested deeper than {} levels", type_name, MAX_NESTING),
                source: pos.source.to_string(),
                line: pos.line,
                column: pos.column,
                hint: Some("Flatten the structure or split it into several structs".into()),
                code: Some(203),
            });
        }
        trace!("open struct '{}' at depth {}", type_name, self.scopes.len() + 1);
        self.scopes.push(Scope {
            type_name,
            node: StructNode::new(),
        });
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        if let Some(scope) = self.scopes.pop() {
            trace!("close struct '{}'", scope.type_name);
            self.current().push_child(&scope.type_name, scope.node);
        }
    }

    fn unwind(&mut self, depth: usize) {
        while self.scopes.len() > depth {
            self.close();
        }
    }

    pub(crate) fn current(&mut self) -> &mut StructNode {
        match self.scopes.last_mut() {
            Some(scope) => &mut scope.node,
            None => &mut self.root,
        }
    }

    /// Type name of the innermost open struct; empty at root.
    pub(crate) fn current_type(&self) -> &str {
        self.scopes.last().map_or("", |s| s.type_name.as_str())
    }

    /// The struct that will receive the innermost open struct when it closes.
    pub(crate) fn enclosing(&self) -> &StructNode {
        match self.scopes.len() {
            0 | 1 => &self.root,
            n => &self.scopes[n - 2].node,
        }
    }

    // --- recovery ---

    /// Runs one statement; on a syntax error, records it and resynchronizes.
    pub(crate) fn statement<F>(&mut self, parse: F) -> Result<(), DlError>
    where
        F: FnOnce(&mut Self) -> Result<(), DlError>,
    {
        let depth = self.scopes.len();
        match parse(self) {
            Ok(()) => Ok(()),
            Err(e) if e.is_syntax() => {
                self.record(e);
                self.unwind(depth);
                self.recover()
            }
            Err(e) => Err(e),
        }
    }

    /// Skips to the end of the broken statement: a `;` outside any braces,
    /// a `}` closing a block opened while skipping, or just before a `}`
    /// that belongs to the enclosing block.
    pub(crate) fn recover(&mut self) -> Result<(), DlError> {
        let mut nesting = 0usize;
        loop {
            match self.peek {
                Token::Eof => return Ok(()),
                Token::LBrace => {
                    nesting += 1;
                }
                Token::RBrace if nesting == 0 => return Ok(()),
                Token::RBrace => {
                    nesting -= 1;
                    if nesting == 0 {
                        self.bump()?;
                        if self.at(&Token::Semicolon) {
                            self.bump()?;
                        }
                        return Ok(());
                    }
                }
                Token::Semicolon if nesting == 0 => {
                    self.bump()?;
                    return Ok(());
                }
                _ => {}
            }
            let skipped = self.bump()?;
            trace!("recovery skipped {}", skipped);
        }
    }
}

#[cfg(test)]
mod tests;
