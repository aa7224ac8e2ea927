use super::*;

/// Current character of the innermost open source.
pub(super) fn peek_char(lexer: &Lexer) -> Option<char> {
    peek_nth(lexer, 0)
}

pub(super) fn peek_nth(lexer: &Lexer, n: usize) -> Option<char> {
    lexer
        .sources
        .last()
        .and_then(|src| src.chars.get(src.pos + n).copied())
}

/// Advance the character iterator and update line/column tracking
pub(super) fn bump(lexer: &mut Lexer) -> Option<char> {
    let src = lexer.sources.last_mut()?;
    let curr = src.chars.get(src.pos).copied();
    if let Some(c) = curr {
        src.pos += 1;
        if c == '\n' {
            src.line += 1;
            src.column = 1;
        } else {
            src.column += 1;
        }
    }
    curr
}

/// Position of the next unread character.
pub(super) fn here(lexer: &Lexer) -> Position {
    match lexer.sources.last() {
        Some(src) => Position {
            source: Rc::clone(&src.name),
            line: src.line,
            column: src.column,
        },
        None => lexer.token_start.clone(),
    }
}

/// Skip whitespace and comments, closing exhausted include streams on the way.
pub(super) fn skip_whitespace_and_comments(lexer: &mut Lexer) -> Result<(), DlError> {
    loop {
        match peek_char(lexer) {
            Some(c) if c.is_whitespace() => {
                bump(lexer);
            }
            Some('/') if peek_nth(lexer, 1) == Some('/') => {
                while let Some(ch) = bump(lexer) {
                    if ch == '\n' {
                        break;
                    }
                }
            }
            Some('/') if peek_nth(lexer, 1) == Some('*') => {
                let start = here(lexer);
                bump(lexer);
                bump(lexer);
                loop {
                    match bump(lexer) {
                        Some('*') if peek_char(lexer) == Some('/') => {
                            bump(lexer);
                            break;
                        }
                        Some(_) => {}
                        None => {
                            return Err(DlError::UnclosedComment {
                                source: start.source.to_string(),
                                line: start.line,
                                column: start.column,
                                hint: Some("Close the comment with */".into()),
                                code: Some(102),
                            });
                        }
                    }
                }
            }
            None if lexer.sources.len() > 1 => {
                if let Some(done) = lexer.sources.pop() {
                    debug!("finished included source '{}'", done.name);
                }
            }
            _ => return Ok(()),
        }
    }
}
