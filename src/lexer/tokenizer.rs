use super::*;
use super::scanner::{bump, here, peek_char, peek_nth, skip_whitespace_and_comments};

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, DlError> {
    loop {
        skip_whitespace_and_comments(lexer)?;
        lexer.token_start = here(lexer);

        let token = match peek_char(lexer) {
            Some('{') => tokenize_symbol(lexer, Token::LBrace),
            Some('}') => tokenize_symbol(lexer, Token::RBrace),
            Some('(') => tokenize_symbol(lexer, Token::LParen),
            Some(')') => tokenize_symbol(lexer, Token::RParen),
            Some('[') => tokenize_symbol(lexer, Token::LBracket),
            Some(']') => tokenize_symbol(lexer, Token::RBracket),
            Some(';') => tokenize_symbol(lexer, Token::Semicolon),
            Some(':') => tokenize_symbol(lexer, Token::Colon),
            Some(',') => tokenize_symbol(lexer, Token::Comma),
            Some('.') => tokenize_symbol(lexer, Token::Dot),
            Some('-') => tokenize_symbol(lexer, Token::Minus),
            Some('#') => {
                tokenize_directive(lexer)?;
                continue;
            }
            Some('"') => tokenize_string(lexer).map(Token::String),
            Some(c) if c.is_ascii_digit() => tokenize_number(lexer),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => tokenize_identifier(lexer),
            Some(ch) => tokenize_unexpected_char(lexer, ch),
            None => Ok(Token::Eof),
        };

        return token;
    }
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, DlError> {
    bump(lexer);
    Ok(token)
}

fn read_identifier(lexer: &mut Lexer) -> String {
    let mut ident = String::new();
    while let Some(ch) = peek_char(lexer) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            ident.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }
    ident
}

fn tokenize_identifier(lexer: &mut Lexer) -> Result<Token, DlError> {
    Ok(Token::Ident(read_identifier(lexer)))
}

fn tokenize_string(lexer: &mut Lexer) -> Result<String, DlError> {
    let start = here(lexer);
    bump(lexer); // consume opening quote
    let mut content = String::new();

    loop {
        match bump(lexer) {
            Some('"') => return Ok(content),
            Some('\\') => content.push(read_escape(lexer, &start)?),
            Some(ch) => content.push(ch),
            None => {
                return Err(DlError::UnclosedString {
                    source: start.source.to_string(),
                    line: start.line,
                    column: start.column,
                    hint: Some("String literal not closed".into()),
                    code: Some(101),
                });
            }
        }
    }
}

fn read_escape(lexer: &mut Lexer, start: &Position) -> Result<char, DlError> {
    let at = here(lexer);
    let escaped = match bump(lexer) {
        Some('n') => '\n',
        Some('t') => '\t',
        Some('r') => '\r',
        Some('b') => '\u{8}',
        Some('f') => '\u{c}',
        Some('0') => '\0',
        Some('\\') => '\\',
        Some('"') => '"',
        Some('\'') => '\'',
        Some('/') => '/',
        Some('u') => {
            let mut hex = String::new();
            for _ in 0..4 {
                match peek_char(lexer) {
                    Some(h) if h.is_ascii_hexdigit() => {
                        hex.push(h);
                        bump(lexer);
                    }
                    _ => break,
                }
            }
            return u32::from_str_radix(&hex, 16)
                .ok()
                .filter(|_| hex.len() == 4)
                .and_then(char::from_u32)
                .ok_or_else(|| invalid_escape(&at, format!("\\u{}", hex)));
        }
        Some(other) => return Err(invalid_escape(&at, format!("\\{}", other))),
        None => {
            return Err(DlError::UnclosedString {
                source: start.source.to_string(),
                line: start.line,
                column: start.column,
                hint: Some("Trailing backslash in string".into()),
                code: Some(101),
            });
        }
    };
    Ok(escaped)
}

fn invalid_escape(at: &Position, sequence: String) -> DlError {
    DlError::InvalidEscape {
        sequence,
        source: at.source.to_string(),
        line: at.line,
        column: at.column,
        hint: Some("Supported escapes: \\n \\t \\r \\b \\f \\0 \\\\ \\\" \\' \\/ \\uXXXX".into()),
        code: Some(105),
    }
}

fn push_digits(lexer: &mut Lexer, num: &mut String) {
    while let Some(ch) = peek_char(lexer) {
        if ch.is_ascii_digit() {
            num.push(ch);
            bump(lexer);
        } else {
            break;
        }
    }
}

fn tokenize_number(lexer: &mut Lexer) -> Result<Token, DlError> {
    let mut num = String::new();
    push_digits(lexer, &mut num);

    // a '.' only belongs to the number when a digit follows it
    if peek_char(lexer) == Some('.') && peek_nth(lexer, 1).is_some_and(|c| c.is_ascii_digit()) {
        num.push('.');
        bump(lexer);
        push_digits(lexer, &mut num);
    }

    if matches!(peek_char(lexer), Some('e') | Some('E')) {
        let exponent_follows = match peek_nth(lexer, 1) {
            Some('+') | Some('-') => peek_nth(lexer, 2).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        };
        if exponent_follows {
            num.push('e');
            bump(lexer);
            if let Some(sign @ ('+' | '-')) = peek_char(lexer) {
                num.push(sign);
                bump(lexer);
            }
            push_digits(lexer, &mut num);
        }
    }

    num.parse::<f64>()
        .map(Token::Number)
        .map_err(|_| DlError::InvalidNumber {
            lexeme: num.clone(),
            source: lexer.token_start.source.to_string(),
            line: lexer.token_start.line,
            column: lexer.token_start.column,
            hint: None,
            code: Some(104),
        })
}

/// Handles `#include "path"`: resolves the path and pushes the nested source.
fn tokenize_directive(lexer: &mut Lexer) -> Result<(), DlError> {
    let start = lexer.token_start.clone();
    bump(lexer); // consume '#'

    let directive = read_identifier(lexer);
    if directive != "include" {
        return Err(DlError::UnexpectedCharacter {
            character: '#',
            source: start.source.to_string(),
            line: start.line,
            column: start.column,
            hint: Some(format!("Unknown directive '#{}', only #include is supported", directive)),
            code: Some(103),
        });
    }

    while peek_char(lexer).is_some_and(|c| c == ' ' || c == '\t') {
        bump(lexer);
    }
    if peek_char(lexer) != Some('"') {
        return Err(DlError::UnexpectedCharacter {
            character: peek_char(lexer).unwrap_or('#'),
            source: start.source.to_string(),
            line: start.line,
            column: start.column,
            hint: Some("Expected a quoted path after #include".into()),
            code: Some(103),
        });
    }
    let path = tokenize_string(lexer)?;

    let included = lexer
        .resolver
        .resolve_include(&start.source, &path)?
        .ok_or_else(|| DlError::MissingInclude {
            path: path.clone(),
            source: start.source.to_string(),
            line: start.line,
            column: start.column,
            hint: Some("Check the include path".into()),
            code: Some(106),
        })?;

    if lexer.sources.iter().any(|src| *src.name == *included.name) {
        return Err(DlError::IncludeCycle {
            path,
            source: start.source.to_string(),
            line: start.line,
            column: start.column,
            hint: Some(format!("'{}' is already being read", included.name)),
            code: Some(107),
        });
    }

    debug!("including '{}' from '{}'", included.name, start.source);
    lexer.sources.push(Source::new(&included.name, &included.text));
    Ok(())
}

fn tokenize_unexpected_char(lexer: &mut Lexer, ch: char) -> Result<Token, DlError> {
    bump(lexer);
    Err(DlError::UnexpectedCharacter {
        character: ch,
        source: lexer.token_start.source.to_string(),
        line: lexer.token_start.line,
        column: lexer.token_start.column,
        hint: Some("Unexpected character in input".into()),
        code: Some(103),
    })
}
