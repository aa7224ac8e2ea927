use super::*;
use super::{archetype, inherit, value};

/// Top level: archetype declarations and struct/field statements until end of input.
pub(super) fn parse_program(parser: &mut Parser) -> Result<(), DlError> {
    loop {
        match parser.peek() {
            Token::Eof => return Ok(()),
            Token::Dot => parser.statement(archetype::parse_archetype_decl)?,
            Token::Ident(_) => parser.statement(parse_struct_decl)?,
            _ => {
                let err = parser.unexpected("a struct, a field or an archetype declaration");
                parser.record(err);
                parser.bump()?;
                parser.recover()?;
            }
        }
    }
}

/// `ID StructTail`: a field (`ID Value ;`) or a child struct of type `ID`.
pub(super) fn parse_struct_decl(parser: &mut Parser) -> Result<(), DlError> {
    let name = parser.expect_ident("a struct or field name")?;

    match parser.peek() {
        Token::LBrace => {
            parser.open(name)?;
            parser.bump()?;
            parse_struct_body(parser)
        }
        Token::Colon => {
            parser.open(name)?;
            inherit::parse_inherit_clause(parser)?;
            parse_statement_end(parser)
        }
        Token::LParen => {
            parser.open(name)?;
            archetype::parse_archetype_clause(parser)?;
            parse_statement_end(parser)
        }
        _ => {
            let value = value::parse_value(parser)?;
            if parser.at(&Token::Semicolon) {
                parser.bump()?;
                parser.current().put_field(name, value);
                Ok(())
            } else {
                parser.open(name)?;
                parser.current().set_own_value(Some(value));
                parse_statement_end(parser)
            }
        }
    }
}

/// Remainder of a struct statement once its scope is open.
fn parse_statement_end(parser: &mut Parser) -> Result<(), DlError> {
    loop {
        match parser.peek() {
            Token::Semicolon => {
                parser.bump()?;
                parser.close();
                return Ok(());
            }
            Token::LBrace => {
                parser.bump()?;
                return parse_struct_body(parser);
            }
            Token::Colon => inherit::parse_inherit_clause(parser)?,
            Token::LParen => archetype::parse_archetype_clause(parser)?,
            _ => return Err(parser.unexpected("';', '{', ':' or '('")),
        }
    }
}

/// Statements inside `{ ... }`; the opening brace is already consumed.
/// Closes the current scope on `}` and swallows an optional `;` after it.
fn parse_struct_body(parser: &mut Parser) -> Result<(), DlError> {
    loop {
        match parser.peek() {
            Token::Ident(_) => parser.statement(parse_struct_decl)?,
            Token::RBrace => {
                parser.bump()?;
                parser.close();
                if parser.at(&Token::Semicolon) {
                    parser.bump()?;
                }
                return Ok(());
            }
            Token::Eof => return Err(parser.unexpected("'}'")),
            _ => {
                let err = parser.unexpected("a struct, a field or '}'");
                parser.record(err);
                parser.bump()?;
                parser.recover()?;
            }
        }
    }
}
