use std::collections::HashMap;

use super::*;
use super::value;

/// Archetype name to ordered parameter (field) names. Lives for one parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchetypeTable {
    table: HashMap<String, Vec<String>>,
}

impl ArchetypeTable {
    /// Registers an archetype, replacing any earlier declaration of the same name.
    pub fn declare(&mut self, name: String, params: Vec<String>) -> Option<Vec<String>> {
        self.table.insert(name, params)
    }

    pub fn params(&self, name: &str) -> Option<&[String]> {
        self.table.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// `'.' ID '(' IDList ')' ';'`
pub(super) fn parse_archetype_decl(parser: &mut Parser) -> Result<(), DlError> {
    parser.expect(Token::Dot)?;
    let name = parser.expect_ident("an archetype name")?;
    parser.expect(Token::LParen)?;

    let mut params = vec![parser.expect_ident("an archetype field name")?];
    while parser.at(&Token::Comma) {
        parser.bump()?;
        params.push(parser.expect_ident("an archetype field name")?);
    }

    parser.expect(Token::RParen)?;
    parser.expect(Token::Semicolon)?;

    debug!("declared archetype '{}' with fields {:?}", name, params);
    parser.archetypes.declare(name, params);
    Ok(())
}

/// `'(' ValueList ')'` applied to the innermost open struct.
///
/// Values bind right-aligned: the last value goes to the last parameter,
/// and leading parameters stay unset when fewer values are given.
pub(super) fn parse_archetype_clause(parser: &mut Parser) -> Result<(), DlError> {
    let at = parser.position();
    parser.expect(Token::LParen)?;
    let values = value::parse_value_list(parser)?;
    parser.expect(Token::RParen)?;

    let name = parser.current_type().to_string();
    let params = match parser.archetypes.params(&name) {
        Some(params) => params.to_vec(),
        None => {
            parser.record(DlError::UndeclaredArchetype {
                name,
                source: at.source.to_string(),
                line: at.line,
                column: at.column,
                hint: Some("Declare it first with .Name(field, ...);".into()),
                code: Some(251),
            });
            return Ok(());
        }
    };

    if values.len() > params.len() {
        parser.record(DlError::TooManyValues {
            name,
            expected: params.len(),
            found: values.len(),
            source: at.source.to_string(),
            line: at.line,
            column: at.column,
            hint: None,
            code: Some(252),
        });
        return Ok(());
    }

    let offset = params.len() - values.len();
    let node = parser.current();
    for (param, value) in params[offset..].iter().zip(values) {
        node.put_field(param.as_str(), value);
    }
    Ok(())
}
