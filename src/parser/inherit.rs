use super::*;
use super::value;

/// `':' ID Value`: copy the content of an earlier sibling of type `ID`
/// whose own value equals `Value` into the innermost open struct.
///
/// The open struct keeps its own value. When several siblings match, the
/// most recently declared one wins.
pub(super) fn parse_inherit_clause(parser: &mut Parser) -> Result<(), DlError> {
    parser.expect(Token::Colon)?;
    let at = parser.position();
    let type_name = parser.expect_ident("the type name of the struct to inherit from")?;
    let key = value::parse_value(parser)?;

    let found = parser
        .enclosing()
        .children(&type_name)
        .iter()
        .rev()
        .find(|sibling| sibling.own_value() == Some(&key))
        .cloned();

    match found {
        Some(base) => {
            trace!("'{}' inherits from {} {}", parser.current_type(), type_name, key);
            let node = parser.current();
            let own = node.take_own_value();
            base.copy_into(node);
            node.set_own_value(own);
        }
        None => parser.record(DlError::InheritanceTargetNotFound {
            type_name,
            value: key.to_string(),
            source: at.source.to_string(),
            line: at.line,
            column: at.column,
            hint: Some("The inherited struct must be declared earlier in the same enclosing struct".into()),
            code: Some(253),
        }),
    }
    Ok(())
}
