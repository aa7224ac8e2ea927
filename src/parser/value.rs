use super::*;
use crate::Value;

/// `'[' ArrayValues ']' | STRING | Number`
pub(super) fn parse_value(parser: &mut Parser) -> Result<Value, DlError> {
    match parser.peek() {
        Token::LBracket => parse_array_value(parser),
        Token::String(_) => parse_string(parser).map(|s| Value::StringArray(vec![s])),
        Token::Minus | Token::Number(_) => parse_number(parser).map(|n| Value::NumberArray(vec![n])),
        _ => Err(parser.unexpected("a value")),
    }
}

/// `Value { ',' Value }`
pub(super) fn parse_value_list(parser: &mut Parser) -> Result<Vec<Value>, DlError> {
    let mut values = vec![parse_value(parser)?];
    while parser.at(&Token::Comma) {
        parser.bump()?;
        values.push(parse_value(parser)?);
    }
    Ok(values)
}

fn parse_string(parser: &mut Parser) -> Result<String, DlError> {
    match parser.peek() {
        Token::String(_) => match parser.bump()? {
            Token::String(s) => Ok(s),
            _ => unreachable!(),
        },
        _ => Err(parser.unexpected("a string")),
    }
}

/// `['-'] NUMBER`
fn parse_number(parser: &mut Parser) -> Result<f64, DlError> {
    let negate = parser.at(&Token::Minus);
    if negate {
        parser.bump()?;
    }
    match parser.peek() {
        Token::Number(n) => {
            let n = *n;
            parser.bump()?;
            Ok(if negate { -n } else { n })
        }
        _ => Err(parser.unexpected("a number")),
    }
}

/// Array literals are homogeneous: all strings or all numbers, at least one element.
fn parse_array_value(parser: &mut Parser) -> Result<Value, DlError> {
    parser.expect(Token::LBracket)?;

    let value = if let Token::String(_) = parser.peek() {
        let mut strings = vec![parse_string(parser)?];
        while parser.at(&Token::Comma) {
            parser.bump()?;
            strings.push(parse_string(parser)?);
        }
        Value::StringArray(strings)
    } else {
        let mut numbers = vec![parse_number(parser)?];
        while parser.at(&Token::Comma) {
            parser.bump()?;
            numbers.push(parse_number(parser)?);
        }
        Value::NumberArray(numbers)
    };

    parser.expect(Token::RBracket)?;
    Ok(value)
}
