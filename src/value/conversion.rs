// Author: Dustin Pilgrim
// License: MIT

use super::{format_number, parse_number, Value};
use crate::DlError;

fn first_element(value: Value) -> Result<Value, DlError> {
    match value.elements().into_iter().next() {
        Some(Value::Reference(name)) => Err(DlError::type_error(
            format!("Unresolved reference '{}'", name),
            "The referenced field does not exist in this struct",
            401,
        )),
        Some(first) => Ok(first),
        None => Err(DlError::type_error(
            "Expected a value, got an empty array".into(),
            "Give the field at least one element",
            400,
        )),
    }
}

impl TryFrom<Value> for String {
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match first_element(value)? {
            Value::StringArray(mut v) => Ok(v.remove(0)),
            Value::NumberArray(v) => Ok(format_number(v[0])),
            Value::Reference(name) => Ok(name),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match first_element(value)? {
            Value::NumberArray(v) => Ok(v[0]),
            Value::StringArray(v) => parse_number(&v[0]),
            Value::Reference(name) => Err(DlError::type_error(
                format!("Unresolved reference '{}'", name),
                "The referenced field does not exist in this struct",
                401,
            )),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        f64::try_from(value).map(|n| n as f32)
    }
}

/// Nonzero numbers are true; NaN is false. Strings may also spell `true`/`false`.
impl TryFrom<Value> for bool {
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Value::StringArray(v) = &value {
            match v.first().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
                Some("true") => return Ok(true),
                Some("false") => return Ok(false),
                _ => {}
            }
        }
        let n = f64::try_from(value).map_err(|_| {
            DlError::type_error(
                "Expected a number or true/false".into(),
                "Booleans are written as 1/0 in DataLang",
                403,
            )
        })?;
        Ok(!n.is_nan() && n != 0.0)
    }
}

/// Strings yield their first character; numbers are read as code points.
impl TryFrom<Value> for char {
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match first_element(value)? {
            Value::StringArray(v) => Ok(v[0].chars().next().unwrap_or('\0')),
            Value::NumberArray(v) => char::from_u32(v[0] as u32).ok_or_else(|| {
                DlError::type_error(
                    format!("Number {} is not a valid character", format_number(v[0])),
                    "Use a Unicode scalar value",
                    404,
                )
            }),
            Value::Reference(name) => Err(DlError::type_error(
                format!("Unresolved reference '{}'", name),
                "The referenced field does not exist in this struct",
                401,
            )),
        }
    }
}

macro_rules! integer_conversion {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = DlError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let n = f64::try_from(value)?.trunc();
                    // `MAX as f64` rounds up to 2^64 / 2^63 for 64-bit types, so the bound is exclusive
                    if n >= <$ty>::MIN as f64 && n < <$ty>::MAX as f64 + 1.0 {
                        Ok(n as $ty)
                    } else {
                        Err(DlError::type_error(
                            format!("Number {} out of range for {}", format_number(n), stringify!($ty)),
                            concat!("Use a number that fits in ", stringify!($ty)),
                            405,
                        ))
                    }
                }
            }
        )*
    };
}

integer_conversion!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = DlError>,
{
    type Error = DlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.elements().into_iter().map(T::try_from).collect()
    }
}
