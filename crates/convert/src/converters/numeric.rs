//! Numeric kinds <-> decimal, scientific and hexadecimal text
//!
//! One converter serves all six numeric kinds; it is bound under the
//! `number` abstract type and reached through supertype resolution.
//!
//! Accepted grammar:
//!
//! ```text
//! -?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?
//! -?0[xX][0-9a-fA-F]+
//! NaN | Infinity | -Infinity            (floating-point targets only)
//! ```
//!
//! Narrow integers (`i8`, `i16`, `i32`) go through `f64`: the value is
//! truncated toward zero, saturated to the `i32` range and then wrapped to
//! the target width, so `"300"` as `i8` is `44`. `i64` text without a
//! decimal point is parsed exactly, exponent included (`"5e3"` is `5000`,
//! `"15e-1"` is an error); with one it is truncated from `f64` and loses
//! precision beyond 2^53.

use crate::converter::StringConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ValueType;
use crate::value::Value;

/// Converter for every numeric kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberConverter;

// ============================================================================
// LEXING
// ============================================================================

/// Shape of a literal that matched the grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal<'a> {
    /// Decimal literal; `exponent` is the offset of the `e`/`E` marker
    Decimal { point: bool, exponent: Option<usize> },
    /// Hexadecimal literal, digits without sign or prefix
    Hex { negative: bool, digits: &'a str },
    NonFinite(f64),
}

fn unexpected(text: &str, offset: usize) -> ConvertError {
    let reason = match text.as_bytes().get(offset) {
        Some(_) => "unexpected character",
        None => "unexpected end of input",
    };
    ConvertError::conversion(text, reason).at(offset)
}

/// Advance past ASCII digits accepted by `is_digit`, returning the new
/// offset and how many were consumed.
fn digits(bytes: &[u8], start: usize, is_digit: fn(&u8) -> bool) -> (usize, usize) {
    let count = bytes[start..].iter().take_while(|b| is_digit(b)).count();
    (start + count, count)
}

fn lex(text: &str) -> ConvertResult<Literal<'_>> {
    match text {
        "NaN" => return Ok(Literal::NonFinite(f64::NAN)),
        "Infinity" => return Ok(Literal::NonFinite(f64::INFINITY)),
        "-Infinity" => return Ok(Literal::NonFinite(f64::NEG_INFINITY)),
        _ => {}
    }

    let bytes = text.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut pos = usize::from(negative);

    if bytes[pos..].starts_with(b"0x") || bytes[pos..].starts_with(b"0X") {
        let start = pos + 2;
        let (end, count) = digits(bytes, start, u8::is_ascii_hexdigit);
        if count == 0 || end != bytes.len() {
            return Err(unexpected(text, end));
        }
        return Ok(Literal::Hex {
            negative,
            digits: &text[start..],
        });
    }

    let (end, count) = digits(bytes, pos, u8::is_ascii_digit);
    if count == 0 {
        return Err(unexpected(text, end));
    }
    pos = end;
    let mut point = false;
    let mut exponent = None;

    if bytes.get(pos) == Some(&b'.') {
        let (end, count) = digits(bytes, pos + 1, u8::is_ascii_digit);
        if count == 0 {
            return Err(unexpected(text, end));
        }
        pos = end;
        point = true;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        exponent = Some(pos);
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let (end, count) = digits(bytes, pos, u8::is_ascii_digit);
        if count == 0 {
            return Err(unexpected(text, end));
        }
        pos = end;
    }

    if pos != bytes.len() {
        return Err(unexpected(text, pos));
    }
    Ok(Literal::Decimal { point, exponent })
}

// ============================================================================
// DECODING
// ============================================================================

fn hex_magnitude(text: &str, digits: &str) -> ConvertResult<i128> {
    i128::from_str_radix(digits, 16)
        .map_err(|_| ConvertError::conversion(text, "hexadecimal literal out of range").at(0))
}

fn to_f64(text: &str, literal: Literal<'_>) -> ConvertResult<f64> {
    match literal {
        Literal::Decimal { .. } => text
            .parse::<f64>()
            .map_err(|e| ConvertError::conversion(text, e.to_string())),
        Literal::Hex { negative, digits } => {
            let magnitude = hex_magnitude(text, digits)? as f64;
            Ok(if negative { -magnitude } else { magnitude })
        }
        Literal::NonFinite(d) => Ok(d),
    }
}

/// `f64` for integral targets, which have no non-finite values.
fn finite_f64(text: &str, literal: Literal<'_>) -> ConvertResult<f64> {
    if let Literal::NonFinite(_) = literal {
        return Err(ConvertError::conversion(
            text,
            "non-finite value for an integral type",
        ));
    }
    to_f64(text, literal)
}

fn out_of_range(text: &str) -> ConvertError {
    ConvertError::conversion(text, "out of range for i64").at(0)
}

/// `mantissa * 10^exponent` in integer arithmetic, for point-free literals.
fn scaled_i64(text: &str, marker: usize) -> ConvertResult<i64> {
    let mut value = text[..marker]
        .parse::<i128>()
        .map_err(|_| out_of_range(text))?;
    let exponent_text = &text[marker + 1..];
    // An exponent too long for `i32` behaves like the largest one.
    let exponent = exponent_text.parse::<i32>().unwrap_or(
        if exponent_text.starts_with('-') { i32::MIN } else { i32::MAX },
    );
    if value == 0 {
        return Ok(0);
    }

    if exponent >= 0 {
        for _ in 0..exponent {
            value = value
                .checked_mul(10)
                .filter(|v| v.unsigned_abs() <= u128::from(i64::MIN.unsigned_abs()))
                .ok_or_else(|| out_of_range(text))?;
        }
    } else {
        for _ in 0..exponent.unsigned_abs() {
            if value % 10 != 0 {
                return Err(ConvertError::conversion(text, "not an integral value").at(0));
            }
            value /= 10;
        }
    }
    i64::try_from(value).map_err(|_| out_of_range(text))
}

fn to_i64(text: &str, literal: Literal<'_>) -> ConvertResult<i64> {
    match literal {
        Literal::Decimal {
            point: false,
            exponent: None,
        } => text.parse::<i64>().map_err(|_| out_of_range(text)),
        Literal::Decimal {
            point: false,
            exponent: Some(marker),
        } => scaled_i64(text, marker),
        Literal::Hex { negative, digits } => {
            let magnitude = hex_magnitude(text, digits)?;
            let signed = if negative { -magnitude } else { magnitude };
            i64::try_from(signed).map_err(|_| out_of_range(text))
        }
        // Decimal point present: lossy beyond 2^53, the cast saturates instead of failing.
        _ => Ok(finite_f64(text, literal)? as i64),
    }
}

fn decode(text: &str, target: &ValueType) -> ConvertResult<Value> {
    if text.is_empty() {
        return zero(target);
    }
    let literal = lex(text)?;
    let value = match target {
        ValueType::I8 => Value::I8(finite_f64(text, literal)? as i32 as i8),
        ValueType::I16 => Value::I16(finite_f64(text, literal)? as i32 as i16),
        ValueType::I32 => Value::I32(finite_f64(text, literal)? as i32),
        ValueType::I64 => Value::I64(to_i64(text, literal)?),
        ValueType::F64 => Value::F64(to_f64(text, literal)?),
        ValueType::F32 => match literal {
            Literal::Decimal { .. } => Value::F32(
                text.parse::<f32>()
                    .map_err(|e| ConvertError::conversion(text, e.to_string()))?,
            ),
            _ => Value::F32(to_f64(text, literal)? as f32),
        },
        other => return Err(ConvertError::unsupported("numeric", other.name())),
    };
    Ok(value)
}

fn zero(target: &ValueType) -> ConvertResult<Value> {
    Ok(match target {
        ValueType::I8 => Value::I8(0),
        ValueType::I16 => Value::I16(0),
        ValueType::I32 => Value::I32(0),
        ValueType::I64 => Value::I64(0),
        ValueType::F32 => Value::F32(0.0),
        ValueType::F64 => Value::F64(0.0),
        other => return Err(ConvertError::unsupported("numeric", other.name())),
    })
}

// ============================================================================
// ENCODING
// ============================================================================

fn encode_f64(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        let token = if d.is_sign_negative() { "-Infinity" } else { "Infinity" };
        token.to_string()
    } else {
        // `Debug` is the shortest text that parses back to the same value.
        format!("{d:?}")
    }
}

fn encode_f32(f: f32) -> String {
    if f.is_finite() {
        format!("{f:?}")
    } else {
        encode_f64(f64::from(f))
    }
}

impl StringConverter for NumberConverter {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn to_string(&self, value: &Value) -> ConvertResult<String> {
        Ok(match value {
            Value::I8(n) => n.to_string(),
            Value::I16(n) => n.to_string(),
            Value::I32(n) => n.to_string(),
            Value::I64(n) => n.to_string(),
            Value::F32(f) => encode_f32(*f),
            Value::F64(d) => encode_f64(*d),
            other => {
                return Err(ConvertError::unsupported(
                    self.name(),
                    other.value_type().name(),
                ));
            }
        })
    }

    fn from_string(&self, text: &str, target: &ValueType) -> ConvertResult<Option<Value>> {
        if !target.is_numeric() {
            return Err(ConvertError::unsupported(self.name(), target.name()));
        }
        if text == "null" {
            return Ok(None);
        }
        decode(text, target)
            .map(Some)
            .map_err(|e| e.with_context(text, target.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn decode(text: &str, target: ValueType) -> Value {
        NumberConverter
            .from_string(text, &target)
            .unwrap()
            .expect("value")
    }

    fn decode_err(text: &str, target: ValueType) -> ConvertError {
        NumberConverter.from_string(text, &target).unwrap_err()
    }

    #[rstest]
    #[case("42", ValueType::I32, Value::I32(42))]
    #[case("-17", ValueType::I8, Value::I8(-17))]
    #[case("0x1F", ValueType::I32, Value::I32(31))]
    #[case("-0X10", ValueType::I64, Value::I64(-16))]
    #[case("1.9", ValueType::I32, Value::I32(1))]
    #[case("-1.9", ValueType::I32, Value::I32(-1))]
    #[case("1e3", ValueType::I16, Value::I16(1000))]
    #[case("2.5E-1", ValueType::F64, Value::F64(0.25))]
    #[case("300", ValueType::I8, Value::I8(44))]
    #[case("70000", ValueType::I16, Value::I16(4464))]
    #[case("3e10", ValueType::I32, Value::I32(i32::MAX))]
    #[case("0.1", ValueType::F32, Value::F32(0.1))]
    #[case("0xff", ValueType::F64, Value::F64(255.0))]
    fn test_decode(#[case] text: &str, #[case] target: ValueType, #[case] expected: Value) {
        assert_eq!(decode(text, target), expected);
    }

    #[test]
    fn test_empty_is_zero_and_null_is_absent() {
        assert_eq!(decode("", ValueType::I64), Value::I64(0));
        assert_eq!(decode("", ValueType::F32), Value::F32(0.0));
        assert_eq!(
            NumberConverter.from_string("null", &ValueType::I32).unwrap(),
            None
        );
    }

    #[test]
    fn test_long_is_exact_without_fraction() {
        assert_eq!(
            decode("9223372036854775806", ValueType::I64),
            Value::I64(9_223_372_036_854_775_806)
        );
        assert_eq!(decode("-9223372036854775808", ValueType::I64), Value::I64(i64::MIN));
        assert_eq!(
            decode("0x7FFFFFFFFFFFFFFF", ValueType::I64),
            Value::I64(i64::MAX)
        );
    }

    #[test]
    fn test_long_with_fraction_goes_through_double() {
        // Not exact, but never an error.
        let Value::I64(n) = decode("9223372036854775806.0", ValueType::I64) else {
            panic!("expected i64");
        };
        assert!(n > 9_223_372_036_854_775_000);
    }

    #[rstest]
    #[case("9007199254740993e0", 9_007_199_254_740_993)]
    #[case("5e3", 5000)]
    #[case("-12E+2", -1200)]
    #[case("1500e-2", 15)]
    #[case("0e99999999999", 0)]
    #[case("922337203685477580e1", 9_223_372_036_854_775_800)]
    #[case("-9223372036854775808e0", i64::MIN)]
    fn test_long_exponent_without_point_is_exact(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(decode(text, ValueType::I64), Value::I64(expected));
    }

    #[rstest]
    #[case("15e-1")]
    #[case("1e19")]
    #[case("1e99999999999")]
    #[case("7e-99999999999")]
    #[case("-9223372036854775809e0")]
    fn test_long_exponent_without_point_rejects_inexact(#[case] text: &str) {
        assert!(decode_err(text, ValueType::I64).is_conversion());
    }

    #[test]
    fn test_long_overflow_is_an_error() {
        assert!(decode_err("9223372036854775808", ValueType::I64).is_conversion());
        assert!(decode_err("0x10000000000000000", ValueType::I64).is_conversion());
    }

    #[rstest]
    #[case("12x", 2)]
    #[case("1.", 2)]
    #[case("1e", 2)]
    #[case("1e+", 3)]
    #[case("-", 1)]
    #[case("0x", 2)]
    #[case("0xfg", 3)]
    #[case("+1", 0)]
    #[case(".5", 0)]
    #[case("1 ", 1)]
    fn test_error_offsets(#[case] text: &str, #[case] offset: usize) {
        let err = decode_err(text, ValueType::F64);
        assert!(err.is_conversion());
        assert_eq!(err.position(), Some(offset));
    }

    #[test]
    fn test_error_carries_text_and_target() {
        let err = decode_err("12x", ValueType::I16);
        assert_eq!(
            err.to_string(),
            "cannot convert '12x' to i16: unexpected character (at offset 2)"
        );
    }

    #[test]
    fn test_non_finite_only_for_floats() {
        let Value::F64(nan) = decode("NaN", ValueType::F64) else {
            panic!("expected f64");
        };
        assert!(nan.is_nan());
        assert_eq!(decode("-Infinity", ValueType::F32), Value::F32(f32::NEG_INFINITY));
        assert!(decode_err("Infinity", ValueType::I32).is_conversion());
        assert!(decode_err("NaN", ValueType::I64).is_conversion());
    }

    #[rstest]
    #[case(Value::I8(-128), "-128")]
    #[case(Value::I64(i64::MAX), "9223372036854775807")]
    #[case(Value::F64(1.0), "1.0")]
    #[case(Value::F64(1e300), "1e300")]
    #[case(Value::F64(1.5e-7), "1.5e-7")]
    #[case(Value::F32(0.1), "0.1")]
    #[case(Value::F64(f64::INFINITY), "Infinity")]
    #[case(Value::F32(f32::NEG_INFINITY), "-Infinity")]
    #[case(Value::F64(f64::NAN), "NaN")]
    fn test_encode(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(NumberConverter.to_string(&value).unwrap(), expected);
    }

    #[test]
    fn test_rejects_non_numeric_types() {
        assert!(decode_err("1", ValueType::Bool).is_unsupported());
        assert!(NumberConverter
            .to_string(&Value::Bool(true))
            .unwrap_err()
            .is_unsupported());
    }
}
