use crate::{DeclaredType, Error, Result, Value, consume_while, truncate_long};
use anyhow::Context;
use atoi::{FromRadix10Checked, FromRadix10SignedChecked};
use fast_float::parse_partial;
use std::any;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description, parsing::Parsed,
};

/// Conversion between native field types and the dynamic [`Value`].
///
/// Every type a mapped field can hold implements it: it knows its own declared
/// shape (used by the classifier for conversion bridges), how to wrap itself
/// into a `Value`, how to come back from one and how to read itself from the
/// SQL text form produced by the literal encoder.
///
/// # Parsing contract
/// - `parse` delegates to `extract` then verifies the input is exhausted.
/// - `extract` advances the input slice only on success.
/// - `String` unquotes only a whole, well formed quoted literal; any other text
///   is taken as is.
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// assert_eq!(i64::try_from_value(v).unwrap(), 42);
/// assert_eq!(String::parse("'it''s'").unwrap(), "it's");
/// ```
pub trait AsValue {
    /// Shape of this type as the classifier sees it.
    fn declared_type() -> DeclaredType
    where
        Self: Sized;
    /// Typed NULL of the corresponding variant.
    fn as_empty_value() -> Value
    where
        Self: Sized;
    fn as_value(self) -> Value;
    /// Convert back from a dynamic value.
    ///
    /// Accepts the canonical variant, narrower or wider variants when the content
    /// fits, and `Value::Unknown` by parsing its text.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the whole input.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = input.as_ref();
        let result = Self::extract(&mut value)?;
        if !value.is_empty() {
            return Err(Error::msg(format!(
                "Value `{}` parsed as {} but did not consume all the input (remaining: `{}`)",
                truncate_long!(input.as_ref()),
                any::type_name::<Self>(),
                truncate_long!(value),
            )));
        }
        Ok(result)
    }
    /// Parse a prefix of the input, advancing it past the consumed text.
    fn extract(value: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(value),
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>(),
    ))
}

/// Strips the opening quote, returns it so the caller can expect the closing one.
fn open_quote<'s>(value: &mut &'s str) -> &'s str {
    if value.starts_with(['"', '\'']) {
        let quote = &value[..1];
        *value = &value[1..];
        quote
    } else {
        ""
    }
}

fn close_quote(value: &mut &str, quote: &str) -> bool {
    if !value.starts_with(quote) {
        return false;
    }
    *value = &value[quote.len()..];
    true
}

macro_rules! impl_as_integer {
    ($source:ty, $variant:path, $declared:expr, $radix:ident) => {
        impl AsValue for $source {
            fn declared_type() -> DeclaredType {
                $declared
            }
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                macro_rules! narrow {
                    ($v:expr) => {
                        <$source>::try_from($v).map_err(|_| {
                            Error::msg(format!(
                                "Value {} is out of range for {}",
                                $v,
                                any::type_name::<Self>(),
                            ))
                        })
                    };
                }
                match value {
                    $variant(Some(v)) => Ok(v),
                    Value::Int8(Some(v)) => narrow!(v),
                    Value::Int16(Some(v)) => narrow!(v),
                    Value::Int32(Some(v)) => narrow!(v),
                    Value::Int64(Some(v)) => narrow!(v),
                    Value::UInt8(Some(v)) => narrow!(v),
                    Value::UInt16(Some(v)) => narrow!(v),
                    Value::UInt32(Some(v)) => narrow!(v),
                    Value::UInt64(Some(v)) => narrow!(v),
                    Value::Unknown(Some(ref v)) => Self::parse(v),
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let mut value = *input;
                let quote = open_quote(&mut value);
                let (num, len) = <$source>::$radix(value.as_bytes());
                if len == 0 || (len == 1 && value.starts_with(['-', '+'])) {
                    return Err(Error::msg(format!(
                        "Cannot extract {} from `{}`",
                        any::type_name::<Self>(),
                        truncate_long!(input),
                    )));
                }
                let Some(num) = num else {
                    return Err(Error::msg(format!(
                        "Value `{}` is out of range for {}",
                        &value[..len],
                        any::type_name::<Self>(),
                    )));
                };
                value = &value[len..];
                if !close_quote(&mut value, quote) {
                    return Err(Error::msg(format!(
                        "Unterminated quoted integer `{}`",
                        truncate_long!(input)
                    )));
                }
                *input = value;
                Ok(num)
            }
        }
    };
}
impl_as_integer!(i8, Value::Int8, DeclaredType::Int8, from_radix_10_signed_checked);
impl_as_integer!(i16, Value::Int16, DeclaredType::Int16, from_radix_10_signed_checked);
impl_as_integer!(i32, Value::Int32, DeclaredType::Int32, from_radix_10_signed_checked);
impl_as_integer!(i64, Value::Int64, DeclaredType::Int64, from_radix_10_signed_checked);
impl_as_integer!(u8, Value::UInt8, DeclaredType::UInt8, from_radix_10_checked);
impl_as_integer!(u16, Value::UInt16, DeclaredType::UInt16, from_radix_10_checked);
impl_as_integer!(u32, Value::UInt32, DeclaredType::UInt32, from_radix_10_checked);
impl_as_integer!(u64, Value::UInt64, DeclaredType::UInt64, from_radix_10_checked);

macro_rules! impl_as_value {
    ($source:ty, $variant:path, $declared:expr, $extract:expr $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn declared_type() -> DeclaredType {
                $declared
            }
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
                    #[allow(unreachable_patterns)]
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
            fn extract(value: &mut &str) -> Result<Self> {
                $extract(value)
            }
        }
    };
}

impl_as_value!(
    bool,
    Value::Boolean,
    DeclaredType::Bool,
    |input: &mut &str| {
        let mut value = *input;
        let quote = open_quote(&mut value);
        let word = consume_while(&mut value, |v| v.is_alphanumeric());
        let result = match word {
            x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => true,
            x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => false,
            _ => return Err(Error::msg(format!("Cannot parse boolean from `{}`", truncate_long!(input)))),
        };
        if !close_quote(&mut value, quote) {
            return Err(Error::msg(format!("Unterminated quoted boolean `{}`", truncate_long!(input))));
        }
        *input = value;
        Ok(result)
    },
    Value::Int8(Some(v)) => Ok(v != 0),
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt8(Some(v)) => Ok(v != 0),
    Value::UInt16(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);

fn extract_float<T: fast_float::FastFloat>(input: &mut &str) -> Result<T> {
    let mut value = *input;
    // Matches the quoted non finite literals written by the encoder.
    let quote = open_quote(&mut value);
    let context = || {
        format!(
            "Cannot extract a floating point value from `{}`",
            truncate_long!(input)
        )
    };
    let (num, len) = parse_partial::<T, _>(value).with_context(context)?;
    value = &value[len..];
    if !close_quote(&mut value, quote) {
        return Err(Error::msg(context()));
    }
    *input = value;
    Ok(num)
}

impl_as_value!(
    f32,
    Value::Float32,
    DeclaredType::Float32,
    extract_float::<f32>,
    Value::Float64(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
);
impl_as_value!(
    f64,
    Value::Float64,
    DeclaredType::Float64,
    extract_float::<f64>,
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::UInt64(Some(v)) => Ok(v as _),
);

fn unquote_string(input: &str) -> Option<String> {
    let mut value = input;
    let quote = open_quote(&mut value);
    if quote.is_empty() {
        return None;
    }
    let mut result = String::with_capacity(value.len());
    loop {
        let pos = value.find(quote)?;
        result.push_str(&value[..pos]);
        value = &value[pos + 1..];
        if value.starts_with(quote) {
            result.push_str(quote);
            value = &value[1..];
            continue;
        }
        return value.is_empty().then_some(result);
    }
}

impl_as_value!(
    String,
    Value::Varchar,
    DeclaredType::String,
    |input: &mut &str| {
        // Raw driver text unless the whole input is a single quoted literal.
        let raw = *input;
        *input = "";
        Ok(unquote_string(raw).unwrap_or_else(|| raw.to_owned()))
    },
    Value::Int8(Some(v)) => Ok(v.to_string()),
    Value::Int16(Some(v)) => Ok(v.to_string()),
    Value::Int32(Some(v)) => Ok(v.to_string()),
    Value::Int64(Some(v)) => Ok(v.to_string()),
    Value::UInt8(Some(v)) => Ok(v.to_string()),
    Value::UInt16(Some(v)) => Ok(v.to_string()),
    Value::UInt32(Some(v)) => Ok(v.to_string()),
    Value::UInt64(Some(v)) => Ok(v.to_string()),
    Value::Float32(Some(v)) => Ok(v.to_string()),
    Value::Float64(Some(v)) => Ok(v.to_string()),
);

fn extract_blob(input: &mut &str) -> Result<Box<[u8]>> {
    let mut value = *input;
    let quote = open_quote(&mut value);
    if value.len() >= 2 && value[..2].eq_ignore_ascii_case("\\x") {
        value = &value[2..];
    }
    let hex = consume_while(&mut value, char::is_ascii_hexdigit);
    let result = hex::decode(hex).with_context(|| {
        format!(
            "While decoding `{}` as {}",
            truncate_long!(input),
            any::type_name::<Box<[u8]>>()
        )
    })?;
    if !close_quote(&mut value, quote) {
        return Err(Error::msg(format!(
            "Unterminated blob literal `{}`",
            truncate_long!(input)
        )));
    }
    *input = value;
    Ok(result.into())
}

impl_as_value!(Box<[u8]>, Value::Blob, DeclaredType::Bytes, extract_blob);
impl_as_value!(
    Vec<u8>,
    Value::Blob,
    DeclaredType::Bytes,
    |v: &mut &str| extract_blob(v).map(Into::into),
);

/// Tries each format on the input, the first one that parses a prefix wins.
fn extract_time<T>(input: &mut &str, formats: &[&[BorrowedFormatItem<'_>]]) -> Result<T>
where
    T: TryFrom<Parsed>,
    <T as TryFrom<Parsed>>::Error: std::error::Error + Send + Sync + 'static,
{
    let mut value = *input;
    let quote = open_quote(&mut value);
    for format in formats {
        let mut parsed = Parsed::new();
        let Ok(remaining) = parsed.parse_items(value.as_bytes(), format) else {
            continue;
        };
        let mut rest = &value[value.len() - remaining.len()..];
        let Ok(result) = T::try_from(parsed) else {
            continue;
        };
        if !close_quote(&mut rest, quote) {
            continue;
        }
        *input = rest;
        return Ok(result);
    }
    Err(Error::msg(format!(
        "Cannot extract {} from `{}`",
        any::type_name::<T>(),
        truncate_long!(input),
    )))
}

impl_as_value!(
    Date,
    Value::Date,
    DeclaredType::Date,
    |v: &mut &str| extract_time::<Date>(v, &[format_description!("[year]-[month]-[day]")]),
    Value::Timestamp(Some(v)) => Ok(v.date()),
    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
);

impl_as_value!(
    Time,
    Value::Time,
    DeclaredType::Time,
    |v: &mut &str| {
        extract_time::<Time>(
            v,
            &[
                format_description!("[hour]:[minute]:[second].[subsecond]"),
                format_description!("[hour]:[minute]:[second]"),
                format_description!("[hour]:[minute]"),
            ],
        )
    },
    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
);

impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    DeclaredType::DateTime,
    |v: &mut &str| {
        extract_time::<PrimitiveDateTime>(
            v,
            &[
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            ],
        )
    },
    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
);

impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    DeclaredType::OffsetDateTime,
    |input: &mut &str| {
        let with_offset = extract_time::<OffsetDateTime>(
            input,
            &[
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"),
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"),
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"),
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"),
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]"),
            ],
        );
        if with_offset.is_ok() {
            return with_offset;
        }
        // UTC designator, or no zone at all.
        let mut value = *input;
        let quote = open_quote(&mut value);
        let mut unquoted = value;
        let timestamp = PrimitiveDateTime::extract(&mut unquoted)?;
        if unquoted.starts_with(['Z', 'z']) {
            unquoted = &unquoted[1..];
        }
        if !close_quote(&mut unquoted, quote) {
            return Err(Error::msg(format!(
                "Unterminated timestamp literal `{}`",
                truncate_long!(input)
            )));
        }
        *input = unquoted;
        Ok(timestamp.assume_utc())
    },
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
);

impl<T: AsValue> AsValue for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::nullable(T::declared_type())
    }
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(T::try_from_value(value)?)
        })
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let word = consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_');
        if word.eq_ignore_ascii_case("null") {
            *input = value;
            return Ok(None);
        }
        T::extract(input).map(Some)
    }
}
