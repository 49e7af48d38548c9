use std::fmt::{self, Display};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Storage representation of a column, the type tag shared by values and property kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Varchar,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
}

impl Storage {
    /// Typed SQL NULL for this storage.
    pub fn null_value(&self) -> Value {
        match self {
            Storage::Boolean => Value::Boolean(None),
            Storage::Int8 => Value::Int8(None),
            Storage::Int16 => Value::Int16(None),
            Storage::Int32 => Value::Int32(None),
            Storage::Int64 => Value::Int64(None),
            Storage::UInt8 => Value::UInt8(None),
            Storage::UInt16 => Value::UInt16(None),
            Storage::UInt32 => Value::UInt32(None),
            Storage::UInt64 => Value::UInt64(None),
            Storage::Float32 => Value::Float32(None),
            Storage::Float64 => Value::Float64(None),
            Storage::Varchar => Value::Varchar(None),
            Storage::Blob => Value::Blob(None),
            Storage::Date => Value::Date(None),
            Storage::Time => Value::Time(None),
            Storage::Timestamp => Value::Timestamp(None),
            Storage::TimestampWithTimezone => Value::TimestampWithTimezone(None),
        }
    }

    /// Zero or empty value written into a non nullable slot when the database returns NULL.
    pub fn sentinel(&self) -> Value {
        match self {
            Storage::Boolean => Value::Boolean(Some(false)),
            Storage::Int8 => Value::Int8(Some(0)),
            Storage::Int16 => Value::Int16(Some(0)),
            Storage::Int32 => Value::Int32(Some(0)),
            Storage::Int64 => Value::Int64(Some(0)),
            Storage::UInt8 => Value::UInt8(Some(0)),
            Storage::UInt16 => Value::UInt16(Some(0)),
            Storage::UInt32 => Value::UInt32(Some(0)),
            Storage::UInt64 => Value::UInt64(Some(0)),
            Storage::Float32 => Value::Float32(Some(0.0)),
            Storage::Float64 => Value::Float64(Some(0.0)),
            Storage::Varchar => Value::Varchar(Some(String::new())),
            Storage::Blob => Value::Blob(Some(Box::default())),
            Storage::Date => Value::Date(Some(EPOCH_DATE)),
            Storage::Time => Value::Time(Some(Time::MIDNIGHT)),
            Storage::Timestamp => Value::Timestamp(Some(EPOCH_TIMESTAMP)),
            Storage::TimestampWithTimezone => {
                Value::TimestampWithTimezone(Some(EPOCH_TIMESTAMP.assume_utc()))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Storage::Boolean => "boolean",
            Storage::Int8 => "int8",
            Storage::Int16 => "int16",
            Storage::Int32 => "int32",
            Storage::Int64 => "int64",
            Storage::UInt8 => "uint8",
            Storage::UInt16 => "uint16",
            Storage::UInt32 => "uint32",
            Storage::UInt64 => "uint64",
            Storage::Float32 => "float32",
            Storage::Float64 => "float64",
            Storage::Varchar => "varchar",
            Storage::Blob => "blob",
            Storage::Date => "date",
            Storage::Time => "time",
            Storage::Timestamp => "timestamp",
            Storage::TimestampWithTimezone => "timestamptz",
        }
    }
}

impl Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First day of the proleptic calendar, the empty date.
pub const EPOCH_DATE: Date = time::macros::date!(0001-01-01);
pub const EPOCH_TIMESTAMP: PrimitiveDateTime = PrimitiveDateTime::new(EPOCH_DATE, Time::MIDNIGHT);

/// Dynamically typed cell moved between entities, cursors and the SQL writer.
///
/// Every variant carries an `Option`, `None` being the typed SQL NULL. `Null` is the
/// untyped NULL and `Unknown` holds raw text returned by drivers that do not decode
/// columns themselves, it gets parsed when converted into a concrete type.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Unknown(Option<String>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None)
            | Value::Int8(None)
            | Value::Int16(None)
            | Value::Int32(None)
            | Value::Int64(None)
            | Value::UInt8(None)
            | Value::UInt16(None)
            | Value::UInt32(None)
            | Value::UInt64(None)
            | Value::Float32(None)
            | Value::Float64(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Date(None)
            | Value::Time(None)
            | Value::Timestamp(None)
            | Value::TimestampWithTimezone(None)
            | Value::Unknown(None) => true,
            _ => false,
        }
    }

    /// Storage of this value, `None` for the untyped variants.
    pub fn storage(&self) -> Option<Storage> {
        Some(match self {
            Value::Boolean(..) => Storage::Boolean,
            Value::Int8(..) => Storage::Int8,
            Value::Int16(..) => Storage::Int16,
            Value::Int32(..) => Storage::Int32,
            Value::Int64(..) => Storage::Int64,
            Value::UInt8(..) => Storage::UInt8,
            Value::UInt16(..) => Storage::UInt16,
            Value::UInt32(..) => Storage::UInt32,
            Value::UInt64(..) => Storage::UInt64,
            Value::Float32(..) => Storage::Float32,
            Value::Float64(..) => Storage::Float64,
            Value::Varchar(..) => Storage::Varchar,
            Value::Blob(..) => Storage::Blob,
            Value::Date(..) => Storage::Date,
            Value::Time(..) => Storage::Time,
            Value::Timestamp(..) => Storage::Timestamp,
            Value::TimestampWithTimezone(..) => Storage::TimestampWithTimezone,
            Value::Null | Value::Unknown(..) => return None,
        })
    }

    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}
