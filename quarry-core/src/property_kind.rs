use crate::{Column, Cursor, DeclaredType, Result, Storage, Value};
use std::fmt::{self, Display};

/// Closed classification of a mapped field.
///
/// The storage decides which typed getter reads the column and which literal
/// the writer emits; `nullable` decides the default and the null test;
/// `convertible` marks fields that go through a [`Conversion`](crate::Conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKind {
    pub storage: Storage,
    pub nullable: bool,
    pub convertible: bool,
}

impl PropertyKind {
    pub const LONG_CONVERTIBLE: PropertyKind = PropertyKind::convertible(Storage::Int64);
    pub const ULONG_CONVERTIBLE: PropertyKind = PropertyKind::convertible(Storage::UInt64);
    pub const DOUBLE_CONVERTIBLE: PropertyKind = PropertyKind::convertible(Storage::Float64);
    pub const STRING_CONVERTIBLE: PropertyKind = PropertyKind::convertible(Storage::Varchar);
    pub const BLOB_CONVERTIBLE: PropertyKind = PropertyKind::convertible(Storage::Blob);

    pub const fn plain(storage: Storage) -> Self {
        Self {
            storage,
            nullable: false,
            convertible: false,
        }
    }

    pub const fn convertible(storage: Storage) -> Self {
        Self {
            storage,
            nullable: false,
            convertible: true,
        }
    }

    pub const fn into_nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Value assigned when the column is NULL: typed NULL or the storage sentinel.
    pub fn default_value(&self) -> Value {
        if self.nullable {
            self.storage.null_value()
        } else {
            self.storage.sentinel()
        }
    }

    /// Whether an identity value counts as assigned, deciding insert versus update.
    pub fn key_is_set(&self, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }
        self.nullable || *value != self.storage.sentinel()
    }

    pub fn is_null(&self, value: &Value) -> bool {
        self.nullable && value.is_null()
    }

    /// Reads the column through the typed getter of the storage.
    pub fn read(&self, cursor: &dyn Cursor, column: Column<'_>) -> Result<Value> {
        Ok(match self.storage {
            Storage::Boolean => Value::Boolean(Some(cursor.get_bool(column)?)),
            Storage::Int8 => Value::Int8(Some(cursor.get_i8(column)?)),
            Storage::Int16 => Value::Int16(Some(cursor.get_i16(column)?)),
            Storage::Int32 => Value::Int32(Some(cursor.get_i32(column)?)),
            Storage::Int64 => Value::Int64(Some(cursor.get_i64(column)?)),
            Storage::UInt8 => Value::UInt8(Some(cursor.get_u8(column)?)),
            Storage::UInt16 => Value::UInt16(Some(cursor.get_u16(column)?)),
            Storage::UInt32 => Value::UInt32(Some(cursor.get_u32(column)?)),
            Storage::UInt64 => Value::UInt64(Some(cursor.get_u64(column)?)),
            Storage::Float32 => Value::Float32(Some(cursor.get_f32(column)?)),
            Storage::Float64 => Value::Float64(Some(cursor.get_f64(column)?)),
            Storage::Varchar => Value::Varchar(Some(cursor.get_string(column)?)),
            Storage::Blob => Value::Blob(Some(cursor.get_blob(column)?)),
            Storage::Date => Value::Date(Some(cursor.get_date(column)?)),
            Storage::Time => Value::Time(Some(cursor.get_time(column)?)),
            Storage::Timestamp => Value::Timestamp(Some(cursor.get_timestamp(column)?)),
            Storage::TimestampWithTimezone => {
                Value::TimestampWithTimezone(Some(cursor.get_timestamptz(column)?))
            }
        })
    }

    /// Classifies a field from its declared type and, when a conversion is
    /// attached, the declared type of its bridge. `None` means unsupported.
    ///
    /// A bridge always takes precedence over the declared type.
    pub fn classify(declared: &DeclaredType, bridge: Option<&DeclaredType>) -> Option<Self> {
        if let Some(bridge) = bridge {
            return Some(match bridge {
                DeclaredType::Int64 => Self::LONG_CONVERTIBLE,
                DeclaredType::UInt64 => Self::ULONG_CONVERTIBLE,
                DeclaredType::Float64 => Self::DOUBLE_CONVERTIBLE,
                DeclaredType::Nullable(inner) if **inner == DeclaredType::Int64 => {
                    Self::LONG_CONVERTIBLE.into_nullable()
                }
                DeclaredType::Nullable(inner) if **inner == DeclaredType::UInt64 => {
                    Self::ULONG_CONVERTIBLE.into_nullable()
                }
                DeclaredType::Nullable(inner) if **inner == DeclaredType::Float64 => {
                    Self::DOUBLE_CONVERTIBLE.into_nullable()
                }
                DeclaredType::String => Self::STRING_CONVERTIBLE,
                DeclaredType::Nullable(inner) if **inner == DeclaredType::String => {
                    Self::STRING_CONVERTIBLE.into_nullable()
                }
                DeclaredType::Bytes => Self::BLOB_CONVERTIBLE,
                DeclaredType::Nullable(inner) if **inner == DeclaredType::Bytes => {
                    Self::BLOB_CONVERTIBLE.into_nullable()
                }
                _ => return None,
            });
        }
        match declared {
            DeclaredType::Nullable(inner) => Some(Self::plain(direct(inner)?).into_nullable()),
            _ => Some(Self::plain(direct(declared)?)),
        }
    }
}

fn direct(declared: &DeclaredType) -> Option<Storage> {
    Some(match declared {
        DeclaredType::Bool => Storage::Boolean,
        DeclaredType::Int8 => Storage::Int8,
        DeclaredType::Int16 => Storage::Int16,
        DeclaredType::Int32 => Storage::Int32,
        DeclaredType::Int64 => Storage::Int64,
        DeclaredType::UInt8 => Storage::UInt8,
        DeclaredType::UInt16 => Storage::UInt16,
        DeclaredType::UInt32 => Storage::UInt32,
        DeclaredType::UInt64 => Storage::UInt64,
        DeclaredType::Float32 => Storage::Float32,
        DeclaredType::Float64 => Storage::Float64,
        DeclaredType::String => Storage::Varchar,
        DeclaredType::Bytes => Storage::Blob,
        DeclaredType::Date => Storage::Date,
        DeclaredType::Time => Storage::Time,
        DeclaredType::DateTime => Storage::Timestamp,
        DeclaredType::OffsetDateTime => Storage::TimestampWithTimezone,
        DeclaredType::Nullable(..) | DeclaredType::Other(..) => return None,
    })
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("nullable-")?;
        }
        if self.convertible {
            let name = match self.storage {
                Storage::Int64 => "long",
                Storage::UInt64 => "ulong",
                Storage::Float64 => "double",
                Storage::Varchar => "string",
                Storage::Blob => "blob",
                other => other.name(),
            };
            write!(f, "{name}-convertible")
        } else {
            f.write_str(self.storage.name())
        }
    }
}
