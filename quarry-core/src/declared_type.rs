use crate::matches_path;
use quote::ToTokens;
use std::{
    borrow::Cow,
    fmt::{self, Display},
};
use syn::{GenericArgument, PathArguments, Type, TypePath, TypeSlice};

/// Shape of a field type as written in the entity definition.
///
/// This is the input of the type classifier. `Other` keeps the textual type for
/// error messages, it never classifies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Bool,
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
    String,
    Bytes,
    Date,
    Time,
    DateTime,
    OffsetDateTime,
    Nullable(Box<DeclaredType>),
    Other(Cow<'static, str>),
}

impl DeclaredType {
    pub fn nullable(inner: DeclaredType) -> Self {
        DeclaredType::Nullable(Box::new(inner))
    }

    pub fn is_other(&self) -> bool {
        match self {
            DeclaredType::Other(..) => true,
            DeclaredType::Nullable(inner) => inner.is_other(),
            _ => false,
        }
    }
}

impl Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Bool => f.write_str("bool"),
            DeclaredType::Int8 => f.write_str("i8"),
            DeclaredType::Int16 => f.write_str("i16"),
            DeclaredType::Int32 => f.write_str("i32"),
            DeclaredType::Int64 => f.write_str("i64"),
            DeclaredType::UInt8 => f.write_str("u8"),
            DeclaredType::UInt16 => f.write_str("u16"),
            DeclaredType::UInt32 => f.write_str("u32"),
            DeclaredType::UInt64 => f.write_str("u64"),
            DeclaredType::Float32 => f.write_str("f32"),
            DeclaredType::Float64 => f.write_str("f64"),
            DeclaredType::String => f.write_str("String"),
            DeclaredType::Bytes => f.write_str("Vec<u8>"),
            DeclaredType::Date => f.write_str("Date"),
            DeclaredType::Time => f.write_str("Time"),
            DeclaredType::DateTime => f.write_str("PrimitiveDateTime"),
            DeclaredType::OffsetDateTime => f.write_str("OffsetDateTime"),
            DeclaredType::Nullable(inner) => write!(f, "Option<{inner}>"),
            DeclaredType::Other(name) => f.write_str(name),
        }
    }
}

fn first_generic_type(path: &syn::Path) -> Option<&Type> {
    let PathArguments::AngleBracketed(bracketed) = &path.segments.last()?.arguments else {
        return None;
    };
    match bracketed.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

/// Decodes the declared type of a struct field, used by the derive macro.
pub fn decode_type(ty: &Type) -> DeclaredType {
    let other = || DeclaredType::Other(ty.to_token_stream().to_string().into());
    match ty {
        Type::Path(TypePath { qself: None, path }) => {
            if let Some(ident) = path.get_ident() {
                let decoded = match ident.to_string().as_str() {
                    "bool" => Some(DeclaredType::Bool),
                    "i8" => Some(DeclaredType::Int8),
                    "i16" => Some(DeclaredType::Int16),
                    "i32" => Some(DeclaredType::Int32),
                    "i64" => Some(DeclaredType::Int64),
                    "u8" => Some(DeclaredType::UInt8),
                    "u16" => Some(DeclaredType::UInt16),
                    "u32" => Some(DeclaredType::UInt32),
                    "u64" => Some(DeclaredType::UInt64),
                    "f32" => Some(DeclaredType::Float32),
                    "f64" => Some(DeclaredType::Float64),
                    _ => None,
                };
                if let Some(decoded) = decoded {
                    return decoded;
                }
            }
            if matches_path(path, &["std", "string", "String"]) {
                DeclaredType::String
            } else if matches_path(path, &["time", "Date"]) {
                DeclaredType::Date
            } else if matches_path(path, &["time", "Time"]) {
                DeclaredType::Time
            } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
                DeclaredType::DateTime
            } else if matches_path(path, &["time", "OffsetDateTime"]) {
                DeclaredType::OffsetDateTime
            } else if matches_path(path, &["std", "option", "Option"]) {
                match first_generic_type(path).map(decode_type) {
                    Some(inner @ DeclaredType::Nullable(..)) | Some(inner @ DeclaredType::Other(..)) => {
                        DeclaredType::Other(format!("Option<{inner}>").into())
                    }
                    Some(inner) => DeclaredType::nullable(inner),
                    None => other(),
                }
            } else if matches_path(path, &["std", "vec", "Vec"]) {
                match first_generic_type(path).map(decode_type) {
                    Some(DeclaredType::UInt8) => DeclaredType::Bytes,
                    _ => other(),
                }
            } else if matches_path(path, &["std", "boxed", "Box"]) {
                match first_generic_type(path) {
                    Some(Type::Slice(TypeSlice { elem, .. }))
                        if decode_type(elem) == DeclaredType::UInt8 =>
                    {
                        DeclaredType::Bytes
                    }
                    _ => other(),
                }
            } else {
                other()
            }
        }
        _ => other(),
    }
}
