use quarry_core::{DeclaredType, decode_type};
use quote::ToTokens;
use syn::{Error, Field, Ident, LitStr, Path, Result, Token, Type, Visibility, spanned::Spanned};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) declared: DeclaredType,
    pub(crate) column_name: Option<String>,
    pub(crate) identity: bool,
    pub(crate) ignore: bool,
    pub(crate) public: bool,
    pub(crate) convert: Option<Path>,
}

fn flag(arg: &syn::meta::ParseNestedMeta, name: &str) -> Result<()> {
    if arg.input.peek(Token![=]) {
        return Err(arg.error(format!(
            "`{name}` takes no value, use it like: `#[quarry({name})]`"
        )));
    }
    Ok(())
}

pub fn decode_column(field: &Field) -> Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new(
            field.span(),
            "Entity fields must be named, tuple structs are not supported",
        ));
    };
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        declared: decode_type(&field.ty),
        column_name: None,
        identity: false,
        ignore: false,
        public: matches!(field.vis, Visibility::Public(..)),
        convert: None,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value: LitStr = arg.value()?.parse().map_err(|_| {
                    arg.error("Error while parsing `name`, use it like: `#[quarry(name = \"my_column\")]`")
                })?;
                metadata.column_name = Some(value.value());
            } else if arg.path.is_ident("identity") {
                flag(&arg, "identity")?;
                metadata.identity = true;
            } else if arg.path.is_ident("ignore") {
                flag(&arg, "ignore")?;
                metadata.ignore = true;
            } else if arg.path.is_ident("convert") {
                let value: Path = arg.value()?.parse().map_err(|_| {
                    arg.error("Error while parsing `convert`, use it like: `#[quarry(convert = MyConversion)]`")
                })?;
                metadata.convert = Some(value);
            } else {
                return Err(arg.error(format!(
                    "Unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                )));
            }
            Ok(())
        })?;
    }
    Ok(metadata)
}
