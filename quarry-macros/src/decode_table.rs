use crate::decode_column::{ColumnMetadata, decode_column};
use quote::ToTokens;
use syn::{Error, Fields, ItemStruct, LitStr, Result, spanned::Spanned};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) name: Option<String>,
    pub(crate) columns: Vec<ColumnMetadata>,
}

pub fn decode_table(item: ItemStruct) -> Result<TableMetadata> {
    if !matches!(item.fields, Fields::Named(..)) {
        return Err(Error::new(
            item.span(),
            "Entity can only be derived for structs with named fields",
        ));
    }
    let columns = item
        .fields
        .iter()
        .map(decode_column)
        .collect::<Result<Vec<_>>>()?;
    let mut name = None;
    for attr in &item.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value: LitStr = arg.value()?.parse().map_err(|_| {
                    arg.error("Error while parsing `name`, use it like: `#[quarry(name = \"my_table\")]`")
                })?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(arg.error(format!(
                    "Unknown attribute `{}` inside quarry macro",
                    arg.path.to_token_stream()
                )))
            }
        })?;
    }
    Ok(TableMetadata {
        item,
        name,
        columns,
    })
}
