mod decode_column;
mod decode_table;

use decode_column::ColumnMetadata;
use decode_table::{TableMetadata, decode_table};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{ItemStruct, parse_macro_input};

/// Implements `quarry::Entity` by describing every field in a `quarry::Schema`.
///
/// Struct attribute: `#[quarry(name = "table")]`.
/// Field attributes: `#[quarry(name = "column")]`, `#[quarry(identity)]`,
/// `#[quarry(ignore)]`, `#[quarry(convert = Conversion)]`.
/// Only `pub` fields are mapped.
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemStruct);
    match decode_table(item) {
        Ok(table) => encode_entity(&table).into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn encode_field(column: &ColumnMetadata) -> proc_macro2::TokenStream {
    let ident = &column.ident;
    let name = ident.to_string();
    let mut field = if let Some(convert) = &column.convert {
        quote! {
            ::quarry::FieldDef::converted::<#convert>(
                #name,
                |e: &Self| &e.#ident,
                |e: &mut Self| &mut e.#ident,
            )
        }
    } else if !column.declared.is_other() {
        quote! {
            ::quarry::FieldDef::column(
                #name,
                |e: &Self| &e.#ident,
                |e: &mut Self| &mut e.#ident,
            )
        }
    } else {
        let ty = column.ty.to_token_stream().to_string();
        quote!(::quarry::FieldDef::opaque(#name, #ty))
    };
    if let Some(column_name) = &column.column_name {
        field.extend(quote!(.column_name(#column_name)));
    }
    if column.identity {
        field.extend(quote!(.identity()));
    }
    if column.ignore {
        field.extend(quote!(.ignore()));
    }
    if !column.public {
        field.extend(quote!(.private()));
    }
    field
}

fn encode_entity(table: &TableMetadata) -> proc_macro2::TokenStream {
    let ident = &table.item.ident;
    let type_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = table.item.generics.split_for_impl();
    let table_name = table.name.as_ref().map(|v| quote!(.table_name(#v)));
    let fields = table.columns.iter().map(encode_field);
    quote! {
        impl #impl_generics ::quarry::Entity for #ident #ty_generics #where_clause {
            fn schema() -> ::quarry::Schema<Self> {
                ::quarry::Schema::new(#type_name)
                    #table_name
                    #(.field(#fields))*
            }
        }
    }
}
