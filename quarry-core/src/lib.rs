mod as_value;
mod conversion;
mod cursor;
mod declared_type;
mod entity;
mod entity_meta;
mod error;
mod executor;
mod field;
mod identity;
mod materialize;
mod naming;
mod property_kind;
mod query_builder;
mod registry;
mod row;
mod schema;
mod sql_writer;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use conversion::*;
pub use cursor::*;
pub use declared_type::*;
pub use entity::*;
pub use entity_meta::*;
pub use error::*;
pub use executor::*;
pub use field::*;
pub use identity::*;
pub use materialize::*;
pub use naming::*;
pub use property_kind::*;
pub use query_builder::*;
pub use registry::*;
pub use row::*;
pub use schema::*;
pub use sql_writer::*;
pub use statement::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
