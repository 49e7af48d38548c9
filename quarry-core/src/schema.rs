use crate::FieldDef;
use std::any;

/// Declarative description of an entity type, the builder the derive expands to.
///
/// ```rust
/// use quarry_core::{FieldDef, Schema};
///
/// #[derive(Default)]
/// struct Point {
///     id: i64,
///     x: i32,
/// }
///
/// let schema = Schema::new("Point")
///     .table_name("points")
///     .field(FieldDef::column("id", |p: &Point| &p.id, |p: &mut Point| &mut p.id))
///     .field(FieldDef::column("x", |p: &Point| &p.x, |p: &mut Point| &mut p.x));
/// assert_eq!(schema.fields.len(), 2);
/// ```
#[derive(Debug)]
pub struct Schema<E> {
    pub type_name: &'static str,
    pub table_name: Option<&'static str>,
    pub fields: Vec<FieldDef<E>>,
}

impl<E> Schema<E> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            table_name: None,
            fields: Vec::new(),
        }
    }

    /// Named after the last path segment of `E`.
    pub fn of() -> Self {
        let name = any::type_name::<E>();
        let name = name.split('<').next().unwrap_or(name);
        Self::new(name.rsplit("::").next().unwrap_or(name))
    }

    pub fn table_name(mut self, name: &'static str) -> Self {
        self.table_name = Some(name);
        self
    }

    pub fn field(mut self, field: FieldDef<E>) -> Self {
        self.fields.push(field);
        self
    }
}
