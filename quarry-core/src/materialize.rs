use crate::{AsValue, Column, Cursor, EntityMeta, Result};
use anyhow::Context;
use std::{marker::PhantomData, sync::Arc};

/// Turns the current cursor row into an output item.
pub trait ReadRow {
    type Output;
    fn read(&mut self, cursor: &dyn Cursor) -> Result<Self::Output>;
}

/// How columns are matched with fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// The n-th selected field reads column n.
    Positional,
    /// Each field reads the column labeled with its column name.
    Named,
}

/// Builds `E` from rows, starting from `E::default()` and filling the selected fields.
pub struct EntityReader<E> {
    meta: Arc<EntityMeta<E>>,
    fields: Vec<usize>,
    mode: ReadMode,
}

impl<E: Default> EntityReader<E> {
    pub fn new(meta: Arc<EntityMeta<E>>, fields: Vec<usize>, mode: ReadMode) -> Self {
        Self { meta, fields, mode }
    }

    /// Every mapped field, by column name.
    pub fn named(meta: Arc<EntityMeta<E>>) -> Self {
        let fields = (0..meta.fields().len()).collect();
        Self::new(meta, fields, ReadMode::Named)
    }
}

impl<E: Default> ReadRow for EntityReader<E> {
    type Output = E;
    fn read(&mut self, cursor: &dyn Cursor) -> Result<E> {
        read_entity(&self.meta, &self.fields, self.mode, cursor)
    }
}

/// Reads one row into a fresh entity.
///
/// A NULL column leaves the kind default in the field: typed NULL for nullable
/// kinds, the sentinel for the others. Converted fields receive the bridge value
/// through `from_bridge`.
pub fn read_entity<E: Default>(
    meta: &EntityMeta<E>,
    fields: &[usize],
    mode: ReadMode,
    cursor: &dyn Cursor,
) -> Result<E> {
    let mut entity = E::default();
    for (i, &index) in fields.iter().enumerate() {
        let field = &meta.fields()[index];
        let column = match mode {
            ReadMode::Positional => Column::Position(i + 1),
            ReadMode::Named => Column::Name(&field.column),
        };
        let context = || {
            format!(
                "While reading column {column} into `{}::{}`",
                meta.type_name(),
                field.name
            )
        };
        let value = if cursor.is_null(column).with_context(context)? {
            field.kind.default_value()
        } else {
            field.kind.read(cursor, column).with_context(context)?
        };
        field.set(&mut entity, value).with_context(context)?;
        if mode == ReadMode::Named && cursor.is_null(column).with_context(context)? {
            field
                .set(&mut entity, field.kind.default_value())
                .with_context(context)?;
        }
    }
    Ok(entity)
}

/// Positional conversion of a whole row, implemented for tuples of [`AsValue`] types.
///
/// ```rust
/// use quarry_core::{Cursor, FromRow, RowsCursor, Value};
///
/// let mut cursor = RowsCursor::new(
///     ["name", "age"],
///     [[Value::Varchar(Some("Ada".into())), Value::Int64(Some(36))]],
/// );
/// assert!(cursor.advance().unwrap());
/// let (name, age) = <(String, u8)>::from_row(&cursor).unwrap();
/// assert_eq!((name.as_str(), age), ("Ada", 36));
/// ```
pub trait FromRow: Sized {
    fn from_row(cursor: &dyn Cursor) -> Result<Self>;
}

macro_rules! impl_from_row {
    ($($ty:ident $pos:literal),+) => {
        impl<$($ty: AsValue),+> FromRow for ($($ty,)+) {
            fn from_row(cursor: &dyn Cursor) -> Result<Self> {
                Ok(($(
                    $ty::try_from_value(cursor.get_value(Column::Position($pos))?)
                        .with_context(|| format!("While reading column #{}", $pos))?,
                )+))
            }
        }
    };
}
impl_from_row!(A 1);
impl_from_row!(A 1, B 2);
impl_from_row!(A 1, B 2, C 3);
impl_from_row!(A 1, B 2, C 3, D 4);
impl_from_row!(A 1, B 2, C 3, D 4, F 5);
impl_from_row!(A 1, B 2, C 3, D 4, F 5, G 6);
impl_from_row!(A 1, B 2, C 3, D 4, F 5, G 6, H 7);
impl_from_row!(A 1, B 2, C 3, D 4, F 5, G 6, H 7, I 8);

/// [`ReadRow`] adapter for any [`FromRow`] type.
pub struct TupleReader<T>(PhantomData<fn() -> T>);

impl<T> Default for TupleReader<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: FromRow> ReadRow for TupleReader<T> {
    type Output = T;
    fn read(&mut self, cursor: &dyn Cursor) -> Result<T> {
        T::from_row(cursor)
    }
}
