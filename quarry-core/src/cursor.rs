use crate::{AsValue, Error, Result, RowLabeled, RowNames, Value};
use std::{
    collections::VecDeque,
    fmt::{self, Display},
};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Address of a column in the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    /// 1-based position in the select list.
    Position(usize),
    /// Column label.
    Name(&'a str),
}

impl Display for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Position(i) => write!(f, "#{i}"),
            Column::Name(name) => write!(f, "`{name}`"),
        }
    }
}

/// Forward only row iterator returned by [`Executor::execute_query`](crate::Executor::execute_query).
///
/// A driver only has to provide `advance` and `get_value`, the typed getters
/// convert the dynamic value and can be overridden when the backend reads a
/// column straight into the native type.
pub trait Cursor {
    /// Move to the next row, `false` once the rows are exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// Raw value of a column in the current row.
    fn get_value(&self, column: Column<'_>) -> Result<Value>;

    fn is_null(&self, column: Column<'_>) -> Result<bool> {
        Ok(self.get_value(column)?.is_null())
    }

    fn get_bool(&self, column: Column<'_>) -> Result<bool> {
        bool::try_from_value(self.get_value(column)?)
    }
    fn get_i8(&self, column: Column<'_>) -> Result<i8> {
        i8::try_from_value(self.get_value(column)?)
    }
    fn get_i16(&self, column: Column<'_>) -> Result<i16> {
        i16::try_from_value(self.get_value(column)?)
    }
    fn get_i32(&self, column: Column<'_>) -> Result<i32> {
        i32::try_from_value(self.get_value(column)?)
    }
    fn get_i64(&self, column: Column<'_>) -> Result<i64> {
        i64::try_from_value(self.get_value(column)?)
    }
    fn get_u8(&self, column: Column<'_>) -> Result<u8> {
        u8::try_from_value(self.get_value(column)?)
    }
    fn get_u16(&self, column: Column<'_>) -> Result<u16> {
        u16::try_from_value(self.get_value(column)?)
    }
    fn get_u32(&self, column: Column<'_>) -> Result<u32> {
        u32::try_from_value(self.get_value(column)?)
    }
    fn get_u64(&self, column: Column<'_>) -> Result<u64> {
        u64::try_from_value(self.get_value(column)?)
    }
    fn get_f32(&self, column: Column<'_>) -> Result<f32> {
        f32::try_from_value(self.get_value(column)?)
    }
    fn get_f64(&self, column: Column<'_>) -> Result<f64> {
        f64::try_from_value(self.get_value(column)?)
    }
    fn get_string(&self, column: Column<'_>) -> Result<String> {
        String::try_from_value(self.get_value(column)?)
    }
    fn get_blob(&self, column: Column<'_>) -> Result<Box<[u8]>> {
        <Box<[u8]>>::try_from_value(self.get_value(column)?)
    }
    fn get_date(&self, column: Column<'_>) -> Result<Date> {
        Date::try_from_value(self.get_value(column)?)
    }
    fn get_time(&self, column: Column<'_>) -> Result<Time> {
        Time::try_from_value(self.get_value(column)?)
    }
    fn get_timestamp(&self, column: Column<'_>) -> Result<PrimitiveDateTime> {
        PrimitiveDateTime::try_from_value(self.get_value(column)?)
    }
    fn get_timestamptz(&self, column: Column<'_>) -> Result<OffsetDateTime> {
        OffsetDateTime::try_from_value(self.get_value(column)?)
    }

    /// Release the underlying resources, the cursor is not used afterwards.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// In memory cursor over rows that were already fetched.
#[derive(Debug, Default)]
pub struct RowsCursor {
    labels: RowNames,
    rows: VecDeque<RowLabeled>,
    current: Option<RowLabeled>,
    closed: bool,
}

impl RowsCursor {
    pub fn new<L, R>(labels: L, rows: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = Value>,
    {
        let labels: RowNames = labels.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|row| RowLabeled::new(labels.clone(), row.into_iter().collect()))
            .collect();
        Self {
            labels,
            rows,
            current: None,
            closed: false,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Cursor for RowsCursor {
    fn advance(&mut self) -> Result<bool> {
        if self.closed {
            return Err(Error::msg("Cannot advance a closed cursor"));
        }
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn get_value(&self, column: Column<'_>) -> Result<Value> {
        let Some(row) = &self.current else {
            return Err(Error::msg(format!(
                "Cannot read column {column}, the cursor is not positioned on a row"
            )));
        };
        let value = match column {
            Column::Position(i) if i > 0 => row.values().get(i - 1),
            Column::Position(..) => None,
            Column::Name(name) => row.get_column(name),
        };
        value.cloned().ok_or_else(|| {
            Error::msg(format!(
                "Column {column} does not exist in the row (columns: {})",
                row.names().join(",")
            ))
        })
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.current = None;
        self.rows.clear();
        Ok(())
    }
}
