use crate::{Cursor, GenericSqlWriter, Result, RowsAffected, SqlWriter};

/// Database access the mapper runs statements through.
///
/// Implemented by the driver layer, which owns the connection. Statements are
/// plain SQL text with the values already inlined as literals.
pub trait Executor {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Run a statement returning rows.
    fn execute_query(&mut self, sql: &str) -> Result<Self::Cursor<'_>>;

    /// Run a modify statement.
    ///
    /// For an INSERT, `last_affected_id` carries the generated identifier when
    /// the backend reports one.
    fn execute_update(&mut self, sql: &str) -> Result<RowsAffected>;

    /// Dialect used to render the statements sent to this executor.
    fn sql_writer(&self) -> &dyn SqlWriter {
        &GenericSqlWriter
    }
}
