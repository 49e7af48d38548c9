use crate::{
    Cursor, Executor, FromRow, ReadRow, Result, SqlWriter, TupleReader, truncate_long,
};
use anyhow::Context;
use std::iter::FusedIterator;

/// Lazy, single use sequence of rows.
///
/// Nothing runs until the first call to `next`, which executes the composed
/// statement once. Every following step advances the cursor and materializes one
/// row. The cursor is closed when the rows are exhausted, when an error occurs
/// and when the builder is dropped; afterwards the iterator only yields `None`.
pub struct QueryBuilder<'e, X: Executor + 'e, R> {
    executor: Option<&'e mut X>,
    sql: String,
    filter: Option<String>,
    order_by: Option<String>,
    reader: R,
    cursor: Option<X::Cursor<'e>>,
    executed: Option<String>,
    finished: bool,
}

impl<'e, X: Executor + 'e, R: ReadRow> QueryBuilder<'e, X, R> {
    pub fn new(executor: &'e mut X, sql: String, reader: R) -> Self {
        Self {
            executor: Some(executor),
            sql,
            filter: None,
            order_by: None,
            reader,
            cursor: None,
            executed: None,
            finished: false,
        }
    }

    /// Appended as ` WHERE <predicate>`.
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filter = Some(predicate.into());
        self
    }

    /// Appended as ` ORDER BY <order>`.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    /// Statement as it will be executed, or as it was once the query ran.
    pub fn sql(&self) -> String {
        match (&self.executed, self.executor.as_deref()) {
            (Some(sql), _) => sql.clone(),
            (None, Some(executor)) => self.compose(executor.sql_writer()),
            (None, None) => self.sql.clone(),
        }
    }

    /// Whether the statement ran and the cursor was released.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn compose(&self, writer: &dyn SqlWriter) -> String {
        let mut sql = self.sql.clone();
        if let Some(filter) = &self.filter {
            writer.write_where(&mut sql, filter);
        }
        if let Some(order) = &self.order_by {
            writer.write_order_by(&mut sql, order);
        }
        sql
    }

    fn release(&mut self) -> Result<()> {
        self.finished = true;
        match self.cursor.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }

    fn step(&mut self) -> Result<Option<R::Output>> {
        if self.cursor.is_none() {
            let Some(executor) = self.executor.take() else {
                return Ok(None);
            };
            let sql = self.compose(executor.sql_writer());
            log::debug!("{}", truncate_long!(sql));
            let result = executor
                .execute_query(&sql)
                .with_context(|| format!("While executing `{}`", truncate_long!(sql)));
            self.executed = Some(sql);
            self.cursor = Some(result?);
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(None);
        };
        if !cursor.advance()? {
            return Ok(None);
        }
        self.reader.read(&*cursor).map(Some)
    }
}

impl<'e, X: Executor + 'e, R: ReadRow> Iterator for QueryBuilder<'e, X, R> {
    type Item = Result<R::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.step() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => self.release().err().map(Err),
            Err(e) => {
                if let Err(close) = self.release() {
                    log::error!("{close:#}");
                }
                Some(Err(e))
            }
        }
    }
}

impl<'e, X: Executor + 'e, R: ReadRow> FusedIterator for QueryBuilder<'e, X, R> {}

impl<'e, X: Executor + 'e, R> Drop for QueryBuilder<'e, X, R> {
    fn drop(&mut self) {
        self.finished = true;
        if let Some(mut cursor) = self.cursor.take()
            && let Err(e) = cursor.close()
        {
            log::error!("{e:#}");
        }
    }
}

/// Runs raw SQL and reads every row positionally into `T`.
///
/// ```rust,ignore
/// let names: Vec<(i64, String)> = quarry::query(&mut connection, "SELECT id,name FROM user")
///     .collect::<Result<_>>()?;
/// ```
pub fn query<'e, T: FromRow, X: Executor + 'e>(
    executor: &'e mut X,
    sql: impl Into<String>,
) -> QueryBuilder<'e, X, TupleReader<T>> {
    QueryBuilder::new(executor, sql.into(), TupleReader::default())
}
