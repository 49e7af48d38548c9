#![allow(dead_code)]
use log::LevelFilter;
use quarry::{
    Column, Cursor, Error, Executor, GenericSqlWriter, Result, RowsAffected, RowsCursor, SqlWriter,
    Value,
};
use std::{cell::Cell, collections::VecDeque, env, rc::Rc};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Simulates a driver returning every column as text, NULL aside.
pub fn text(literal: &str) -> Value {
    if literal == "NULL" {
        Value::Null
    } else {
        Value::Unknown(Some(literal.into()))
    }
}

/// Delegates to a `RowsCursor`, counting the calls to `close`.
pub struct CountingCursor {
    inner: RowsCursor,
    closes: Rc<Cell<usize>>,
}

impl Cursor for CountingCursor {
    fn advance(&mut self) -> Result<bool> {
        self.inner.advance()
    }
    fn get_value(&self, column: Column<'_>) -> Result<Value> {
        self.inner.get_value(column)
    }
    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        self.inner.close()
    }
}

/// Dialect quoting identifiers and parenthesizing predicates.
pub struct QuotedWriter;

impl SqlWriter for QuotedWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push('"');
        out.push_str(value);
        out.push('"');
    }
    fn write_where(&self, out: &mut String, predicate: &str) {
        out.push_str(" WHERE (");
        out.push_str(predicate);
        out.push(')');
    }
}

/// Records every statement and answers with canned results.
#[derive(Default)]
pub struct MockExecutor {
    pub statements: Vec<String>,
    pub results: VecDeque<RowsCursor>,
    pub rows_affected: u64,
    pub generated_id: Option<i64>,
    pub fail: Option<&'static str>,
    pub closes: Rc<Cell<usize>>,
    pub quoted: bool,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            rows_affected: 1,
            ..Default::default()
        }
    }

    pub fn with_rows<L, R>(mut self, labels: L, rows: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = Value>,
    {
        self.results.push_back(RowsCursor::new(labels, rows));
        self
    }

    pub fn with_generated_id(mut self, id: i64) -> Self {
        self.generated_id = Some(id);
        self
    }

    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    pub fn failing(mut self, message: &'static str) -> Self {
        self.fail = Some(message);
        self
    }

    pub fn closes(&self) -> usize {
        self.closes.get()
    }

    pub fn last_statement(&self) -> &str {
        self.statements.last().map(String::as_str).unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    type Cursor<'c> = CountingCursor;

    fn sql_writer(&self) -> &dyn SqlWriter {
        if self.quoted {
            &QuotedWriter
        } else {
            &GenericSqlWriter
        }
    }

    fn execute_query(&mut self, sql: &str) -> Result<CountingCursor> {
        self.statements.push(sql.into());
        if let Some(message) = self.fail {
            return Err(Error::msg(message));
        }
        Ok(CountingCursor {
            inner: self.results.pop_front().unwrap_or_default(),
            closes: self.closes.clone(),
        })
    }

    fn execute_update(&mut self, sql: &str) -> Result<RowsAffected> {
        self.statements.push(sql.into());
        if let Some(message) = self.fail {
            return Err(Error::msg(message));
        }
        Ok(match self.generated_id {
            Some(id) => RowsAffected::with_generated_id(self.rows_affected, id),
            None => RowsAffected::new(self.rows_affected),
        })
    }
}
