use crate::{
    Assignment, MappingError, PropertyKind, Result, SelectTemplate, Value, separated_by,
    try_separated_by,
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Renders statements and literals as SQL text.
///
/// Every method has a default producing plain SQL, a dialect overrides the
/// pieces that differ. Identifiers are written as is and lists are joined by `,`.
pub trait SqlWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_column_list(&self, out: &mut String, columns: &mut dyn Iterator<Item = &str>) {
        separated_by(out, columns, |out, v| self.write_identifier(out, v), ",");
    }

    /// `SELECT c1,c2 FROM t`
    fn write_select(&self, out: &mut String, template: &SelectTemplate) {
        out.reserve(32 + template.columns.len() * 16);
        out.push_str("SELECT ");
        self.write_column_list(out, &mut template.columns.iter().map(|c| &**c));
        out.push_str(" FROM ");
        self.write_identifier(out, &template.table);
    }

    fn write_where(&self, out: &mut String, predicate: &str) {
        out.push_str(" WHERE ");
        out.push_str(predicate);
    }

    fn write_order_by(&self, out: &mut String, order: &str) {
        out.push_str(" ORDER BY ");
        out.push_str(order);
    }

    /// `c1=v1,c2=v2`
    fn write_assignments(&self, out: &mut String, values: &[Assignment<'_>]) -> Result<()> {
        try_separated_by(
            out,
            values,
            |out, v| {
                self.write_identifier(out, v.column);
                out.push('=');
                self.write_field_value(out, v.kind, &v.value)
            },
            ",",
        )
    }

    /// `INSERT INTO t(c1,c2) VALUES (v1,v2)`, or `INSERT INTO t DEFAULT VALUES` without columns.
    fn write_insert(&self, out: &mut String, table: &str, values: &[Assignment<'_>]) -> Result<()> {
        out.reserve(32 + values.len() * 24);
        out.push_str("INSERT INTO ");
        self.write_identifier(out, table);
        if values.is_empty() {
            out.push_str(" DEFAULT VALUES");
            return Ok(());
        }
        out.push('(');
        self.write_column_list(out, &mut values.iter().map(|v| v.column));
        out.push_str(") VALUES (");
        try_separated_by(
            out,
            values,
            |out, v| self.write_field_value(out, v.kind, &v.value),
            ",",
        )?;
        out.push(')');
        Ok(())
    }

    /// `UPDATE t SET c1=v1,c2=v2 WHERE k1=v3,k2=v4`
    ///
    /// Keys are joined the same way as the assignments.
    fn write_update(
        &self,
        out: &mut String,
        table: &str,
        set: &[Assignment<'_>],
        keys: &[Assignment<'_>],
    ) -> Result<()> {
        out.reserve(32 + (set.len() + keys.len()) * 24);
        out.push_str("UPDATE ");
        self.write_identifier(out, table);
        out.push_str(" SET ");
        self.write_assignments(out, set)?;
        out.push_str(" WHERE ");
        self.write_assignments(out, keys)
    }

    /// `DELETE FROM t WHERE id=v`
    fn write_delete(&self, out: &mut String, table: &str, key: &Assignment<'_>) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_identifier(out, table);
        out.push_str(" WHERE ");
        self.write_assignments(out, std::slice::from_ref(key))
    }

    /// Literal of a field value, checked against the property kind of the field.
    fn write_field_value(&self, out: &mut String, kind: PropertyKind, value: &Value) -> Result<()> {
        let matches = if value.is_null() {
            kind.nullable && !matches!(value, Value::Unknown(..))
        } else {
            value.storage() == Some(kind.storage)
        };
        if !matches {
            return Err(MappingError::Encoding {
                value: format!("{value:?}"),
                kind,
            }
            .into());
        }
        self.write_value(out, value)
    }

    /// Literal of any value. `Value::Unknown` has no literal form.
    fn write_value(&self, out: &mut String, value: &Value) -> Result<()> {
        match value {
            Value::Unknown(..) => {
                return Err(crate::Error::msg(format!(
                    "Cannot write {value:?} as a SQL literal"
                )));
            }
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => self.write_value_date(out, v, false),
            Value::Time(Some(v)) => self.write_value_time(out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(out, v),
            Value::TimestampWithTimezone(Some(v)) => self.write_value_timestamptz(out, v),
            _ => self.write_value_none(out),
        };
        Ok(())
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        out.push_str(if negative { "'-Infinity'" } else { "'Infinity'" });
    }

    fn write_value_nan(&self, out: &mut String) {
        out.push_str("'NaN'");
    }

    /// Single quoted, embedded quotes doubled.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.reserve(value.len() + 2);
        out.push('\'');
        let mut pos = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[pos..i]);
                out.push_str("''");
                pos = i + 1;
            }
        }
        out.push_str(&value[pos..]);
        out.push('\'');
    }

    /// `'\x0a1b'`
    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.reserve(value.len() * 2 + 4);
        out.push_str("'\\x");
        out.push_str(&hex::encode(value));
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date, timestamp: bool) {
        let b = if timestamp { "" } else { "'" };
        let year = value.year();
        let sign = if year < 0 { "-" } else { "" };
        let _ = write!(
            out,
            "{b}{sign}{:04}-{:02}-{:02}{b}",
            year.unsigned_abs(),
            value.month() as u8,
            value.day()
        );
    }

    /// Fraction written only when not zero, without trailing zeros.
    fn write_value_time(&self, out: &mut String, value: &Time, timestamp: bool) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{subsecond:0width$}");
        }
        out.push_str(b);
    }

    fn write_value_timestamp(&self, out: &mut String, value: &PrimitiveDateTime) {
        out.push('\'');
        self.write_value_date(out, &value.date(), true);
        out.push('T');
        self.write_value_time(out, &value.time(), true);
        out.push('\'');
    }

    /// Normalized to UTC, suffixed with `Z`.
    fn write_value_timestamptz(&self, out: &mut String, value: &OffsetDateTime) {
        let utc = value.to_offset(UtcOffset::UTC);
        out.push('\'');
        self.write_value_date(out, &utc.date(), true);
        out.push('T');
        self.write_value_time(out, &utc.time(), true);
        out.push_str("Z'");
    }
}

/// Plain SQL, no identifier quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}
