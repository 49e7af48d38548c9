use crate::{
    AsValue, Assignment, EntityMeta, EntityReader, Executor, QueryBuilder, ReadMode, Registry,
    Result, RowsAffected, Schema, Value, truncate_long,
};
use anyhow::Context;
use std::sync::Arc;

/// A record type mapped to a table.
///
/// Implementations only describe the fields through [`Entity::schema`], usually
/// via `#[derive(Entity)]`. Everything else is derived once, on first use, and
/// cached in the [`Registry`].
pub trait Entity: Default + Sized + 'static {
    fn schema() -> Schema<Self>;

    /// Mapping metadata, built on first call.
    fn meta() -> Result<Arc<EntityMeta<Self>>> {
        Registry::global().resolve::<Self>()
    }

    /// Every row of the table, every mapped field read positionally.
    fn select<'e, X: Executor + 'e>(
        executor: &'e mut X,
    ) -> Result<QueryBuilder<'e, X, EntityReader<Self>>> {
        let meta = Self::meta()?;
        let mut sql = String::new();
        executor.sql_writer().write_select(&mut sql, meta.select());
        let fields = meta.select().fields.clone();
        Ok(QueryBuilder::new(
            executor,
            sql,
            EntityReader::new(meta, fields, ReadMode::Positional),
        ))
    }

    /// Like [`Entity::select`] but only the named fields, in that order, the others
    /// keep their default value.
    fn select_fields<'e, X: Executor + 'e>(
        executor: &'e mut X,
        fields: &[&str],
    ) -> Result<QueryBuilder<'e, X, EntityReader<Self>>> {
        let meta = Self::meta()?;
        let template = meta.projection(fields)?;
        let mut sql = String::new();
        executor.sql_writer().write_select(&mut sql, &template);
        let fields = template.fields.clone();
        Ok(QueryBuilder::new(
            executor,
            sql,
            EntityReader::new(meta, fields, ReadMode::Positional),
        ))
    }

    /// Raw SQL, each mapped field is read from the column carrying its name.
    fn query<'e, X: Executor + 'e>(
        executor: &'e mut X,
        sql: impl Into<String>,
    ) -> Result<QueryBuilder<'e, X, EntityReader<Self>>> {
        let meta = Self::meta()?;
        Ok(QueryBuilder::new(
            executor,
            sql.into(),
            EntityReader::named(meta),
        ))
    }

    /// First row whose column `id` equals `id`.
    fn find_by_id<X: Executor>(executor: &mut X, id: impl AsValue) -> Result<Option<Self>> {
        let mut predicate = String::new();
        let writer = executor.sql_writer();
        writer.write_identifier(&mut predicate, "id");
        predicate.push('=');
        writer.write_value(&mut predicate, &id.as_value())?;
        Self::find_one(executor, predicate)
    }

    /// First row matching the predicate.
    fn find_one<X: Executor>(
        executor: &mut X,
        predicate: impl Into<String>,
    ) -> Result<Option<Self>> {
        Self::select(executor)?.filter(predicate).next().transpose()
    }

    /// Inserts every non identity field, then writes the generated identifier
    /// back into the identity fields.
    fn insert<X: Executor>(&mut self, executor: &mut X) -> Result<RowsAffected> {
        let meta = Self::meta()?;
        let template = meta.insert();
        let values: Vec<Assignment> = template
            .fields
            .iter()
            .map(|&i| meta.fields()[i].assignment(self))
            .collect();
        let mut sql = String::new();
        executor
            .sql_writer()
            .write_insert(&mut sql, &template.table, &values)?;
        let result = execute_update(executor, &sql)?;
        if meta.identity().is_empty() {
            return Ok(result);
        }
        let Some(id) = result.last_affected_id else {
            log::warn!(
                "The insert into `{}` did not report a generated id, the identity of `{}` is left unchanged",
                meta.table(),
                meta.type_name(),
            );
            return Ok(result);
        };
        for field in meta.identity_fields() {
            field
                .set(self, Value::Int64(Some(id)))
                .with_context(|| format!("While assigning the generated id {id} to `{}`", field.name))?;
        }
        Ok(result)
    }

    /// Sets every non identity field of the row matching the identity fields.
    fn update<X: Executor>(&self, executor: &mut X) -> Result<RowsAffected> {
        let meta = Self::meta()?;
        let template = meta.update()?;
        let assignments = |indexes: &[usize]| {
            indexes
                .iter()
                .map(|&i| meta.fields()[i].assignment(self))
                .collect::<Vec<_>>()
        };
        let set = assignments(&template.set);
        let keys = assignments(&template.keys);
        let mut sql = String::new();
        executor
            .sql_writer()
            .write_update(&mut sql, &template.table, &set, &keys)?;
        execute_update(executor, &sql)
    }

    /// Deletes the row whose column `id` equals the field named `id`.
    fn delete<X: Executor>(&self, executor: &mut X) -> Result<RowsAffected> {
        let meta = Self::meta()?;
        let template = meta.delete()?;
        let field = &meta.fields()[template.id];
        let key = Assignment {
            column: "id",
            kind: field.kind,
            value: field.get(self),
        };
        let mut sql = String::new();
        executor
            .sql_writer()
            .write_delete(&mut sql, &template.table, &key)?;
        let result = execute_update(executor, &sql)?;
        if result.rows_affected != 1 {
            log::warn!(
                "Deleting from `{}` affected {} rows instead of 1",
                meta.table(),
                result.rows_affected
            );
        }
        Ok(result)
    }

    /// Update when every identity field holds a value, insert otherwise.
    fn save<X: Executor>(&mut self, executor: &mut X) -> Result<RowsAffected> {
        let meta = Self::meta()?;
        let stored = !meta.identity().is_empty()
            && meta
                .identity_fields()
                .all(|f| f.kind.key_is_set(&f.get(self)));
        if stored {
            self.update(executor)
        } else {
            self.insert(executor)
        }
    }
}

fn execute_update<X: Executor>(executor: &mut X, sql: &str) -> Result<RowsAffected> {
    log::debug!("{}", truncate_long!(sql));
    executor
        .execute_update(sql)
        .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
}
