use crate::{FieldMeta, MappingError, PropertyKind, Value};
use std::sync::Arc;

/// Column list and source table of a SELECT, with the mapped fields each column fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectTemplate {
    pub table: Arc<str>,
    pub columns: Vec<Arc<str>>,
    /// Index in the entity fields of every selected column.
    pub fields: Vec<usize>,
}

/// Every non identity column, identities are generated by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertTemplate {
    pub table: Arc<str>,
    pub columns: Vec<Arc<str>>,
    pub fields: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTemplate {
    pub table: Arc<str>,
    pub set: Vec<usize>,
    pub keys: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTemplate {
    pub table: Arc<str>,
    /// The field named `id`.
    pub id: usize,
}

impl SelectTemplate {
    pub fn new<E>(table: &Arc<str>, fields: &[FieldMeta<E>], selected: Vec<usize>) -> Self {
        Self {
            table: table.clone(),
            columns: selected.iter().map(|&i| fields[i].column.clone()).collect(),
            fields: selected,
        }
    }
}

impl InsertTemplate {
    pub fn new<E>(table: &Arc<str>, fields: &[FieldMeta<E>], identity: &[usize]) -> Self {
        let selected: Vec<usize> = (0..fields.len()).filter(|i| !identity.contains(i)).collect();
        Self {
            table: table.clone(),
            columns: selected.iter().map(|&i| fields[i].column.clone()).collect(),
            fields: selected,
        }
    }
}

impl UpdateTemplate {
    pub fn new<E>(
        entity: &'static str,
        table: &Arc<str>,
        fields: &[FieldMeta<E>],
        identity: &[usize],
    ) -> Result<Self, MappingError> {
        if identity.is_empty() {
            return Err(MappingError::MissingIdentity {
                entity,
                statement: "UPDATE",
            });
        }
        let set: Vec<usize> = (0..fields.len()).filter(|i| !identity.contains(i)).collect();
        if set.is_empty() {
            return Err(MappingError::NothingToUpdate { entity });
        }
        Ok(Self {
            table: table.clone(),
            set,
            keys: identity.to_vec(),
        })
    }
}

impl DeleteTemplate {
    pub fn new<E>(
        entity: &'static str,
        table: &Arc<str>,
        fields: &[FieldMeta<E>],
    ) -> Result<Self, MappingError> {
        let id = fields
            .iter()
            .position(|f| f.name == "id")
            .ok_or(MappingError::MissingIdField { entity })?;
        Ok(Self {
            table: table.clone(),
            id,
        })
    }
}

/// Column name, property kind and current value of a field, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    pub column: &'a str,
    pub kind: PropertyKind,
    pub value: Value,
}
