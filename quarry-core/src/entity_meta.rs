use crate::{
    Accessor, Assignment, DeleteTemplate, InsertTemplate, MappingError, PropertyKind, Result,
    Schema, SelectTemplate, UpdateTemplate, Value, column_name, resolve_identity, table_name,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// A field that made it through classification.
pub struct FieldMeta<E> {
    pub name: &'static str,
    pub column: Arc<str>,
    pub column_override: Option<&'static str>,
    pub identity: bool,
    pub kind: PropertyKind,
    /// Name of the conversion, if any.
    pub adapter: Option<&'static str>,
    accessor: Accessor<E>,
}

impl<E> FieldMeta<E> {
    /// Current value, already through `to_bridge` for converted fields.
    pub fn get(&self, entity: &E) -> Value {
        (self.accessor.get)(entity)
    }

    /// Assigns the value, through `from_bridge` for converted fields.
    pub fn set(&self, entity: &mut E, value: Value) -> Result<()> {
        (self.accessor.set)(entity, value)
    }

    pub fn assignment(&self, entity: &E) -> Assignment<'_> {
        Assignment {
            column: &self.column,
            kind: self.kind,
            value: self.get(entity),
        }
    }
}

impl<E> fmt::Debug for FieldMeta<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("identity", &self.identity)
            .field("kind", &self.kind)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

/// Everything derived once per entity type: mapped fields, names, identity and
/// statement templates.
pub struct EntityMeta<E> {
    type_name: &'static str,
    table: Arc<str>,
    fields: Vec<FieldMeta<E>>,
    identity: Vec<usize>,
    select: Arc<SelectTemplate>,
    projections: RwLock<HashMap<Box<[usize]>, Arc<SelectTemplate>>>,
    insert: InsertTemplate,
    update: std::result::Result<UpdateTemplate, MappingError>,
    delete: std::result::Result<DeleteTemplate, MappingError>,
}

impl<E> EntityMeta<E> {
    /// Classifies every field and builds the templates.
    ///
    /// Ignored and private fields are left out. A remaining field that does not
    /// classify makes the whole type unmappable. Update and delete problems are
    /// kept and reported when those statements are requested.
    pub fn new(schema: Schema<E>) -> std::result::Result<Self, MappingError> {
        let entity = schema.type_name;
        let table: Arc<str> = table_name(entity, schema.table_name).into();
        let mut fields = Vec::with_capacity(schema.fields.len());
        for field in schema.fields {
            if field.ignore || !field.public {
                continue;
            }
            let unsupported = || MappingError::UnsupportedField {
                entity,
                field: field.name,
                ty: field.declared.to_string(),
            };
            let kind = PropertyKind::classify(
                &field.declared,
                field.adapter.as_ref().map(|v| &v.bridge),
            )
            .ok_or_else(unsupported)?;
            let accessor = field.accessor.ok_or_else(unsupported)?;
            fields.push(FieldMeta {
                name: field.name,
                column: column_name(field.name, field.column_name).into(),
                column_override: field.column_name,
                identity: field.identity,
                kind,
                adapter: field.adapter.map(|v| v.name),
                accessor,
            });
        }
        let identity = resolve_identity(&fields);
        let select = SelectTemplate::new(&table, &fields, (0..fields.len()).collect()).into();
        let insert = InsertTemplate::new(&table, &fields, &identity);
        let update = UpdateTemplate::new(entity, &table, &fields, &identity);
        let delete = DeleteTemplate::new(entity, &table, &fields);
        Ok(Self {
            type_name: entity,
            table,
            fields,
            identity,
            select,
            projections: Default::default(),
            insert,
            update,
            delete,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[FieldMeta<E>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta<E>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Indexes into [`EntityMeta::fields`] of the identity fields.
    pub fn identity(&self) -> &[usize] {
        &self.identity
    }

    pub fn identity_fields(&self) -> impl Iterator<Item = &FieldMeta<E>> {
        self.identity.iter().map(|&i| &self.fields[i])
    }

    /// Every mapped field in declaration order.
    pub fn select(&self) -> &Arc<SelectTemplate> {
        &self.select
    }

    /// Only the named fields, in the given order. Computed once per distinct projection.
    pub fn projection(&self, names: &[&str]) -> Result<Arc<SelectTemplate>> {
        let indexes = names
            .iter()
            .map(|name| {
                self.fields
                    .iter()
                    .position(|f| f.name == *name)
                    .ok_or_else(|| MappingError::UnknownField {
                        entity: self.type_name,
                        field: (*name).to_owned(),
                    })
            })
            .collect::<std::result::Result<Box<[usize]>, _>>()?;
        if let Some(template) = self
            .projections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&indexes)
        {
            return Ok(template.clone());
        }
        let mut projections = self
            .projections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let template = projections
            .entry(indexes.clone())
            .or_insert_with(|| SelectTemplate::new(&self.table, &self.fields, indexes.into()).into());
        Ok(template.clone())
    }

    pub fn insert(&self) -> &InsertTemplate {
        &self.insert
    }

    pub fn update(&self) -> Result<&UpdateTemplate> {
        self.update.as_ref().map_err(|e| e.clone().into())
    }

    pub fn delete(&self) -> Result<&DeleteTemplate> {
        self.delete.as_ref().map_err(|e| e.clone().into())
    }
}

impl<E> fmt::Debug for EntityMeta<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMeta")
            .field("type_name", &self.type_name)
            .field("table", &self.table)
            .field("fields", &self.fields)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
