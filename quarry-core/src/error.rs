use crate::PropertyKind;
use thiserror::Error;

/// Failures of the mapping layer itself, as opposed to conversion or executor errors.
///
/// They travel inside [`crate::Error`], use `downcast_ref::<MappingError>()` to
/// inspect them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A public, non ignored field whose type does not classify.
    #[error("field `{entity}::{field}` of type `{ty}` cannot be mapped to a column")]
    UnsupportedField {
        entity: &'static str,
        field: &'static str,
        ty: String,
    },

    /// A projection or lookup named a field that is not mapped.
    #[error("`{entity}` has no mapped field named `{field}`")]
    UnknownField { entity: &'static str, field: String },

    /// The statement needs identity fields the entity does not have.
    #[error("`{entity}` has no identity field, cannot generate {statement}")]
    MissingIdentity {
        entity: &'static str,
        statement: &'static str,
    },

    /// Delete and fetch by id require a field named `id`.
    #[error("`{entity}` has no mapped field named `id`")]
    MissingIdField { entity: &'static str },

    /// Update with identity fields only.
    #[error("`{entity}` has no field to update besides its identity")]
    NothingToUpdate { entity: &'static str },

    /// A value that cannot be written as a literal of the property kind.
    #[error("cannot encode {value} as a {kind} literal")]
    Encoding { value: String, kind: PropertyKind },
}

impl MappingError {
    /// Errors about the shape of the entity, detected on registration or first use.
    pub fn is_definition(&self) -> bool {
        !self.is_encoding()
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, MappingError::Encoding { .. })
    }
}
