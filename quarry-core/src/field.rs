use crate::{AsValue, Conversion, DeclaredType, Result, Value};
use std::{any, borrow::Cow, fmt};

pub type Getter<E> = Box<dyn Fn(&E) -> Value + Send + Sync>;
pub type Setter<E> = Box<dyn Fn(&mut E, Value) -> Result<()> + Send + Sync>;

/// Reads and writes one field of `E` as a dynamic [`Value`].
pub struct Accessor<E> {
    pub get: Getter<E>,
    pub set: Setter<E>,
}

/// Conversion attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDef {
    pub name: &'static str,
    /// Declared type of the bridge, drives the classification.
    pub bridge: DeclaredType,
}

/// Declarative description of an entity field, the input of the classifier and
/// of the name and identity resolvers.
///
/// ```rust
/// use quarry_core::FieldDef;
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// let id = FieldDef::column("id", |u: &User| &u.id, |u: &mut User| &mut u.id).identity();
/// let name = FieldDef::column("name", |u: &User| &u.name, |u: &mut User| &mut u.name)
///     .column_name("user_name");
/// assert!(id.identity);
/// assert_eq!(name.column_name, Some("user_name"));
/// ```
pub struct FieldDef<E> {
    pub name: &'static str,
    pub declared: DeclaredType,
    pub column_name: Option<&'static str>,
    pub ignore: bool,
    pub identity: bool,
    pub public: bool,
    pub adapter: Option<AdapterDef>,
    pub accessor: Option<Accessor<E>>,
}

impl<E: 'static> FieldDef<E> {
    /// Field stored as is, `T` is any type with a native column representation.
    pub fn column<T>(name: &'static str, get: fn(&E) -> &T, get_mut: fn(&mut E) -> &mut T) -> Self
    where
        T: AsValue + Clone + 'static,
    {
        Self::new(
            name,
            T::declared_type(),
            Some(Accessor {
                get: Box::new(move |entity| get(entity).clone().as_value()),
                set: Box::new(move |entity, value| {
                    *get_mut(entity) = T::try_from_value(value)?;
                    Ok(())
                }),
            }),
        )
    }

    /// Field stored through the conversion `C`.
    pub fn converted<C>(
        name: &'static str,
        get: fn(&E) -> &C::Target,
        get_mut: fn(&mut E) -> &mut C::Target,
    ) -> Self
    where
        C: Conversion + 'static,
        C::Target: 'static,
    {
        let mut result = Self::new(
            name,
            DeclaredType::Other(Cow::Borrowed(any::type_name::<C::Target>())),
            Some(Accessor {
                get: Box::new(move |entity| C::to_bridge(get(entity)).as_value()),
                set: Box::new(move |entity, value| {
                    *get_mut(entity) = C::from_bridge(C::Bridge::try_from_value(value)?)?;
                    Ok(())
                }),
            }),
        );
        result.adapter = Some(AdapterDef {
            name: any::type_name::<C>(),
            bridge: <C::Bridge as AsValue>::declared_type(),
        });
        result
    }

    /// Field whose type has no column representation. It is fine as long as the
    /// field is ignored or private, otherwise the entity cannot be registered.
    pub fn opaque(name: &'static str, ty: &'static str) -> Self {
        Self::new(name, DeclaredType::Other(Cow::Borrowed(ty)), None)
    }
}

impl<E> FieldDef<E> {
    fn new(name: &'static str, declared: DeclaredType, accessor: Option<Accessor<E>>) -> Self {
        Self {
            name,
            declared,
            column_name: None,
            ignore: false,
            identity: false,
            public: true,
            adapter: None,
            accessor,
        }
    }

    pub fn column_name(mut self, column: &'static str) -> Self {
        self.column_name = Some(column);
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

impl<E> fmt::Debug for FieldDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("column_name", &self.column_name)
            .field("ignore", &self.ignore)
            .field("identity", &self.identity)
            .field("public", &self.public)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
