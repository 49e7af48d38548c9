use crate::{Entity, EntityMeta, Result};
use anyhow::Context;
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Process wide cache of [`EntityMeta`], one entry per entity type.
///
/// Entries are built on first use and never change afterwards. A type that
/// fails to register is not cached, every attempt reports the error again.
#[derive(Default)]
pub struct Registry {
    entries: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::default);

impl Registry {
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn resolve<E: Entity>(&self) -> Result<Arc<EntityMeta<E>>> {
        let key = TypeId::of::<E>();
        if let Some(entry) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return downcast(entry.clone());
        }
        let meta = Arc::new(EntityMeta::new(E::schema()).with_context(|| {
            format!(
                "While registering entity `{}`",
                std::any::type_name::<E>()
            )
        })?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have registered it in the meantime, keep the first one.
        let entry = entries.entry(key).or_insert_with(|| {
            log::trace!(
                "Registered entity `{}` as table `{}` with {} fields",
                meta.type_name(),
                meta.table(),
                meta.fields().len()
            );
            meta.clone() as Arc<dyn Any + Send + Sync>
        });
        downcast(entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn downcast<E: Entity>(entry: Arc<dyn Any + Send + Sync>) -> Result<Arc<EntityMeta<E>>> {
    entry.downcast::<EntityMeta<E>>().map_err(|_| {
        anyhow::Error::msg(format!(
            "Registry entry of `{}` has an unexpected type",
            std::any::type_name::<E>()
        ))
    })
}
