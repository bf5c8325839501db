//! Entity CRUD and the in-memory directory the resolvers work on.

use rb_core::RecordId;
use rb_schema::{Authority, Child, Driver, Entity, Escort, Institution, Route};
use rb_store::{OrderBy, RecordStore, TypedStore};
use tracing::{debug, info};

use crate::error::AppResult;

/// Summary of a record for listing.
#[derive(Debug, Clone)]
pub struct EntitySummary {
    pub id: RecordId,
    pub name: String,
    pub created_at: String,
}

impl EntitySummary {
    pub fn of<T: Entity>(entity: &T) -> Self {
        Self {
            id: entity.id().clone(),
            name: entity.display_name(),
            created_at: entity.created_at().to_string(),
        }
    }
}

/// Every record of a collection, newest first.
pub fn list_entities<T: Entity, S: RecordStore + ?Sized>(store: &S) -> AppResult<Vec<T>> {
    let entities: Vec<T> = store.list_all(OrderBy::CreatedAtDesc)?;
    debug!(collection = %T::COLLECTION, count = entities.len(), "listed records");
    Ok(entities)
}

pub fn get_entity<T: Entity, S: RecordStore + ?Sized>(store: &S, id: &RecordId) -> AppResult<T> {
    Ok(store.fetch(id)?)
}

/// Insert a new record. A blank id is replaced by a fresh one and the
/// store stamps `created_at`. Sub-items without an id get one, and phones
/// are reduced to digits before validation.
pub fn create_entity<T: Entity, S: RecordStore + ?Sized>(store: &S, mut entity: T) -> AppResult<T> {
    if entity.id().is_blank() {
        entity.set_id(RecordId::generate());
    }
    entity.set_created_at(String::new());
    entity.assign_sub_item_ids();
    entity.normalize_phones();
    entity.validate()?;

    let stored = store.insert_entity(&entity)?;
    info!(collection = %T::COLLECTION, id = %stored.id(), "created record");
    Ok(stored)
}

/// Overwrite an existing record by id. Last write wins.
pub fn update_entity<T: Entity, S: RecordStore + ?Sized>(store: &S, mut entity: T) -> AppResult<T> {
    entity.assign_sub_item_ids();
    entity.normalize_phones();
    entity.validate()?;

    let stored = store.update_entity(&entity)?;
    info!(collection = %T::COLLECTION, id = %stored.id(), "updated record");
    Ok(stored)
}

/// Delete by id. Records referencing it keep their dangling references.
pub fn delete_entity<T: Entity, S: RecordStore + ?Sized>(
    store: &S,
    id: &RecordId,
) -> AppResult<()> {
    store.delete_entity::<T>(id)?;
    info!(collection = %T::COLLECTION, id = %id, "deleted record");
    Ok(())
}

/// Already-fetched collections, for resolving cross-references without
/// going back to the store.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub children: Vec<Child>,
    pub institutions: Vec<Institution>,
    pub authorities: Vec<Authority>,
    pub drivers: Vec<Driver>,
    pub escorts: Vec<Escort>,
}

impl Directory {
    pub fn load<S: RecordStore + ?Sized>(store: &S) -> AppResult<Self> {
        Ok(Self {
            children: list_entities(store)?,
            institutions: list_entities(store)?,
            authorities: list_entities(store)?,
            drivers: list_entities(store)?,
            escorts: list_entities(store)?,
        })
    }

    pub fn child(&self, id: &RecordId) -> Option<&Child> {
        self.children.iter().find(|c| &c.id == id)
    }
}

/// Listing rows for a collection chosen at runtime.
pub fn list_summaries<S: RecordStore + ?Sized>(
    store: &S,
    collection: rb_schema::Collection,
) -> AppResult<Vec<EntitySummary>> {
    use rb_schema::Collection;

    fn summarize<T: Entity>(entities: Vec<T>) -> Vec<EntitySummary> {
        entities.iter().map(EntitySummary::of).collect()
    }

    Ok(match collection {
        Collection::Children => summarize(list_entities::<Child, _>(store)?),
        Collection::Institutions => summarize(list_entities::<Institution, _>(store)?),
        Collection::Authorities => summarize(list_entities::<Authority, _>(store)?),
        Collection::Drivers => summarize(list_entities::<Driver, _>(store)?),
        Collection::Escorts => summarize(list_entities::<Escort, _>(store)?),
        Collection::Routes => summarize(list_entities::<Route, _>(store)?),
    })
}
