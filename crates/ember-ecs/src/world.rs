use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use std::ops::Range;

use tracing::debug;

use crate::component::{Component, ComponentTable, Table, Tables};
use crate::entity::{Entity, EntityPool, DEFAULT_MAX_ENTITIES};
use crate::error::EcsError;
use crate::query::{Access, Candidates, QueryIter, ReadOnlyQuery, WorldQuery};
use crate::resource::Resources;

/// The central entity store. Owns the id pool, every component table, the
/// deletion queue, and world-wide resources.
pub struct World {
    pub(crate) entities: EntityPool,
    pub(crate) components: Tables,
    deletion_queue: VecDeque<Entity>,
    resources: Resources,
}

impl World {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTITIES)
    }

    /// Create a world whose id pool holds at most `max_entities` ids.
    pub fn with_capacity(max_entities: u32) -> Self {
        Self {
            entities: EntityPool::new(max_entities),
            components: HashMap::new(),
            deletion_queue: VecDeque::new(),
            resources: Resources::new(),
        }
    }

    // ---- Entity management ----

    /// Issue the lowest free entity id.
    ///
    /// # Panics
    /// Panics if the pool is exhausted; the ceiling is a configuration limit,
    /// not a recoverable runtime condition.
    pub fn spawn(&mut self) -> Entity {
        self.try_spawn().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Issue the lowest free entity id, reporting exhaustion instead of panicking.
    pub fn try_spawn(&mut self) -> Result<Entity, EcsError> {
        self.entities.allocate()
    }

    /// Remove `entity` from every component table and return its id to the pool.
    ///
    /// Erasing an id that is already free is a no-op.
    ///
    /// # Panics
    /// Panics if the id lies beyond the pool ceiling.
    pub fn erase_entity(&mut self, entity: Entity) {
        if let Err(err) = self.try_erase_entity(entity) {
            panic!("{err}");
        }
    }

    /// Fallible form of [`erase_entity`](Self::erase_entity). Returns whether
    /// the id was alive.
    pub fn try_erase_entity(&mut self, entity: Entity) -> Result<bool, EcsError> {
        let was_alive = self.entities.release(entity)?;
        for table in self.components.values_mut() {
            table.purge(entity.0);
        }
        Ok(was_alive)
    }

    /// Queue `entity` for erasure by the end-of-frame cleanup.
    pub fn mark_for_deletion(&mut self, entity: Entity) {
        self.deletion_queue.push_back(entity);
    }

    /// Whether `entity` is waiting in the deletion queue.
    pub fn is_marked_for_deletion(&self, entity: Entity) -> bool {
        self.deletion_queue.contains(&entity)
    }

    /// Number of queued deletions.
    pub fn pending_deletions(&self) -> usize {
        self.deletion_queue.len()
    }

    /// Erase every queued entity in FIFO order. Returns how many were alive.
    pub fn drain_deletions(&mut self) -> usize {
        let mut erased = 0;
        while let Some(entity) = self.deletion_queue.pop_front() {
            if self.try_erase_entity(entity).unwrap_or_else(|err| panic!("{err}")) {
                erased += 1;
            }
        }
        if erased > 0 {
            debug!(erased, remaining = self.entities.len(), "drained deletion queue");
        }
        erased
    }

    /// Check whether an entity id is currently issued.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Configured entity ceiling.
    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    // ---- Component management ----

    fn table_mut<T: Component>(&mut self) -> &mut Table<T> {
        self.components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Table::<T>::new()))
            .as_any_mut()
            .downcast_mut::<Table<T>>()
            .unwrap_or_else(|| unreachable!("component table keyed by TypeId"))
    }

    fn table<T: Component>(&self) -> Option<&Table<T>> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|t| t.as_any().downcast_ref::<Table<T>>())
    }

    /// Insert a component on an entity. Replaces any existing component of the same type.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        assert!(
            self.entities.is_alive(entity),
            "cannot insert component on dead entity {entity:?}"
        );
        self.table_mut::<T>().insert(entity.0, component);
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.table::<T>()?.get(entity.0)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.table_mut::<T>().get_mut(entity.0)
    }

    /// Remove a component from an entity. Returns `true` if it was present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.components
            .get_mut(&TypeId::of::<T>())
            .is_some_and(|table| table.purge(entity.0))
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.table::<T>().is_some_and(|t| t.contains(entity.0))
    }

    /// Whether the table for `T` holds any entry for this id, alive or not.
    /// Used to verify that erasure leaves nothing behind.
    pub fn table_contains<T: Component>(&self, entity: Entity) -> bool {
        self.table::<T>().is_some_and(|t| t.contains(entity.0))
    }

    /// Number of entries in the table for `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.table::<T>().map_or(0, |t| t.len())
    }

    /// Ids of every alive entity carrying `T`, in ascending order.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.table::<T>().map_or_else(Vec::new, |table| {
            table
                .iter()
                .map(|(id, _)| Entity(id))
                .filter(|&e| self.entities.is_alive(e))
                .collect()
        })
    }

    // ---- Queries ----

    /// Ids of the smallest required table, or `None` when a required kind has
    /// no table at all and nothing can match.
    fn driving_ids(&self, required: &[TypeId]) -> Option<&[u32]> {
        let mut smallest: Option<&[u32]> = None;
        for kind in required {
            let ids = self.components.get(kind)?.ids();
            if smallest.map_or(true, |s| ids.len() < s.len()) {
                smallest = Some(ids);
            }
        }
        smallest
    }

    fn issued_ids(&self) -> Range<u32> {
        0..self.entities.alive.len() as u32
    }

    /// Read-only query over entities matching the component pattern.
    ///
    /// # Example
    /// ```ignore
    /// for (entity, (transform, model)) in world.query::<(&Transform, &Model)>() {
    ///     // ...
    /// }
    /// ```
    pub fn query<Q: ReadOnlyQuery>(&self) -> QueryIter<'_, Q> {
        let access = Access::of::<Q>();
        let candidates = if access.required.is_empty() {
            Candidates::All(self.issued_ids())
        } else {
            Candidates::Borrowed(self.driving_ids(&access.required).unwrap_or(&[]).iter())
        };
        QueryIter {
            alive: &self.entities.alive,
            tables: &self.components,
            candidates,
            _marker: PhantomData,
        }
    }

    /// Query that may hand out `&mut` components.
    ///
    /// # Panics
    /// Panics if the pattern writes a component kind it also names elsewhere.
    pub fn query_mut<Q: WorldQuery>(&mut self) -> QueryIter<'_, Q> {
        let access = Access::of::<Q>();
        assert!(!access.aliases(), "query names a component kind twice");

        let candidates = if access.required.is_empty() {
            Candidates::All(self.issued_ids())
        } else {
            let ids = self.driving_ids(&access.required).unwrap_or(&[]);
            Candidates::Owned(ids.to_vec().into_iter())
        };
        QueryIter {
            alive: &self.entities.alive,
            tables: &self.components,
            candidates,
            _marker: PhantomData,
        }
    }

    // ---- Resources ----

    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(value);
    }

    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    pub fn resource_or_insert_with<T: 'static + Send + Sync>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> &mut T {
        self.resources.get_or_insert_with(init)
    }

    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
