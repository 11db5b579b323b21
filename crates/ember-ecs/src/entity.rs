use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::error::EcsError;

/// Default ceiling on simultaneously alive entities.
pub const DEFAULT_MAX_ENTITIES: u32 = 100_000;

/// An opaque entity id. Carries no data; existence is defined by the pool
/// and by presence in component tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Create an entity from a raw id (mainly for testing and persistence).
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw id of this entity.
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bounded pool of entity ids. Always hands out the lowest available id.
///
/// Ids below `high_water` that are not alive sit in `released`; ids at or
/// above it have never been issued. An id is alive iff it is in neither.
pub struct EntityPool {
    capacity: u32,
    high_water: u32,
    released: BinaryHeap<Reverse<u32>>,
    pub(crate) alive: Vec<bool>,
    len: usize,
}

impl EntityPool {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            high_water: 0,
            released: BinaryHeap::new(),
            alive: Vec::new(),
            len: 0,
        }
    }

    /// Take the lowest available id.
    pub fn allocate(&mut self) -> Result<Entity, EcsError> {
        let id = if let Some(Reverse(id)) = self.released.pop() {
            id
        } else if self.high_water < self.capacity {
            let id = self.high_water;
            self.high_water += 1;
            self.alive.push(false);
            id
        } else {
            return Err(EcsError::PoolExhausted {
                capacity: self.capacity,
            });
        };
        self.alive[id as usize] = true;
        self.len += 1;
        Ok(Entity(id))
    }

    /// Return an id to the pool. Returns `Ok(true)` if it was alive.
    pub fn release(&mut self, entity: Entity) -> Result<bool, EcsError> {
        if entity.0 >= self.capacity {
            return Err(EcsError::OutOfRange {
                id: entity.0,
                capacity: self.capacity,
            });
        }
        if !self.is_alive(entity) {
            return Ok(false);
        }
        self.alive[entity.0 as usize] = false;
        self.released.push(Reverse(entity.0));
        self.len -= 1;
        Ok(true)
    }

    /// Check if an entity id is currently issued.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.0 as usize).copied().unwrap_or(false)
    }

    /// Number of currently alive entities.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no alive entities.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured ceiling.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut pool = EntityPool::new(8);
        let e0 = pool.allocate().unwrap();
        let e1 = pool.allocate().unwrap();
        assert_eq!(e0.id(), 0);
        assert_eq!(e1.id(), 1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn lowest_released_id_first() {
        let mut pool = EntityPool::new(8);
        let ids: Vec<_> = (0..5).map(|_| pool.allocate().unwrap()).collect();
        pool.release(ids[3]).unwrap();
        pool.release(ids[1]).unwrap();
        assert_eq!(pool.allocate().unwrap().id(), 1);
        assert_eq!(pool.allocate().unwrap().id(), 3);
        assert_eq!(pool.allocate().unwrap().id(), 5);
    }

    #[test]
    fn double_release_is_noop() {
        let mut pool = EntityPool::new(4);
        let e = pool.allocate().unwrap();
        assert_eq!(pool.release(e), Ok(true));
        assert_eq!(pool.release(e), Ok(false));
        assert_eq!(pool.allocate().unwrap(), e);
        assert_eq!(pool.allocate().unwrap().id(), 1);
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut pool = EntityPool::new(2);
        pool.allocate().unwrap();
        pool.allocate().unwrap();
        assert_eq!(
            pool.allocate(),
            Err(EcsError::PoolExhausted { capacity: 2 })
        );
    }

    #[test]
    fn out_of_range_release() {
        let mut pool = EntityPool::new(2);
        assert_eq!(
            pool.release(Entity::from_raw(7)),
            Err(EcsError::OutOfRange { id: 7, capacity: 2 })
        );
    }
}
