use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-map storage for world-wide singletons (input state, render frame,
/// gameplay settings). Not tied to any entity and never purged by erasure.
pub struct Resources {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut())
    }

    /// Get a resource, inserting the value produced by `init` if it is missing.
    pub fn get_or_insert_with<T: 'static + Send + Sync>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> &mut T {
        self.map
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(init()))
            .downcast_mut()
            .unwrap_or_else(|| unreachable!("resource map keyed by TypeId"))
    }

    /// Remove a resource, returning it if it existed.
    pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast().ok())
            .map(|b| *b)
    }

    pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct FrameCounter(u32);

    #[test]
    fn insert_and_get() {
        let mut res = Resources::new();
        res.insert(FrameCounter(3));
        res.insert("hello".to_string());
        assert_eq!(res.get::<FrameCounter>(), Some(&FrameCounter(3)));
        assert_eq!(res.get::<String>(), Some(&"hello".to_string()));
    }

    #[test]
    fn replace() {
        let mut res = Resources::new();
        res.insert(FrameCounter(1));
        res.insert(FrameCounter(2));
        assert_eq!(res.get::<FrameCounter>(), Some(&FrameCounter(2)));
    }

    #[test]
    fn get_or_insert() {
        let mut res = Resources::new();
        res.get_or_insert_with(FrameCounter::default).0 += 1;
        res.get_or_insert_with(FrameCounter::default).0 += 1;
        assert_eq!(res.get::<FrameCounter>(), Some(&FrameCounter(2)));
    }

    #[test]
    fn remove_resource() {
        let mut res = Resources::new();
        res.insert(FrameCounter(99));
        assert_eq!(res.remove::<FrameCounter>(), Some(FrameCounter(99)));
        assert!(!res.contains::<FrameCounter>());
    }
}
