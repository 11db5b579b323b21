//! Typed component queries
//!
//! A query pattern is `&T`, `&mut T`, `Option<&T>`, `Option<&mut T>` or a
//! tuple of those. Matches are yielded in ascending entity id order.

#![allow(private_interfaces)]

use std::any::TypeId;
use std::marker::PhantomData;
use std::ops::Range;

use crate::component::{Component, ComponentTable, Table, Tables};
use crate::entity::Entity;

/// Component kinds touched by a query pattern.
#[derive(Debug, Default)]
pub struct Access {
    pub(crate) required: Vec<TypeId>,
    pub(crate) optional: Vec<TypeId>,
    pub(crate) written: Vec<TypeId>,
}

impl Access {
    pub(crate) fn of<Q: WorldQuery>() -> Self {
        let mut access = Self::default();
        Q::access(&mut access);
        access
    }

    /// Whether some written kind is named more than once in the pattern.
    pub(crate) fn aliases(&self) -> bool {
        self.written.iter().any(|kind| {
            self.required
                .iter()
                .chain(&self.optional)
                .filter(|named| *named == kind)
                .count()
                > 1
        })
    }
}

/// A query pattern.
///
/// # Safety
/// `access` must report every kind `fetch` touches, and every kind it hands
/// out as `&mut` must be listed as written.
pub unsafe trait WorldQuery {
    type Item<'w>;

    fn access(access: &mut Access);

    /// Fetch the item for `id`, or `None` if a required kind is missing.
    ///
    /// # Safety
    /// The caller must not fetch the same id twice while an earlier item for
    /// it is alive when the pattern writes.
    unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>>;
}

/// Patterns that never hand out `&mut`, allowed through `World::query`.
///
/// # Safety
/// Implementors must not produce mutable references.
pub unsafe trait ReadOnlyQuery: WorldQuery {}

fn table<T: Component>(tables: &Tables) -> Option<&Table<T>> {
    tables.get(&TypeId::of::<T>())?.as_any().downcast_ref()
}

/// # Safety
/// The world must be uniquely borrowed for `'w` and no two live references
/// may point at the same slot.
#[allow(clippy::mut_from_ref)]
unsafe fn table_mut<'w, T: Component>(tables: &'w Tables) -> Option<&'w mut Table<T>> {
    let table = tables.get(&TypeId::of::<T>())?;
    let ptr = table.as_ref() as *const dyn ComponentTable as *mut dyn ComponentTable;
    (*ptr).as_any_mut().downcast_mut()
}

unsafe impl<T: Component> WorldQuery for &T {
    type Item<'w> = &'w T;

    fn access(access: &mut Access) {
        access.required.push(TypeId::of::<T>());
    }

    unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>> {
        table::<T>(tables)?.get(id)
    }
}

unsafe impl<T: Component> ReadOnlyQuery for &T {}

unsafe impl<T: Component> WorldQuery for &mut T {
    type Item<'w> = &'w mut T;

    fn access(access: &mut Access) {
        access.required.push(TypeId::of::<T>());
        access.written.push(TypeId::of::<T>());
    }

    unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>> {
        table_mut::<T>(tables)?.get_mut(id)
    }
}

unsafe impl<T: Component> WorldQuery for Option<&T> {
    type Item<'w> = Option<&'w T>;

    fn access(access: &mut Access) {
        access.optional.push(TypeId::of::<T>());
    }

    unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>> {
        Some(table::<T>(tables).and_then(|t| t.get(id)))
    }
}

unsafe impl<T: Component> ReadOnlyQuery for Option<&T> {}

unsafe impl<T: Component> WorldQuery for Option<&mut T> {
    type Item<'w> = Option<&'w mut T>;

    fn access(access: &mut Access) {
        access.optional.push(TypeId::of::<T>());
        access.written.push(TypeId::of::<T>());
    }

    unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>> {
        Some(table_mut::<T>(tables).and_then(|t| t.get_mut(id)))
    }
}

macro_rules! tuple_query {
    ($($q:ident),+) => {
        #[allow(non_snake_case)]
        unsafe impl<$($q: WorldQuery),+> WorldQuery for ($($q,)+) {
            type Item<'w> = ($($q::Item<'w>,)+);

            fn access(access: &mut Access) {
                $($q::access(access);)+
            }

            unsafe fn fetch<'w>(tables: &'w Tables, id: u32) -> Option<Self::Item<'w>> {
                Some(($($q::fetch(tables, id)?,)+))
            }
        }

        unsafe impl<$($q: ReadOnlyQuery),+> ReadOnlyQuery for ($($q,)+) {}
    };
}

tuple_query!(A);
tuple_query!(A, B);
tuple_query!(A, B, C);
tuple_query!(A, B, C, D);
tuple_query!(A, B, C, D, E);
tuple_query!(A, B, C, D, E, F);

/// Ids a query walks, already ascending.
pub(crate) enum Candidates<'w> {
    /// Borrowed from the smallest required table (read-only queries)
    Borrowed(std::slice::Iter<'w, u32>),
    /// Copied out of the table so writes cannot alias the id list
    Owned(std::vec::IntoIter<u32>),
    /// No required kind: every id the pool has issued
    All(Range<u32>),
}

impl Iterator for Candidates<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Candidates::Borrowed(ids) => ids.next().copied(),
            Candidates::Owned(ids) => ids.next(),
            Candidates::All(ids) => ids.next(),
        }
    }
}

/// Iterator returned by `World::query` / `World::query_mut`.
pub struct QueryIter<'w, Q: WorldQuery> {
    pub(crate) alive: &'w [bool],
    pub(crate) tables: &'w Tables,
    pub(crate) candidates: Candidates<'w>,
    pub(crate) _marker: PhantomData<Q>,
}

impl<'w, Q: WorldQuery> Iterator for QueryIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.candidates.by_ref() {
            if !self.alive.get(id as usize).copied().unwrap_or(false) {
                continue;
            }
            // Safety: candidates are strictly ascending, so each id is fetched once.
            if let Some(item) = unsafe { Q::fetch(self.tables, id) } {
                return Some((Entity(id), item));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pos;
    struct Vel;

    #[test]
    fn access_collects_every_kind() {
        let access = Access::of::<(&Pos, &mut Vel, Option<&Pos>)>();
        assert_eq!(access.required, vec![TypeId::of::<Pos>(), TypeId::of::<Vel>()]);
        assert_eq!(access.optional, vec![TypeId::of::<Pos>()]);
        assert_eq!(access.written, vec![TypeId::of::<Vel>()]);
        assert!(!access.aliases());
    }

    #[test]
    fn repeated_reads_do_not_alias() {
        assert!(!Access::of::<(&Pos, Option<&Pos>)>().aliases());
        assert!(Access::of::<(&mut Pos, &Pos)>().aliases());
        assert!(Access::of::<(&Vel, Option<&mut Vel>)>().aliases());
    }
}
