use thiserror::Error;

/// Invariant violations in the entity store.
///
/// The store treats these as fatal: the panicking entry points (`spawn`,
/// `erase_entity`) surface this text as the diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity pool exhausted: all {capacity} ids are in use")]
    PoolExhausted { capacity: u32 },

    #[error("entity id {id} is outside the pool (capacity {capacity})")]
    OutOfRange { id: u32, capacity: u32 },
}
