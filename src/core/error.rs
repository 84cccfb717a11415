use thiserror::Error;

use crate::core::types::EntityId;

/// Why an entity could not be recycled
///
/// The scheduler itself treats all of these as non-fatal: the entity is
/// simply left in place.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecycleError {
    #[error("entity {0:?} has no Recyclable component")]
    NotRecyclable(EntityId),

    #[error("no valid refund sink exists for entity {0:?}")]
    NoRefundSink(EntityId),

    #[error("refund sink {0:?} has no inventory")]
    SinkHasNoInventory(EntityId),
}

/// Top-level error for fallible scheduler operations
#[derive(Error, Debug)]
pub enum FoundryError {
    #[error(transparent)]
    Recycle(#[from] RecycleError),
}

pub type Result<T> = std::result::Result<T, FoundryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recycle_error_converts_and_displays() {
        let err: FoundryError = RecycleError::NotRecyclable(EntityId(3)).into();
        assert!(matches!(err, FoundryError::Recycle(_)));
        assert!(err.to_string().contains("no Recyclable component"));
    }
}
