//! Record identifier generation

use uuid::Uuid;

/// Mints record identifiers
///
/// Identifiers must be globally unique, non-empty and never reused. Take
/// pages in identifier order, so generators whose output sorts in creation
/// order give creation-ordered pagination.
pub trait IdGenerator: Send + Sync {
    /// Next fresh identifier
    fn next_id(&self) -> String;
}

/// UUIDv7 identifiers: millisecond timestamp prefix, monotonic within the
/// process, so the strings sort lexicographically in creation order
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}
