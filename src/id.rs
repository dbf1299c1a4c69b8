use crate::types::IdStrategy;
use uuid::Uuid;

/// Produce the key for the next document of a collection holding
/// `current_count` documents.
///
/// Auto-increment keys come from the current size, not from a high-water
/// mark, so a create that follows a delete can hand out a key that is
/// still in use.
pub fn next_id(current_count: usize, strategy: IdStrategy) -> String {
    match strategy {
        IdStrategy::AutoIncrement => (current_count + 1).to_string(),
        IdStrategy::RandomUnique => Uuid::new_v4().to_string(),
    }
}
