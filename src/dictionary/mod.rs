/*!
 * Dictionary module: entries and word combinations.
 *
 * - `payload`: the two-word request shape and canonical pair ordering
 * - `entry_store`: get-or-create and orphan cleanup of entries
 * - `combinations`: create/update/delete of combinations with duplicate
 *   detection and post-commit entry cleanup
 */

pub mod payload;
pub mod entry_store;
pub mod combinations;

// Re-export main types
pub use combinations::CombinationManager;
pub use entry_store::EntryStore;
pub use payload::{CanonicalPair, CombinationPayload, WordInput, MAX_LANGUAGE_LEN, MAX_WORD_LEN};
