/*!
 * Collections: named groups of word combinations.
 *
 * A combination may belong to many collections. Membership changes never
 * mutate a shared combination; a combination left without memberships is
 * released through the combination manager.
 */

pub mod service;

pub use service::CollectionService;
