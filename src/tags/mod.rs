//! Tag vocabulary validation.
//!
//! OSM tags suggested by the model are only trusted after the tag registry
//! (a taginfo-style statistics service) confirms the value actually exists
//! for the key. The contract is deliberately infallible: any transport or
//! parse problem counts as "not validated" and the tag is dropped, never the
//! search.

mod taginfo;

pub use taginfo::TaginfoClient;

/// Trait for tag-vocabulary authorities.
pub trait TagRegistry: Send + Sync {
    /// The registry name.
    fn name(&self) -> &'static str;

    /// Returns true iff `value` is a known value for `key`.
    ///
    /// Never fails: network and parse errors are treated as validation
    /// failure so a flaky registry degrades a tag, not a search.
    fn validate(&self, key: &str, value: &str) -> bool;
}
