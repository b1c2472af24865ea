use std::fmt::Display;
use std::hash::Hash;

/// Capability surface a persisted record exposes to the generic repository
/// and caching layers.
///
/// Identity rules: an entity whose identifier is still unassigned (`is_new`)
/// receives a fresh one on save; an assigned identifier means save replaces
/// the stored record with that identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Display + Send + Sync + 'static;
    type Filter: Send + Sync + 'static;

    /// Collection the entity is stored in; lower-cased type name.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    fn is_new(&self) -> bool;

    /// Give a new record its store identity.
    fn assign_fresh_id(&mut self);

    /// Exact-match filter for a single identifier.
    fn by_id(id: Self::Id) -> Self::Filter;

    /// Apply a filter to a materialized entity.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// The identifier a filter reduces to, when it is an exact-id filter.
    fn filter_id(filter: &Self::Filter) -> Option<&Self::Id>;

    /// Secondary cache key to invalidate when this entity changes.
    fn group_key(&self) -> Option<String>;
}
