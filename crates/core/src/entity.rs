//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Line items and archived transactions are entities: an edited line item is
/// still the same line item because its id does not change.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
