//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A grocery item keeps its identity while it moves from pending to bought to
/// opened, even though every other attribute may be shared with a duplicate.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
