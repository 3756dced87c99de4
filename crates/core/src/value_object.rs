//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are immutable: `Money` and catalog
/// entries are compared purely by their attribute values. To "modify" one,
/// build a new one.
///
/// ```ignore
/// let a = Money::from_major(70);
/// let b = Money::from_centavos(7_000);
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
