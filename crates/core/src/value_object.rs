//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A price
/// of `2.50` is the same price wherever it appears; two grocery items with equal
/// names and prices are still different entities.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Price(f64);
///
/// impl ValueObject for Price {}
///
/// assert_eq!(Price(2.5), Price(2.5));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
