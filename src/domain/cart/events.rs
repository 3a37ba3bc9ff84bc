use serde::{Deserialize, Serialize};

// ============================================================================
// Cart Change Events
// ============================================================================

/// Change notifications emitted by [`Cart`](super::Cart) for the
/// presentation layer.
///
/// Ordering guarantee: within one logical mutation the item-level event is
/// sent first, then `TotalChanged` (only when the total actually moved),
/// then `EmptinessChanged` (only when emptiness flipped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// A new line item was appended at `index`.
    ItemAdded { index: usize },
    /// The line item at `index` changed quantity/subtotal in place.
    ItemChanged { index: usize },
    /// The line item at `index` was deleted.
    ItemRemoved { index: usize },
    /// The whole cart was reset in one step.
    Cleared,
    /// The running total moved to `total`.
    TotalChanged { total: i64 },
    /// The cart transitioned between empty and non-empty.
    EmptinessChanged { is_empty: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tags() {
        let json = serde_json::to_string(&CartEvent::ItemAdded { index: 2 }).unwrap();
        assert_eq!(json, r#"{"type":"item_added","index":2}"#);

        let json = serde_json::to_string(&CartEvent::TotalChanged { total: 14_000 }).unwrap();
        assert_eq!(json, r#"{"type":"total_changed","total":14000}"#);
    }
}
