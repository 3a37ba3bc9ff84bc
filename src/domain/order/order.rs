use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::value_objects::{LineItem, OrderStatus, PaymentType};

// ============================================================================
// Order Record - Immutable Once Committed
// ============================================================================

/// A completed order as persisted by the store.
///
/// `total` is always derived from the line items at creation time, never
/// accepted as independent input; checkout is the only production code
/// path that constructs one. `id` is 0 until the store assigns a rowid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub total: i64,
    pub payment_type: PaymentType,
    pub status: OrderStatus,
    pub created_at: NaiveDateTime,
    pub completed_at: NaiveDateTime,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Check the defining invariant: the header total matches the items.
    pub fn total_matches_items(&self) -> bool {
        self.total == self.items.iter().map(|i| i.subtotal).sum::<i64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_order() -> Order {
        let mut double = LineItem::new(1, "Americano", 4500);
        double.set_quantity(2);

        Order {
            id: 0,
            order_no: "20260824-0001".to_string(),
            total: 14_000,
            payment_type: PaymentType::Cash,
            status: OrderStatus::Completed,
            created_at: NaiveDate::from_ymd_opt(2026, 8, 24)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            completed_at: NaiveDate::from_ymd_opt(2026, 8, 24)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            items: vec![double, LineItem::new(2, "Cafe Latte", 5000)],
        }
    }

    #[test]
    fn test_total_matches_items() {
        let order = sample_order();
        assert!(order.total_matches_items());

        let mut broken = sample_order();
        broken.total = 9999;
        assert!(!broken.total_matches_items());
    }

    #[test]
    fn test_order_serialization() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();

        assert!(json.contains("20260824-0001"));
        assert!(json.contains("\"CASH\""));
        assert!(json.contains("\"COMPLETED\""));

        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back.order_no, order.order_no);
        assert_eq!(back.items.len(), 2);
    }
}
