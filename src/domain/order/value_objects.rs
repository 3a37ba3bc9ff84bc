use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Value Objects
// ============================================================================

/// One product's quantity and computed subtotal within a cart or order.
///
/// Invariant: `subtotal == quantity * unit_price` after every mutation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub subtotal: i64,
}

impl LineItem {
    /// New quantity-1 line for a product.
    pub fn new(product_id: i64, product_name: &str, unit_price: i64) -> Self {
        Self {
            product_id,
            product_name: product_name.to_string(),
            quantity: 1,
            unit_price,
            subtotal: unit_price,
        }
    }

    /// Set the quantity and recompute the subtotal in the same step.
    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.subtotal = self.quantity * self.unit_price;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Card,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Card => "CARD",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized payment type: {0}")]
pub struct ParsePaymentTypeError(pub String);

impl FromStr for PaymentType {
    type Err = ParsePaymentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentType::Cash),
            "CARD" => Ok(PaymentType::Card),
            other => Err(ParsePaymentTypeError(other.to_string())),
        }
    }
}

/// Order lifecycle status. Checkout only ever produces `Completed`;
/// `Cancelled` exists for records written by back-office tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_starts_at_quantity_one() {
        let item = LineItem::new(7, "Americano", 4500);

        assert_eq!(item.quantity, 1);
        assert_eq!(item.subtotal, 4500);
        assert_eq!(item.subtotal, item.quantity * item.unit_price);
    }

    #[test]
    fn test_set_quantity_recomputes_subtotal() {
        let mut item = LineItem::new(7, "Americano", 4500);
        item.set_quantity(3);

        assert_eq!(item.quantity, 3);
        assert_eq!(item.subtotal, 13_500);
    }

    #[test]
    fn test_payment_type_round_trip() {
        assert_eq!("CASH".parse::<PaymentType>().unwrap(), PaymentType::Cash);
        assert_eq!("CARD".parse::<PaymentType>().unwrap(), PaymentType::Card);
        assert_eq!(PaymentType::Cash.as_str(), "CASH");
        assert_eq!(PaymentType::Card.to_string(), "CARD");
    }

    #[test]
    fn test_payment_type_rejects_unknown() {
        let err = "BITCOIN".parse::<PaymentType>().unwrap_err();
        assert!(err.to_string().contains("BITCOIN"));
    }

    #[test]
    fn test_payment_type_serialization() {
        let json = serde_json::to_string(&PaymentType::Card).unwrap();
        assert_eq!(json, "\"CARD\"");

        let back: PaymentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PaymentType::Card);
    }

    #[test]
    fn test_order_status_round_trip() {
        assert_eq!(
            "COMPLETED".parse::<OrderStatus>().unwrap(),
            OrderStatus::Completed
        );
        assert_eq!(
            "CANCELLED".parse::<OrderStatus>().unwrap(),
            OrderStatus::Cancelled
        );
        assert!("PENDING".parse::<OrderStatus>().is_err());
    }
}
