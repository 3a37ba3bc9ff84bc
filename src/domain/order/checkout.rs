use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::cart::Cart;
use crate::store::OrderStore;

use super::errors::CheckoutError;
use super::order::Order;
use super::value_objects::{OrderStatus, PaymentType};

// ============================================================================
// Checkout - The Single Write Path Into The Order Store
// ============================================================================
//
// Orchestrates: Cart → Order → OrderStore.commit → Receipt
//
// ============================================================================

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// What the operator gets back after a successful checkout, kept around
/// as "last completed" for receipt display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: i64,
    pub order_no: String,
    pub total: i64,
    pub payment_type: PaymentType,
}

/// Success/failure notifications mirroring [`Checkout::complete`] outcomes.
#[derive(Debug, Clone)]
pub enum CheckoutEvent {
    Completed(Receipt),
    Failed { kind: &'static str, message: String },
}

pub struct Checkout {
    store: Arc<OrderStore>,
    last_completed: Option<Receipt>,
    events: broadcast::Sender<CheckoutEvent>,
}

impl Checkout {
    pub fn new(store: Arc<OrderStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            last_completed: None,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CheckoutEvent> {
        self.events.subscribe()
    }

    /// The most recent successful checkout, if any.
    pub fn last_completed(&self) -> Option<&Receipt> {
        self.last_completed.as_ref()
    }

    /// Convert the cart into a persisted order paid with `payment_type`
    /// ("CASH" or "CARD").
    ///
    /// On any failure the cart is left exactly as it was, so the operator
    /// can retry without re-entering items. On success the cart is cleared,
    /// which makes a duplicate invocation fail with `EmptyCart` instead of
    /// double-charging.
    pub async fn complete(
        &mut self,
        cart: &mut Cart,
        payment_type: &str,
    ) -> Result<Receipt, CheckoutError> {
        match self.try_complete(cart, payment_type).await {
            Ok(receipt) => {
                let _ = self.events.send(CheckoutEvent::Completed(receipt.clone()));
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), error = %err, "checkout failed");
                let _ = self.events.send(CheckoutEvent::Failed {
                    kind: err.kind(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn try_complete(
        &mut self,
        cart: &mut Cart,
        payment_type: &str,
    ) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let payment_type: PaymentType = payment_type
            .parse()
            .map_err(|_| CheckoutError::InvalidPaymentType(payment_type.to_string()))?;

        let now = Local::now().naive_local();
        let order_no = self.store.generate_order_no(now.date()).await?;

        // Items are copied out of the cart: the persisted order must be
        // immune to any later cart mutation.
        let order = Order {
            id: 0,
            order_no,
            total: cart.total_amount(),
            payment_type,
            status: OrderStatus::Completed,
            created_at: now,
            completed_at: now,
            items: cart.items().to_vec(),
        };

        let order_id = self.store.commit(&order).await?;

        // Only a durable commit clears the cart.
        cart.clear();

        let receipt = Receipt {
            order_id,
            order_no: order.order_no,
            total: order.total,
            payment_type,
        };

        tracing::info!(
            order_no = %receipt.order_no,
            total = receipt.total,
            payment_type = %receipt.payment_type,
            "payment completed"
        );

        self.last_completed = Some(receipt.clone());
        Ok(receipt)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
