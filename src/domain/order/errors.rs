// ============================================================================
// Checkout Errors
// ============================================================================

/// Everything that can go wrong between a filled cart and a durable order.
///
/// None of these are fatal: `EmptyCart` is cleared by adding items,
/// `InvalidPaymentType` is a malformed caller input rejected before any
/// side effect, and `Persistence` leaves the cart intact so the operator
/// can retry without re-entering items.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("unrecognized payment type: {0}")]
    InvalidPaymentType(String),

    #[error("failed to persist order")]
    Persistence(#[from] sqlx::Error),
}

impl CheckoutError {
    /// Stable kind tag carried on failure notifications.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::EmptyCart => "empty_cart",
            CheckoutError::InvalidPaymentType(_) => "invalid_payment_type",
            CheckoutError::Persistence(_) => "persistence_failure",
        }
    }
}
