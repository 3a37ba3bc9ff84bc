// ============================================================================
// Order Domain - Completed Orders And The Path That Creates Them
// ============================================================================
//
// This module contains all order-specific code:
// - Value objects (LineItem, PaymentType, OrderStatus)
// - Record (the immutable Order)
// - Errors (CheckoutError taxonomy)
// - Checkout (the sole write path from cart to store)
//
// ============================================================================

pub mod checkout;
pub mod errors;
pub mod order;
pub mod value_objects;

pub use checkout::*;
pub use errors::*;
pub use order::*;
pub use value_objects::*;
