// ============================================================================
// Cart Domain - The Order In Progress
// ============================================================================
//
// This module contains the mutable cart aggregate and its change events:
// - Aggregate (Cart with add/adjust/remove/clear and the running total)
// - Events (CartEvent change notifications for the presentation layer)
//
// ============================================================================

pub mod aggregate;
pub mod events;

pub use aggregate::*;
pub use events::*;
