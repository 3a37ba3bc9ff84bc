use tokio::sync::broadcast;

use crate::domain::order::LineItem;

use super::events::CartEvent;

// ============================================================================
// Cart - The Order Being Built
// ============================================================================

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Mutable working set of line items for the order in progress.
///
/// Single-writer by design: one till builds one cart at a time, and the
/// caller serializes mutations. Mutations never fail; out-of-range indices
/// from a stale view are silent no-ops. The running total is recomputed
/// from the line items after every mutation, never adjusted independently.
#[derive(Debug)]
pub struct Cart {
    items: Vec<LineItem>,
    total_amount: i64,
    events: broadcast::Sender<CartEvent>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            items: Vec::new(),
            total_amount: 0,
            events,
        }
    }

    /// Subscribe to change notifications. Receivers that lag behind the
    /// channel capacity miss events; the view re-reads state in that case.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add one unit of a product: merge into the existing line for that
    /// product, or append a new quantity-1 line. Always succeeds.
    pub fn add_item(&mut self, product_id: i64, product_name: &str, unit_price: i64) {
        let was_empty = self.is_empty();

        if let Some(index) = self.items.iter().position(|i| i.product_id == product_id) {
            let quantity = self.items[index].quantity + 1;
            self.items[index].set_quantity(quantity);
            self.emit(CartEvent::ItemChanged { index });
        } else {
            self.items
                .push(LineItem::new(product_id, product_name, unit_price));
            self.emit(CartEvent::ItemAdded {
                index: self.items.len() - 1,
            });
        }

        self.recalculate_total();
        self.emit_emptiness(was_empty);
    }

    /// Bump the quantity of the line at `index` by one.
    pub fn increase_quantity(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }

        let quantity = self.items[index].quantity + 1;
        self.items[index].set_quantity(quantity);
        self.emit(CartEvent::ItemChanged { index });
        self.recalculate_total();
    }

    /// Lower the quantity of the line at `index` by one; at quantity 1 the
    /// line is removed instead of reaching zero.
    pub fn decrease_quantity(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }

        if self.items[index].quantity <= 1 {
            self.remove_item(index);
        } else {
            let quantity = self.items[index].quantity - 1;
            self.items[index].set_quantity(quantity);
            self.emit(CartEvent::ItemChanged { index });
            self.recalculate_total();
        }
    }

    /// Delete the line at `index`.
    pub fn remove_item(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }

        let was_empty = self.is_empty();
        self.items.remove(index);
        self.emit(CartEvent::ItemRemoved { index });
        self.recalculate_total();
        self.emit_emptiness(was_empty);
    }

    /// Empty the cart. Strict no-op on an already empty cart so the view
    /// never sees a redundant reset.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }

        self.items.clear();
        self.emit(CartEvent::Cleared);
        self.recalculate_total();
        self.emit_emptiness(false);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn recalculate_total(&mut self) {
        let total: i64 = self.items.iter().map(|i| i.subtotal).sum();
        if total != self.total_amount {
            self.total_amount = total;
            self.emit(CartEvent::TotalChanged { total });
        }
    }

    fn emit_emptiness(&self, was_empty: bool) {
        if was_empty != self.is_empty() {
            self.emit(CartEvent::EmptinessChanged {
                is_empty: self.is_empty(),
            });
        }
    }

    fn emit(&self, event: CartEvent) {
        // send only fails when nobody is subscribed, which is fine.
        let _ = self.events.send(event);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
