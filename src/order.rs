use std::fmt;

use crate::types::{Nanos, OrderId, Price, Quantity, Side};

/// One resting or incoming order. Identity is immutable; only the remaining
/// quantity changes, and only downward, inside the matching pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
    pub arrival_time: Nanos,
}

impl Order {
    pub fn new(id: OrderId, price: Price, quantity: Quantity, side: Side, arrival_time: Nanos) -> Self {
        Self {
            id,
            price,
            quantity,
            side,
            arrival_time,
        }
    }

    /// Admission predicate. Construction never rejects; the book checks this
    /// before an order may rest.
    pub fn is_valid(&self) -> bool {
        self.id > 0 && !self.price.is_zero() && self.quantity > 0
    }

    pub(crate) fn reduce_quantity(&mut self, fill: Quantity) {
        debug_assert!(fill <= self.quantity);
        self.quantity -= fill;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} @ {} (ts {})",
            self.id, self.side, self.quantity, self.price, self.arrival_time
        )
    }
}
