use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use crate::order::Order;
use crate::types::{OrderId, Price, Quantity, Side};

/// One side of the book: price levels under a total order, FIFO queue per
/// level. The side tag decides iteration direction, so bids and asks are two
/// instances of the same structure rather than two types.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, VecDeque<Order>>,
}

impl BookSide {
    fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best live price: highest for bids, lowest for asks.
    pub fn best(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.last_key_value().map(|(&price, _)| price),
            Side::Ask => self.levels.first_key_value().map(|(&price, _)| price),
        }
    }

    /// Sum of remaining quantity over every resting order on this side,
    /// recomputed on demand.
    pub fn volume(&self) -> Quantity {
        self.levels.values().flatten().map(|order| order.quantity).sum()
    }

    /// Levels best-price-first: bids descending, asks ascending.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Price, &VecDeque<Order>)> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.iter().rev().map(|(&price, queue)| (price, queue))),
            Side::Ask => Box::new(self.levels.iter().map(|(&price, queue)| (price, queue))),
        }
    }

    fn push(&mut self, order: Order) {
        self.levels.entry(order.price).or_default().push_back(order);
    }

    fn queue_mut(&mut self, price: Price) -> Option<&mut VecDeque<Order>> {
        self.levels.get_mut(&price)
    }

    fn drop_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(|queue| queue.is_empty()) {
            self.levels.remove(&price);
        }
    }

    /// Removes the first order with a matching id. Levels are scanned in key
    /// order, so the scan is deterministic; survivors keep their queue order.
    fn cancel(&mut self, order_id: OrderId) -> bool {
        let found = self.levels.iter().find_map(|(&price, queue)| {
            queue
                .iter()
                .position(|order| order.id == order_id)
                .map(|pos| (price, pos))
        });
        let Some((price, pos)) = found else {
            return false;
        };
        if let Some(queue) = self.levels.get_mut(&price) {
            queue.remove(pos);
            if queue.is_empty() {
                self.levels.remove(&price);
            }
        }
        true
    }
}

/// Single-instrument matching engine under price-time priority. Owns both
/// sides exclusively; every public operation runs to completion, and the
/// matching pass is fully resolved before `insert` returns.
#[derive(Debug)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
    total_matches: u64,
    latencies: Vec<Duration>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            total_matches: 0,
            latencies: Vec::new(),
        }
    }

    /// Admits a valid order at the tail of its price level and immediately
    /// runs the matching pass. Returns false (no state change) for an order
    /// failing its validity predicate. One latency sample covering the full
    /// insert+match duration is recorded per accepted order.
    pub fn insert(&mut self, order: Order) -> bool {
        if !order.is_valid() {
            return false;
        }
        let start = Instant::now();
        match order.side {
            Side::Bid => self.bids.push(order),
            Side::Ask => self.asks.push(order),
        }
        self.match_orders();
        self.latencies.push(start.elapsed());
        true
    }

    /// Removes the first resting order with this id, bids scanned before
    /// asks. No matching pass follows: a cancel cannot cross the book.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        self.bids.cancel(order_id) || self.asks.cancel(order_id)
    }

    fn match_orders(&mut self) {
        loop {
            let (Some(best_bid), Some(best_ask)) = (self.bids.best(), self.asks.best()) else {
                break;
            };
            if best_bid < best_ask {
                break;
            }
            // Execution at the resting ask quote: the aggressor receives no
            // price improvement.
            self.match_level(best_bid, best_ask);
            self.bids.drop_level_if_empty(best_bid);
            self.asks.drop_level_if_empty(best_ask);
        }
    }

    /// Pairs the heads of the best bid and best ask queues until one level
    /// empties. The match counter increments once per pairing event, full or
    /// partial fill alike.
    fn match_level(&mut self, best_bid: Price, best_ask: Price) {
        let Some(bids) = self.bids.queue_mut(best_bid) else {
            return;
        };
        let Some(asks) = self.asks.queue_mut(best_ask) else {
            return;
        };
        let mut pairings = 0u64;
        loop {
            let (Some(bid), Some(ask)) = (bids.front_mut(), asks.front_mut()) else {
                break;
            };
            let fill = bid.quantity.min(ask.quantity);
            bid.reduce_quantity(fill);
            ask.reduce_quantity(fill);
            let bid_filled = bid.quantity == 0;
            let ask_filled = ask.quantity == 0;
            pairings += 1;
            if bid_filled {
                bids.pop_front();
            }
            if ask_filled {
                asks.pop_front();
            }
        }
        self.total_matches += pairings;
    }

    /// Highest live bid price, or zero if the side is empty.
    pub fn best_bid(&self) -> Price {
        self.bids.best().unwrap_or(Price::ZERO)
    }

    /// Lowest live ask price, or zero if the side is empty.
    pub fn best_ask(&self) -> Price {
        self.asks.best().unwrap_or(Price::ZERO)
    }

    pub fn bid_volume(&self) -> Quantity {
        self.bids.volume()
    }

    pub fn ask_volume(&self) -> Quantity {
        self.asks.volume()
    }

    /// Best ask minus best bid when both sides are live, zero otherwise.
    /// Matching runs synchronously after every insert, so a crossed spread is
    /// never observable here.
    pub fn spread(&self) -> Price {
        if self.bids.is_empty() || self.asks.is_empty() {
            return Price::ZERO;
        }
        self.best_ask().saturating_sub(self.best_bid())
    }

    /// Pairing events since construction.
    pub fn matched_orders(&self) -> u64 {
        self.total_matches
    }

    /// Mean of the per-insert latency samples; zero when none recorded. This
    /// is call duration, not a market timestamp.
    pub fn average_execution_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.latencies.iter().sum();
        total / self.latencies.len() as u32
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "order book state")?;
        writeln!(f, "bids:")?;
        for (price, queue) in self.bids.iter() {
            let volume: Quantity = queue.iter().map(|order| order.quantity).sum();
            writeln!(f, "  {price} x {volume}")?;
        }
        writeln!(f, "asks:")?;
        for (price, queue) in self.asks.iter() {
            let volume: Quantity = queue.iter().map(|order| order.quantity).sum();
            writeln!(f, "  {price} x {volume}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(id: OrderId, cents: u64, qty: Quantity) -> Order {
        Order::new(id, Price::from_cents(cents), qty, Side::Bid, 0)
    }

    fn ask(id: OrderId, cents: u64, qty: Quantity) -> Order {
        Order::new(id, Price::from_cents(cents), qty, Side::Ask, 0)
    }

    #[test]
    fn executes_at_resting_ask_price() {
        let mut book = OrderBook::new();
        assert!(book.insert(ask(1, 10000, 5)));
        // far-through bid still clears the 100.00 ask
        assert!(book.insert(bid(2, 10500, 5)));
        assert_eq!(book.bid_volume(), 0);
        assert_eq!(book.ask_volume(), 0);
        assert_eq!(book.matched_orders(), 1);
    }

    #[test]
    fn aggressor_sweeps_levels_in_price_order() {
        let mut book = OrderBook::new();
        book.insert(ask(1, 10000, 2));
        book.insert(ask(2, 10100, 2));
        book.insert(ask(3, 10200, 2));
        book.insert(bid(4, 10200, 5));

        assert_eq!(book.matched_orders(), 3);
        assert_eq!(book.best_ask(), Price::from_cents(10200));
        assert_eq!(book.ask_volume(), 1);
        assert_eq!(book.bid_volume(), 0);
    }

    #[test]
    fn fifo_within_level() {
        let mut book = OrderBook::new();
        book.insert(ask(1, 10000, 2));
        book.insert(ask(2, 10000, 2));
        book.insert(bid(3, 10000, 3));

        // first ask fully filled, second partially: its remainder rests
        assert_eq!(book.ask_volume(), 1);
        assert!(!book.cancel(1));
        assert!(book.cancel(2));
        assert_eq!(book.ask_volume(), 0);
    }

    #[test]
    fn partial_fill_counts_one_pairing() {
        let mut book = OrderBook::new();
        book.insert(bid(1, 10000, 10));
        book.insert(ask(2, 10000, 4));
        assert_eq!(book.matched_orders(), 1);
        assert_eq!(book.bid_volume(), 6);
    }

    #[test]
    fn cancel_scan_is_deterministic_and_idempotent() {
        let mut book = OrderBook::new();
        book.insert(bid(1, 10000, 10));
        assert!(book.cancel(1));
        assert!(!book.cancel(1));
        assert_eq!(book.bid_volume(), 0);
        assert_eq!(book.best_bid(), Price::ZERO);
    }

    #[test]
    fn display_lists_level_aggregates() {
        let mut book = OrderBook::new();
        book.insert(bid(1, 10000, 4));
        book.insert(bid(2, 10000, 6));
        book.insert(bid(3, 9900, 1));
        book.insert(ask(4, 10100, 3));

        let rendered = book.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "order book state",
                "bids:",
                "  100.00 x 10",
                "  99.00 x 1",
                "asks:",
                "  101.00 x 3",
            ]
        );
    }
}
