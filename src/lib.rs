pub mod config;
pub mod csv;
pub mod generator;
pub mod order;
pub mod orderbook;
pub mod types;

pub use order::Order;
pub use orderbook::OrderBook;
pub use types::{Nanos, OrderId, Price, Quantity, Side};
