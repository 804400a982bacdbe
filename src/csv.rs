use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::order::Order;
use crate::orderbook::OrderBook;
use crate::types::Side;

const ORDER_HEADER: &str = "order_id,price,quantity,is_buy,timestamp";
const BOOK_HEADER: &str = "side,price,quantity";

/// Why a single order line was rejected. Never escapes `read_orders`; a bad
/// line is skipped and the import keeps going.
#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),
    #[error("empty field")]
    EmptyField,
    #[error("bad integer: {0}")]
    Integer(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Price(#[from] crate::types::ParsePriceError),
    #[error("order failed validation")]
    Invalid,
}

fn parse_order_line(line: &str) -> Result<Order, ParseError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 5 {
        return Err(ParseError::FieldCount(fields.len()));
    }
    if fields.iter().any(|field| field.is_empty()) {
        return Err(ParseError::EmptyField);
    }

    let id = fields[0].parse()?;
    let price = fields[1].parse()?;
    let quantity = fields[2].parse()?;
    let side = match fields[3] {
        "1" | "true" => Side::Bid,
        _ => Side::Ask,
    };
    let arrival_time = fields[4].parse()?;

    let order = Order::new(id, price, quantity, side, arrival_time);
    if !order.is_valid() {
        return Err(ParseError::Invalid);
    }
    Ok(order)
}

fn format_order(order: &Order) -> String {
    format!(
        "{},{},{},{},{}",
        order.id,
        order.price,
        order.quantity,
        if order.side == Side::Bid { "1" } else { "0" },
        order.arrival_time
    )
}

/// Reads orders from a delimited-text file, skipping the header line. Fails
/// only when the file cannot be opened or read; malformed lines are skipped
/// silently.
pub fn read_orders(path: &Path) -> anyhow::Result<Vec<Order>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut orders = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        match parse_order_line(&line) {
            Ok(order) => orders.push(order),
            Err(err) => debug!(%err, line, "skipping malformed order line"),
        }
    }
    Ok(orders)
}

pub fn write_orders(path: &Path, orders: &[Order]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{ORDER_HEADER}")?;
    for order in orders {
        writeln!(writer, "{}", format_order(order))?;
    }
    writer.flush()?;
    Ok(())
}

/// Exports the resting book, one row per order: BID rows highest price first,
/// then ASK rows lowest price first. The quantity column is the individual
/// order's remaining quantity, not the level aggregate.
pub fn write_book(path: &Path, book: &OrderBook) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{BOOK_HEADER}")?;
    for (label, side) in [("BID", Side::Bid), ("ASK", Side::Ask)] {
        for (price, queue) in book.side(side).iter() {
            for order in queue {
                writeln!(writer, "{label},{price},{}", order.quantity)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
