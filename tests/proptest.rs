use proptest::prelude::*;

use matchbook::{Order, OrderBook, Price, Quantity, Side};

#[derive(Clone, Debug)]
enum Op {
    Insert { cents: u64, qty: Quantity, buy: bool },
    Cancel { id: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (9_900u64..=10_100, 1u64..=50, any::<bool>())
            .prop_map(|(cents, qty, buy)| Op::Insert { cents, qty, buy }),
        1 => (1u64..=60).prop_map(|id| Op::Cancel { id }),
    ]
}

fn apply(ops: &[Op]) -> (OrderBook, Quantity, Quantity) {
    let mut book = OrderBook::new();
    let mut inserted_bid = 0;
    let mut inserted_ask = 0;
    let mut next_id = 1u64;
    for op in ops {
        match *op {
            Op::Insert { cents, qty, buy } => {
                let side = if buy { Side::Bid } else { Side::Ask };
                let order = Order::new(next_id, Price::from_cents(cents), qty, side, 0);
                next_id += 1;
                if book.insert(order) {
                    match side {
                        Side::Bid => inserted_bid += qty,
                        Side::Ask => inserted_ask += qty,
                    }
                }
            }
            Op::Cancel { id } => {
                book.cancel(id);
            }
        }
    }
    (book, inserted_bid, inserted_ask)
}

proptest! {
    #[test]
    fn book_is_never_crossed_at_rest(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut book = OrderBook::new();
        let mut next_id = 1u64;
        for op in &ops {
            match *op {
                Op::Insert { cents, qty, buy } => {
                    let side = if buy { Side::Bid } else { Side::Ask };
                    book.insert(Order::new(next_id, Price::from_cents(cents), qty, side, 0));
                    next_id += 1;
                }
                Op::Cancel { id } => {
                    book.cancel(id);
                }
            }
            let bid = book.best_bid();
            let ask = book.best_ask();
            prop_assert!(bid.is_zero() || ask.is_zero() || bid < ask);
        }
    }

    #[test]
    fn filled_quantity_balances_across_sides(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        // cancels would remove quantity without a matching fill, so only
        // insert sequences are checked here
        let inserts: Vec<Op> = ops
            .into_iter()
            .filter(|op| matches!(op, Op::Insert { .. }))
            .collect();
        let (book, inserted_bid, inserted_ask) = apply(&inserts);
        prop_assert_eq!(
            inserted_bid - book.bid_volume(),
            inserted_ask - book.ask_volume()
        );
    }

    #[test]
    fn replay_yields_identical_state(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let (first, _, _) = apply(&ops);
        let (second, _, _) = apply(&ops);
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert_eq!(first.matched_orders(), second.matched_orders());
        prop_assert_eq!(first.bid_volume(), second.bid_volume());
        prop_assert_eq!(first.ask_volume(), second.ask_volume());
    }

    #[test]
    fn unknown_cancel_is_observably_idempotent(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let (mut book, _, _) = apply(&ops);
        let before = (
            book.best_bid(),
            book.best_ask(),
            book.bid_volume(),
            book.ask_volume(),
        );
        // far above any id `apply` can assign
        prop_assert!(!book.cancel(100_000));
        let after = (
            book.best_bid(),
            book.best_ask(),
            book.bid_volume(),
            book.ask_volume(),
        );
        prop_assert_eq!(before, after);
    }
}
