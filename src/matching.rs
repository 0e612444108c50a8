//! Price-time priority matching.
//!
//! [`match_order`] runs one order against the opposite book: takes liquidity
//! maker-priced, applies the round-lot clamp, and honors an optional market
//! data gate. The incoming order is never inserted here; the caller decides
//! whether the remainder rests locally or is forwarded to the venue.

use crate::order_book::Book;
use crate::types::{MarketData, Order, Side};
use rust_decimal::Decimal;

/// One fill reported against the maker: its order fields plus the execution
/// identifiers. The taker-side report is synthesized by the coordinator.
#[derive(Clone, Debug)]
pub struct Execution {
    pub maker: Order,
    pub exec_id: String,
    pub exec_qty: u32,
    pub exec_price: Decimal,
}

/// Result of a match: the fills in price-then-time order of the makers
/// consumed, and what is left of the incoming order.
#[derive(Clone, Debug)]
pub struct MatchResult {
    pub executions: Vec<Execution>,
    pub remaining_qty: u32,
}

/// Formats the process-wide execution id: `"EXEC"` + 16 zero-padded digits.
pub fn format_exec_id(n: u64) -> String {
    format!("EXEC{:016}", n)
}

/// How far the incoming order may cross. The reference quote, when present
/// and nonzero, caps a buy at the quoted ask and floors a sell at the
/// quoted bid.
fn crossing_limit(order: &Order, market_data: Option<&MarketData>) -> Decimal {
    let mut limit = order.price;
    if let Some(md) = market_data {
        match order.side {
            Side::Buy => {
                if md.ask_price > Decimal::ZERO && md.ask_price < limit {
                    limit = md.ask_price;
                }
            }
            Side::Sell => {
                if md.bid_price > Decimal::ZERO && md.bid_price > limit {
                    limit = md.bid_price;
                }
            }
        }
    }
    limit
}

/// Matches `order` against the opposite side of `book`. Execution ids are
/// assigned from `next_exec_id` upward, one per fill. Returns `None` when
/// nothing crossed; the book is untouched in that case.
pub fn match_order(
    book: &mut Book,
    order: &Order,
    market_data: Option<&MarketData>,
    next_exec_id: u64,
) -> Option<MatchResult> {
    let price_limit = crossing_limit(order, market_data);
    let fills = match order.side {
        Side::Buy => book.take_from_asks(&order.security_id, price_limit, order.qty),
        Side::Sell => book.take_from_bids(&order.security_id, price_limit, order.qty),
    };
    if fills.is_empty() {
        return None;
    }
    let mut exec_id = next_exec_id;
    let mut filled = 0u32;
    let mut executions = Vec::with_capacity(fills.len());
    for fill in fills {
        filled += fill.quantity;
        executions.push(Execution {
            maker: fill.maker,
            exec_id: format_exec_id(exec_id),
            exec_qty: fill.quantity,
            exec_price: fill.price,
        });
        exec_id += 1;
    }
    Some(MatchResult {
        executions,
        remaining_qty: order.qty - filled,
    })
}
