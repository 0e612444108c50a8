//! Single-entry matching engine facade.
//!
//! Holds the book and the execution-id counter so the coordinator can match,
//! rest, cancel, and reduce orders without managing [`Book`] and
//! [`match_order`](crate::matching::match_order) directly.

use crate::matching::{self, MatchResult};
use crate::order_book::{Book, BookEntry, CancelError, CanceledEntry};
use crate::types::{MarketData, Order};
use rust_decimal::Decimal;

/// Matching engine: global two-sided book plus the monotonic execId counter
/// (starts at 1, never reset; execIds are unique within one process).
#[derive(Debug)]
pub struct MatchingEngine {
    book: Book,
    next_exec_id: u64,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            book: Book::new(),
            next_exec_id: 1,
        }
    }

    /// Pure matching against the opposite side. The incoming order is never
    /// inserted; consumed makers are decremented or removed. Returns `None`
    /// when nothing crossed.
    pub fn match_order(
        &mut self,
        order: &Order,
        market_data: Option<&MarketData>,
    ) -> Option<MatchResult> {
        let result = matching::match_order(&mut self.book, order, market_data, self.next_exec_id);
        if let Some(r) = &result {
            self.next_exec_id += r.executions.len() as u64;
        }
        result
    }

    /// Rests an order; a duplicate `clOrderId` is an idempotent no-op.
    /// Returns true if the order was inserted.
    pub fn add_order(&mut self, order: &Order) -> bool {
        self.book.add_order(order)
    }

    /// Removes a resting order; see [`Book::cancel_order`].
    pub fn cancel_order(&mut self, cl_order_id: &str) -> Result<CanceledEntry, CancelError> {
        self.book.cancel_order(cl_order_id)
    }

    /// Shrinks a resting order after an away fill; see
    /// [`Book::reduce_order_qty`].
    pub fn reduce_order_qty(&mut self, cl_order_id: &str, qty: u32) {
        self.book.reduce_order_qty(cl_order_id, qty);
    }

    /// Best bid price for a security, if any.
    pub fn best_bid(&self, security_id: &str) -> Option<Decimal> {
        self.book.best_bid(security_id)
    }

    /// Best ask price for a security, if any.
    pub fn best_ask(&self, security_id: &str) -> Option<Decimal> {
        self.book.best_ask(security_id)
    }

    pub fn has_resting_orders(&self) -> bool {
        self.book.has_resting_orders()
    }

    /// Snapshot of every resting entry (bids best-first, then asks).
    pub fn resting_orders(&self) -> Vec<BookEntry> {
        self.book.resting_orders()
    }
}
