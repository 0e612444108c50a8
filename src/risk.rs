//! Cross-trade risk guard.
//!
//! Tracks live exposure per shareholder/security/side and rejects any order
//! that would put the same shareholder on both sides of one instrument. The
//! price relationship is irrelevant: a same-shareholder opposite is
//! prohibited whether or not it would cross the book.
//!
//! State is driven by the accept/execute/cancel hooks; unknown ids in the
//! execute and cancel hooks are silently ignored so events can be redriven
//! across modes without the order ever having entered the local book.

use crate::types::{Order, Side};
use std::collections::HashMap;

/// Outcome of the pre-match risk check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskCheckResult {
    Passed,
    CrossTrade,
}

#[derive(Clone, Debug)]
struct LiveOrder {
    cl_order_id: String,
    remaining_qty: u32,
}

#[derive(Debug, Default)]
struct SideLists {
    buys: Vec<LiveOrder>,
    sells: Vec<LiveOrder>,
}

impl SideLists {
    fn side(&self, side: Side) -> &Vec<LiveOrder> {
        match side {
            Side::Buy => &self.buys,
            Side::Sell => &self.sells,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<LiveOrder> {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }

    fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }
}

/// Live-order registry keyed shareholder -> security -> side. A location
/// index keeps the execute/cancel hooks O(1) in the number of shareholders.
#[derive(Debug, Default)]
pub struct RiskGuard {
    state: HashMap<String, HashMap<String, SideLists>>,
    /// clOrderId -> (shareholderId, securityId, side).
    locations: HashMap<String, (String, String, Side)>,
}

impl RiskGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes unless a live order with the same shareholder and security
    /// rests on the opposite side with quantity remaining.
    pub fn check_order(&self, order: &Order) -> RiskCheckResult {
        if let Some(by_security) = self.state.get(&order.shareholder_id) {
            if let Some(lists) = by_security.get(&order.security_id) {
                let opposite = lists.side(order.side.opposite());
                if opposite.iter().any(|o| o.remaining_qty > 0) {
                    return RiskCheckResult::CrossTrade;
                }
            }
        }
        RiskCheckResult::Passed
    }

    /// Registers a live order with its full quantity remaining. Re-accepting
    /// a known id is ignored (first registration wins).
    pub fn on_order_accepted(&mut self, order: &Order) {
        if self.locations.contains_key(&order.cl_order_id) {
            return;
        }
        self.state
            .entry(order.shareholder_id.clone())
            .or_default()
            .entry(order.security_id.clone())
            .or_default()
            .side_mut(order.side)
            .push(LiveOrder {
                cl_order_id: order.cl_order_id.clone(),
                remaining_qty: order.qty,
            });
        self.locations.insert(
            order.cl_order_id.clone(),
            (
                order.shareholder_id.clone(),
                order.security_id.clone(),
                order.side,
            ),
        );
    }

    /// Subtracts an execution from the order's remaining, saturating at
    /// zero; a fully filled order is evicted. Unknown ids are ignored.
    pub fn on_order_executed(&mut self, cl_order_id: &str, exec_qty: u32) {
        let Some((shareholder, security, side)) = self.locations.get(cl_order_id).cloned() else {
            return;
        };
        let mut drained = false;
        if let Some(lists) = self
            .state
            .get_mut(&shareholder)
            .and_then(|m| m.get_mut(&security))
        {
            let orders = lists.side_mut(side);
            if let Some(order) = orders.iter_mut().find(|o| o.cl_order_id == cl_order_id) {
                order.remaining_qty = order.remaining_qty.saturating_sub(exec_qty);
                drained = order.remaining_qty == 0;
            }
            if drained {
                orders.retain(|o| o.cl_order_id != cl_order_id);
            }
        }
        if drained {
            self.locations.remove(cl_order_id);
            self.prune(&shareholder, &security);
        }
    }

    /// Evicts a live order. Unknown ids are ignored.
    pub fn on_order_canceled(&mut self, orig_cl_order_id: &str) {
        let Some((shareholder, security, side)) = self.locations.remove(orig_cl_order_id) else {
            return;
        };
        if let Some(lists) = self
            .state
            .get_mut(&shareholder)
            .and_then(|m| m.get_mut(&security))
        {
            lists
                .side_mut(side)
                .retain(|o| o.cl_order_id != orig_cl_order_id);
        }
        self.prune(&shareholder, &security);
    }

    fn prune(&mut self, shareholder: &str, security: &str) {
        if let Some(by_security) = self.state.get_mut(shareholder) {
            if by_security.get(security).is_some_and(|l| l.is_empty()) {
                by_security.remove(security);
            }
            if by_security.is_empty() {
                self.state.remove(shareholder);
            }
        }
    }
}
