//! Trade system coordinator: order lifecycle across risk, matching, and the
//! optional downstream venue.
//!
//! Runs in one of two modes, chosen by construction: **pure** (no venue
//! sink) prints its own executions; **front** (venue sink wired) pre-matches
//! internally, recalls the passive side from the venue, and only finalizes a
//! pre-match once every cancel has come back. Partial cancel rejections roll
//! back into a re-forward of the unfilled quantity.
//!
//! Every handler takes one wire message and runs it to completion; nothing
//! here suspends.

use crate::codec;
use crate::engine::MatchingEngine;
use crate::matching::{Execution, MatchResult};
use crate::order_book::CancelError;
use crate::risk::{RiskCheckResult, RiskGuard};
use crate::sinks::MessageSink;
use crate::types::{
    MarketData, Order, CANCEL_INDEX_REJECT_CODE, CANCEL_INDEX_REJECT_TEXT,
    CANCEL_NOT_FOUND_REJECT_CODE, CANCEL_NOT_FOUND_REJECT_TEXT, CROSS_TRADE_REJECT_CODE,
    CROSS_TRADE_REJECT_TEXT,
};
use log::warn;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// A provisional pre-match parked until the venue answers every passive-side
/// cancel. Resolution fires when `pending_cancels` reaches zero.
#[derive(Debug)]
struct PendingMatch {
    active_order: Order,
    /// Original wire message, kept verbatim for re-forwarding.
    raw_input: Value,
    executions: Vec<Execution>,
    remaining_qty: u32,
    pending_cancels: usize,
    confirmed: HashSet<String>,
    rejected: HashSet<String>,
}

/// The dispatch coordinator. Owns the matching engine, the risk guard, and
/// the pending-match tables; subordinates never call back up.
pub struct TradeSystem {
    engine: MatchingEngine,
    risk: RiskGuard,
    client_sink: Box<dyn MessageSink>,
    venue_sink: Option<Box<dyn MessageSink>>,
    /// Latest reference quote per security, advisory at match time only.
    quotes: HashMap<String, MarketData>,
    /// Active clOrderId -> parked pre-match.
    pending: HashMap<String, PendingMatch>,
    /// Pre-matched maker clOrderId -> active clOrderId.
    maker_to_active: HashMap<String, String>,
    /// Orders forwarded to the venue, mirrored into the local book once the
    /// venue confirms them.
    forwarded: HashMap<String, Order>,
    next_cancel_id: u64,
}

impl TradeSystem {
    /// Pure mode: the system is the sole venue.
    pub fn new(client_sink: Box<dyn MessageSink>) -> Self {
        Self {
            engine: MatchingEngine::new(),
            risk: RiskGuard::new(),
            client_sink,
            venue_sink: None,
            quotes: HashMap::new(),
            pending: HashMap::new(),
            maker_to_active: HashMap::new(),
            forwarded: HashMap::new(),
            next_cancel_id: 1,
        }
    }

    /// Front mode: pre-match internally, reconcile with the venue by
    /// cancel-and-reforward.
    pub fn with_venue(client_sink: Box<dyn MessageSink>, venue_sink: Box<dyn MessageSink>) -> Self {
        let mut system = Self::new(client_sink);
        system.venue_sink = Some(venue_sink);
        system
    }

    pub fn is_front(&self) -> bool {
        self.venue_sink.is_some()
    }

    /// Engine view for adapters and tests; the book is owned exclusively by
    /// the engine.
    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    /// Handles an inbound new-order message.
    pub fn handle_order(&mut self, input: &Value) {
        let order = match codec::parse_order(input) {
            Ok(order) => order,
            Err(e) => {
                warn!("rejecting malformed order: {}", e);
                self.client_sink.send(&codec::invalid_format_reject(input));
                return;
            }
        };
        if self.risk.check_order(&order) == RiskCheckResult::CrossTrade {
            self.client_sink.send(&codec::order_reject(
                &order,
                CROSS_TRADE_REJECT_CODE,
                CROSS_TRADE_REJECT_TEXT,
            ));
            return;
        }
        let result = self
            .engine
            .match_order(&order, self.quotes.get(&order.security_id));
        match result {
            None => match &self.venue_sink {
                Some(venue) => {
                    venue.send(input);
                    self.risk.on_order_accepted(&order);
                    self.forwarded.insert(order.cl_order_id.clone(), order);
                }
                None => {
                    self.engine.add_order(&order);
                    self.risk.on_order_accepted(&order);
                    self.client_sink.send(&codec::order_confirm(&order));
                }
            },
            Some(result) => {
                if self.is_front() {
                    self.park_pending(order, input.clone(), result);
                } else {
                    self.settle_local(order, result);
                }
            }
        }
    }

    /// Handles an inbound cancel message.
    pub fn handle_cancel(&mut self, input: &Value) {
        let cancel = match codec::parse_cancel(input) {
            Ok(cancel) => cancel,
            Err(e) => {
                warn!("rejecting malformed cancel: {}", e);
                self.client_sink.send(&codec::invalid_format_reject(input));
                return;
            }
        };
        if let Some(venue) = &self.venue_sink {
            venue.send(input);
            return;
        }
        match self.engine.cancel_order(&cancel.orig_cl_order_id) {
            Ok(entry) => {
                self.risk.on_order_canceled(&cancel.orig_cl_order_id);
                self.client_sink.send(&codec::cancel_confirm(&cancel, &entry));
            }
            Err(CancelError::NotFound) => {
                self.client_sink.send(&codec::cancel_reject(
                    &cancel,
                    CANCEL_NOT_FOUND_REJECT_CODE,
                    CANCEL_NOT_FOUND_REJECT_TEXT,
                ));
            }
            Err(CancelError::IndexInconsistent) => {
                self.client_sink.send(&codec::cancel_reject(
                    &cancel,
                    CANCEL_INDEX_REJECT_CODE,
                    CANCEL_INDEX_REJECT_TEXT,
                ));
            }
        }
    }

    /// Stores the latest reference quote for a security. Malformed updates
    /// are dropped; market data has no response channel.
    pub fn handle_market_data(&mut self, input: &Value) {
        match codec::parse_market_data(input) {
            Ok(md) => {
                self.quotes.insert(md.security_id.clone(), md);
            }
            Err(e) => warn!("ignoring malformed market data: {}", e),
        }
    }

    /// Handles a message from the venue (front mode). Classified by payload:
    /// an `execId` is an away fill, an `origClOrderId` is a cancel response,
    /// anything else is a new-order confirmation.
    pub fn handle_venue_response(&mut self, input: &Value) {
        if self.venue_sink.is_none() {
            warn!("dropping venue response in pure mode");
            return;
        }
        if input.get("execId").is_some() {
            self.on_venue_execution(input);
            return;
        }
        if let Some(orig) = input.get("origClOrderId").and_then(Value::as_str) {
            let orig = orig.to_string();
            match self.maker_to_active.get(&orig).cloned() {
                Some(active_id) => self.on_recall_response(&active_id, &orig, input),
                None => self.on_client_cancel_echo(&orig, input),
            }
            return;
        }
        // New-order confirmation: forward, and mirror the order locally so
        // later arrivals can pre-match against it.
        self.client_sink.send(input);
        if let Some(cl_order_id) = input.get("clOrderId").and_then(Value::as_str) {
            if let Some(order) = self.forwarded.remove(cl_order_id) {
                self.engine.add_order(&order);
            }
        }
    }

    /// Pure-mode match: print both sides of every fill, then rest any
    /// remainder of the incoming order with a confirmation for the residue.
    fn settle_local(&mut self, order: Order, result: MatchResult) {
        for exec in &result.executions {
            self.client_sink.send(&codec::execution(
                &exec.maker,
                &exec.exec_id,
                exec.exec_qty,
                exec.exec_price,
            ));
            self.client_sink.send(&codec::execution(
                &order,
                &exec.exec_id,
                exec.exec_qty,
                exec.exec_price,
            ));
            self.risk.on_order_executed(&exec.maker.cl_order_id, exec.exec_qty);
            self.risk.on_order_executed(&order.cl_order_id, exec.exec_qty);
        }
        if result.remaining_qty > 0 {
            let mut residual = order;
            residual.qty = result.remaining_qty;
            self.engine.add_order(&residual);
            self.risk.on_order_accepted(&residual);
            self.client_sink.send(&codec::order_confirm(&residual));
        }
    }

    /// Front-mode match: park the result and recall every consumed maker
    /// from the venue. Nothing reaches the client until every cancel has
    /// been answered.
    fn park_pending(&mut self, order: Order, raw_input: Value, result: MatchResult) {
        let Some(venue) = &self.venue_sink else {
            return;
        };
        for exec in &result.executions {
            let cancel_id = format!("CXL{:016}", self.next_cancel_id);
            self.next_cancel_id += 1;
            venue.send(&codec::venue_cancel_request(&cancel_id, &exec.maker));
            self.maker_to_active
                .insert(exec.maker.cl_order_id.clone(), order.cl_order_id.clone());
        }
        self.pending.insert(
            order.cl_order_id.clone(),
            PendingMatch {
                active_order: order,
                raw_input,
                remaining_qty: result.remaining_qty,
                pending_cancels: result.executions.len(),
                executions: result.executions,
                confirmed: HashSet::new(),
                rejected: HashSet::new(),
            },
        );
    }

    /// An execution the venue produced on its own: forward it and bring the
    /// local mirror and risk state in line.
    fn on_venue_execution(&mut self, input: &Value) {
        self.client_sink.send(input);
        let cl_order_id = input.get("clOrderId").and_then(Value::as_str);
        let exec_qty = input
            .get("execQty")
            .and_then(Value::as_u64)
            .and_then(|q| u32::try_from(q).ok());
        if let (Some(cl_order_id), Some(exec_qty)) = (cl_order_id, exec_qty) {
            self.engine.reduce_order_qty(cl_order_id, exec_qty);
            self.risk.on_order_executed(cl_order_id, exec_qty);
        } else {
            warn!("venue execution without clOrderId/execQty: {}", input);
        }
    }

    /// Venue answer to one of our pre-match recalls. Books the vote and
    /// resolves the pending match once all recalls are in.
    fn on_recall_response(&mut self, active_id: &str, maker_id: &str, input: &Value) {
        let Some(pm) = self.pending.get_mut(active_id) else {
            // Stale reverse-map entry; drop it.
            self.maker_to_active.remove(maker_id);
            return;
        };
        let rejected = input
            .get("rejectCode")
            .and_then(Value::as_i64)
            .unwrap_or(0)
            != 0;
        if rejected {
            pm.rejected.insert(maker_id.to_string());
        } else {
            pm.confirmed.insert(maker_id.to_string());
        }
        pm.pending_cancels = pm.pending_cancels.saturating_sub(1);
        if pm.pending_cancels == 0 {
            self.resolve_pending(active_id);
        }
    }

    /// A cancel response for a client-initiated cancel: forward the echo and
    /// retire the order locally when the venue confirmed.
    fn on_client_cancel_echo(&mut self, orig_cl_order_id: &str, input: &Value) {
        self.client_sink.send(input);
        let rejected = input
            .get("rejectCode")
            .and_then(Value::as_i64)
            .unwrap_or(0)
            != 0;
        if !rejected {
            self.risk.on_order_canceled(orig_cl_order_id);
            let _ = self.engine.cancel_order(orig_cl_order_id);
            self.forwarded.remove(orig_cl_order_id);
        }
    }

    /// All recalls answered: finalize confirmed fills, void rejected ones,
    /// and re-forward whatever is still unfilled. All output for one
    /// pre-match is emitted here, contiguously.
    fn resolve_pending(&mut self, active_id: &str) {
        let Some(pm) = self.pending.remove(active_id) else {
            return;
        };
        for exec in &pm.executions {
            self.maker_to_active.remove(&exec.maker.cl_order_id);
        }
        // Register the active order first so the confirmed fills below leave
        // its live remaining equal to the re-forwarded quantity.
        self.risk.on_order_accepted(&pm.active_order);
        let mut rejected_qty = 0u32;
        for exec in &pm.executions {
            if pm.confirmed.contains(&exec.maker.cl_order_id) {
                self.client_sink.send(&codec::execution(
                    &exec.maker,
                    &exec.exec_id,
                    exec.exec_qty,
                    exec.exec_price,
                ));
                self.client_sink.send(&codec::execution(
                    &pm.active_order,
                    &exec.exec_id,
                    exec.exec_qty,
                    exec.exec_price,
                ));
                self.risk
                    .on_order_executed(&exec.maker.cl_order_id, exec.exec_qty);
                self.risk
                    .on_order_executed(&pm.active_order.cl_order_id, exec.exec_qty);
            } else {
                // The venue filled this maker elsewhere; our provisional
                // fill is void.
                rejected_qty += exec.exec_qty;
            }
        }
        let unfilled = rejected_qty + pm.remaining_qty;
        if unfilled > 0 {
            let mut raw = pm.raw_input.clone();
            if let Some(obj) = raw.as_object_mut() {
                obj.insert("qty".into(), unfilled.into());
            }
            if let Some(venue) = &self.venue_sink {
                venue.send(&raw);
            }
            let mut residual = pm.active_order;
            residual.qty = unfilled;
            self.forwarded
                .insert(residual.cl_order_id.clone(), residual);
        }
    }
}
