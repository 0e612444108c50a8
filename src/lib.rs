//! # A-share exchange front
//!
//! Trading core that sits between clients and an exchange venue for China
//! A-share markets (XSHG/XSHE/BJSE): a price/time-priority matching engine
//! with round-lot rules, a cross-trade risk guard, and a dispatch
//! coordinator that either prints its own executions (pure mode) or
//! pre-matches and reconciles with the downstream venue by
//! cancel-and-reforward (front mode).
//!
//! ## Entry point
//!
//! Use [`TradeSystem`] as the single entry point: create with
//! [`TradeSystem::new`] (pure) or [`TradeSystem::with_venue`] (front), then
//! feed wire messages to `handle_order`, `handle_cancel`,
//! `handle_market_data`, and `handle_venue_response`.
//!
//! ## Example
//!
//! ```rust
//! use ashare_front::{InMemorySink, TradeSystem};
//! use serde_json::json;
//!
//! let sink = InMemorySink::new();
//! let mut system = TradeSystem::new(Box::new(sink.clone()));
//! system.handle_order(&json!({
//!     "clOrderId": "1001",
//!     "market": "XSHG",
//!     "securityId": "600030",
//!     "side": "B",
//!     "price": 10.5,
//!     "qty": 200,
//!     "shareholderId": "SH001"
//! }));
//! let messages = sink.drain();
//! assert_eq!(messages.len(), 1); // confirmation, order now rests
//! assert_eq!(messages[0]["clOrderId"], "1001");
//! ```
//!
//! ## Lower-level API
//!
//! [`MatchingEngine`] and [`RiskGuard`] can be driven directly if you manage
//! the order lifecycle yourself.

pub mod api;
pub mod codec;
pub mod engine;
pub mod matching;
pub mod order_book;
pub mod order_gen;
pub mod risk;
pub mod sinks;
pub mod system;
pub mod types;

pub use engine::MatchingEngine;
pub use matching::{Execution, MatchResult};
pub use order_book::{Book, BookEntry, CancelError, CanceledEntry, Fill};
pub use risk::{RiskCheckResult, RiskGuard};
pub use sinks::{InMemorySink, MessageSink, StdoutSink};
pub use system::TradeSystem;
pub use types::{CancelOrder, Market, MarketData, Order, Side};
