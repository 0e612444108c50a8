//! Core domain types: markets, sides, orders, cancels, market data, and the
//! reject codes used on the wire.
//!
//! Wire field names are camelCase (`clOrderId`, `securityId`, ...); sides
//! serialize as `"B"`/`"S"` and markets as their venue codes.

use rust_decimal::Decimal;

/// Round lot size: BUY orders are admitted in multiples of this; a resting
/// remainder below it is an odd-lot tail.
pub const ROUND_LOT: u32 = 100;

/// New-order reject: same shareholder on both sides of an instrument.
pub const CROSS_TRADE_REJECT_CODE: i32 = 1;
pub const CROSS_TRADE_REJECT_TEXT: &str = "Cross trade detected";

/// New-order reject: missing/invalid fields or admission-rule violation.
pub const INVALID_FORMAT_REJECT_CODE: i32 = 2;
pub const INVALID_FORMAT_REJECT_TEXT: &str = "Invalid order format";

/// Cancel reject: target order is not resting in the book.
pub const CANCEL_NOT_FOUND_REJECT_CODE: i32 = 1;
pub const CANCEL_NOT_FOUND_REJECT_TEXT: &str = "Order not found in book";

/// Cancel reject: the order index pointed at a level that no longer holds
/// the order. The stale index entry is cleared before this is returned.
pub const CANCEL_INDEX_REJECT_CODE: i32 = 2;
pub const CANCEL_INDEX_REJECT_TEXT: &str = "Order index inconsistency";

/// Trading venue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Market {
    #[serde(rename = "XSHG")]
    Xshg,
    #[serde(rename = "XSHE")]
    Xshe,
    #[serde(rename = "BJSE")]
    Bjse,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Xshg => "XSHG",
            Market::Xshe => "XSHE",
            Market::Bjse => "BJSE",
        }
    }
}

/// Order side. `"B"`/`"S"` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "B",
            Side::Sell => "S",
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// New-order request.
///
/// Admission rules (`validate`): positive price, positive quantity, and BUY
/// quantities in round lots. SELL may be odd-lot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub cl_order_id: String,
    pub market: Market,
    pub security_id: String,
    pub side: Side,
    pub price: Decimal,
    pub qty: u32,
    pub shareholder_id: String,
}

impl Order {
    /// Checks the admission rules that field types alone cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.price <= Decimal::ZERO {
            return Err(format!("price must be positive, got {}", self.price));
        }
        if self.qty == 0 {
            return Err("qty must be positive".to_string());
        }
        if self.side == Side::Buy && self.qty % ROUND_LOT != 0 {
            return Err(format!(
                "BUY qty must be a multiple of {}, got {}",
                ROUND_LOT, self.qty
            ));
        }
        Ok(())
    }
}

/// Cancel request. `orig_cl_order_id` names the resting order to remove;
/// `cl_order_id` identifies the cancel itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrder {
    pub cl_order_id: String,
    pub orig_cl_order_id: String,
    pub market: Market,
    pub security_id: String,
    pub shareholder_id: String,
    pub side: Side,
}

/// Reference quote for one instrument. A zero price on either side means
/// "no constraint" for that side.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub market: Market,
    pub security_id: String,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
}
