//! JSON wire codec: parse and validate inbound messages, build outbound
//! responses.
//!
//! Inbound parsing is strict: a missing field, a type mismatch, an unknown
//! market/side, or an admission-rule violation all fail, and the coordinator
//! answers with an invalid-format reject. Outbound prices are emitted as
//! JSON numbers with exact decimal text.

use crate::order_book::CanceledEntry;
use crate::types::{
    CancelOrder, MarketData, Order, INVALID_FORMAT_REJECT_CODE, INVALID_FORMAT_REJECT_TEXT,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Fields echoed back on an invalid-format reject when the raw input
/// carried them.
const ECHO_FIELDS: [&str; 8] = [
    "clOrderId",
    "origClOrderId",
    "market",
    "securityId",
    "side",
    "price",
    "qty",
    "shareholderId",
];

/// Parses and validates a new-order message.
pub fn parse_order(input: &Value) -> Result<Order, String> {
    let order: Order = serde_json::from_value(input.clone()).map_err(|e| e.to_string())?;
    order.validate()?;
    Ok(order)
}

/// Parses and validates a cancel message.
pub fn parse_cancel(input: &Value) -> Result<CancelOrder, String> {
    serde_json::from_value(input.clone()).map_err(|e| e.to_string())
}

/// Parses a market-data update. Zero prices are legal ("no constraint");
/// negative prices are not.
pub fn parse_market_data(input: &Value) -> Result<MarketData, String> {
    let md: MarketData = serde_json::from_value(input.clone()).map_err(|e| e.to_string())?;
    if md.bid_price < Decimal::ZERO || md.ask_price < Decimal::ZERO {
        return Err(format!(
            "quote prices must be non-negative, got bid {} ask {}",
            md.bid_price, md.ask_price
        ));
    }
    Ok(md)
}

/// Serializes an order's fields the way every outbound message echoes them.
pub fn order_to_json(order: &Order) -> Value {
    let mut m = Map::new();
    m.insert("clOrderId".into(), Value::String(order.cl_order_id.clone()));
    m.insert("market".into(), Value::String(order.market.as_str().into()));
    m.insert("securityId".into(), Value::String(order.security_id.clone()));
    m.insert("side".into(), Value::String(order.side.as_str().into()));
    m.insert("price".into(), number(order.price));
    m.insert("qty".into(), order.qty.into());
    m.insert(
        "shareholderId".into(),
        Value::String(order.shareholder_id.clone()),
    );
    Value::Object(m)
}

/// New-order confirmation: the order fields, nothing else.
pub fn order_confirm(order: &Order) -> Value {
    order_to_json(order)
}

/// New-order reject: the order fields plus code and text.
pub fn order_reject(order: &Order, code: i32, text: &str) -> Value {
    let mut v = order_to_json(order);
    let m = v.as_object_mut().expect("object");
    m.insert("rejectCode".into(), code.into());
    m.insert("rejectText".into(), Value::String(text.into()));
    v
}

/// Reject for input that failed parsing: echoes whatever identifying fields
/// the raw message carried, plus the invalid-format code.
pub fn invalid_format_reject(input: &Value) -> Value {
    let mut m = Map::new();
    if let Some(obj) = input.as_object() {
        for key in ECHO_FIELDS {
            if let Some(v) = obj.get(key) {
                m.insert(key.into(), v.clone());
            }
        }
    }
    m.insert("rejectCode".into(), INVALID_FORMAT_REJECT_CODE.into());
    m.insert(
        "rejectText".into(),
        Value::String(INVALID_FORMAT_REJECT_TEXT.into()),
    );
    Value::Object(m)
}

/// Execution report for one participant: their order fields plus the
/// execution identifiers.
pub fn execution(order: &Order, exec_id: &str, exec_qty: u32, exec_price: Decimal) -> Value {
    let mut v = order_to_json(order);
    let m = v.as_object_mut().expect("object");
    m.insert("execId".into(), Value::String(exec_id.into()));
    m.insert("execQty".into(), exec_qty.into());
    m.insert("execPrice".into(), number(exec_price));
    v
}

fn cancel_echo(cancel: &CancelOrder) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("clOrderId".into(), Value::String(cancel.cl_order_id.clone()));
    m.insert(
        "origClOrderId".into(),
        Value::String(cancel.orig_cl_order_id.clone()),
    );
    m.insert("market".into(), Value::String(cancel.market.as_str().into()));
    m.insert("securityId".into(), Value::String(cancel.security_id.clone()));
    m.insert(
        "shareholderId".into(),
        Value::String(cancel.shareholder_id.clone()),
    );
    m.insert("side".into(), Value::String(cancel.side.as_str().into()));
    m
}

/// Cancel confirmation: the cancel's fields plus the removed entry's
/// original quantity, price, filled and removed quantities.
pub fn cancel_confirm(cancel: &CancelOrder, entry: &CanceledEntry) -> Value {
    let mut m = cancel_echo(cancel);
    m.insert("qty".into(), entry.order.qty.into());
    m.insert("price".into(), number(entry.order.price));
    m.insert("cumQty".into(), entry.cum_qty.into());
    m.insert("canceledQty".into(), entry.canceled_qty.into());
    Value::Object(m)
}

/// Cancel reject with a distinguishing code.
pub fn cancel_reject(cancel: &CancelOrder, code: i32, text: &str) -> Value {
    let mut m = cancel_echo(cancel);
    m.insert("rejectCode".into(), code.into());
    m.insert("rejectText".into(), Value::String(text.into()));
    Value::Object(m)
}

/// Cancel request sent to the venue to recall a pre-matched maker.
pub fn venue_cancel_request(cl_order_id: &str, maker: &Order) -> Value {
    let mut m = Map::new();
    m.insert("clOrderId".into(), Value::String(cl_order_id.into()));
    m.insert(
        "origClOrderId".into(),
        Value::String(maker.cl_order_id.clone()),
    );
    m.insert("market".into(), Value::String(maker.market.as_str().into()));
    m.insert("securityId".into(), Value::String(maker.security_id.clone()));
    m.insert(
        "shareholderId".into(),
        Value::String(maker.shareholder_id.clone()),
    );
    m.insert("side".into(), Value::String(maker.side.as_str().into()));
    Value::Object(m)
}

/// Decimal as a JSON number with exact text ("10.5", not a float artifact).
fn number(d: Decimal) -> Value {
    serde_json::from_str::<serde_json::Number>(&d.to_string())
        .map(Value::Number)
        .unwrap_or_else(|_| Value::String(d.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Market, Side};
    use serde_json::json;

    fn valid_order_json() -> Value {
        json!({
            "clOrderId": "1001",
            "market": "XSHG",
            "securityId": "600030",
            "side": "B",
            "price": 10.5,
            "qty": 1000,
            "shareholderId": "SH001"
        })
    }

    #[test]
    fn parses_a_valid_order() {
        let order = parse_order(&valid_order_json()).unwrap();
        assert_eq!(order.cl_order_id, "1001");
        assert_eq!(order.market, Market::Xshg);
        assert_eq!(order.security_id, "600030");
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.price, "10.5".parse().unwrap());
        assert_eq!(order.qty, 1000);
        assert_eq!(order.shareholder_id, "SH001");
    }

    #[test]
    fn sell_side_may_be_odd_lot() {
        let mut v = valid_order_json();
        v["side"] = json!("S");
        v["qty"] = json!(50);
        let order = parse_order(&v).unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.qty, 50);
    }

    #[test]
    fn every_market_is_recognized() {
        for (market, expected) in [
            ("XSHG", Market::Xshg),
            ("XSHE", Market::Xshe),
            ("BJSE", Market::Bjse),
        ] {
            let mut v = valid_order_json();
            v["market"] = json!(market);
            assert_eq!(parse_order(&v).unwrap().market, expected);
        }
    }

    #[test]
    fn missing_fields_fail() {
        for field in [
            "clOrderId",
            "market",
            "securityId",
            "side",
            "price",
            "qty",
            "shareholderId",
        ] {
            let mut v = valid_order_json();
            v.as_object_mut().unwrap().remove(field);
            assert!(parse_order(&v).is_err(), "expected failure without {}", field);
        }
    }

    #[test]
    fn unknown_market_and_side_fail() {
        let mut v = valid_order_json();
        v["market"] = json!("NYSE");
        assert!(parse_order(&v).is_err());
        let mut v = valid_order_json();
        v["side"] = json!("X");
        assert!(parse_order(&v).is_err());
    }

    #[test]
    fn type_mismatches_fail() {
        let mut v = valid_order_json();
        v["price"] = json!("not_a_number");
        assert!(parse_order(&v).is_err());
        let mut v = valid_order_json();
        v["qty"] = json!("not_a_number");
        assert!(parse_order(&v).is_err());
        let mut v = valid_order_json();
        v["qty"] = json!(10.5);
        assert!(parse_order(&v).is_err());
    }

    #[test]
    fn admission_rules_enforced() {
        let mut v = valid_order_json();
        v["price"] = json!(0.0);
        assert!(parse_order(&v).is_err());
        let mut v = valid_order_json();
        v["price"] = json!(-1.0);
        assert!(parse_order(&v).is_err());
        let mut v = valid_order_json();
        v["qty"] = json!(0);
        assert!(parse_order(&v).is_err());
        // BUY must be round-lot.
        let mut v = valid_order_json();
        v["qty"] = json!(150);
        assert!(parse_order(&v).is_err());
        v["qty"] = json!(300);
        assert!(parse_order(&v).is_ok());
    }

    #[test]
    fn parses_a_valid_cancel() {
        let v = json!({
            "clOrderId": "C001",
            "origClOrderId": "1001",
            "market": "XSHG",
            "securityId": "600030",
            "shareholderId": "SH001",
            "side": "B"
        });
        let cancel = parse_cancel(&v).unwrap();
        assert_eq!(cancel.cl_order_id, "C001");
        assert_eq!(cancel.orig_cl_order_id, "1001");
        assert_eq!(cancel.side, Side::Buy);
    }

    #[test]
    fn cancel_requires_orig_id() {
        let v = json!({
            "clOrderId": "C001",
            "market": "XSHG",
            "securityId": "600030",
            "shareholderId": "SH001",
            "side": "B"
        });
        assert!(parse_cancel(&v).is_err());
        assert!(parse_cancel(&json!({})).is_err());
    }

    #[test]
    fn market_data_parses_and_rejects_negative_quotes() {
        let v = json!({
            "market": "XSHG",
            "securityId": "600030",
            "bidPrice": 10.4,
            "askPrice": 10.6
        });
        let md = parse_market_data(&v).unwrap();
        assert_eq!(md.bid_price, "10.4".parse().unwrap());
        let v = json!({
            "market": "XSHG",
            "securityId": "600030",
            "bidPrice": -1.0,
            "askPrice": 10.6
        });
        assert!(parse_market_data(&v).is_err());
    }

    #[test]
    fn confirm_echoes_order_fields_with_numeric_price() {
        let order = parse_order(&valid_order_json()).unwrap();
        let confirm = order_confirm(&order);
        assert_eq!(confirm["clOrderId"], "1001");
        assert_eq!(confirm["side"], "B");
        assert!(confirm["price"].is_number());
        assert_eq!(confirm["price"], json!(10.5));
        assert_eq!(confirm["qty"], json!(1000));
        assert!(confirm.get("execId").is_none());
        assert!(confirm.get("rejectCode").is_none());
    }

    #[test]
    fn execution_carries_exec_fields() {
        let order = parse_order(&valid_order_json()).unwrap();
        let exec = execution(&order, "EXEC0000000000000001", 500, "10.5".parse().unwrap());
        assert_eq!(exec["execId"], "EXEC0000000000000001");
        assert_eq!(exec["execQty"], json!(500));
        assert_eq!(exec["execPrice"], json!(10.5));
        assert_eq!(exec["clOrderId"], "1001");
    }

    #[test]
    fn invalid_format_reject_echoes_present_fields() {
        let input = json!({"clOrderId": "77", "side": "B", "unrelated": true});
        let reject = invalid_format_reject(&input);
        assert_eq!(reject["clOrderId"], "77");
        assert_eq!(reject["side"], "B");
        assert_eq!(reject["rejectCode"], json!(INVALID_FORMAT_REJECT_CODE));
        assert_eq!(reject["rejectText"], INVALID_FORMAT_REJECT_TEXT);
        assert!(reject.get("unrelated").is_none());
    }

    #[test]
    fn venue_cancel_request_targets_the_maker() {
        let maker = parse_order(&valid_order_json()).unwrap();
        let req = venue_cancel_request("CXL0000000000000001", &maker);
        assert_eq!(req["clOrderId"], "CXL0000000000000001");
        assert_eq!(req["origClOrderId"], "1001");
        assert_eq!(req["securityId"], "600030");
        assert_eq!(req["side"], "B");
    }
}
