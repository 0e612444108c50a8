//! Harness binary.
//!
//! Default: line-delimited JSON over stdio. Each input line is a route tag
//! followed by one JSON object: `ORD` (new order), `CXL` (cancel), `MD`
//! (market data), `RSP` (venue response). Client-bound output is printed as
//! `[Ord]: {json}`, venue-bound as `[Res]: {json}`. `MODE=front` wires the
//! venue sink; the default is pure mode.
//!
//! With `PORT` set, serves the REST adapter instead (pure mode only).

use ashare_front::api;
use ashare_front::sinks::StdoutSink;
use ashare_front::TradeSystem;
use std::io::BufRead;

#[tokio::main]
async fn main() {
    env_logger::init();
    let port = std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok());
    match port {
        Some(port) => serve_http(port).await,
        None => run_stdio(),
    }
}

async fn serve_http(port: u16) {
    let app = api::create_router();
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.expect("bind");
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await.expect("serve");
}

fn run_stdio() {
    let front = std::env::var("MODE")
        .map(|m| m.eq_ignore_ascii_case("front"))
        .unwrap_or(false);
    let client = Box::new(StdoutSink::new("[Ord]:"));
    let mut system = if front {
        log::info!("front mode: venue traffic on [Res]");
        TradeSystem::with_venue(client, Box::new(StdoutSink::new("[Res]:")))
    } else {
        TradeSystem::new(client)
    };

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((tag, payload)) = line.split_once(char::is_whitespace) else {
            log::warn!("skipping line without payload: {}", line);
            continue;
        };
        let message: serde_json::Value = match serde_json::from_str(payload.trim()) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("skipping unparseable JSON: {}", e);
                continue;
            }
        };
        match tag {
            "ORD" => system.handle_order(&message),
            "CXL" => system.handle_cancel(&message),
            "MD" => system.handle_market_data(&message),
            "RSP" => system.handle_venue_response(&message),
            other => log::warn!("unknown route tag: {}", other),
        }
    }
}
