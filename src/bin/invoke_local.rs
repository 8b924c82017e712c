//! CLI tool to invoke the view counter locally with a JSON event.
//!
//! Usage:
//! - `invoke_local event.json` — read the event from a file
//! - `invoke_local < event.json` — read the event from stdin
//!
//! Variables from a `.env` file are loaded first; set
//! `VIEW_COUNTER_BACKEND=memory` to run without AWS credentials.

use std::io::Read;

use resume_view_counter::config::CounterConfig;
use resume_view_counter::handler::ViewCounterHandler;
use resume_view_counter::telemetry;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    dotenv::dotenv().ok();
    telemetry::init();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let event: Value = serde_json::from_str(&raw)?;

    let config = CounterConfig::from_env()?;
    let counter = ViewCounterHandler::from_config(&config);

    let response = counter.handle_event(&event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
