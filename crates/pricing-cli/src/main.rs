//! pricing-cli
//!
//! Prices a resolved cart from a JSON file (or stdin) and prints one
//! response per subscription root.
//!
//! ```text
//! pricing-cli cart.json              # JSON responses on stdout
//! pricing-cli --summary cart.json    # human-readable summary
//! pricing-cli --today 2026-10-16T00:00:00Z --horizon 6 < cart.json
//! ```
//!
//! Logs go to stderr; tune them with `RUST_LOG`.

mod config;

use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use pricing_core::Cart;
use subscription_pricing::{Clock, FixedClock, SubscriptionPricer, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::{CliConfig, OutputFormat};

fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CliConfig::from_env_and_args(std::env::args().skip(1))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("pricing", %request_id);
    let _guard = span.enter();

    let cart = load_cart(config.cart_path.as_deref())?;
    tracing::info!(cart_id = %cart.id, items = cart.items.len(), "Loaded cart");

    let clock: Arc<dyn Clock> = match config.today {
        Some(today) => {
            tracing::info!(%today, "Using pinned date");
            Arc::new(FixedClock::new(today))
        }
        None => Arc::new(SystemClock::new()),
    };

    let pricer = SubscriptionPricer::new(&config.pricing, clock)?;
    let responses = pricer
        .price_cart(&cart)
        .inspect_err(|e| tracing::error!("Pricing failed: {}", e))?;

    match config.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&responses)?);
        }
        OutputFormat::Summary => {
            if responses.is_empty() {
                println!("No subscriptions in cart {}", cart.id);
            }
            for response in &responses {
                println!("{}", response.summary());
            }
        }
    }

    Ok(())
}

fn load_cart(path: Option<&Path>) -> anyhow::Result<Cart> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading cart from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading cart from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&raw).context("decoding cart JSON")
}
