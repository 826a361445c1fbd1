//! # subscription-pricing
//!
//! Prices subscription purchases and changes inside a shopping cart: the
//! amount due at checkout and a forward schedule of estimated payments.
//!
//! ## Pipeline
//!
//! ```text
//! Cart ──▶ subscription_roots ──▶ PricingContextBuilder ──▶ ResponseAssembler
//!                                  │  PeriodScheduler        │  ProrationCalculator
//!                                  ▼                         ▼
//!                            PricingContext            PriceResponse
//!                            (12 periods)              due now + 12 payments
//! ```
//!
//! ## Billing Philosophies
//!
//! - **IN_ADVANCE** - each period is billed on its first day
//! - **POSTPAID** - each period is billed the day after it ends
//!
//! A postpaid subscription edited mid-cycle keeps its existing bill date:
//! the first period runs from today up to that date and is prorated per day.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use subscription_pricing::{PricingConfig, SubscriptionPricer, SystemClock};
//!
//! let pricer = SubscriptionPricer::new(&PricingConfig::default(), Arc::new(SystemClock::new()))?;
//! for response in pricer.price_cart(&cart)? {
//!     println!("{}", response.summary());
//! }
//! ```

pub mod assembler;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod context;
pub mod model;
pub mod pricer;
pub mod proration;
pub mod schedule;

#[cfg(test)]
mod test_support;

pub use assembler::ResponseAssembler;
pub use classifier::{SubscriptionRoot, subscription_roots};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DEFAULT_HORIZON, PricingConfig};
pub use context::PricingContextBuilder;
pub use model::{
    EstimatedFuturePayment, ItemPriceDetail, PeriodDefinition, PriceResponse, PriceTotals,
    PricingContext, sum_field,
};
pub use pricer::SubscriptionPricer;
pub use proration::{ProrationAdjustments, ProrationCalculator, StandardAdjustments};
pub use schedule::PeriodScheduler;
