//! Shared test fixtures

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pricing_core::{
    CartItem, Currency, Flow, ItemAttributes, ItemPrice, Money, PaymentStrategy, PeriodType,
};
use rust_decimal::Decimal;

use crate::clock::{Clock, FixedClock};
use crate::model::PricingContext;

/// Midnight UTC of the given date
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::usd())
}

/// 2026-10-16, mid-afternoon
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).unwrap(),
    ))
}

/// Recurring item whose unit, recurring and subtotal prices are all `amount`
pub fn recurring_item(id: &str, period_type: PeriodType, amount: Decimal) -> CartItem {
    CartItem {
        id: id.into(),
        product_id: id.into(),
        quantity: 1,
        price: ItemPrice {
            period_type: Some(period_type),
            period_frequency: 1,
            unit_price: usd(amount),
            recurring_price: usd(amount),
            subtotal: usd(amount),
        },
        term_duration: None,
        attributes: ItemAttributes::default(),
        dependents: Vec::new(),
        separate_from_primary: false,
    }
}

/// CREATE context on 2026-10-16 with no periods scheduled yet
pub fn context_for(
    period_type: PeriodType,
    period_frequency: u32,
    payment_strategy: PaymentStrategy,
) -> PricingContext {
    PricingContext {
        root_item_id: "root".into(),
        flow: Flow::Create,
        existing_subscription_id: None,
        payment_strategy,
        period_type,
        period_frequency,
        term_duration: None,
        currency: Currency::usd(),
        atypical_next_bill_date: None,
        today: utc(2026, 10, 16),
        dependents_promoted: false,
        period_definitions: BTreeMap::new(),
    }
}
