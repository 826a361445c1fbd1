//! Billing Calendar Math
//!
//! Month arithmetic and day counts for the supported period types.

use chrono::{DateTime, Months, Utc};
use pricing_core::{PaymentStrategy, PeriodType, PricingError, Result};

use crate::model::PricingContext;

/// Calendar months covered by one period unit
pub fn months_per_unit(period_type: PeriodType) -> Result<u32> {
    match period_type {
        PeriodType::Monthly => Ok(1),
        PeriodType::Quarterly => Ok(3),
        PeriodType::Annually => Ok(12),
        other => Err(PricingError::invalid(format!(
            "period type {other} has no month-based billing cycle"
        ))),
    }
}

/// Nominal day count of a period, used for per-day rates
pub fn days_in_period(period_type: PeriodType, frequency: u32) -> Result<u32> {
    let base: u32 = match period_type {
        PeriodType::Monthly => 30,
        PeriodType::Quarterly => 90,
        PeriodType::Annually => 365,
        other => {
            return Err(PricingError::invalid(format!(
                "period type {other} has no nominal day count"
            )));
        }
    };
    base.checked_mul(frequency)
        .ok_or_else(|| PricingError::invalid(format!("period frequency {frequency} is too large")))
}

/// Bill date of `period`, given the bill date that precedes it
///
/// Pure: callable for any period number, which is what lets an in-advance
/// period look one period ahead to find its own end.
pub fn next_bill_date(
    period: u32,
    previous_bill_date: DateTime<Utc>,
    context: &PricingContext,
) -> Result<DateTime<Utc>> {
    if period == 1 && context.payment_strategy == PaymentStrategy::InAdvance {
        return Ok(previous_bill_date);
    }

    let months = months_per_unit(context.period_type)?
        .checked_mul(context.period_frequency)
        .ok_or_else(|| {
            PricingError::invalid(format!(
                "period frequency {} is too large",
                context.period_frequency
            ))
        })?;

    previous_bill_date
        .checked_add_months(Months::new(months))
        .ok_or_else(|| {
            PricingError::invalid(format!(
                "bill date {previous_bill_date} + {months} months is out of range"
            ))
        })
}
