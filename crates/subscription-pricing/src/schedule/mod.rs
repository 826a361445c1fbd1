//! Period Scheduling
//!
//! Lays out the contiguous forward schedule of billing periods for a
//! context.
//!
//! ```text
//! POSTPAID      start ──────────── end│bill
//!                                      start ──────────── end│bill
//!
//! IN_ADVANCE    bill│start ──────────── end
//!                                        bill│start ──────────── end
//! ```
//!
//! Periods never overlap or leave gaps: each period ends one nanosecond
//! before the next one starts.

pub mod calendar;

use std::collections::BTreeMap;

use pricing_core::{PaymentStrategy, Result};

use crate::clock::{end_of_previous_day, start_of_day};
use crate::model::{PeriodDefinition, PricingContext};
pub use calendar::{days_in_period, months_per_unit, next_bill_date};

/// Builds the forward schedule over a fixed horizon
#[derive(Clone, Copy, Debug)]
pub struct PeriodScheduler {
    horizon: u32,
}

impl PeriodScheduler {
    pub const fn new(horizon: u32) -> Self {
        Self { horizon }
    }

    pub const fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Compute periods `1..=horizon` for the context
    ///
    /// Reads the context's terms, today and atypical bill date; ignores any
    /// periods already present on it.
    pub fn build_schedule(
        &self,
        context: &PricingContext,
    ) -> Result<BTreeMap<u32, PeriodDefinition>> {
        let strategy = context.payment_strategy;
        let mut previous_bill_date = context
            .atypical_next_bill_date
            .map_or(context.today, start_of_day);
        let mut periods = BTreeMap::new();

        for period in 1..=self.horizon {
            let definition = match context.atypical_next_bill_date {
                // Short first period from today up to the carried-over bill date
                Some(atypical) if period == 1 && strategy == PaymentStrategy::Postpaid => {
                    let bill_date = start_of_day(atypical);
                    PeriodDefinition {
                        bill_date,
                        period_start_date: context.today,
                        period_end_date: end_of_previous_day(bill_date),
                    }
                }
                _ => {
                    let bill_date = next_bill_date(period, previous_bill_date, context)?;
                    let (period_start_date, following_bill_date) = match strategy {
                        PaymentStrategy::Postpaid => (previous_bill_date, bill_date),
                        PaymentStrategy::InAdvance => {
                            (bill_date, next_bill_date(period + 1, bill_date, context)?)
                        }
                    };
                    PeriodDefinition {
                        bill_date,
                        period_start_date,
                        period_end_date: end_of_previous_day(following_bill_date),
                    }
                }
            };

            tracing::debug!(
                root_item_id = %context.root_item_id,
                period,
                bill_date = %definition.bill_date,
                period_start = %definition.period_start_date,
                period_end = %definition.period_end_date,
                "Scheduled period"
            );

            previous_bill_date = definition.bill_date;
            periods.insert(period, definition);
        }

        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, Utc};
    use pricing_core::{Flow, PeriodType};

    use crate::test_support::{context_for, utc};

    fn schedule(context: &PricingContext) -> BTreeMap<u32, PeriodDefinition> {
        PeriodScheduler::new(12).build_schedule(context).unwrap()
    }

    fn assert_contiguous(periods: &BTreeMap<u32, PeriodDefinition>) {
        for number in 1..periods.len() as u32 {
            let current = &periods[&number];
            let next = &periods[&(number + 1)];
            assert_eq!(
                current.period_end_date + TimeDelta::nanoseconds(1),
                next.period_start_date,
                "gap or overlap between periods {number} and {}",
                number + 1
            );
        }
    }

    fn bill_date_gaps(periods: &BTreeMap<u32, PeriodDefinition>) -> Vec<i64> {
        let bills: Vec<DateTime<Utc>> = periods.values().map(|p| p.bill_date).collect();
        bills.windows(2).map(|w| (w[1] - w[0]).num_days()).collect()
    }

    #[test]
    fn test_postpaid_without_atypical_date() {
        let context = context_for(PeriodType::Monthly, 1, PaymentStrategy::Postpaid);
        let periods = schedule(&context);

        assert_eq!(periods.len(), 12);
        let first = &periods[&1];
        assert_eq!(first.period_start_date, utc(2026, 10, 16));
        assert_eq!(first.bill_date, utc(2026, 11, 16));
        assert_eq!(first.bill_date, first.period_end_date + TimeDelta::nanoseconds(1));
        assert_eq!(periods[&12].bill_date, utc(2027, 10, 16));

        assert_contiguous(&periods);
        assert!(bill_date_gaps(&periods).iter().all(|d| (28..=31).contains(d)));
    }

    #[test]
    fn test_in_advance_without_atypical_date() {
        let context = context_for(PeriodType::Monthly, 1, PaymentStrategy::InAdvance);
        let periods = schedule(&context);

        let first = &periods[&1];
        assert_eq!(first.bill_date, first.period_start_date);
        assert_eq!(first.bill_date, utc(2026, 10, 16));
        assert_eq!(
            first.period_end_date + TimeDelta::nanoseconds(1),
            utc(2026, 11, 16)
        );
        for period in periods.values() {
            assert_eq!(period.bill_date, period.period_start_date);
        }
        assert_eq!(
            periods[&12].period_end_date + TimeDelta::nanoseconds(1),
            utc(2027, 10, 16)
        );

        assert_contiguous(&periods);
        assert!(bill_date_gaps(&periods).iter().all(|d| (28..=31).contains(d)));
    }

    #[test]
    fn test_postpaid_stub_period() {
        let mut context = context_for(PeriodType::Monthly, 1, PaymentStrategy::Postpaid);
        context.flow = Flow::Edit;
        context.atypical_next_bill_date = Some(utc(2026, 11, 7) + TimeDelta::hours(9));
        let periods = schedule(&context);

        let first = &periods[&1];
        assert_eq!(first.period_start_date, utc(2026, 10, 16));
        assert_eq!(first.bill_date, utc(2026, 11, 7));
        assert_eq!(first.period_end_date + TimeDelta::nanoseconds(1), utc(2026, 11, 7));

        let second = &periods[&2];
        assert_eq!(second.period_start_date, utc(2026, 11, 7));
        assert_eq!(second.bill_date, utc(2026, 12, 7));

        assert_contiguous(&periods);
    }

    #[test]
    fn test_in_advance_with_atypical_date_starts_there() {
        let mut context = context_for(PeriodType::Monthly, 1, PaymentStrategy::InAdvance);
        context.flow = Flow::Upgrade;
        context.atypical_next_bill_date = Some(utc(2026, 11, 7));
        let periods = schedule(&context);

        assert_eq!(periods[&1].bill_date, utc(2026, 11, 7));
        assert_eq!(periods[&1].period_start_date, utc(2026, 11, 7));
        assert_eq!(periods[&2].bill_date, utc(2026, 12, 7));
        assert_contiguous(&periods);
    }

    #[test]
    fn test_quarterly_and_multi_month_cycles() {
        let quarterly = context_for(PeriodType::Quarterly, 1, PaymentStrategy::Postpaid);
        let periods = schedule(&quarterly);
        assert_eq!(periods[&1].bill_date, utc(2027, 1, 16));
        assert_eq!(periods[&4].bill_date, utc(2027, 10, 16));
        assert_contiguous(&periods);

        let every_two_months = context_for(PeriodType::Monthly, 2, PaymentStrategy::InAdvance);
        let periods = schedule(&every_two_months);
        assert_eq!(periods[&2].bill_date, utc(2026, 12, 16));
        assert_contiguous(&periods);
    }

    #[test]
    fn test_unsupported_period_type_fails() {
        let weekly = context_for(PeriodType::Weekly, 1, PaymentStrategy::InAdvance);
        assert!(PeriodScheduler::new(12).build_schedule(&weekly).is_err());
    }
}
