//! Money and Currency
//!
//! All monetary values are `rust_decimal` based - never use f64 for money!
//! Amounts of different currencies never mix: every arithmetic helper
//! checks the currency and fails with `InvalidPricingConfiguration`.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};

/// ISO-4217 style currency code (e.g., "USD", "JPY")
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Parse a three-letter alphabetic code, upper-casing it
    pub fn new(code: impl AsRef<str>) -> Result<Self> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PricingError::invalid(format!(
                "'{code}' is not a three-letter currency code"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn usd() -> Self {
        Self("USD".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of minor-unit digits used when rounding amounts
    pub fn scale(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "XAF" | "XOF" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "IQD" | "LYD" => 3,
            _ => 2,
        }
    }

    /// Apply this currency's rounding rule (scale, midpoint to even)
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale(), RoundingStrategy::MidpointNearestEven)
    }
}

impl TryFrom<String> for Currency {
    type Error = PricingError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount in a specific currency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub const fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Fail unless this amount is expressed in `currency`
    pub fn ensure_currency(&self, currency: &Currency) -> Result<()> {
        if &self.currency == currency {
            Ok(())
        } else {
            Err(PricingError::invalid(format!(
                "amount in {} cannot be combined with {}",
                self.currency, currency
            )))
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        other.ensure_currency(&self.currency)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| PricingError::invalid("monetary overflow in addition"))?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        other.ensure_currency(&self.currency)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| PricingError::invalid("monetary overflow in subtraction"))?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Multiply without rounding
    pub fn mul_decimal(&self, factor: Decimal) -> Result<Self> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| PricingError::invalid("monetary overflow in multiplication"))?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Divide without rounding
    pub fn div_decimal(&self, divisor: Decimal) -> Result<Self> {
        let amount = self
            .amount
            .checked_div(divisor)
            .ok_or_else(|| PricingError::invalid(format!("cannot divide {self} by {divisor}")))?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Round to the currency's minor units
    pub fn rounded(&self) -> Self {
        Self::new(self.currency.round(self.amount), self.currency.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.currency.scale() as usize;
        write!(f, "{:.*} {}", scale, self.amount, self.currency)
    }
}
