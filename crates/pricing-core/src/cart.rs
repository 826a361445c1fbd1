//! Cart Input Model
//!
//! Read-only view of a resolved cart as handed over by the cart/catalog
//! collaborators. Upstream flow resolution communicates intent only through
//! [`ItemAttributes`]; nothing here is persisted or mutated by pricing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::money::Money;

/// Billing period unit of a recurring price
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    /// Accepted on input, not billable by the month-based scheduler
    Daily,
    /// Accepted on input, not billable by the month-based scheduler
    Weekly,
    Monthly,
    Quarterly,
    Annually,
}

impl PeriodType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Daily => "DAILY",
            PeriodType::Weekly => "WEEKLY",
            PeriodType::Monthly => "MONTHLY",
            PeriodType::Quarterly => "QUARTERLY",
            PeriodType::Annually => "ANNUALLY",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the cart is doing to the subscription
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flow {
    #[default]
    Create,
    Edit,
    Upgrade,
    Downgrade,
    Terminate,
}

impl Flow {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Flow::Create => "CREATE",
            Flow::Edit => "EDIT",
            Flow::Upgrade => "UPGRADE",
            Flow::Downgrade => "DOWNGRADE",
            Flow::Terminate => "TERMINATE",
        }
    }

    /// Whether the flow modifies an already existing subscription
    pub const fn is_modification(&self) -> bool {
        !matches!(self, Flow::Create)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a billing period is charged
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStrategy {
    /// Billed at period start, for the upcoming period
    InAdvance,
    /// Billed at period end, for what was already rendered
    Postpaid,
}

impl PaymentStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStrategy::InAdvance => "IN_ADVANCE",
            PaymentStrategy::Postpaid => "POSTPAID",
        }
    }
}

impl FromStr for PaymentStrategy {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IN_ADVANCE" => Ok(PaymentStrategy::InAdvance),
            "POSTPAID" => Ok(PaymentStrategy::Postpaid),
            blank if blank.trim().is_empty() => {
                Err(PricingError::invalid("payment strategy is blank"))
            }
            other => Err(PricingError::invalid(format!(
                "unknown payment strategy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PaymentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurring price terms of a cart item
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemPrice {
    /// `None` for one-time charges
    #[serde(default)]
    pub period_type: Option<PeriodType>,

    /// Multiplier on the period unit (2 + MONTHLY = every two months)
    #[serde(default = "default_frequency")]
    pub period_frequency: u32,

    pub unit_price: Money,

    /// Typical (undiscounted) price of one full period
    pub recurring_price: Money,

    /// Line amount charged at checkout
    pub subtotal: Money,
}

const fn default_frequency() -> u32 {
    1
}

/// Contract length of the subscription
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDuration {
    pub duration_type: PeriodType,
    pub length: u32,
}

/// Typed replacement for the upstream internal-attribute bag
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAttributes {
    /// Absent means CREATE
    pub flow: Option<Flow>,

    pub existing_subscription_id: Option<String>,

    /// Raw upstream value; absent or blank is a hard failure at pricing time
    pub payment_strategy: Option<String>,

    /// Bill date carried over from an existing subscription
    pub atypical_next_bill_date: Option<DateTime<Utc>>,
}

/// A line in the cart
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,

    pub product_id: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    pub price: ItemPrice,

    #[serde(default)]
    pub term_duration: Option<TermDuration>,

    #[serde(default)]
    pub attributes: ItemAttributes,

    /// Add-ons and other items that depend on this one
    #[serde(default)]
    pub dependents: Vec<CartItem>,

    /// Dependents of a flagged item are priced as their own subscriptions
    #[serde(default)]
    pub separate_from_primary: bool,
}

const fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Whether the item carries recurring terms
    pub const fn is_recurring(&self) -> bool {
        self.price.period_type.is_some()
    }

    /// Attach attributes (builder style)
    pub fn with_attributes(mut self, attributes: ItemAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach a dependent item (builder style)
    pub fn with_dependent(mut self, dependent: Self) -> Self {
        self.dependents.push(dependent);
        self
    }

    /// Flag the item as separate from its primary (builder style)
    pub fn separate(mut self) -> Self {
        self.separate_from_primary = true;
        self
    }
}

/// A resolved shopping cart
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,

    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(id: impl Into<String>, items: Vec<CartItem>) -> Self {
        Self {
            id: id.into(),
            items,
        }
    }
}
