//! # pricing-core
//!
//! Shared building blocks for subscription pricing: the error taxonomy,
//! decimal money with per-currency rounding, and the read-only cart model
//! that upstream collaborators hand to the pricing engine.
//!
//! ```text
//! Cart
//!  └─ CartItem (root, recurring)
//!      ├─ ItemPrice       period type / frequency / recurring price / subtotal
//!      ├─ ItemAttributes  flow, payment strategy, atypical next bill date
//!      └─ dependents      add-ons priced with the root, or separate roots
//! ```

pub mod cart;
pub mod error;
pub mod money;

pub use cart::{
    Cart, CartItem, Flow, ItemAttributes, ItemPrice, PaymentStrategy, PeriodType, TermDuration,
};
pub use error::{PricingError, Result};
pub use money::{Currency, Money};
