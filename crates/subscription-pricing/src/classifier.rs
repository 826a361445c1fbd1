//! Subscription Root Classification

use pricing_core::{Cart, CartItem};

/// A cart item that anchors one subscription
#[derive(Clone, Copy, Debug)]
pub struct SubscriptionRoot<'a> {
    pub item: &'a CartItem,

    /// The item's dependents were promoted to roots of their own
    pub dependents_promoted: bool,
}

impl<'a> SubscriptionRoot<'a> {
    /// A top-level cart item; its dependents are promoted when it is flagged
    pub const fn top_level(item: &'a CartItem) -> Self {
        Self {
            item,
            dependents_promoted: item.separate_from_primary,
        }
    }

    /// A dependent promoted to a root; its own dependents stay its children
    pub const fn promoted(item: &'a CartItem) -> Self {
        Self {
            item,
            dependents_promoted: false,
        }
    }
}

/// Cart items that each anchor one subscription, in cart order
///
/// Candidates are the top-level items followed by the direct dependents of
/// top-level items flagged separate from primary; only candidates with a
/// recurring period type are kept. Nesting below that is not examined.
pub fn subscription_roots(cart: &Cart) -> impl Iterator<Item = SubscriptionRoot<'_>> {
    let promoted = cart
        .items
        .iter()
        .filter(|item| item.separate_from_primary)
        .flat_map(|item| item.dependents.iter())
        .map(SubscriptionRoot::promoted);

    cart.items
        .iter()
        .map(SubscriptionRoot::top_level)
        .chain(promoted)
        .filter(|root| root.item.is_recurring())
}
