//! Checkout Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use crate::{
    checkout::{AddressProvider, IdentityProvider},
    orders::OrderService,
    pricing::PricingPolicy,
};

/// Collaborators and constants shared by every checkout session.
#[derive(Clone)]
pub struct CheckoutContext {
    /// Who is checking out.
    pub identity: Arc<dyn IdentityProvider>,

    /// Resolves the chosen delivery address.
    pub addresses: Arc<dyn AddressProvider>,

    /// Persists placed orders.
    pub orders: Arc<dyn OrderService>,

    /// Tax and shipping constants.
    pub pricing: PricingPolicy,
}

impl Debug for CheckoutContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CheckoutContext")
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}
