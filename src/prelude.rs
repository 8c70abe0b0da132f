//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CartError, CartHandle, CartLine, CartStore, NewCartLine},
    checkout::{
        Address, AddressBook, AddressId, AddressProvider, CheckoutContext, CheckoutError,
        CheckoutSession, CheckoutStep, IdentityProvider, PaymentMethod, StaticIdentity,
        StepStatus, UserId,
    },
    orders::{
        LocalOrderService, OrderId, OrderRecord, OrderService, OrderServiceError, OrderStatus,
        StoredOrder,
    },
    pricing::{OrderTotals, Price, PricingError, PricingPolicy},
    products::{Product, ProductId, VariantKey},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
    summary::{OrderSummary, SummaryError},
};
