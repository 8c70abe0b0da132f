//! Storefront
//!
//! Shopping cart and checkout engine for a single storefront: a persistent cart of
//! product lines, a four-step checkout that turns the cart into an order, and the
//! totals (subtotal, shipping, tax) shown along the way.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod storage;
pub mod summary;
