//! Checkout
//!
//! A four step flow: address, payment, review, confirm. Each step is gated on the
//! previous one being complete, and the final step places the order.

mod addresses;
mod context;
mod errors;
mod identity;
mod payments;
mod session;
mod steps;

pub use addresses::{
    Address, AddressBook, AddressError, AddressId, AddressProvider, MockAddressProvider,
};
pub use context::CheckoutContext;
pub use errors::CheckoutError;
pub use identity::{IdentityProvider, MockIdentityProvider, StaticIdentity, UserId};
pub use payments::{PaymentMethod, UnknownPaymentMethod};
pub use session::CheckoutSession;
pub use steps::{CheckoutStep, StepStatus, progress};
