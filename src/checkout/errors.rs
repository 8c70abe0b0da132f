//! Checkout errors.

use thiserror::Error;

use crate::{
    cart::CartError,
    checkout::{AddressError, AddressId, CheckoutStep},
    orders::OrderServiceError,
    pricing::PricingError,
};

/// Errors returned by checkout operations.
///
/// Precondition failures leave the session where it was; the caller should prompt the
/// customer and try again.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nobody is signed in.
    #[error("please sign in to check out")]
    Unauthenticated,

    /// There is nothing to buy.
    #[error("your cart is empty")]
    EmptyCart,

    /// The address step was left without choosing an address.
    #[error("please select an address")]
    MissingAddress,

    /// The payment step was left without choosing a payment method.
    #[error("please select a payment method")]
    MissingPaymentMethod,

    /// The chosen address no longer exists.
    #[error("address {0} could not be found")]
    UnknownAddress(AddressId),

    /// The operation is not allowed at the current step.
    #[error("that is not possible at the {0} step")]
    InvalidStep(CheckoutStep),

    /// An order is already being placed for this session.
    #[error("your order is already being placed")]
    SubmissionInProgress,

    /// The order service failed; the order was not placed and may be retried.
    #[error("failed to place order, please try again")]
    OrderSubmissionFailed(#[source] OrderServiceError),

    /// The chosen address could not be looked up.
    #[error("failed to look up address")]
    AddressLookup(#[from] AddressError),

    /// The cart could not be read or cleared.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Order totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A writer panicked while holding the session.
    #[error("checkout session lock poisoned")]
    Poisoned,
}
