//! Cart errors.

use thiserror::Error;

use crate::{
    pricing::PricingError,
    products::{ProductId, VariantKey},
    storage::StorageError,
};

/// Errors returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantities added to a cart must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Unit prices cannot be negative.
    #[error("price for product {0} cannot be negative")]
    NegativePrice(ProductId),

    /// A price's currency differs from the cart currency (price currency, cart currency).
    #[error("price is in {0}, but the cart is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The product cannot currently be bought.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The product is sized and no size was chosen.
    #[error("please select a size for product {0}")]
    SizeRequired(ProductId),

    /// The chosen size is not offered for the product.
    #[error("product {0} is not available in size {1}")]
    UnknownSize(ProductId, VariantKey),

    /// The cart could not be written to local storage.
    #[error("failed to save cart")]
    Storage(#[from] StorageError),

    /// Totals could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A writer panicked while holding the shared cart.
    #[error("cart lock poisoned")]
    Poisoned,
}

