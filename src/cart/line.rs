//! Cart Lines

use crate::{
    pricing::{Price, PricingError, line_total},
    products::{ProductId, VariantKey},
};

/// One distinct purchasable selection in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product_id: ProductId,
    variant_key: Option<VariantKey>,
    name: Option<String>,
    unit_price: Price,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(line: NewCartLine, quantity: u32) -> Self {
        Self {
            product_id: line.product_id,
            variant_key: line.variant_key,
            name: line.name,
            unit_price: line.unit_price,
            quantity,
        }
    }

    /// Product this line is for.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Size or variant, if the product has one.
    pub fn variant_key(&self) -> Option<&VariantKey> {
        self.variant_key.as_ref()
    }

    /// Display name captured when the line was added.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Price snapshot taken when the line was first added.
    pub fn unit_price(&self) -> &Price {
        &self.unit_price
    }

    /// Number of units, always at least one.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Price, PricingError> {
        line_total(&self.unit_price, self.quantity)
    }

    /// True if this line is the cart line for `(product_id, variant_key)`.
    pub fn is(&self, product_id: &ProductId, variant_key: Option<&VariantKey>) -> bool {
        self.product_id == *product_id && self.variant_key.as_ref() == variant_key
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn increase(&mut self, quantity: u32) -> Result<(), PricingError> {
        self.quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or(PricingError::Overflow)?;

        Ok(())
    }
}

/// Data for a line being added to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    /// Product being added.
    pub product_id: ProductId,

    /// Chosen size or variant.
    pub variant_key: Option<VariantKey>,

    /// Optional display name.
    pub name: Option<String>,

    /// Price at the moment of adding.
    pub unit_price: Price,
}

impl NewCartLine {
    /// A line without a display name.
    pub fn new(product_id: ProductId, variant_key: Option<VariantKey>, unit_price: Price) -> Self {
        Self {
            product_id,
            variant_key,
            name: None,
            unit_price,
        }
    }

    /// Attach a display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
