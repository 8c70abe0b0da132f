//! Cart Store

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use rusty_money::iso::Currency;
use tracing::{debug, info, warn};

use crate::{
    cart::{
        errors::CartError,
        line::{CartLine, NewCartLine},
        records::CartLineRecord,
    },
    pricing::{Price, PricingError, sum},
    products::{Product, ProductId, VariantKey},
    storage::{KeyValueStore, StorageError},
};

/// Storage key the cart snapshot is kept under.
pub const CART_STORAGE_KEY: &str = "cart";

/// The authoritative list of cart lines for the active session.
///
/// Every mutation is persisted before it is applied, so a failed write leaves the
/// in-memory cart unchanged and a reader always sees what a reload would see.
pub struct CartStore {
    lines: Vec<CartLine>,
    currency: &'static Currency,
    storage: Arc<dyn KeyValueStore>,
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Rehydrate the cart from storage.
    ///
    /// A missing, unreadable or unparseable snapshot yields an empty cart.
    pub fn load(storage: Arc<dyn KeyValueStore>, currency: &'static Currency) -> Self {
        let lines = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(snapshot)) => match parse_snapshot(&snapshot, currency) {
                Ok(lines) => lines,
                Err(error) => {
                    warn!(%error, "stored cart is corrupt; starting with an empty cart");

                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "failed to read stored cart; starting with an empty cart");

                Vec::new()
            }
        };

        info!(lines = lines.len(), currency = currency.iso_alpha_code, "loaded cart");

        Self {
            lines,
            currency,
            storage,
        }
    }

    /// Add `quantity` units of a product variant at the given price.
    ///
    /// If the cart already has a line for `(product_id, variant_key)` its quantity is
    /// increased and its original price snapshot kept; otherwise a new line is appended.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero.
    /// - [`CartError::CurrencyMismatch`]: the price is not in the cart currency.
    /// - [`CartError::Storage`]: the updated cart could not be saved.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        variant_key: Option<VariantKey>,
        unit_price: Price,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.add_line(NewCartLine::new(product_id, variant_key, unit_price), quantity)
    }

    /// Add a line, merging with an existing line of the same identity.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    #[tracing::instrument(
        name = "cart.add_line",
        skip_all,
        fields(product_id = %line.product_id, quantity = quantity)
    )]
    pub fn add_line(&mut self, line: NewCartLine, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if line.unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(line.product_id));
        }

        let price_currency = line.unit_price.currency();

        if price_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                price_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let mut lines = self.lines.clone();

        merge_line(&mut lines, line, quantity)?;

        self.commit(lines)?;

        debug!(lines = self.lines.len(), "added to cart");

        Ok(())
    }

    /// Add a catalog product in the chosen size.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`]: the product cannot be bought.
    /// - [`CartError::SizeRequired`]: the product is sized and `size` is `None`.
    /// - [`CartError::UnknownSize`]: `size` is not offered for the product.
    /// - Any error from [`CartStore::add_item`].
    pub fn add_product(
        &mut self,
        product: &Product,
        size: Option<VariantKey>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if !product.in_stock {
            return Err(CartError::OutOfStock(product.id.clone()));
        }

        match &size {
            None if product.is_sized() => {
                return Err(CartError::SizeRequired(product.id.clone()));
            }
            Some(size) if !product.offers(size) => {
                return Err(CartError::UnknownSize(product.id.clone(), size.clone()));
            }
            _ => {}
        }

        let line =
            NewCartLine::new(product.id.clone(), size, product.price).named(product.name.clone());

        self.add_line(line, quantity)
    }

    /// Remove the line for `(product_id, variant_key)`. Missing lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the updated cart could not be saved.
    #[tracing::instrument(name = "cart.remove_item", skip_all, fields(product_id = %product_id))]
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        variant_key: Option<&VariantKey>,
    ) -> Result<(), CartError> {
        if self.line(product_id, variant_key).is_none() {
            return Ok(());
        }

        let lines = self
            .lines
            .iter()
            .filter(|line| !line.is(product_id, variant_key))
            .cloned()
            .collect();

        self.commit(lines)?;

        debug!(lines = self.lines.len(), "removed from cart");

        Ok(())
    }

    /// Set the quantity of an existing line. A quantity of zero removes the line.
    ///
    /// There is no upper bound; stock levels are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the updated cart could not be saved.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variant_key: Option<&VariantKey>,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(product_id, variant_key);
        }

        let Some(idx) = self
            .lines
            .iter()
            .position(|line| line.is(product_id, variant_key))
        else {
            return Ok(());
        };

        let mut lines = self.lines.clone();

        if let Some(line) = lines.get_mut(idx) {
            line.set_quantity(quantity);
        }

        self.commit(lines)
    }

    /// Empty the cart and delete its stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot could not be deleted, leaving the
    /// cart unchanged.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.storage.remove(CART_STORAGE_KEY)?;
        self.lines.clear();

        debug!("cleared cart");

        Ok(())
    }

    /// Sum of `unit_price * quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Pricing`] if the total overflows.
    pub fn subtotal(&self) -> Result<Price, CartError> {
        let totals = self
            .lines
            .iter()
            .map(CartLine::total)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sum(totals, self.currency)?)
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `(product_id, variant_key)`, if any.
    pub fn line(
        &self,
        product_id: &ProductId,
        variant_key: Option<&VariantKey>,
    ) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.is(product_id, variant_key))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Currency every line is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Persisted form of the current lines.
    pub fn records(&self) -> Vec<CartLineRecord> {
        self.lines.iter().map(CartLineRecord::from).collect()
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        save(self.storage.as_ref(), &lines)?;

        self.lines = lines;

        Ok(())
    }
}

fn merge_line(
    lines: &mut Vec<CartLine>,
    line: NewCartLine,
    quantity: u32,
) -> Result<(), PricingError> {
    match lines
        .iter_mut()
        .find(|existing| existing.is(&line.product_id, line.variant_key.as_ref()))
    {
        Some(existing) => existing.increase(quantity)?,
        None => lines.push(CartLine::new(line, quantity)),
    }

    Ok(())
}

fn save(storage: &dyn KeyValueStore, lines: &[CartLine]) -> Result<(), StorageError> {
    let records: Vec<CartLineRecord> = lines.iter().map(CartLineRecord::from).collect();
    let snapshot = serde_json::to_string(&records)?;

    storage.set(CART_STORAGE_KEY, &snapshot)
}

/// Parse a stored snapshot, dropping unusable records and merging duplicate identities.
fn parse_snapshot(
    snapshot: &str,
    currency: &'static Currency,
) -> Result<Vec<CartLine>, CartError> {
    let records: Vec<CartLineRecord> =
        serde_json::from_str(snapshot).map_err(StorageError::Serialization)?;
    let mut lines = Vec::with_capacity(records.len());

    for record in records {
        if record.quantity == 0 || record.unit_price < 0 {
            warn!(product_id = %record.product_id, "dropping invalid stored cart line");

            continue;
        }

        let (new_line, quantity) = record.into_parts(currency);

        merge_line(&mut lines, new_line, quantity)?;
    }

    Ok(lines)
}
