//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::pricing::Price;

/// Product identifier, as issued by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Size or other variant discriminator for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(String);

impl VariantKey {
    /// Wrap a variant label, e.g. a size.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw variant label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Catalog identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Current product price
    pub price: Price,

    /// Sizes the product is offered in; empty when the product is not sized.
    pub sizes: Vec<VariantKey>,

    /// Whether the product can currently be bought.
    pub in_stock: bool,
}

impl Product {
    /// True if the product must be bought in a specific size.
    pub fn is_sized(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// True if the product is offered in the given size.
    pub fn offers(&self, size: &VariantKey) -> bool {
        self.sizes.contains(size)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::new("shirt"),
            name: "Linen Shirt".to_string(),
            price: Money::from_minor(129_900, iso::INR),
            sizes: vec!["S".into(), "M".into(), "L".into()],
            in_stock: true,
        }
    }

    #[test]
    fn sized_product_offers_its_sizes() {
        let product = shirt();

        assert!(product.is_sized());
        assert!(product.offers(&VariantKey::new("M")));
        assert!(!product.offers(&VariantKey::new("XXL")));
    }

    #[test]
    fn product_without_sizes_is_not_sized() {
        let product = Product {
            sizes: Vec::new(),
            ..shirt()
        };

        assert!(!product.is_sized());
    }

    #[test]
    fn ids_serialize_as_plain_strings() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&ProductId::new("p1"))?;

        assert_eq!(json, "\"p1\"");

        Ok(())
    }
}
