//! Cart Records
//!
//! The persisted form of a cart: an ordered JSON list of
//! `{productId, variantKey, unitPrice, quantity}` objects, with prices in minor units.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    cart::line::{CartLine, NewCartLine},
    products::{ProductId, VariantKey},
};

/// Cart Line Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRecord {
    /// Product identifier
    pub product_id: ProductId,

    /// Size or variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<VariantKey>,

    /// Unit price in minor units of the cart currency
    pub unit_price: i64,

    /// Number of units
    pub quantity: u32,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&CartLine> for CartLineRecord {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id().clone(),
            variant_key: line.variant_key().cloned(),
            unit_price: line.unit_price().to_minor_units(),
            quantity: line.quantity(),
            name: line.name().map(str::to_string),
        }
    }
}

impl CartLineRecord {
    pub(crate) fn into_parts(self, currency: &'static Currency) -> (NewCartLine, u32) {
        let new_line = NewCartLine {
            product_id: self.product_id,
            variant_key: self.variant_key,
            name: self.name,
            unit_price: Money::from_minor(self.unit_price, currency),
        };

        (new_line, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() -> TestResult {
        let record = CartLineRecord {
            product_id: ProductId::new("p1"),
            variant_key: Some(VariantKey::new("M")),
            unit_price: 100_000,
            quantity: 3,
            name: None,
        };

        assert_eq!(
            serde_json::to_value(&record)?,
            json!({
                "productId": "p1",
                "variantKey": "M",
                "unitPrice": 100_000,
                "quantity": 3,
            })
        );

        Ok(())
    }

    #[test]
    fn missing_variant_deserializes_as_none() -> TestResult {
        let record: CartLineRecord = serde_json::from_value(json!({
            "productId": "p1",
            "unitPrice": 500,
            "quantity": 1,
        }))?;

        assert_eq!(record.variant_key, None);

        Ok(())
    }
}
