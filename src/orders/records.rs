//! Order Records

use jiff::Timestamp;
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};

use crate::{
    cart::CartLineRecord,
    checkout::{Address, PaymentMethod, UserId},
    orders::{OrderId, OrderRecord, OrderStatus},
    pricing::Price,
};

/// Stored Order
///
/// Amounts are minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrder {
    /// Order id
    pub id: OrderId,

    /// Customer who placed the order
    pub user_id: UserId,

    /// Purchased lines
    pub items: Vec<CartLineRecord>,

    /// ISO currency code
    pub currency: String,

    /// Sum of line totals
    pub subtotal: i64,

    /// Shipping charged
    pub shipping: i64,

    /// Tax charged
    pub tax: i64,

    /// Amount payable
    pub grand_total: i64,

    /// Fulfilment status
    pub status: OrderStatus,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Delivery address
    pub shipping_address: Address,

    /// When the order was placed
    pub created_at: Timestamp,
}

impl StoredOrder {
    /// Record `order` under `id`.
    pub fn new(id: OrderId, order: &OrderRecord) -> Self {
        Self {
            id,
            user_id: order.user_id.clone(),
            items: order.lines.iter().map(CartLineRecord::from).collect(),
            currency: order.totals.subtotal.currency().iso_alpha_code.to_string(),
            subtotal: order.totals.subtotal.to_minor_units(),
            shipping: order.totals.shipping.to_minor_units(),
            tax: order.totals.tax.to_minor_units(),
            grand_total: order.totals.grand_total.to_minor_units(),
            status: order.status,
            payment_method: order.payment_method,
            shipping_address: order.shipping_address.clone(),
            created_at: order.created_at,
        }
    }

    /// Amount payable, if the stored currency is known.
    pub fn grand_total_price(&self) -> Option<Price> {
        iso::find(&self.currency).map(|currency| Money::from_minor(self.grand_total, currency))
    }
}
