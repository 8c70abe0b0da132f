//! Orders
//!
//! Checkout assembles an [`OrderRecord`] and hands it to an [`OrderService`]; what
//! happens to the order after submission is not tracked here.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::{Address, PaymentMethod, UserId},
    pricing::OrderTotals,
    storage::StorageError,
};

mod local;
mod records;

pub use local::LocalOrderService;
pub use records::StoredOrder;

/// Identifier assigned to a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap an order id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, not yet processed.
    #[default]
    Pending,

    /// Being prepared.
    Processing,

    /// Delivered.
    Completed,

    /// Cancelled before completion.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Snapshot of a checkout handed to the order service.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Customer placing the order
    pub user_id: UserId,

    /// Cart lines at the time of submission
    pub lines: Vec<CartLine>,

    /// Subtotal, shipping, tax and grand total
    pub totals: OrderTotals,

    /// Where to deliver
    pub shipping_address: Address,

    /// How the customer chose to pay
    pub payment_method: PaymentMethod,

    /// Always [`OrderStatus::Pending`] when built by checkout
    pub status: OrderStatus,

    /// When the order was assembled
    pub created_at: Timestamp,
}

/// Errors an order service may report.
#[derive(Debug, Error)]
pub enum OrderServiceError {
    /// The service refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("order service unavailable")]
    Unavailable(#[source] io::Error),

    /// Local order storage failed.
    #[error("failed to store order")]
    Storage(#[from] StorageError),

    /// A stored order could not be decoded.
    #[error("stored orders are corrupt")]
    Corrupt(#[from] serde_json::Error),
}

/// Persists submitted orders.
#[automock]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Persist an order, returning its new id.
    async fn submit_order(&self, order: OrderRecord) -> Result<OrderId, OrderServiceError>;
}
