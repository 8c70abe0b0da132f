//! Local order storage.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::{
    checkout::UserId,
    orders::{OrderId, OrderRecord, OrderService, OrderServiceError, StoredOrder},
    storage::KeyValueStore,
};

/// Keeps each customer's orders as a JSON list in a key/value store.
pub struct LocalOrderService {
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl Debug for LocalOrderService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LocalOrderService").finish_non_exhaustive()
    }
}

impl LocalOrderService {
    /// Store orders in `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderServiceError`] if the orders cannot be read or decoded.
    pub fn list_orders(&self, user: &UserId) -> Result<Vec<StoredOrder>, OrderServiceError> {
        let mut orders = self.read(user)?;

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }

    fn read(&self, user: &UserId) -> Result<Vec<StoredOrder>, OrderServiceError> {
        match self.storage.get(&orders_key(user))? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderService for LocalOrderService {
    #[tracing::instrument(
        name = "orders.submit",
        skip_all,
        fields(user_id = %order.user_id, lines = order.lines.len())
    )]
    async fn submit_order(&self, order: OrderRecord) -> Result<OrderId, OrderServiceError> {
        let _guard = self.write_lock.lock().await;

        let id = OrderId::new(Uuid::now_v7().to_string());
        let mut orders = self.read(&order.user_id)?;

        orders.push(StoredOrder::new(id.clone(), &order));

        let json = serde_json::to_string(&orders)?;

        self.storage.set(&orders_key(&order.user_id), &json)?;

        info!(order_id = %id, "stored order");

        Ok(id)
    }
}

/// Storage key for a user's orders; any user id maps to a key of `[0-9a-f-]`.
fn orders_key(user: &UserId) -> String {
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, user.as_str().as_bytes());

    format!("orders_{id}")
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        checkout::{Address, PaymentMethod},
        orders::OrderStatus,
        pricing::PricingPolicy,
        storage::{FileStore, MemoryStore},
    };

    use super::*;

    fn order(user: &str, created_at: Timestamp) -> TestResult<OrderRecord> {
        let totals =
            PricingPolicy::standard(iso::INR).totals(Money::from_minor(300_000, iso::INR))?;

        Ok(OrderRecord {
            user_id: UserId::new(user),
            lines: Vec::new(),
            totals,
            shipping_address: Address {
                id: "home".into(),
                name: "Asha Rao".to_string(),
                phone: "+91 98765 43210".to_string(),
                address_line1: "12 Lake Road".to_string(),
                address_line2: None,
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                country: "India".to_string(),
                postal_code: "560001".to_string(),
                is_default: true,
            },
            payment_method: PaymentMethod::Upi,
            status: OrderStatus::Pending,
            created_at,
        })
    }

    #[tokio::test]
    async fn submitted_orders_are_listed_newest_first() -> TestResult {
        let service = LocalOrderService::new(Arc::new(MemoryStore::new()));
        let now = Timestamp::now();

        let older = service.submit_order(order("u1", now - 1.hour())?).await?;
        let newer = service.submit_order(order("u1", now)?).await?;

        let ids: Vec<OrderId> = service
            .list_orders(&UserId::new("u1"))?
            .into_iter()
            .map(|stored| stored.id)
            .collect();

        assert_eq!(ids, vec![newer, older]);

        Ok(())
    }

    #[tokio::test]
    async fn orders_are_kept_per_user() -> TestResult {
        let service = LocalOrderService::new(Arc::new(MemoryStore::new()));

        service.submit_order(order("u1", Timestamp::now())?).await?;

        assert!(service.list_orders(&UserId::new("u2"))?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn stored_order_keeps_totals() -> TestResult {
        let service = LocalOrderService::new(Arc::new(MemoryStore::new()));

        service.submit_order(order("u1", Timestamp::now())?).await?;

        let stored = service.list_orders(&UserId::new("u1"))?;
        let first = stored.first().ok_or("no stored order")?;

        assert_eq!(first.grand_total, 354_000);
        assert_eq!(first.currency, "INR");
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(
            first.grand_total_price(),
            Some(Money::from_minor(354_000, iso::INR))
        );

        Ok(())
    }

    #[tokio::test]
    async fn email_user_ids_work_with_file_storage() -> TestResult {
        let dir = tempfile::tempdir()?;
        let service = LocalOrderService::new(Arc::new(FileStore::open(dir.path())?));

        let id = service
            .submit_order(order("asha@example.com", Timestamp::now())?)
            .await?;

        let stored = service.list_orders(&UserId::new("asha@example.com"))?;

        assert_eq!(stored.len(), 1);
        assert_eq!(stored.first().map(|order| &order.id), Some(&id));
        assert!(service.list_orders(&UserId::new("asha@example.org"))?.is_empty());

        Ok(())
    }

    #[test]
    fn order_keys_are_stable_and_distinct() {
        let asha = orders_key(&UserId::new("asha@example.com"));

        assert_eq!(asha, orders_key(&UserId::new("asha@example.com")));
        assert_ne!(asha, orders_key(&UserId::new("asha.example.com")));
        assert!(
            asha.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
