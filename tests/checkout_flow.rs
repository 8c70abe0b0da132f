//! End-to-end checkout against on-disk storage.
//!
//! A customer fills a cart, restarts the process (reloading the cart from disk), checks
//! out to a saved address and pays by UPI:
//!
//! - 3 x Linen Shirt (M) at ₹1,000.00 = ₹3,000.00
//! - Shipping: free
//! - Tax: 18% GST = ₹540.00
//! - Total: ₹3,540.00

use std::{fs, sync::Arc};

use rusty_money::{Money, iso};
use testresult::TestResult;

use storefront::prelude::*;

const ADDRESSES: &str = r"
- id: home
  name: Asha Rao
  phone: '+91 98765 43210'
  addressLine1: 12 Lake Road
  city: Bengaluru
  state: Karnataka
  country: India
  postalCode: '560001'
  isDefault: true
";

fn rupees(amount: i64) -> Price {
    Money::from_minor(amount * 100, iso::INR)
}

#[tokio::test]
async fn cart_survives_restart_and_checks_out() -> TestResult {
    let dir = tempfile::tempdir()?;
    let book_path = dir.path().join("addresses.yaml");

    fs::write(&book_path, ADDRESSES)?;

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);
        let mut cart = CartStore::load(storage, iso::INR);

        cart.add_line(
            NewCartLine::new("p1".into(), Some("M".into()), rupees(1000)).named("Linen Shirt"),
            2,
        )?;
        cart.add_item("p1".into(), Some("M".into()), rupees(1000), 1)?;
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);
    let cart = CartHandle::new(CartStore::load(storage.clone(), iso::INR));

    assert_eq!(cart.read(CartStore::len)?, 1);
    assert_eq!(cart.read(CartStore::item_count)?, 3);

    let orders = Arc::new(LocalOrderService::new(storage.clone()));
    let addresses = Arc::new(AddressBook::load(&book_path)?);

    let context = CheckoutContext {
        identity: Arc::new(StaticIdentity::new(Some(UserId::new("asha")))),
        addresses,
        orders: orders.clone(),
        pricing: PricingPolicy::standard(iso::INR),
    };

    let session = CheckoutSession::begin(&context, cart.clone())?;

    session.select_address("home".into())?;
    session.advance()?;
    session.select_payment_method(PaymentMethod::Upi)?;
    session.advance()?;

    let totals = session.totals()?;

    assert_eq!(totals.subtotal, rupees(3000));
    assert_eq!(totals.tax, rupees(540));
    assert_eq!(totals.grand_total, rupees(3540));

    let order_id = session.place_order().await?;

    assert_eq!(session.step()?, CheckoutStep::Confirm);
    assert!(cart.read(CartStore::is_empty)?);

    let reloaded = CartStore::load(storage, iso::INR);

    assert!(reloaded.is_empty());

    let history = orders.list_orders(&UserId::new("asha"))?;

    assert_eq!(history.len(), 1);

    let stored = history.first().ok_or("missing order")?;

    assert_eq!(stored.id, order_id);
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.payment_method, PaymentMethod::Upi);
    assert_eq!(stored.shipping_address.city, "Bengaluru");
    assert_eq!(stored.grand_total_price(), Some(rupees(3540)));
    assert_eq!(stored.items.first().map(|item| item.quantity), Some(3));

    Ok(())
}

#[tokio::test]
async fn signed_out_customer_cannot_check_out() -> TestResult {
    let dir = tempfile::tempdir()?;
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);

    let mut store = CartStore::load(storage.clone(), iso::INR);

    store.add_item("p1".into(), None, rupees(10), 1)?;

    let context = CheckoutContext {
        identity: Arc::new(StaticIdentity::new(None)),
        addresses: Arc::new(AddressBook::default()),
        orders: Arc::new(LocalOrderService::new(storage)),
        pricing: PricingPolicy::standard(iso::INR),
    };

    let result = CheckoutSession::begin(&context, CartHandle::new(store));

    assert!(matches!(result, Err(CheckoutError::Unauthenticated)));

    Ok(())
}
