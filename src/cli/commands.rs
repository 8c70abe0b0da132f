//! Subcommands

use std::{io, sync::Arc};

use clap::Subcommand;
use rusty_money::Money;
use thiserror::Error;
use tracing::info;

use storefront::{
    cart::{CartError, CartHandle, CartStore, NewCartLine},
    checkout::{
        AddressBook, AddressError, AddressId, AddressProvider, CheckoutContext, CheckoutError,
        CheckoutSession, PaymentMethod, StaticIdentity, UserId,
    },
    orders::{LocalOrderService, OrderServiceError},
    products::{ProductId, VariantKey},
    storage::{FileStore, KeyValueStore, StorageError},
    summary::{OrderSummary, SummaryError},
};

use super::config::{CliConfig, ConfigError};

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid store settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The data directory could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout could not continue.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The address book could not be read.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Order history could not be read.
    #[error(transparent)]
    Orders(#[from] OrderServiceError),

    /// Summary could not be rendered.
    #[error(transparent)]
    Summary(#[from] SummaryError),

    /// No address given and the address book has no default.
    #[error("no address given and no default address saved")]
    NoDefaultAddress,

    /// Output could not be written.
    #[error("IO error")]
    IO,
}

/// Top level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Change or inspect the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Place an order for everything in the cart
    Checkout {
        /// Saved address to deliver to (defaults to the default address)
        #[arg(long)]
        address: Option<String>,

        /// Payment method (card, paypal, upi)
        #[arg(long)]
        payment: PaymentMethod,
    },

    /// List the signed-in customer's orders, newest first
    Orders,

    /// List saved addresses
    Addresses,
}

/// Cart commands.
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add units of a product, merging with an existing line
    Add {
        /// Product id
        #[arg(long)]
        product: String,

        /// Size or other variant
        #[arg(long)]
        size: Option<String>,

        /// Unit price in minor units
        #[arg(long)]
        price: i64,

        /// Units to add
        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a line
    Remove {
        /// Product id
        #[arg(long)]
        product: String,

        /// Size or other variant
        #[arg(long)]
        size: Option<String>,
    },

    /// Set the quantity of a line; zero removes it
    Set {
        /// Product id
        #[arg(long)]
        product: String,

        /// Size or other variant
        #[arg(long)]
        size: Option<String>,

        /// New quantity
        #[arg(long)]
        quantity: u32,
    },

    /// Show the cart and its totals
    Show,

    /// Empty the cart
    Clear,
}

/// Run the configured command, writing results to `out`.
///
/// # Errors
///
/// Returns a [`CliError`] if the command fails.
pub async fn run(config: CliConfig, out: &mut impl io::Write) -> Result<(), CliError> {
    let pricing = config.store.pricing()?;
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.store.data_dir.clone())?);
    let cart = CartHandle::new(CartStore::load(storage.clone(), pricing.currency()));
    let orders = Arc::new(LocalOrderService::new(storage));
    let addresses = Arc::new(AddressBook::load(&config.store.address_book_path())?);
    let user = config.store.user.clone().map(UserId::new);

    let context = CheckoutContext {
        identity: Arc::new(StaticIdentity::new(user.clone())),
        addresses: addresses.clone(),
        orders: orders.clone(),
        pricing,
    };

    match config.command {
        Command::Cart(command) => run_cart(command, &context, &cart, out),
        Command::Checkout { address, payment } => {
            let address = match address {
                Some(id) => AddressId::new(id),
                None => addresses
                    .default_address()
                    .map(|address| address.id.clone())
                    .ok_or(CliError::NoDefaultAddress)?,
            };

            checkout(&context, &cart, address, payment, out).await
        }
        Command::Orders => {
            let user = user.ok_or(CheckoutError::Unauthenticated)?;

            for order in orders.list_orders(&user)? {
                let total = order
                    .grand_total_price()
                    .map_or_else(|| order.grand_total.to_string(), |price| price.to_string());

                writeln!(
                    out,
                    "{}  {}  {:<10}  {:>3} items  {}  {}",
                    order.id,
                    order.created_at,
                    order.status,
                    order.items.iter().map(|item| u64::from(item.quantity)).sum::<u64>(),
                    order.payment_method.id(),
                    total,
                )
                .map_err(|_err| CliError::IO)?;
            }

            Ok(())
        }
        Command::Addresses => {
            for address in addresses.addresses() {
                let marker = if address.is_default { " (default)" } else { "" };

                writeln!(out, "{}{marker}", address.id).map_err(|_err| CliError::IO)?;

                for line in address.lines() {
                    writeln!(out, "  {line}").map_err(|_err| CliError::IO)?;
                }
            }

            Ok(())
        }
    }
}

fn run_cart(
    command: CartCommand,
    context: &CheckoutContext,
    cart: &CartHandle,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    match command {
        CartCommand::Add {
            product,
            size,
            price,
            quantity,
            name,
        } => {
            let currency = context.pricing.currency();
            let mut line = NewCartLine::new(
                ProductId::new(product),
                size.map(VariantKey::new),
                Money::from_minor(price, currency),
            );

            if let Some(name) = name {
                line = line.named(name);
            }

            cart.write(|store| store.add_line(line, quantity))?;
        }
        CartCommand::Remove { product, size } => {
            let size = size.map(VariantKey::new);

            cart.write(|store| store.remove_item(&ProductId::new(product), size.as_ref()))?;
        }
        CartCommand::Set {
            product,
            size,
            quantity,
        } => {
            let size = size.map(VariantKey::new);

            cart.write(|store| {
                store.update_quantity(&ProductId::new(product), size.as_ref(), quantity)
            })?;
        }
        CartCommand::Clear => {
            cart.write(CartStore::clear)?;

            info!("cart cleared");
        }
        CartCommand::Show => {}
    }

    show_cart(context, cart, out)
}

fn show_cart(
    context: &CheckoutContext,
    cart: &CartHandle,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let (lines, subtotal) =
        cart.read(|store| store.subtotal().map(|subtotal| (store.lines().to_vec(), subtotal)))??;

    if lines.is_empty() {
        return writeln!(out, "Cart is empty").map_err(|_err| CliError::IO);
    }

    let totals = context
        .pricing
        .totals(subtotal)
        .map_err(CartError::Pricing)?;

    OrderSummary::new(&lines, &totals, context.pricing.tax_rate()).write_to(out)?;

    Ok(())
}

async fn checkout(
    context: &CheckoutContext,
    cart: &CartHandle,
    address_id: AddressId,
    payment: PaymentMethod,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let session = CheckoutSession::begin(context, cart.clone())?;

    session.select_address(address_id.clone())?;
    session.advance()?;
    session.select_payment_method(payment)?;
    session.advance()?;

    let address = context
        .addresses
        .address(&address_id)?
        .ok_or(CheckoutError::UnknownAddress(address_id))?;

    let lines = cart.read(|store| store.lines().to_vec())?;
    let totals = session.totals()?;

    OrderSummary::new(&lines, &totals, context.pricing.tax_rate())
        .with_address(&address)
        .with_payment_method(payment)
        .write_to(&mut *out)?;

    let order_id = session.place_order().await?;

    writeln!(out, "Order placed: {order_id}").map_err(|_err| CliError::IO)
}
