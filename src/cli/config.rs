//! Command line and environment configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use storefront::pricing::PricingPolicy;

use super::commands::Command;

/// Invalid store settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Tax rates must be zero or more.
    #[error("tax rate cannot be negative: {0}")]
    NegativeTaxRate(Decimal),

    /// Shipping costs must be zero or more.
    #[error("shipping cost cannot be negative: {0}")]
    NegativeShipping(i64),
}

/// Storefront command line
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront cart and checkout", long_about = None)]
pub struct CliConfig {
    /// Store settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Logging settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Store settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 currency code for all prices
    #[arg(long, env = "STORE_CURRENCY", default_value = "INR", global = true)]
    pub currency: String,

    /// Tax rate in percent points, e.g. 18 for 18%
    #[arg(long, env = "STORE_TAX_RATE", default_value = "18", global = true)]
    pub tax_rate: Decimal,

    /// Flat shipping cost in minor units
    #[arg(long, env = "STORE_SHIPPING_MINOR", default_value_t = 0, global = true)]
    pub shipping_minor: i64,

    /// Directory holding the cart and placed orders
    #[arg(long, env = "STORE_DATA_DIR", default_value = ".storefront", global = true)]
    pub data_dir: PathBuf,

    /// Signed-in customer; checkout and order history need one
    #[arg(long, env = "STORE_USER", global = true)]
    pub user: Option<String>,

    /// YAML address book (defaults to `addresses.yaml` in the data directory)
    #[arg(long, env = "STORE_ADDRESS_BOOK", global = true)]
    pub address_book: Option<PathBuf>,
}

impl StoreConfig {
    /// Currency named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes `rusty_money` does not know.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_ascii_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Pricing constants for checkout.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown currencies or negative amounts.
    pub fn pricing(&self) -> Result<PricingPolicy, ConfigError> {
        if self.tax_rate.is_sign_negative() {
            return Err(ConfigError::NegativeTaxRate(self.tax_rate));
        }

        if self.shipping_minor < 0 {
            return Err(ConfigError::NegativeShipping(self.shipping_minor));
        }

        Ok(PricingPolicy::new(
            self.currency()?,
            Percentage::from(self.tax_rate / Decimal::ONE_HUNDRED),
            self.shipping_minor,
        ))
    }

    /// Where the address book lives.
    pub fn address_book_path(&self) -> PathBuf {
        self.address_book
            .clone()
            .unwrap_or_else(|| self.data_dir.join("addresses.yaml"))
    }
}

/// How log events are written to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One line per event, for reading in a terminal next to command output.
    Compact,

    /// One JSON object per event, with the cart or checkout span it happened in.
    Json,
}

/// Where and how much the storefront logs.
///
/// Command results go to stdout; logs always go to stderr so they can be separated.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// `EnvFilter` directive. Defaults to `warn` so cart and checkout output is not
    /// interleaved with routine events; use `info` to see cart saves and placed orders.
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Event format on stderr (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn parse(args: &[&str]) -> Result<CliConfig, clap::Error> {
        CliConfig::try_parse_from(std::iter::once("storefront").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_rupees_and_gst() -> TestResult {
        let config = parse(&["cart", "show"])?;
        let pricing = config.store.pricing()?;

        assert_eq!(pricing.currency(), iso::INR);
        assert_eq!(pricing.shipping(), Money::from_minor(0, iso::INR));

        let totals = pricing.totals(Money::from_minor(300_000, iso::INR))?;

        assert_eq!(totals.tax, Money::from_minor(54_000, iso::INR));

        Ok(())
    }

    #[test]
    fn store_settings_can_be_overridden() -> TestResult {
        let config = parse(&[
            "--currency",
            "gbp",
            "--tax-rate",
            "20",
            "--shipping-minor",
            "499",
            "cart",
            "show",
        ])?;

        let pricing = config.store.pricing()?;

        assert_eq!(pricing.currency(), iso::GBP);
        assert_eq!(pricing.shipping(), Money::from_minor(499, iso::GBP));

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let config = parse(&["--currency", "XYZ", "cart", "show"])?;

        assert!(matches!(
            config.store.pricing(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ"
        ));

        Ok(())
    }

    #[test]
    fn negative_tax_is_rejected() -> TestResult {
        let config = parse(&["--tax-rate=-5", "cart", "show"])?;

        assert!(matches!(
            config.store.pricing(),
            Err(ConfigError::NegativeTaxRate(_))
        ));

        Ok(())
    }

    #[test]
    fn address_book_defaults_to_data_dir() -> TestResult {
        let config = parse(&["--data-dir", "/tmp/shop", "orders"])?;

        assert_eq!(
            config.store.address_book_path(),
            PathBuf::from("/tmp/shop/addresses.yaml")
        );

        Ok(())
    }

    #[test]
    fn logging_flags_follow_the_subcommand() -> TestResult {
        let config = parse(&["orders", "--log-format", "json", "--log-level", "debug"])?;

        assert_eq!(config.logging.log_format, LogFormat::Json);
        assert_eq!(config.logging.log_level, "debug");

        Ok(())
    }
}
