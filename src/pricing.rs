//! Pricing
//!
//! All monetary values are [`Money`] amounts built from integer minor units of a single
//! ISO currency. Percentages are applied in [`Decimal`] space and rounded once, to whole
//! minor units, using [`RoundingStrategy::MidpointAwayFromZero`].

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// A price in a fixed ISO currency.
pub type Price = Money<'static, Currency>;

/// Errors that can occur while calculating prices and totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount could not be represented in minor units.
    #[error("amount overflowed while calculating prices")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Returns `unit_price * quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn line_total(unit_price: &Price, quantity: u32) -> Result<Price, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sums a list of prices, starting from zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::Money`]: a price is in a different currency.
pub fn sum<I>(prices: I, currency: &'static Currency) -> Result<Price, PricingError>
where
    I: IntoIterator<Item = Price>,
{
    let total = prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))?;

    Ok(total)
}

/// Applies a percentage to a price, rounding once to whole minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented in minor units.
pub fn percent_of(price: &Price, percent: Percentage) -> Result<Price, PricingError> {
    let minor = Decimal::from_i64(price.to_minor_units()).ok_or(PricingError::Overflow)?;

    let applied = (percent * minor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(applied, price.currency()))
}

/// Store-wide pricing constants used at checkout.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    currency: &'static Currency,
    tax_rate: Percentage,
    shipping_minor: i64,
}

impl PricingPolicy {
    /// Create a policy with the given currency, tax rate and flat shipping cost.
    pub fn new(currency: &'static Currency, tax_rate: Percentage, shipping_minor: i64) -> Self {
        Self {
            currency,
            tax_rate,
            shipping_minor,
        }
    }

    /// Free shipping and 18% GST.
    pub fn standard(currency: &'static Currency) -> Self {
        Self::new(currency, Percentage::from(0.18), 0)
    }

    /// Currency all totals are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Tax rate applied to the subtotal.
    pub fn tax_rate(&self) -> Percentage {
        self.tax_rate
    }

    /// Flat shipping cost.
    pub fn shipping(&self) -> Price {
        Money::from_minor(self.shipping_minor, self.currency)
    }

    /// Derive shipping, tax and grand total from a subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal is in another currency or overflows.
    pub fn totals(&self, subtotal: Price) -> Result<OrderTotals, PricingError> {
        let shipping = self.shipping();
        let tax = percent_of(&subtotal, self.tax_rate)?;
        let grand_total = subtotal.add(shipping)?.add(tax)?;

        Ok(OrderTotals {
            subtotal,
            shipping,
            tax,
            grand_total,
        })
    }
}

/// Totals presented for confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of all line totals.
    pub subtotal: Price,

    /// Shipping cost.
    pub shipping: Price,

    /// Tax on the subtotal.
    pub tax: Price,

    /// `subtotal + shipping + tax`
    pub grand_total: Price,
}

impl OrderTotals {
    /// True when no shipping is charged.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        let price = Money::from_minor(100_000, iso::INR);

        assert_eq!(line_total(&price, 3)?, Money::from_minor(300_000, iso::INR));

        Ok(())
    }

    #[test]
    fn line_total_overflow_errors() {
        let price = Money::from_minor(i64::MAX, iso::INR);

        assert_eq!(line_total(&price, 2), Err(PricingError::Overflow));
    }

    #[test]
    fn sum_of_nothing_is_zero() -> TestResult {
        assert_eq!(sum([], iso::GBP)?, Money::from_minor(0, iso::GBP));

        Ok(())
    }

    #[test]
    fn sum_rejects_mixed_currencies() {
        let prices = [
            Money::from_minor(100, iso::GBP),
            Money::from_minor(100, iso::USD),
        ];

        assert!(matches!(
            sum(prices, iso::GBP),
            Err(PricingError::Money(MoneyError::CurrencyMismatch { .. }))
        ));
    }

    #[test]
    fn percent_of_rounds_half_away_from_zero() -> TestResult {
        // 18% of 2.75 is 0.495
        let price = Money::from_minor(275, iso::USD);

        assert_eq!(
            percent_of(&price, Percentage::from(0.18))?,
            Money::from_minor(50, iso::USD)
        );

        Ok(())
    }

    #[test]
    fn standard_totals_for_three_thousand() -> TestResult {
        let policy = PricingPolicy::standard(iso::INR);
        let totals = policy.totals(Money::from_minor(300_000, iso::INR))?;

        assert_eq!(totals.shipping, Money::from_minor(0, iso::INR));
        assert_eq!(totals.tax, Money::from_minor(54_000, iso::INR));
        assert_eq!(totals.grand_total, Money::from_minor(354_000, iso::INR));
        assert!(totals.has_free_shipping());

        Ok(())
    }

    #[test]
    fn totals_include_flat_shipping() -> TestResult {
        let policy = PricingPolicy::new(iso::GBP, Percentage::from(0.2), 499);
        let totals = policy.totals(Money::from_minor(1_000, iso::GBP))?;

        assert_eq!(totals.tax, Money::from_minor(200, iso::GBP));
        assert_eq!(totals.grand_total, Money::from_minor(1_699, iso::GBP));
        assert!(!totals.has_free_shipping());

        Ok(())
    }

    #[test]
    fn totals_reject_subtotal_in_other_currency() {
        let policy = PricingPolicy::standard(iso::GBP);

        assert!(policy.totals(Money::from_minor(100, iso::USD)).is_err());
    }
}
