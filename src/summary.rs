//! Order summary

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::{Address, PaymentMethod},
    pricing::{OrderTotals, PricingError},
};

/// Errors that can occur when rendering an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// What the customer sees before confirming an order, and after placing it.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a> {
    lines: &'a [CartLine],
    totals: &'a OrderTotals,
    tax_rate: Percentage,
    address: Option<&'a Address>,
    payment_method: Option<PaymentMethod>,
}

impl<'a> OrderSummary<'a> {
    /// Summarise `lines` with the totals derived from them.
    pub fn new(lines: &'a [CartLine], totals: &'a OrderTotals, tax_rate: Percentage) -> Self {
        Self {
            lines,
            totals,
            tax_rate,
            address: None,
            payment_method: None,
        }
    }

    /// Include the delivery address.
    #[must_use]
    pub fn with_address(mut self, address: &'a Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Include the payment method.
    #[must_use]
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Writes the summary table and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total overflows or the summary cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Total"]);

        for line in self.lines {
            builder.push_record([
                line_description(line),
                line.quantity().to_string(),
                line.total()?.to_string(),
            ]);
        }

        write_summary_table(&mut out, builder, self.lines.len())?;
        write_totals(&mut out, self.totals, self.tax_rate)?;

        if let Some(address) = self.address {
            writeln!(out, " Deliver to:").map_err(|_err| SummaryError::IO)?;

            for line in address.lines() {
                writeln!(out, "   {line}").map_err(|_err| SummaryError::IO)?;
            }
        }

        if let Some(method) = self.payment_method {
            writeln!(out, " Payment: {method}").map_err(|_err| SummaryError::IO)?;
        }

        Ok(())
    }
}

/// Name and quantity, with the size on its own line when there is one.
fn line_description(line: &CartLine) -> String {
    let name = line
        .name()
        .map_or_else(|| line.product_id().to_string(), str::to_string);

    let mut description = format!("{name} x {}", line.quantity());

    if let Some(size) = line.variant_key() {
        _ = write!(description, "\nSize: {size}");
    }

    description
}

fn write_summary_table(
    out: &mut impl io::Write,
    builder: Builder,
    line_count: usize,
) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for row in 2..=line_count {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..3), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| SummaryError::IO)
}

fn write_totals(
    out: &mut impl io::Write,
    totals: &OrderTotals,
    tax_rate: Percentage,
) -> Result<(), SummaryError> {
    let shipping = if totals.has_free_shipping() {
        "Free".to_string()
    } else {
        totals.shipping.to_string()
    };

    let rows = [
        (" Subtotal:".to_string(), totals.subtotal.to_string()),
        (" Shipping:".to_string(), shipping),
        (
            format!(" Tax ({}% GST):", percent_points(tax_rate)),
            totals.tax.to_string(),
        ),
        (" Total:".to_string(), totals.grand_total.to_string()),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| SummaryError::IO)?;
    }

    writeln!(out).map_err(|_err| SummaryError::IO)
}

/// Converts a fractional percentage to percent points for display, e.g. `0.18` to `18`.
fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        cart::{CartStore, NewCartLine},
        pricing::PricingPolicy,
        storage::MemoryStore,
    };

    use super::*;

    fn render(summary: &OrderSummary<'_>) -> TestResult<String> {
        let mut out = Vec::new();

        summary.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    fn shirt_cart() -> TestResult<CartStore> {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()), iso::INR);

        let shirt = NewCartLine::new(
            "p1".into(),
            Some("M".into()),
            Money::from_minor(100_000, iso::INR),
        )
        .named("Linen Shirt");

        cart.add_line(shirt, 3)?;

        Ok(cart)
    }

    #[test]
    fn renders_lines_and_totals() -> TestResult {
        let cart = shirt_cart()?;
        let policy = PricingPolicy::standard(iso::INR);
        let totals = policy.totals(cart.subtotal()?)?;

        let output = render(&OrderSummary::new(cart.lines(), &totals, policy.tax_rate()))?;

        assert!(output.contains("Linen Shirt x 3"));
        assert!(output.contains("Size: M"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Free"));
        assert!(output.contains("Tax (18% GST):"));
        assert!(output.contains("Total:"));
        assert!(output.contains(&totals.grand_total.to_string()));

        Ok(())
    }

    #[test]
    fn unnamed_lines_fall_back_to_product_id() -> TestResult {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()), iso::GBP);

        cart.add_item("sku-42".into(), None, Money::from_minor(250, iso::GBP), 2)?;

        let policy = PricingPolicy::new(iso::GBP, Percentage::from(0.2), 399);
        let totals = policy.totals(cart.subtotal()?)?;

        let output = render(&OrderSummary::new(cart.lines(), &totals, policy.tax_rate()))?;

        assert!(output.contains("sku-42 x 2"));
        assert!(!output.contains("Size:"));
        assert!(!output.contains("Free"));
        assert!(output.contains("Tax (20% GST):"));

        Ok(())
    }

    #[test]
    fn includes_address_and_payment_when_given() -> TestResult {
        let cart = shirt_cart()?;
        let policy = PricingPolicy::standard(iso::INR);
        let totals = policy.totals(cart.subtotal()?)?;

        let address = Address {
            id: "home".into(),
            name: "Asha Rao".to_string(),
            phone: "+91 98765 43210".to_string(),
            address_line1: "12 Lake Road".to_string(),
            address_line2: Some("Flat 4".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            country: "India".to_string(),
            postal_code: "560001".to_string(),
            is_default: true,
        };

        let summary = OrderSummary::new(cart.lines(), &totals, policy.tax_rate())
            .with_address(&address)
            .with_payment_method(PaymentMethod::Upi);

        let output = render(&summary)?;

        assert!(output.contains("Deliver to:"));
        assert!(output.contains("Asha Rao"));
        assert!(output.contains("Flat 4"));
        assert!(output.contains("Payment: UPI Payment"));

        Ok(())
    }

    #[test]
    fn percent_points_drop_trailing_zeros() {
        assert_eq!(percent_points(Percentage::from(0.18)).to_string(), "18");
        assert_eq!(percent_points(Percentage::from(0.125)).to_string(), "12.5");
    }
}
