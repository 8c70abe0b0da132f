//! Payment Methods

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported ways to pay. Only the choice is recorded; nothing is charged here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,

    /// PayPal account.
    PayPal,

    /// Unified Payments Interface.
    Upi,
}

impl PaymentMethod {
    /// Every supported method.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Card,
        PaymentMethod::PayPal,
        PaymentMethod::Upi,
    ];

    /// Identifier used in stored orders and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::PayPal => "paypal",
            PaymentMethod::Upi => "upi",
        }
    }

    /// Name shown to the customer.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Upi => "UPI Payment",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// The given identifier is not a supported payment method.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method {0:?}; expected one of card, paypal, upi")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_ids_case_insensitively() -> TestResult {
        assert_eq!("UPI".parse::<PaymentMethod>()?, PaymentMethod::Upi);
        assert_eq!("paypal".parse::<PaymentMethod>()?, PaymentMethod::PayPal);

        Ok(())
    }

    #[test]
    fn rejects_unknown_ids() {
        assert_eq!(
            "cash".parse::<PaymentMethod>(),
            Err(UnknownPaymentMethod("cash".to_string()))
        );
    }

    #[test]
    fn serializes_as_id() -> TestResult {
        for method in PaymentMethod::ALL {
            assert_eq!(serde_json::to_string(&method)?, format!("\"{}\"", method.id()));
        }

        Ok(())
    }
}
