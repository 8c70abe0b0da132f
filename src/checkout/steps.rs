//! Checkout Steps

use std::fmt::{Display, Formatter, Result as FmtResult};

/// One step of the linear checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    /// Choose a delivery address.
    Address,

    /// Choose a payment method.
    Payment,

    /// Review the order and place it.
    Review,

    /// Order placed.
    Confirm,
}

impl CheckoutStep {
    /// Every step, in order.
    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::Address,
        CheckoutStep::Payment,
        CheckoutStep::Review,
        CheckoutStep::Confirm,
    ];

    /// Human readable step name.
    pub fn label(self) -> &'static str {
        match self {
            CheckoutStep::Address => "Address",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Confirm => "Confirm",
        }
    }

    /// The step that follows this one; `None` for the terminal step.
    pub fn next(self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Address => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => Some(CheckoutStep::Confirm),
            CheckoutStep::Confirm => None,
        }
    }

    /// True once the order has been placed.
    pub fn is_terminal(self) -> bool {
        self == CheckoutStep::Confirm
    }
}

impl Display for CheckoutStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// Where a step sits relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Already passed.
    Completed,

    /// The step the session is on.
    Current,

    /// Not reached yet.
    Upcoming,
}

/// Status of every step given the current one.
pub fn progress(current: CheckoutStep) -> [(CheckoutStep, StepStatus); 4] {
    CheckoutStep::ALL.map(|step| {
        let status = match step.cmp(&current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Current,
            std::cmp::Ordering::Greater => StepStatus::Upcoming,
        };

        (step, status)
    })
}
