//! User-facing alerts built from operation outcomes.

use serde::Serialize;

use laundrypay_core::DomainError;
use laundrypay_orders::Settlement;

use crate::config::PosConfig;
use crate::session::Operation;

/// A dialog the front end shows after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn for_settlement(settlement: &Settlement, config: &PosConfig) -> Self {
        match settlement {
            Settlement::Paid(p) => Self::new(
                "Payment Successful",
                format!(
                    "Total Amount Paid: {}. Change: {}",
                    config.format_money(p.amount_paid),
                    config.format_money(p.change)
                ),
            ),
            Settlement::Partial(p) => Self::new(
                "Payment Received",
                format!(
                    "Amount Paid: {}. Remaining Balance: {}",
                    config.format_money(p.amount_paid),
                    config.format_money(p.remaining_balance)
                ),
            ),
        }
    }

    /// Translate a rejected operation into what the attendant should do next.
    pub fn for_error(operation: Operation, error: &DomainError) -> Self {
        match (operation, error) {
            (Operation::AddService, DomainError::Validation(_)) => {
                Self::error("Please enter the client's name.")
            }
            (Operation::SettlePayment, DomainError::Validation(_)) => {
                Self::error("Please enter a valid payment amount.")
            }
            (_, DomainError::InvalidService(_)) => Self::error("Please select a valid service."),
            (_, DomainError::EmptyOrder) => Self::error("No services added to the order."),
            (_, DomainError::NotFound(_)) => {
                Self::error("That service is no longer in the order.")
            }
            (_, other) => Self::error(other.to_string()),
        }
    }
}

impl core::fmt::Display for Notification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
