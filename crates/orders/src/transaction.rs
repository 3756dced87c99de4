use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use laundrypay_core::{Entity, Money, TransactionId};

use crate::line_item::LineItem;

/// Local date/time layout used for transaction timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// A fully paid order.
///
/// Created only by a successful settlement and never mutated afterwards.
/// `orders` is a snapshot of the ledger's line items at settlement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub client_name: String,
    pub client_number: String,
    pub orders: Vec<LineItem>,
    pub total: Money,
    pub settled_at: DateTime<Utc>,
}

impl Transaction {
    /// Settlement time in local time, e.g. `10/19/2026, 02:05:09 PM`.
    pub fn timestamp(&self) -> String {
        self.format_timestamp(DEFAULT_TIMESTAMP_FORMAT)
    }

    /// Settlement time in local time using a chrono `strftime` layout.
    ///
    /// The layout must be valid; callers taking it from configuration check it first.
    pub fn format_timestamp(&self, layout: &str) -> String {
        self.settled_at.with_timezone(&Local).format(layout).to_string()
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
