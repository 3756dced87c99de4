//! Order ledger domain module.
//!
//! Business rules for the in-progress order at the counter: line items, the
//! running total, edits, and cash settlement. Pure domain logic (no IO).

pub mod ledger;
pub mod line_item;
pub mod transaction;

pub use ledger::{
    AddService, BeginEdit, CancelEdit, ClientDetailsSet, CommitEdit, EditCancelled, EditStarted,
    OrderLedger, OrderLedgerCommand, OrderLedgerEvent, OrderSettled, PaidSettlement,
    PartialSettlement, PaymentReceived, RemoveService, ServiceAdded, ServiceChanged,
    ServiceRemoved, SetClientDetails, SettlePayment, Settlement, SettlementOutcome,
};
pub use line_item::LineItem;
pub use transaction::{DEFAULT_TIMESTAMP_FORMAT, Transaction};
