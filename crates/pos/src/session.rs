//! One counter session: the live order ledger plus the transaction archive.

use serde::Serialize;
use thiserror::Error;

use laundrypay_archive::TransactionArchive;
use laundrypay_core::{DomainError, LineItemId, Money};
use laundrypay_orders::{LineItem, OrderLedger, Settlement, Transaction};

use crate::config::PosConfig;
use crate::notification::Notification;
use crate::screen::{Screen, ScreenStack};

/// The user action an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    SetClientDetails,
    AddService,
    BeginEdit,
    CommitEdit,
    CancelEdit,
    RemoveService,
    SettlePayment,
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Operation::SetClientDetails => "set client details",
            Operation::AddService => "add service",
            Operation::BeginEdit => "begin edit",
            Operation::CommitEdit => "commit edit",
            Operation::CancelEdit => "cancel edit",
            Operation::RemoveService => "remove service",
            Operation::SettlePayment => "settle payment",
        };
        f.write_str(name)
    }
}

/// A rejected user action. Session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {source}")]
pub struct PosError {
    pub operation: Operation,
    #[source]
    pub source: DomainError,
}

impl PosError {
    pub fn new(operation: Operation, source: DomainError) -> Self {
        Self { operation, source }
    }

    pub fn notification(&self) -> Notification {
        Notification::for_error(self.operation, &self.source)
    }
}

pub type PosResult<T> = Result<T, PosError>;

/// Ledger, archive and navigation state for one attendant session.
///
/// Both the ledger and the archive start empty and are dropped with the
/// session; nothing is persisted.
#[derive(Debug)]
pub struct PosSession {
    config: PosConfig,
    ledger: OrderLedger,
    archive: TransactionArchive,
    screens: ScreenStack,
    history_query: String,
}

impl PosSession {
    pub fn new(config: PosConfig) -> Self {
        Self {
            config,
            ledger: OrderLedger::new(),
            archive: TransactionArchive::new(),
            screens: ScreenStack::new(),
            history_query: String::new(),
        }
    }

    pub fn config(&self) -> &PosConfig {
        &self.config
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn archive(&self) -> &TransactionArchive {
        &self.archive
    }

    pub fn current_screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn set_client_details(&mut self, client_name: &str, client_number: &str) -> PosResult<()> {
        self.ledger
            .set_client_details(client_name, client_number)
            .map_err(|e| PosError::new(Operation::SetClientDetails, e))
    }

    pub fn add_service(&mut self, client_name: &str, service_code: &str) -> PosResult<LineItem> {
        self.ledger
            .add_service(client_name, service_code)
            .map_err(|e| PosError::new(Operation::AddService, e))
    }

    pub fn begin_edit(&mut self, line_item_id: LineItemId) -> PosResult<()> {
        self.ledger
            .begin_edit(line_item_id)
            .map_err(|e| PosError::new(Operation::BeginEdit, e))
    }

    pub fn commit_edit(&mut self, service_code: &str) -> PosResult<LineItem> {
        self.ledger
            .commit_edit(service_code)
            .map_err(|e| PosError::new(Operation::CommitEdit, e))
    }

    pub fn commit_edit_with_client(
        &mut self,
        service_code: &str,
        client_name: &str,
    ) -> PosResult<LineItem> {
        self.ledger
            .commit_edit_with_client(service_code, client_name)
            .map_err(|e| PosError::new(Operation::CommitEdit, e))
    }

    pub fn cancel_edit(&mut self) -> PosResult<()> {
        self.ledger
            .cancel_edit()
            .map_err(|e| PosError::new(Operation::CancelEdit, e))
    }

    pub fn remove_service(&mut self, line_item_id: LineItemId) -> PosResult<Option<LineItem>> {
        self.ledger
            .remove_service(line_item_id)
            .map_err(|e| PosError::new(Operation::RemoveService, e))
    }

    /// Tender a numeric amount. Paid settlements are archived.
    pub fn settle_payment(&mut self, amount_tendered: f64) -> PosResult<Settlement> {
        let settlement = self
            .ledger
            .settle_payment(amount_tendered)
            .map_err(|e| PosError::new(Operation::SettlePayment, e))?;
        self.archive_if_paid(&settlement);
        Ok(settlement)
    }

    /// Tender an amount typed into the payment field.
    ///
    /// Same checks as `settle_payment`: an empty order is reported before the
    /// text is parsed.
    pub fn settle_payment_text(&mut self, amount_tendered: &str) -> PosResult<Settlement> {
        if self.ledger.is_empty() {
            return Err(PosError::new(Operation::SettlePayment, DomainError::EmptyOrder));
        }

        let settlement = amount_tendered
            .parse::<Money>()
            .and_then(|amount| self.ledger.settle_payment_amount(amount))
            .map_err(|e| PosError::new(Operation::SettlePayment, e))?;
        self.archive_if_paid(&settlement);
        Ok(settlement)
    }

    fn archive_if_paid(&mut self, settlement: &Settlement) {
        if let Settlement::Paid(paid) = settlement {
            self.archive.append(paid.transaction.clone());
        }
    }

    pub fn settlement_notification(&self, settlement: &Settlement) -> Notification {
        Notification::for_settlement(settlement, &self.config)
    }

    /// Switch to the history screen with an empty search.
    pub fn open_history(&mut self) {
        self.history_query.clear();
        self.screens.navigate(Screen::TransactionHistory);
    }

    pub fn search_history(&mut self, query: &str) {
        self.history_query = query.to_string();
    }

    pub fn history_query(&self) -> &str {
        &self.history_query
    }

    /// Archived transactions matching the current search.
    pub fn history(&self) -> impl Iterator<Item = &Transaction> {
        self.archive.filter_by_client_substring(&self.history_query)
    }

    /// Return to the previous screen.
    pub fn back(&mut self) -> bool {
        self.screens.back()
    }

    /// Render a transaction timestamp with the configured layout.
    pub fn format_timestamp(&self, transaction: &Transaction) -> String {
        transaction.format_timestamp(&self.config.timestamp_format)
    }
}

impl Default for PosSession {
    fn default() -> Self {
        Self::new(PosConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laundrypay_orders::SettlementOutcome;

    #[test]
    fn paid_settlement_is_archived_and_partial_is_not() {
        let mut session = PosSession::default();
        session.add_service("Bo", "dry").unwrap();

        let partial = session.settle_payment(50.0).unwrap();
        assert_eq!(partial.outcome(), SettlementOutcome::Partial);
        assert!(session.archive().is_empty());

        let paid = session.settle_payment(20.0).unwrap();
        assert_eq!(paid.outcome(), SettlementOutcome::Paid);
        assert_eq!(session.archive().len(), 1);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn errors_carry_their_operation() {
        let mut session = PosSession::default();

        let err = session.add_service("", "wash").unwrap_err();
        assert_eq!(err.operation, Operation::AddService);
        assert_eq!(err.notification().message, "Please enter the client's name.");
        assert_eq!(err.to_string(), "add service failed: validation failed: client name is required");
    }

    #[test]
    fn text_tender_checks_empty_order_first() {
        let mut session = PosSession::default();

        let err = session.settle_payment_text("abc").unwrap_err();
        assert_eq!(err.source, DomainError::EmptyOrder);

        session.add_service("Ana", "wash").unwrap();
        let err = session.settle_payment_text("abc").unwrap_err();
        assert_eq!(err.notification().message, "Please enter a valid payment amount.");
        assert_eq!(session.ledger().line_items().len(), 1);
    }

    #[test]
    fn history_search_is_scoped_to_the_screen() {
        let mut session = PosSession::default();
        session.add_service("Ana", "wash").unwrap();
        session.settle_payment_text("70").unwrap();
        session.add_service("Bo", "fold").unwrap();
        session.settle_payment_text("30").unwrap();

        session.open_history();
        assert_eq!(session.current_screen(), Screen::TransactionHistory);
        session.search_history("an");
        let names: Vec<&str> = session.history().map(|t| t.client_name.as_str()).collect();
        assert_eq!(names, vec!["Ana"]);

        assert!(session.back());
        session.open_history();
        assert_eq!(session.history().count(), 2);
    }
}
