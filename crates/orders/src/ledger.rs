use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use laundrypay_catalog::{self as catalog, ServiceCode};
use laundrypay_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, LineItemId, Money,
    TransactionId,
};
use laundrypay_events::{Command, Event, execute};

use crate::line_item::LineItem;
use crate::transaction::Transaction;

/// Aggregate root: OrderLedger.
///
/// Holds the current client's in-progress order. All mutation goes through
/// `OrderLedgerCommand`s; the convenience methods below build the commands.
///
/// Invariant: `total_amount` equals the sum of the line item prices after
/// every applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLedger {
    id: AggregateId,
    client_name: String,
    client_number: String,
    line_items: Vec<LineItem>,
    total_amount: Money,
    /// Partial payments already applied to the open order.
    amount_paid: Money,
    remaining_balance: Option<Money>,
    editing: Option<LineItemId>,
    version: u64,
}

impl OrderLedger {
    /// Fresh ledger with a generated id.
    pub fn new() -> Self {
        Self::empty(AggregateId::new())
    }

    /// Empty ledger with a known id.
    pub fn empty(id: AggregateId) -> Self {
        Self {
            id,
            client_name: String::new(),
            client_number: String::new(),
            line_items: Vec::new(),
            total_amount: Money::ZERO,
            amount_paid: Money::ZERO,
            remaining_balance: None,
            editing: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> AggregateId {
        self.id
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_number(&self) -> &str {
        &self.client_number
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn line_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    /// What still has to be tendered to close the order.
    pub fn amount_due(&self) -> Money {
        self.total_amount.saturating_sub(self.amount_paid)
    }

    /// Balance still open after partial payments, if any were made.
    ///
    /// Kept in step with the total when the order changes after a payment.
    pub fn remaining_balance(&self) -> Option<Money> {
        self.remaining_balance
    }

    pub fn editing(&self) -> Option<LineItemId> {
        self.editing
    }

    /// The line item currently being edited.
    pub fn editing_item(&self) -> Option<&LineItem> {
        self.editing.and_then(|id| self.line_item(id))
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRoot for OrderLedger {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddService.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddService {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub client_name: String,
    /// Raw catalog code as captured from the picker (`"wash"`, ...).
    pub service_code: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: BeginEdit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginEdit {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CommitEdit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEdit {
    pub ledger_id: AggregateId,
    pub service_code: String,
    /// Replacement client name for the edited item; `None` keeps the old one.
    pub client_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelEdit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelEdit {
    pub ledger_id: AggregateId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveService.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveService {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetClientDetails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetClientDetails {
    pub ledger_id: AggregateId,
    pub client_name: String,
    pub client_number: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SettlePayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlePayment {
    pub ledger_id: AggregateId,
    /// Id given to the archived transaction if this payment closes the order.
    pub transaction_id: TransactionId,
    pub amount_tendered: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderLedgerCommand {
    AddService(AddService),
    BeginEdit(BeginEdit),
    CommitEdit(CommitEdit),
    CancelEdit(CancelEdit),
    RemoveService(RemoveService),
    SetClientDetails(SetClientDetails),
    SettlePayment(SettlePayment),
}

impl Command for OrderLedgerCommand {
    fn target_aggregate_id(&self) -> AggregateId {
        match self {
            OrderLedgerCommand::AddService(c) => c.ledger_id,
            OrderLedgerCommand::BeginEdit(c) => c.ledger_id,
            OrderLedgerCommand::CommitEdit(c) => c.ledger_id,
            OrderLedgerCommand::CancelEdit(c) => c.ledger_id,
            OrderLedgerCommand::RemoveService(c) => c.ledger_id,
            OrderLedgerCommand::SetClientDetails(c) => c.ledger_id,
            OrderLedgerCommand::SettlePayment(c) => c.ledger_id,
        }
    }
}

/// Event: ServiceAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAdded {
    pub ledger_id: AggregateId,
    pub line_item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EditStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditStarted {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EditCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCancelled {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ServiceChanged (an edit was committed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChanged {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub service_code: ServiceCode,
    pub service_label: String,
    pub old_price: Money,
    pub new_price: Money,
    pub client_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ServiceRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRemoved {
    pub ledger_id: AggregateId,
    pub line_item_id: LineItemId,
    pub price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ClientDetailsSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetailsSet {
    pub ledger_id: AggregateId,
    pub client_name: String,
    pub client_number: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PaymentReceived (tender did not cover the amount due).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceived {
    pub ledger_id: AggregateId,
    pub amount_tendered: Money,
    pub amount_due: Money,
    pub remaining_balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderSettled (tender covered the amount due).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettled {
    pub ledger_id: AggregateId,
    pub transaction: Transaction,
    pub amount_tendered: Money,
    pub amount_due: Money,
    pub change: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderLedgerEvent {
    ServiceAdded(ServiceAdded),
    EditStarted(EditStarted),
    EditCancelled(EditCancelled),
    ServiceChanged(ServiceChanged),
    ServiceRemoved(ServiceRemoved),
    ClientDetailsSet(ClientDetailsSet),
    PaymentReceived(PaymentReceived),
    OrderSettled(OrderSettled),
}

impl Event for OrderLedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderLedgerEvent::ServiceAdded(_) => "orders.ledger.service_added",
            OrderLedgerEvent::EditStarted(_) => "orders.ledger.edit_started",
            OrderLedgerEvent::EditCancelled(_) => "orders.ledger.edit_cancelled",
            OrderLedgerEvent::ServiceChanged(_) => "orders.ledger.service_changed",
            OrderLedgerEvent::ServiceRemoved(_) => "orders.ledger.service_removed",
            OrderLedgerEvent::ClientDetailsSet(_) => "orders.ledger.client_details_set",
            OrderLedgerEvent::PaymentReceived(_) => "orders.ledger.payment_received",
            OrderLedgerEvent::OrderSettled(_) => "orders.ledger.order_settled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderLedgerEvent::ServiceAdded(e) => e.occurred_at,
            OrderLedgerEvent::EditStarted(e) => e.occurred_at,
            OrderLedgerEvent::EditCancelled(e) => e.occurred_at,
            OrderLedgerEvent::ServiceChanged(e) => e.occurred_at,
            OrderLedgerEvent::ServiceRemoved(e) => e.occurred_at,
            OrderLedgerEvent::ClientDetailsSet(e) => e.occurred_at,
            OrderLedgerEvent::PaymentReceived(e) => e.occurred_at,
            OrderLedgerEvent::OrderSettled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for OrderLedger {
    type Command = OrderLedgerCommand;
    type Event = OrderLedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderLedgerEvent::ServiceAdded(e) => {
                if !e.line_item.client_name.is_empty() {
                    self.client_name = e.line_item.client_name.clone();
                }
                self.total_amount = self.total_amount.saturating_add(e.line_item.price);
                self.line_items.push(e.line_item.clone());
                self.refresh_remaining_balance();
            }
            OrderLedgerEvent::EditStarted(e) => {
                self.editing = Some(e.line_item_id);
            }
            OrderLedgerEvent::EditCancelled(_) => {
                self.editing = None;
            }
            OrderLedgerEvent::ServiceChanged(e) => {
                if let Some(item) = self.line_items.iter_mut().find(|i| i.id == e.line_item_id) {
                    item.service_code = e.service_code;
                    item.service_label = e.service_label.clone();
                    item.price = e.new_price;
                    if let Some(name) = &e.client_name {
                        item.client_name = name.clone();
                    }
                }
                if let Some(name) = &e.client_name {
                    self.client_name = name.clone();
                }
                // Delta update: the total moves by exactly new - old.
                self.total_amount = self
                    .total_amount
                    .saturating_sub(e.old_price)
                    .saturating_add(e.new_price);
                self.editing = None;
                self.refresh_remaining_balance();
            }
            OrderLedgerEvent::ServiceRemoved(e) => {
                self.line_items.retain(|i| i.id != e.line_item_id);
                self.total_amount = self.total_amount.saturating_sub(e.price);
                self.refresh_remaining_balance();
            }
            OrderLedgerEvent::ClientDetailsSet(e) => {
                self.client_name = e.client_name.clone();
                self.client_number = e.client_number.clone();
            }
            OrderLedgerEvent::PaymentReceived(e) => {
                self.amount_paid = self.amount_paid.saturating_add(e.amount_tendered);
                self.remaining_balance = Some(e.remaining_balance);
            }
            OrderLedgerEvent::OrderSettled(_) => {
                self.client_name.clear();
                self.client_number.clear();
                self.line_items.clear();
                self.total_amount = Money::ZERO;
                self.amount_paid = Money::ZERO;
                self.remaining_balance = None;
                self.editing = None;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_ledger_id(command.target_aggregate_id())?;

        match command {
            OrderLedgerCommand::AddService(cmd) => self.handle_add_service(cmd),
            OrderLedgerCommand::BeginEdit(cmd) => self.handle_begin_edit(cmd),
            OrderLedgerCommand::CommitEdit(cmd) => self.handle_commit_edit(cmd),
            OrderLedgerCommand::CancelEdit(cmd) => Ok(self.handle_cancel_edit(cmd)),
            OrderLedgerCommand::RemoveService(cmd) => Ok(self.handle_remove_service(cmd)),
            OrderLedgerCommand::SetClientDetails(cmd) => Ok(self.handle_set_client_details(cmd)),
            OrderLedgerCommand::SettlePayment(cmd) => self.handle_settle_payment(cmd),
        }
    }
}

impl OrderLedger {
    fn refresh_remaining_balance(&mut self) {
        if !self.amount_paid.is_zero() {
            self.remaining_balance = Some(self.amount_due());
        }
    }

    fn ensure_ledger_id(&self, ledger_id: AggregateId) -> Result<(), DomainError> {
        if self.id != ledger_id {
            return Err(DomainError::invariant("ledger_id mismatch"));
        }
        Ok(())
    }

    fn handle_add_service(&self, cmd: &AddService) -> Result<Vec<OrderLedgerEvent>, DomainError> {
        let client_name = cmd.client_name.trim();
        if client_name.is_empty() && self.editing.is_none() {
            return Err(DomainError::validation("client name is required"));
        }

        let entry = catalog::lookup(&cmd.service_code)?;

        if self.line_item(cmd.line_item_id).is_some() {
            return Err(DomainError::invariant("duplicate line item id"));
        }
        if self.total_amount.checked_add(entry.unit_price).is_none() {
            return Err(DomainError::invariant("order total overflow"));
        }

        Ok(vec![OrderLedgerEvent::ServiceAdded(ServiceAdded {
            ledger_id: cmd.ledger_id,
            line_item: LineItem::from_catalog(cmd.line_item_id, client_name, entry),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_begin_edit(&self, cmd: &BeginEdit) -> Result<Vec<OrderLedgerEvent>, DomainError> {
        if self.line_item(cmd.line_item_id).is_none() {
            return Err(DomainError::not_found(format!("line item {}", cmd.line_item_id)));
        }

        Ok(vec![OrderLedgerEvent::EditStarted(EditStarted {
            ledger_id: cmd.ledger_id,
            line_item_id: cmd.line_item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_commit_edit(&self, cmd: &CommitEdit) -> Result<Vec<OrderLedgerEvent>, DomainError> {
        let entry = catalog::lookup(&cmd.service_code)?;

        let editing = self
            .editing
            .ok_or_else(|| DomainError::not_found("no line item is being edited"))?;
        let item = self
            .line_item(editing)
            .ok_or_else(|| DomainError::not_found(format!("line item {editing}")))?;

        self.total_amount
            .saturating_sub(item.price)
            .checked_add(entry.unit_price)
            .ok_or_else(|| DomainError::invariant("order total overflow"))?;

        let client_name = cmd
            .client_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(vec![OrderLedgerEvent::ServiceChanged(ServiceChanged {
            ledger_id: cmd.ledger_id,
            line_item_id: item.id,
            service_code: entry.code,
            service_label: entry.display_label.to_string(),
            old_price: item.price,
            new_price: entry.unit_price,
            client_name,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel_edit(&self, cmd: &CancelEdit) -> Vec<OrderLedgerEvent> {
        match self.editing {
            Some(line_item_id) => vec![OrderLedgerEvent::EditCancelled(EditCancelled {
                ledger_id: cmd.ledger_id,
                line_item_id,
                occurred_at: cmd.occurred_at,
            })],
            None => Vec::new(),
        }
    }

    /// Removing an unknown line item is a no-op, not an error.
    fn handle_remove_service(&self, cmd: &RemoveService) -> Vec<OrderLedgerEvent> {
        match self.line_item(cmd.line_item_id) {
            Some(item) => vec![OrderLedgerEvent::ServiceRemoved(ServiceRemoved {
                ledger_id: cmd.ledger_id,
                line_item_id: item.id,
                price: item.price,
                occurred_at: cmd.occurred_at,
            })],
            None => Vec::new(),
        }
    }

    fn handle_set_client_details(&self, cmd: &SetClientDetails) -> Vec<OrderLedgerEvent> {
        vec![OrderLedgerEvent::ClientDetailsSet(ClientDetailsSet {
            ledger_id: cmd.ledger_id,
            client_name: cmd.client_name.trim().to_string(),
            client_number: cmd.client_number.trim().to_string(),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_settle_payment(
        &self,
        cmd: &SettlePayment,
    ) -> Result<Vec<OrderLedgerEvent>, DomainError> {
        if self.line_items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }

        if cmd.amount_tendered.is_zero() {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        // Everything tendered so far, this payment included.
        let credit = self
            .amount_paid
            .checked_add(cmd.amount_tendered)
            .ok_or_else(|| DomainError::validation("payment amount is too large"))?;
        let amount_due = self.amount_due();

        if let Some(change) = credit.checked_sub(self.total_amount) {
            let transaction = Transaction {
                id: cmd.transaction_id,
                client_name: self.client_name.clone(),
                client_number: self.client_number.clone(),
                orders: self.line_items.clone(),
                total: self.total_amount,
                settled_at: cmd.occurred_at,
            };

            Ok(vec![OrderLedgerEvent::OrderSettled(OrderSettled {
                ledger_id: cmd.ledger_id,
                transaction,
                amount_tendered: cmd.amount_tendered,
                amount_due,
                change,
                occurred_at: cmd.occurred_at,
            })])
        } else {
            Ok(vec![OrderLedgerEvent::PaymentReceived(PaymentReceived {
                ledger_id: cmd.ledger_id,
                amount_tendered: cmd.amount_tendered,
                amount_due,
                remaining_balance: self.total_amount.saturating_sub(credit),
                occurred_at: cmd.occurred_at,
            })])
        }
    }
}

/// Which way a settlement attempt went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementOutcome {
    Paid,
    Partial,
}

/// The order was paid in full and archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidSettlement {
    /// Portion of the tender applied to the order (the amount that was due).
    /// Zero when earlier payments already covered a since-reduced total.
    pub amount_paid: Money,
    /// Everything tendered beyond the order total, earlier payments included.
    pub change: Money,
    pub transaction: Transaction,
}

/// The tender fell short; the order stays open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSettlement {
    pub amount_paid: Money,
    pub remaining_balance: Money,
}

/// Result of `OrderLedger::settle_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    Paid(PaidSettlement),
    Partial(PartialSettlement),
}

impl Settlement {
    pub fn outcome(&self) -> SettlementOutcome {
        match self {
            Settlement::Paid(_) => SettlementOutcome::Paid,
            Settlement::Partial(_) => SettlementOutcome::Partial,
        }
    }

    pub fn amount_paid(&self) -> Money {
        match self {
            Settlement::Paid(p) => p.amount_paid,
            Settlement::Partial(p) => p.amount_paid,
        }
    }
}

// Convenience operations: build the command, execute it, and shape the
// resulting events into the value the caller needs.
impl OrderLedger {
    /// Decide and apply a command. Rejected commands leave the ledger untouched.
    pub fn dispatch(&mut self, command: &OrderLedgerCommand) -> DomainResult<Vec<OrderLedgerEvent>> {
        match execute(self, command) {
            Ok(events) => {
                for ev in &events {
                    tracing::debug!(
                        ledger_id = %self.id,
                        event_type = ev.event_type(),
                        version = self.version,
                        total = %self.total_amount,
                        "order ledger event applied"
                    );
                }
                Ok(events)
            }
            Err(err) => {
                tracing::warn!(ledger_id = %self.id, error = %err, "order ledger command rejected");
                Err(err)
            }
        }
    }

    /// Add a catalog service for `client_name` to the order.
    pub fn add_service(&mut self, client_name: &str, service_code: &str) -> DomainResult<LineItem> {
        let cmd = OrderLedgerCommand::AddService(AddService {
            ledger_id: self.id,
            line_item_id: LineItemId::new(),
            client_name: client_name.to_string(),
            service_code: service_code.to_string(),
            occurred_at: Utc::now(),
        });

        self.dispatch(&cmd)?
            .into_iter()
            .find_map(|ev| match ev {
                OrderLedgerEvent::ServiceAdded(e) => Some(e.line_item),
                _ => None,
            })
            .ok_or_else(|| DomainError::invariant("add service produced no line item"))
    }

    /// Mark a line item as the target of the next `commit_edit`.
    pub fn begin_edit(&mut self, line_item_id: LineItemId) -> DomainResult<()> {
        let cmd = OrderLedgerCommand::BeginEdit(BeginEdit {
            ledger_id: self.id,
            line_item_id,
            occurred_at: Utc::now(),
        });
        self.dispatch(&cmd).map(|_| ())
    }

    /// Switch the edited line item to another catalog service.
    pub fn commit_edit(&mut self, service_code: &str) -> DomainResult<LineItem> {
        self.commit(service_code, None)
    }

    /// Like `commit_edit`, also replacing the item's client name.
    pub fn commit_edit_with_client(
        &mut self,
        service_code: &str,
        client_name: &str,
    ) -> DomainResult<LineItem> {
        self.commit(service_code, Some(client_name.to_string()))
    }

    fn commit(&mut self, service_code: &str, client_name: Option<String>) -> DomainResult<LineItem> {
        let cmd = OrderLedgerCommand::CommitEdit(CommitEdit {
            ledger_id: self.id,
            service_code: service_code.to_string(),
            client_name,
            occurred_at: Utc::now(),
        });

        let changed = self
            .dispatch(&cmd)?
            .into_iter()
            .find_map(|ev| match ev {
                OrderLedgerEvent::ServiceChanged(e) => Some(e.line_item_id),
                _ => None,
            })
            .ok_or_else(|| DomainError::invariant("commit edit produced no change"))?;

        self.line_item(changed)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("line item {changed}")))
    }

    /// Abandon the edit in progress, if any.
    pub fn cancel_edit(&mut self) -> DomainResult<()> {
        let cmd = OrderLedgerCommand::CancelEdit(CancelEdit {
            ledger_id: self.id,
            occurred_at: Utc::now(),
        });
        self.dispatch(&cmd).map(|_| ())
    }

    /// Remove a line item. Returns the removed item, or `None` if it was not in the order.
    pub fn remove_service(&mut self, line_item_id: LineItemId) -> DomainResult<Option<LineItem>> {
        let removed = self.line_item(line_item_id).cloned();
        let cmd = OrderLedgerCommand::RemoveService(RemoveService {
            ledger_id: self.id,
            line_item_id,
            occurred_at: Utc::now(),
        });
        self.dispatch(&cmd)?;
        Ok(removed)
    }

    pub fn set_client_details(&mut self, client_name: &str, client_number: &str) -> DomainResult<()> {
        let cmd = OrderLedgerCommand::SetClientDetails(SetClientDetails {
            ledger_id: self.id,
            client_name: client_name.to_string(),
            client_number: client_number.to_string(),
            occurred_at: Utc::now(),
        });
        self.dispatch(&cmd).map(|_| ())
    }

    /// Tender cash against the order.
    ///
    /// An empty order is rejected before the amount is looked at.
    pub fn settle_payment(&mut self, amount_tendered: f64) -> DomainResult<Settlement> {
        if self.line_items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        let amount = Money::try_from_amount(amount_tendered)?;
        self.settle_payment_amount(amount)
    }

    /// Tender an already validated amount against the order.
    pub fn settle_payment_amount(&mut self, amount_tendered: Money) -> DomainResult<Settlement> {
        let cmd = OrderLedgerCommand::SettlePayment(SettlePayment {
            ledger_id: self.id,
            transaction_id: TransactionId::new(),
            amount_tendered,
            occurred_at: Utc::now(),
        });

        let settlement = self
            .dispatch(&cmd)?
            .into_iter()
            .find_map(|ev| match ev {
                OrderLedgerEvent::OrderSettled(e) => Some(Settlement::Paid(PaidSettlement {
                    amount_paid: e.amount_due,
                    change: e.change,
                    transaction: e.transaction,
                })),
                OrderLedgerEvent::PaymentReceived(e) => {
                    Some(Settlement::Partial(PartialSettlement {
                        amount_paid: e.amount_tendered,
                        remaining_balance: e.remaining_balance,
                    }))
                }
                _ => None,
            })
            .ok_or_else(|| DomainError::invariant("settlement produced no outcome"))?;

        match &settlement {
            Settlement::Paid(p) => tracing::info!(
                ledger_id = %self.id,
                transaction_id = %p.transaction.id,
                total = %p.transaction.total,
                change = %p.change,
                "order settled"
            ),
            Settlement::Partial(p) => tracing::info!(
                ledger_id = %self.id,
                amount_paid = %p.amount_paid,
                remaining_balance = %p.remaining_balance,
                "partial payment received"
            ),
        }

        Ok(settlement)
    }
}
