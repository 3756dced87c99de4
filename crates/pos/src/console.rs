//! Line-oriented terminal front end.
//!
//! Each input line is parsed into a `ConsoleCommand` and run against a
//! `PosSession`; the resulting text is returned as lines for the caller to
//! print. Line items are addressed by their 1-based position in the order.

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use thiserror::Error;

use laundrypay_catalog as catalog;
use laundrypay_core::LineItemId;
use laundrypay_orders::Transaction;

use crate::screen::Screen;
use crate::session::PosSession;

#[derive(Debug, Parser)]
#[command(name = "laundrypay", no_binary_name = true, subcommand_required = true)]
#[command(disable_version_flag = true)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConsoleCommand {
    /// Set the client's name
    Name {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// Set the client's number
    Number {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        number: Vec<String>,
    },

    /// List the service catalog
    Services,

    /// Add a service for the current client
    Add { service: String },

    /// Start editing line n
    Edit {
        #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        line: usize,
    },

    /// Change the service of the line being edited
    Update { service: String },

    /// Stop editing
    Cancel,

    /// Remove line n
    Remove {
        #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        line: usize,
    },

    /// Tender cash
    Pay {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the current order
    Order,

    /// Show past transactions, filtered by client name
    History {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Print all transactions as JSON
    Export,

    /// Leave the history screen
    Back,

    /// Exit
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("no line {0} in the order")]
    NoSuchLine(usize),
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// `help` comes back as an error of kind `DisplayHelp` holding the
    /// rendered command list.
    pub fn parse(line: &str) -> Result<Option<Self>, clap::Error> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };

        let args = std::iter::once(first.to_ascii_lowercase()).chain(words.map(str::to_string));
        ConsoleLine::try_parse_from(args).map(|parsed| Some(parsed.command))
    }
}

/// Run a parsed command and return the lines to print.
pub fn run(session: &mut PosSession, command: ConsoleCommand) -> Vec<String> {
    match command {
        ConsoleCommand::Name { name } => {
            let name = name.join(" ");
            let number = session.ledger().client_number().to_string();
            match session.set_client_details(&name, &number) {
                Ok(()) => vec![format!("Client: {}", session.ledger().client_name())],
                Err(err) => vec![err.notification().to_string()],
            }
        }
        ConsoleCommand::Number { number } => {
            let number = number.join(" ");
            let name = session.ledger().client_name().to_string();
            match session.set_client_details(&name, &number) {
                Ok(()) => vec![format!("Client number: {}", session.ledger().client_number())],
                Err(err) => vec![err.notification().to_string()],
            }
        }
        ConsoleCommand::Services => catalog::entries()
            .iter()
            .map(|e| {
                format!(
                    "{:<6} {:<13} {}",
                    e.code.as_str(),
                    e.display_label,
                    session.config().format_money(e.unit_price)
                )
            })
            .collect(),
        ConsoleCommand::Add { service } => {
            let name = session.ledger().client_name().to_string();
            match session.add_service(&name, &service) {
                Ok(_) => render_order(session),
                Err(err) => vec![err.notification().to_string()],
            }
        }
        ConsoleCommand::Edit { line: n } => match line_id(session, n) {
            Ok(id) => match session.begin_edit(id) {
                Ok(()) => {
                    let label = session
                        .ledger()
                        .editing_item()
                        .map(|item| item.service_label.clone())
                        .unwrap_or_default();
                    vec![format!("Editing line {n} ({label}); use `update <service>`")]
                }
                Err(err) => vec![err.notification().to_string()],
            },
            Err(err) => vec![err.to_string()],
        },
        ConsoleCommand::Update { service } => {
            let name = session.ledger().client_name().to_string();
            match session.commit_edit_with_client(&service, &name) {
                Ok(_) => render_order(session),
                Err(err) => vec![err.notification().to_string()],
            }
        }
        ConsoleCommand::Cancel => match session.cancel_edit() {
            Ok(()) => vec!["Edit cancelled".to_string()],
            Err(err) => vec![err.notification().to_string()],
        },
        ConsoleCommand::Remove { line: n } => match line_id(session, n) {
            Ok(id) => match session.remove_service(id) {
                Ok(_) => render_order(session),
                Err(err) => vec![err.notification().to_string()],
            },
            Err(err) => vec![err.to_string()],
        },
        ConsoleCommand::Pay { amount } => match session.settle_payment_text(&amount) {
            Ok(settlement) => vec![session.settlement_notification(&settlement).to_string()],
            Err(err) => vec![err.notification().to_string()],
        },
        ConsoleCommand::Order => render_order(session),
        ConsoleCommand::History { query } => {
            if session.current_screen() != Screen::TransactionHistory {
                session.open_history();
            }
            session.search_history(&query.join(" "));
            render_history(session)
        }
        ConsoleCommand::Export => match serde_json::to_string_pretty(session.archive()) {
            Ok(json) => json.lines().map(str::to_string).collect(),
            Err(err) => vec![format!("export failed: {err}")],
        },
        ConsoleCommand::Back => {
            if session.back() {
                render_order(session)
            } else {
                vec!["Already on the order screen".to_string()]
            }
        }
        ConsoleCommand::Quit => Vec::new(),
    }
}

/// Resolve a 1-based line number shown by `render_order`.
fn line_id(session: &PosSession, n: usize) -> Result<LineItemId, ConsoleError> {
    let items = session.ledger().line_items();
    n.checked_sub(1)
        .and_then(|i| items.get(i))
        .map(|item| item.id)
        .ok_or(ConsoleError::NoSuchLine(n))
}

/// Current order as shown on the home screen.
pub fn render_order(session: &PosSession) -> Vec<String> {
    let ledger = session.ledger();
    let config = session.config();
    let mut out = Vec::new();

    if ledger.is_empty() {
        out.push("No services in the order".to_string());
    }

    for (i, item) in ledger.line_items().iter().enumerate() {
        let marker = if ledger.editing() == Some(item.id) { " *" } else { "" };
        out.push(format!(
            "{}. {} - {}: {}{}",
            i + 1,
            item.client_name,
            item.service_label,
            config.format_money(item.price),
            marker
        ));
    }

    out.push(format!("Total: {}", config.format_money(ledger.total_amount())));
    if let Some(balance) = ledger.remaining_balance() {
        out.push(format!("Amount Paid: {}", config.format_money(ledger.amount_paid())));
        out.push(format!("Remaining Balance: {}", config.format_money(balance)));
    }
    out
}

/// Matching transactions as shown on the history screen.
pub fn render_history(session: &PosSession) -> Vec<String> {
    let mut out = Vec::new();
    for t in session.history() {
        render_transaction(session, t, &mut out);
    }
    if out.is_empty() {
        out.push("No transactions".to_string());
    }
    out
}

fn render_transaction(session: &PosSession, t: &Transaction, out: &mut Vec<String>) {
    let config = session.config();
    out.push(format!("Client: {} ({})", t.client_name, t.client_number));
    out.push(format!("Transaction ID: {}", t.id));
    out.push(format!("Date & Time: {}", session.format_timestamp(t)));
    out.push(format!("Total: {}", config.format_money(t.total)));
    for order in &t.orders {
        out.push(format!("  {}: {}", order.service_label, config.format_money(order.price)));
    }
}
