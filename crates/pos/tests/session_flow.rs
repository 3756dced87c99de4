use laundrypay_core::{DomainError, Money};
use laundrypay_orders::{Settlement, SettlementOutcome};
use laundrypay_pos::{Operation, PosSession};
use proptest::prelude::*;

fn codes() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("wash"), Just("dry"), Just("fold"), Just("full")]
}

#[test]
fn ana_pays_exact_total() {
    let mut session = PosSession::default();
    session.add_service("Ana", "wash").unwrap();
    session.add_service("Ana", "fold").unwrap();
    assert_eq!(session.ledger().total_amount(), Money::from_major(100));

    let settlement = session.settle_payment(100.0).unwrap();
    let Settlement::Paid(paid) = settlement else {
        panic!("expected a paid settlement");
    };
    assert_eq!(paid.change, Money::ZERO);
    assert_eq!(paid.amount_paid, Money::from_major(100));

    assert_eq!(session.archive().len(), 1);
    let archived = session.archive().iter().next().unwrap();
    assert_eq!(archived.id, paid.transaction.id);
    assert_eq!(archived.client_name, "Ana");
    assert_eq!(archived.total, Money::from_major(100));
    assert_eq!(archived.orders.len(), 2);

    assert!(session.ledger().is_empty());
    assert_eq!(session.ledger().total_amount(), Money::ZERO);
}

#[test]
fn bo_pays_in_two_installments() {
    let mut session = PosSession::default();
    session.add_service("Bo", "dry").unwrap();

    let first = session.settle_payment(50.0).unwrap();
    let Settlement::Partial(partial) = first else {
        panic!("expected a partial settlement");
    };
    assert_eq!(partial.remaining_balance, Money::from_major(20));
    assert_eq!(session.ledger().line_items().len(), 1);
    assert!(session.archive().is_empty());

    let second = session.settle_payment(20.0).unwrap();
    let Settlement::Paid(paid) = second else {
        panic!("expected a paid settlement");
    };
    assert_eq!(paid.change, Money::ZERO);
    assert_eq!(paid.transaction.total, Money::from_major(70));
    assert_eq!(session.archive().len(), 1);
    assert!(session.ledger().is_empty());
}

#[test]
fn order_changes_after_partial_payment_are_credited() {
    let mut session = PosSession::default();
    let dry = session.add_service("Bo", "dry").unwrap();
    session.add_service("Bo", "wash").unwrap();

    let first = session.settle_payment(100.0).unwrap();
    assert_eq!(first.outcome(), SettlementOutcome::Partial);
    assert_eq!(session.ledger().remaining_balance(), Some(Money::from_major(40)));

    session.remove_service(dry.id).unwrap();
    assert_eq!(session.ledger().total_amount(), Money::from_major(70));
    assert_eq!(session.ledger().amount_paid(), Money::from_major(100));
    assert_eq!(session.ledger().remaining_balance(), Some(Money::ZERO));

    let settlement = session.settle_payment(1.0).unwrap();
    let notification = session.settlement_notification(&settlement);
    let Settlement::Paid(paid) = settlement else {
        panic!("expected a paid settlement");
    };
    assert_eq!(paid.amount_paid, Money::ZERO);
    assert_eq!(paid.change, Money::from_major(31));
    assert_eq!(notification.message, "Total Amount Paid: ₱0.00. Change: ₱31.00");

    assert_eq!(session.archive().len(), 1);
    assert_eq!(session.archive().as_slice()[0].total, Money::from_major(70));
    assert_eq!(session.ledger().remaining_balance(), None);
}

#[test]
fn edit_after_partial_payment_moves_the_balance() {
    let mut session = PosSession::default();
    let wash = session.add_service("Ana", "wash").unwrap();
    session.settle_payment(40.0).unwrap();
    assert_eq!(session.ledger().remaining_balance(), Some(Money::from_major(30)));

    session.begin_edit(wash.id).unwrap();
    session.commit_edit("full").unwrap();
    assert_eq!(session.ledger().remaining_balance(), Some(Money::from_major(130)));

    let partial = session.settle_payment(100.0).unwrap();
    let Settlement::Partial(partial) = partial else {
        panic!("expected a partial settlement");
    };
    assert_eq!(partial.remaining_balance, Money::from_major(30));
    assert!(session.archive().is_empty());

    let Settlement::Paid(paid) = session.settle_payment(50.0).unwrap() else {
        panic!("expected a paid settlement");
    };
    assert_eq!(paid.amount_paid, Money::from_major(30));
    assert_eq!(paid.change, Money::from_major(20));
    assert_eq!(paid.transaction.total, Money::from_major(170));
}

#[test]
fn overpayment_returns_change() {
    let mut session = PosSession::default();
    session.add_service("Cy", "full").unwrap();

    let settlement = session.settle_payment_text("200").unwrap();
    let notification = session.settlement_notification(&settlement);
    assert_eq!(notification.title, "Payment Successful");
    assert_eq!(notification.message, "Total Amount Paid: ₱170.00. Change: ₱30.00");
}

#[test]
fn settling_an_empty_order_leaves_archive_untouched() {
    let mut session = PosSession::default();

    let err = session.settle_payment(100.0).unwrap_err();
    assert_eq!(err.operation, Operation::SettlePayment);
    assert_eq!(err.source, DomainError::EmptyOrder);
    assert_eq!(err.notification().message, "No services added to the order.");
    assert!(session.archive().is_empty());
}

#[test]
fn invalid_payments_are_rejected_without_side_effects() {
    let mut session = PosSession::default();
    session.add_service("Ana", "wash").unwrap();

    for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let err = session.settle_payment(bad).unwrap_err();
        assert!(matches!(err.source, DomainError::Validation(_)));
    }
    assert_eq!(session.ledger().total_amount(), Money::from_major(70));
    assert_eq!(session.ledger().remaining_balance(), None);
    assert!(session.archive().is_empty());
}

#[test]
fn edit_and_remove_keep_total_consistent() {
    let mut session = PosSession::default();
    let wash = session.add_service("Ana", "wash").unwrap();
    let fold = session.add_service("Ana", "fold").unwrap();

    session.begin_edit(wash.id).unwrap();
    let edited = session.commit_edit("full").unwrap();
    assert_eq!(edited.id, wash.id);
    assert_eq!(edited.service_label, "Full Service");
    assert_eq!(session.ledger().total_amount(), Money::from_major(200));
    assert_eq!(session.ledger().editing(), None);

    let removed = session.remove_service(fold.id).unwrap();
    assert_eq!(removed.map(|item| item.id), Some(fold.id));
    assert_eq!(session.ledger().total_amount(), Money::from_major(170));

    assert_eq!(session.remove_service(fold.id).unwrap(), None);
    assert_eq!(session.ledger().total_amount(), Money::from_major(170));
}

#[test]
fn history_filter_is_case_insensitive_substring() {
    let mut session = PosSession::default();
    for name in ["Ana Santos", "Bo", "Diana"] {
        session.add_service(name, "fold").unwrap();
        session.settle_payment(30.0).unwrap();
    }

    session.open_history();
    session.search_history("ANA");
    let names: Vec<&str> = session.history().map(|t| t.client_name.as_str()).collect();
    assert_eq!(names, vec!["Ana Santos", "Diana"]);

    session.search_history("");
    assert_eq!(session.history().count(), 3);
}

proptest! {
    #[test]
    fn every_paid_settlement_is_archived_in_order(
        orders in prop::collection::vec(prop::collection::vec(codes(), 1..4), 1..8)
    ) {
        let mut session = PosSession::default();
        let mut settled = Vec::new();

        for (i, codes) in orders.iter().enumerate() {
            let client = format!("client-{i}");
            for code in codes {
                session.add_service(&client, code).unwrap();
            }
            let total = session.ledger().total_amount();
            let settlement = session.settle_payment_text(&total.to_string()).unwrap();
            prop_assert_eq!(settlement.outcome(), SettlementOutcome::Paid);
            settled.push(client);
        }

        let archived: Vec<String> = session
            .archive()
            .filter_by_client_substring("")
            .map(|t| t.client_name.clone())
            .collect();
        prop_assert_eq!(archived, settled);
    }
}
