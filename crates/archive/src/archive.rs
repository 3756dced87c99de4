use serde::{Deserialize, Serialize};

use laundrypay_core::TransactionId;
use laundrypay_orders::Transaction;

/// Append-only list of settled transactions, in settlement order.
///
/// There is no removal or mutation; the only writer is a paid settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionArchive {
    transactions: Vec<Transaction>,
}

impl TransactionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, transaction: Transaction) {
        tracing::debug!(
            transaction_id = %transaction.id,
            client = %transaction.client_name,
            total = %transaction.total,
            position = self.transactions.len(),
            "transaction archived"
        );
        self.transactions.push(transaction);
    }

    /// Transactions whose client name contains `query`, ignoring case.
    ///
    /// An empty query matches everything. The iterator is lazy and borrows
    /// the archive; call again for a new query.
    pub fn filter_by_client_substring<'a>(
        &'a self,
        query: &str,
    ) -> impl Iterator<Item = &'a Transaction> + use<'a> {
        let needle = query.to_lowercase();
        self.transactions
            .iter()
            .filter(move |t| t.client_name.to_lowercase().contains(&needle))
    }

    /// Look up a transaction; an unknown id is simply `None`.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use laundrypay_core::Money;
    use proptest::prelude::*;

    fn transaction(client_name: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            client_name: client_name.to_string(),
            client_number: String::new(),
            orders: Vec::new(),
            total: Money::from_major(100),
            settled_at: Utc::now(),
        }
    }

    fn names<'a>(it: impl Iterator<Item = &'a Transaction>) -> Vec<&'a str> {
        it.map(|t| t.client_name.as_str()).collect()
    }

    #[test]
    fn append_preserves_settlement_order() {
        let mut archive = TransactionArchive::new();
        archive.append(transaction("Ana"));
        archive.append(transaction("Bo"));
        archive.append(transaction("Cy"));

        assert_eq!(archive.len(), 3);
        assert_eq!(names(archive.iter()), vec!["Ana", "Bo", "Cy"]);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut archive = TransactionArchive::new();
        archive.append(transaction("Ana Santos"));
        archive.append(transaction("Bo"));
        archive.append(transaction("Joanna"));

        assert_eq!(
            names(archive.filter_by_client_substring("ANA")),
            vec!["Ana Santos", "Joanna"]
        );
        assert_eq!(names(archive.filter_by_client_substring("bo")), vec!["Bo"]);
        assert!(archive.filter_by_client_substring("zed").next().is_none());
    }

    #[test]
    fn empty_query_matches_all() {
        let mut archive = TransactionArchive::new();
        archive.append(transaction("Ana"));
        archive.append(transaction("Bo"));

        assert_eq!(archive.filter_by_client_substring("").count(), 2);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let mut archive = TransactionArchive::new();
        let t = transaction("Ana");
        let id = t.id;
        archive.append(t);

        assert_eq!(archive.get(id).map(|t| t.client_name.as_str()), Some("Ana"));
        assert!(archive.get(TransactionId::new()).is_none());
    }

    #[test]
    fn serializes_as_json_array() {
        let mut archive = TransactionArchive::new();
        archive.append(transaction("Ana"));

        let json = serde_json::to_value(&archive).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["client_name"], "Ana");
        assert_eq!(json[0]["total"], 10_000);
    }

    proptest! {
        /// Property: after N appends the archive holds N entries in order
        /// and the empty filter returns all of them.
        #[test]
        fn n_appends_yield_n_entries(clients in prop::collection::vec("[A-Za-z]{1,12}", 0..30)) {
            let mut archive = TransactionArchive::new();
            for c in &clients {
                archive.append(transaction(c));
            }

            prop_assert_eq!(archive.len(), clients.len());
            let all: Vec<&str> = names(archive.filter_by_client_substring(""));
            let expected: Vec<&str> = clients.iter().map(String::as_str).collect();
            prop_assert_eq!(all, expected);
        }
    }
}
