//! Transaction archive: the session's list of completed transactions.

pub mod archive;

pub use archive::TransactionArchive;
