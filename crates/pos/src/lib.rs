//! Counter-side composition of the order ledger and the transaction archive.

pub mod config;
pub mod console;
pub mod notification;
pub mod screen;
pub mod session;

pub use config::PosConfig;
pub use console::{ConsoleCommand, ConsoleError};
pub use notification::Notification;
pub use screen::{Screen, ScreenStack};
pub use session::{Operation, PosError, PosResult, PosSession};
