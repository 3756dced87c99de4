//! `laundrypay` terminal front end.

use std::io::{self, BufRead, Write};

use laundrypay_pos::console::{self, ConsoleCommand};
use laundrypay_pos::{PosConfig, PosSession};

fn main() -> anyhow::Result<()> {
    let config = PosConfig::from_env();
    laundrypay_observability::init(config.log_format);

    tracing::info!(
        currency_symbol = %config.currency_symbol,
        timestamp_format = %config.timestamp_format,
        "laundrypay starting"
    );

    let mut session = PosSession::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "LaundryPay. Type `help` for commands.")?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;

        match ConsoleCommand::parse(&line) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => {
                for out in console::run(&mut session, command) {
                    writeln!(stdout, "{out}")?;
                }
            }
            Ok(None) => {}
            Err(err) => {
                stdout.flush()?;
                err.print()?;
            }
        }

        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    tracing::info!(transactions = session.archive().len(), "laundrypay exiting");
    Ok(())
}
