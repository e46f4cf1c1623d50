//! Bill Splitter CLI
//!
//! Reads participants and bills from CSV files and prints one report as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- participants.csv bills.csv [view] > report.csv
//! ```
//!
//! `view` is one of `balances`, `settlements` (default), `residual`,
//! `categories`, `months`, `people`, `debts`, `summary`, `bills`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity

use bill_splitter::{write_report, Ledger, Result, SplitError, View};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(SplitError::MissingArgument);
    }

    let view = match args.get(3) {
        Some(name) => name.parse::<View>()?,
        None => View::default(),
    };

    let mut ledger = Ledger::new();
    ledger.load_participants_csv(BufReader::new(File::open(&args[1])?))?;
    ledger.load_bills_csv(BufReader::new(File::open(&args[2])?))?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_report(&ledger, view, handle)?;

    Ok(())
}
