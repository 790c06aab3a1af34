//! # Till Register Entry Point
//!
//! ```text
//! $ till-register --catalog demos/catalog.toml --cashier Sari
//! > add nasi
//! > add kopi
//! > discount 10
//! > tender 100000
//! > pay
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

use clap::Parser;
use till_register::Args;

fn main() -> ExitCode {
    match till_register::run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
