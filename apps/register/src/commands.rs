//! # Register Commands
//!
//! One line typed by the cashier becomes one [`Command`].
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart                         Payment                                   │
//! │  ────                         ───────                                   │
//! │  add <id>                     discount <percent>                        │
//! │  qty <id> <n>                 method <cash|card|qris>                   │
//! │  remove <id>                  tender <amount>                           │
//! │  clear                        pay                                       │
//! │  cart                                                                   │
//! │                                                                         │
//! │  Receipts                     Back office                               │
//! │  ────────                     ───────────                               │
//! │  receipt [number]             search <text>                             │
//! │  share <phone> [number]       low                                       │
//! │  export <path>                restock <id> <qty>                        │
//! │                               adjust <id> <delta>                       │
//! │                               price <id> <amount>                       │
//! │                               report                                    │
//! │                               save [config path]                        │
//! │                                                                         │
//! │  help, quit                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are in minor units (what the catalog uses).

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use till_core::PaymentMethod;

/// A parsed register command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Quantity(String, i64),
    Remove(String),
    Clear,
    Cart,
    Discount(i64),
    Method(PaymentMethod),
    Tender(i64),
    Pay,
    Receipt(Option<String>),
    Share {
        phone: String,
        receipt_number: Option<String>,
    },
    Export(PathBuf),
    Search(String),
    LowStock,
    Restock(String, i64),
    Adjust(String, i64),
    Price(String, i64),
    Report,
    SaveConfig(Option<PathBuf>),
    Help,
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{0}")]
    InvalidArgument(String),
}

fn number(raw: &str) -> Result<i64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::NotANumber(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Usage("help"));
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("add" | "a", [id]) => Command::Add(id.to_string()),
            ("add" | "a", _) => return Err(CommandError::Usage("add <id>")),

            ("qty" | "q", [id, n]) => Command::Quantity(id.to_string(), number(n)?),
            ("qty" | "q", _) => return Err(CommandError::Usage("qty <id> <quantity>")),

            ("remove" | "rm", [id]) => Command::Remove(id.to_string()),
            ("remove" | "rm", _) => return Err(CommandError::Usage("remove <id>")),

            ("clear", []) => Command::Clear,
            ("cart", []) => Command::Cart,

            ("discount" | "disc", [pct]) => Command::Discount(number(pct.trim_end_matches('%'))?),
            ("discount" | "disc", _) => return Err(CommandError::Usage("discount <percent>")),

            ("method", [m]) => Command::Method(
                m.parse()
                    .map_err(|e: till_core::ValidationError| CommandError::InvalidArgument(e.to_string()))?,
            ),
            ("method", _) => return Err(CommandError::Usage("method <cash|card|qris>")),

            ("tender" | "paid", [amount]) => Command::Tender(number(amount)?),
            ("tender" | "paid", _) => return Err(CommandError::Usage("tender <amount>")),

            ("pay" | "checkout", []) => Command::Pay,

            ("receipt", []) => Command::Receipt(None),
            ("receipt", [number]) => Command::Receipt(Some(number.to_string())),

            ("share", [phone]) => Command::Share {
                phone: phone.to_string(),
                receipt_number: None,
            },
            ("share", [phone, number]) => Command::Share {
                phone: phone.to_string(),
                receipt_number: Some(number.to_string()),
            },
            ("share", _) => return Err(CommandError::Usage("share <phone> [receipt number]")),

            ("export", [path]) => Command::Export(PathBuf::from(path)),
            ("export", _) => return Err(CommandError::Usage("export <path>")),

            ("search" | "find", rest) => Command::Search(rest.join(" ")),
            ("low", []) => Command::LowStock,

            ("restock", [id, qty]) => Command::Restock(id.to_string(), number(qty)?),
            ("restock", _) => return Err(CommandError::Usage("restock <id> <quantity>")),

            ("adjust", [id, delta]) => Command::Adjust(id.to_string(), number(delta)?),
            ("adjust", _) => return Err(CommandError::Usage("adjust <id> <delta>")),

            ("price", [id, amount]) => Command::Price(id.to_string(), number(amount)?),
            ("price", _) => return Err(CommandError::Usage("price <id> <amount>")),

            ("report", []) => Command::Report,
            ("save", []) => Command::SaveConfig(None),
            ("save", [path]) => Command::SaveConfig(Some(PathBuf::from(path))),
            ("save", _) => return Err(CommandError::Usage("save [config path]")),
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,

            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

pub const HELP: &str = "\
cart:      add <id> | qty <id> <n> | remove <id> | clear | cart
payment:   discount <percent> | method <cash|card|qris> | tender <amount> | pay
receipts:  receipt [number] | share <phone> [number] | export <path>
stock:     search <text> | low | restock <id> <qty> | adjust <id> <delta> | price <id> <amount>
other:     report | save [config path] | help | quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn test_cart_commands() {
        assert_eq!(parse("add kopi"), Ok(Command::Add("kopi".into())));
        assert_eq!(parse("  ADD   kopi "), Ok(Command::Add("kopi".into())));
        assert_eq!(parse("qty kopi 3"), Ok(Command::Quantity("kopi".into(), 3)));
        assert_eq!(parse("qty kopi -1"), Ok(Command::Quantity("kopi".into(), -1)));
        assert_eq!(parse("rm kopi"), Ok(Command::Remove("kopi".into())));
        assert_eq!(parse("clear"), Ok(Command::Clear));
    }

    #[test]
    fn test_payment_commands() {
        assert_eq!(parse("discount 10"), Ok(Command::Discount(10)));
        assert_eq!(parse("discount 10%"), Ok(Command::Discount(10)));
        assert_eq!(parse("method qris"), Ok(Command::Method(PaymentMethod::Qris)));
        assert_eq!(parse("tender 100000"), Ok(Command::Tender(100_000)));
        assert_eq!(parse("pay"), Ok(Command::Pay));
    }

    #[test]
    fn test_receipt_commands() {
        assert_eq!(parse("receipt"), Ok(Command::Receipt(None)));
        assert_eq!(
            parse("share 081234567890 241018-093000-0001"),
            Ok(Command::Share {
                phone: "081234567890".into(),
                receipt_number: Some("241018-093000-0001".into()),
            })
        );
        assert_eq!(parse("search kopi susu"), Ok(Command::Search("kopi susu".into())));
    }

    #[test]
    fn test_save_command() {
        assert_eq!(parse("save"), Ok(Command::SaveConfig(None)));
        assert_eq!(
            parse("save /tmp/till.toml"),
            Ok(Command::SaveConfig(Some(PathBuf::from("/tmp/till.toml"))))
        );
        assert_eq!(parse("save a b"), Err(CommandError::Usage("save [config path]")));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("add"), Err(CommandError::Usage("add <id>")));
        assert_eq!(
            parse("qty kopi many"),
            Err(CommandError::NotANumber("many".into()))
        );
        assert!(matches!(parse("method cheque"), Err(CommandError::InvalidArgument(_))));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
        assert!(parse("").is_err());
    }
}
