//! # Till Register
//!
//! Terminal front end for the checkout service. One register, one cashier,
//! commands read line by line from stdin.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Register Startup                                │
//! │                                                                         │
//! │  1. init_tracing()                                                      │
//! │     └── EnvFilter from RUST_LOG, else "info,till=debug" (to stderr)     │
//! │                                                                         │
//! │  2. StoreConfig::load(--config)                                         │
//! │     └── defaults → till.toml → TILL_* env → validate                    │
//! │                                                                         │
//! │  3. Catalog::load(--catalog or [catalog].path)                          │
//! │     └── no catalog: empty inventory (warning)                           │
//! │                                                                         │
//! │  4. CheckoutService::new(config, inventory)                             │
//! │     └── register_cashier(--cashier)                                     │
//! │                                                                         │
//! │  5. Read-eval loop                                                      │
//! │     └── line ──► Command ──► Register::execute ──► stdout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! ```text
//! till_register/
//! ├── main.rs         ◄─── Entry point (calls run)
//! ├── lib.rs          ◄─── You are here (args, setup, Register)
//! └── commands.rs     ◄─── Line parsing into Command
//! ```

pub mod commands;

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use till_checkout::{CartView, Catalog, CheckoutService, ConfigError, ServiceError, ServiceResult, StoreConfig};
use till_core::cashier::CashierRole;
use till_core::inventory::Inventory;
use till_core::ledger::LineKind;
use till_core::receipt::Receipt;
use till_core::totals::PaymentStatus;
use till_core::Money;

use commands::{Command, HELP};

/// How many products the report lists.
const REPORT_TOP_PRODUCTS: usize = 5;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[clap(name = "till-register", about = "Till POS terminal register")]
pub struct Args {
    /// Config file (defaults to the platform config directory)
    #[clap(short, long, env = "TILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Product and bundle catalog (overrides [catalog].path)
    #[clap(short = 'k', long)]
    pub catalog: Option<PathBuf>,

    /// Name of the cashier on this register
    #[clap(short = 'u', long, default_value = "Cashier")]
    pub cashier: String,
}

/// Startup and I/O failures. Command failures are printed and the loop goes on.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("terminal: {0}")]
    Io(#[from] io::Error),
}

/// Initializes tracing on stderr so it never mixes with receipts on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the register until `quit` or end of input.
pub fn run(args: Args) -> Result<(), RegisterError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Till register");

    let config = StoreConfig::load(args.config)?;
    let inventory = load_inventory(args.catalog.as_deref().or(config.catalog_path()))?;

    let service = CheckoutService::new(config, inventory);
    let cashier = service.register_cashier(&args.cashier, None, CashierRole::Cashier)?;
    let register = Register::new(service, cashier.id);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{} ready. Type 'help' for commands.", register.store_name())?;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "{e}")?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        match register.execute(command) {
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(e) => {
                debug!(code = ?e.code, "Command failed");
                writeln!(stdout, "! {}", e.message)?;
            }
        }
        stdout.flush()?;
    }

    info!("Register closed");
    Ok(())
}

fn load_inventory(path: Option<&std::path::Path>) -> Result<Inventory, ConfigError> {
    match path {
        Some(path) => {
            let inventory = Catalog::load(path)?.into_inventory()?;
            info!(path = %path.display(), "Catalog loaded");
            Ok(inventory)
        }
        None => {
            warn!("No catalog configured, starting with an empty inventory");
            Ok(Inventory::new())
        }
    }
}

// =============================================================================
// Register
// =============================================================================

/// A checkout service bound to the cashier working the register.
#[derive(Debug, Clone)]
pub struct Register {
    service: CheckoutService,
    cashier_id: String,
}

impl Register {
    pub fn new(service: CheckoutService, cashier_id: impl Into<String>) -> Self {
        Register {
            service,
            cashier_id: cashier_id.into(),
        }
    }

    pub fn service(&self) -> &CheckoutService {
        &self.service
    }

    fn store_name(&self) -> &str {
        &self.service.config().store.name
    }

    fn money(&self, amount: Money) -> String {
        self.service.config().format_currency(amount)
    }

    /// Runs one command and returns what to print.
    pub fn execute(&self, command: Command) -> ServiceResult<String> {
        let service = &self.service;

        match command {
            Command::Add(id) => service.add_to_cart(&id).map(|cart| self.render_cart(&cart)),
            Command::Quantity(id, quantity) => service
                .update_quantity(&id, quantity)
                .map(|cart| self.render_cart(&cart)),
            Command::Remove(id) => service.remove_from_cart(&id).map(|cart| self.render_cart(&cart)),
            Command::Clear => service.clear_cart().map(|cart| self.render_cart(&cart)),
            Command::Cart => service.cart().map(|cart| self.render_cart(&cart)),
            Command::Discount(percent) => {
                service.set_discount(percent).map(|cart| self.render_cart(&cart))
            }
            Command::Method(method) => service
                .set_payment_method(method)
                .map(|cart| self.render_cart(&cart)),
            Command::Tender(amount) => service
                .set_tendered(Money::from_minor(amount))
                .map(|cart| self.render_cart(&cart)),
            Command::Pay => {
                let receipt = service.checkout(&self.cashier_id)?;
                service.receipt_text(receipt.receipt_number())
            }
            Command::Receipt(number) => {
                let number = self.receipt_number(number)?;
                service.receipt_text(&number)
            }
            Command::Share {
                phone,
                receipt_number,
            } => {
                let number = self.receipt_number(receipt_number)?;
                service.share_receipt(&number, &phone)
            }
            Command::Export(path) => {
                let json = service.export_journal()?;
                std::fs::write(&path, json).map_err(|e| {
                    ServiceError::internal(format!("Cannot write {}: {}", path.display(), e))
                })?;
                Ok(format!("Journal written to {}", path.display()))
            }
            Command::Search(query) => {
                let products = service.search_products(&query)?;
                if products.is_empty() {
                    return Ok("No products found".to_string());
                }
                let mut out = String::new();
                for p in products {
                    let stock = p.stock.map_or_else(|| "-".to_string(), |s| s.to_string());
                    let _ = writeln!(out, "{:<12} {:<24} {:>12}  stock {}", p.id, p.name, self.money(p.price), stock);
                }
                Ok(out.trim_end().to_string())
            }
            Command::LowStock => {
                let low = service.low_stock()?;
                if low.is_empty() {
                    return Ok("Stock levels OK".to_string());
                }
                let mut out = String::new();
                for item in low {
                    let _ = writeln!(out, "{:<12} {:<24} {}", item.id, item.name, item.stock.unwrap_or(0));
                }
                Ok(out.trim_end().to_string())
            }
            Command::Restock(id, quantity) => {
                let stock = service.restock(&id, quantity)?;
                Ok(format!("{id}: {stock} in stock"))
            }
            Command::Adjust(id, delta) => {
                let stock = service.adjust_stock(&id, delta)?;
                Ok(format!("{id}: {stock} in stock"))
            }
            Command::Price(id, amount) => {
                let price = Money::from_minor(amount);
                service.set_price(&id, price)?;
                Ok(format!("{id}: now {}", self.money(price)))
            }
            Command::Report => self.render_report(),
            Command::SaveConfig(path) => {
                let path = service.save_config(path)?;
                Ok(format!("Config saved to {}", path.display()))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Explicit receipt number, or the latest receipt.
    fn receipt_number(&self, number: Option<String>) -> ServiceResult<String> {
        match number {
            Some(number) => Ok(number),
            None => self
                .service
                .last_receipt()
                .map(|r: Receipt| r.receipt_number().to_string()),
        }
    }

    fn render_cart(&self, cart: &CartView) -> String {
        if cart.items.is_empty() {
            return "Cart is empty".to_string();
        }

        let mut out = String::new();
        for item in &cart.items {
            let marker = match item.kind {
                LineKind::Bundle => " (bundle)",
                LineKind::Unit => "",
            };
            let _ = writeln!(
                out,
                "{:>3} x {:<24} {:>14}",
                item.quantity,
                format!("{}{}", item.name, marker),
                self.money(item.line_total())
            );
        }

        let totals = &cart.totals;
        let _ = writeln!(out, "{:<30} {:>14}", "Subtotal", self.money(totals.subtotal));
        if totals.discount.is_positive() {
            let _ = writeln!(
                out,
                "{:<30} {:>14}",
                format!("Discount ({}%)", cart.payment.discount_percent),
                format!("-{}", self.money(totals.discount))
            );
        }
        let _ = writeln!(out, "{:<30} {:>14}", "Tax", self.money(totals.tax));
        let _ = writeln!(out, "{:<30} {:>14}", "TOTAL", self.money(totals.total));
        let _ = write!(
            out,
            "{:<30} {:>14}",
            format!("Paid ({})", cart.payment.method),
            self.money(cart.payment.amount_paid)
        );

        match cart.payment.status {
            PaymentStatus::Incomplete { remaining } => {
                let _ = write!(out, "\n{:<30} {:>14}", "Due", self.money(remaining));
            }
            PaymentStatus::Settled { change } => {
                let _ = write!(out, "\n{:<30} {:>14}", "Change", self.money(change));
            }
        }
        out
    }

    fn render_report(&self) -> ServiceResult<String> {
        let summary = self.service.dashboard(REPORT_TOP_PRODUCTS)?;
        let mut out = String::new();

        let _ = writeln!(out, "Transactions  {}", summary.transaction_count);
        let _ = writeln!(out, "Gross sales   {}", self.money(summary.gross_sales));
        let _ = writeln!(out, "Discounts     {}", self.money(summary.discounts_given));
        let _ = writeln!(out, "Tax           {}", self.money(summary.tax_collected));
        let _ = writeln!(out, "Net sales     {}", self.money(summary.net_sales));
        let _ = writeln!(out, "Average       {}", self.money(summary.average_ticket));

        for method in &summary.by_method {
            let _ = writeln!(
                out,
                "  {:<10} {:>4} x  {}",
                method.method.to_string(),
                method.transactions,
                self.money(method.total)
            );
        }
        for (rank, product) in summary.top_products.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {:<24} {:>4}  {}",
                rank + 1,
                product.name,
                product.quantity,
                self.money(product.revenue)
            );
        }
        Ok(out.trim_end().to_string())
    }
}
