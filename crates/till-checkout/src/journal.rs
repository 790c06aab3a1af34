//! # Receipt Journal
//!
//! Append-only record of completed receipts for the running register. The
//! dashboard, reprints and share links all read from here.
//!
//! ## Receipt Numbers
//! ```text
//! 241018-093000-0007
//! ──┬─── ──┬─── ──┬─
//!   │      │      └── sequence within this journal (1-based, wraps at 10000)
//!   │      └───────── completion time HHMMSS (UTC)
//!   └──────────────── completion date YYMMDD (UTC)
//! ```

use chrono::{DateTime, Utc};

use till_core::receipt::Receipt;

/// Completed receipts in completion order.
#[derive(Debug, Clone, Default)]
pub struct ReceiptJournal {
    receipts: Vec<Receipt>,
}

impl ReceiptJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next appended receipt will carry.
    pub fn next_receipt_number(&self, now: DateTime<Utc>) -> String {
        let sequence = (self.receipts.len() + 1) % 10_000;
        format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), sequence)
    }

    pub fn append(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
    }

    /// Looks up a receipt by its number.
    pub fn find(&self, receipt_number: &str) -> Option<&Receipt> {
        self.receipts
            .iter()
            .find(|r| r.receipt_number() == receipt_number)
    }

    pub fn last(&self) -> Option<&Receipt> {
        self.receipts.last()
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    /// Serializes every receipt as a JSON array (end-of-day export).
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.receipts)
    }
}
