//! # Receipt Sharing
//!
//! Builds WhatsApp click-to-chat links so a receipt can be sent to the
//! customer's phone instead of (or as well as) being printed.
//!
//! ```text
//! "0812-3456-7890" ──normalize──► "6281234567890"
//!                                       │
//!                                       ▼
//!        https://wa.me/6281234567890?text=Warung%20Maju%0AReceipt%20...
//! ```

use url::Url;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::receipt::{Receipt, ReceiptHeader};
use crate::validation::normalize_phone;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Normalises a local or international phone number to international digits.
///
/// A leading `0` is the local trunk prefix and is replaced by `country_code`.
pub fn international_phone(raw: &str, country_code: &str) -> CoreResult<String> {
    if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "country code".to_string(),
            reason: "must contain only digits".to_string(),
        }
        .into());
    }

    let digits = normalize_phone(raw)?;
    match digits.strip_prefix('0') {
        Some(local) => Ok(format!("{country_code}{local}")),
        None => Ok(digits),
    }
}

/// Builds a `wa.me` link that opens a chat with `phone` prefilled with `message`.
///
/// Spaces in the text are encoded as `%20`, not `+`.
///
/// ```rust
/// use till_core::share::whatsapp_link;
///
/// let link = whatsapp_link("0812 3456 7890", "62", "Total Rp99.900").unwrap();
/// assert_eq!(link.as_str(), "https://wa.me/6281234567890?text=Total%20Rp99.900");
/// ```
pub fn whatsapp_link(phone: &str, country_code: &str, message: &str) -> CoreResult<Url> {
    let phone = international_phone(phone, country_code)?;
    let mut link = Url::parse_with_params(&format!("{WHATSAPP_BASE}{phone}"), &[("text", message)])
        .map_err(|e| ValidationError::InvalidFormat {
            field: "share link".to_string(),
            reason: e.to_string(),
        })?;

    // Form encoding turns a literal '+' into %2B, so every '+' left is a space.
    let query = link.query().map(|q| q.replace('+', "%20"));
    link.set_query(query.as_deref());
    Ok(link)
}

/// Plain-text receipt summary suitable for a chat message.
pub fn receipt_message(receipt: &Receipt, header: &ReceiptHeader) -> String {
    let fmt = |m: Money| header.currency.format(m);
    let mut lines = vec![
        header.store_name.clone(),
        format!("Receipt {}", receipt.receipt_number()),
        receipt.completed_at().format("%Y-%m-%d %H:%M").to_string(),
        String::new(),
    ];

    for item in receipt.items() {
        lines.push(format!(
            "{} x{} {}",
            item.name,
            item.quantity,
            fmt(item.line_total)
        ));
    }

    lines.push(String::new());
    if !receipt.discount().is_zero() {
        lines.push(format!("Discount: -{}", fmt(receipt.discount())));
    }
    if !receipt.tax().is_zero() {
        lines.push(format!("Tax: {}", fmt(receipt.tax())));
    }
    lines.push(format!("Total: {}", fmt(receipt.total())));
    lines.push(format!(
        "Paid ({}): {}",
        receipt.payment_method(),
        fmt(receipt.amount_paid())
    ));
    lines.push(format!("Change: {}", fmt(receipt.change())));

    if let Some(footer) = &header.footer {
        lines.push(String::new());
        lines.push(footer.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashier::CashierRef;
    use crate::ledger::LineItem;
    use crate::money::CurrencyFormat;
    use crate::session::CheckoutSession;
    use crate::types::TaxRate;
    use chrono::Utc;

    #[test]
    fn test_local_number_gets_country_code() {
        assert_eq!(
            international_phone("0812-3456-7890", "62").unwrap(),
            "6281234567890"
        );
        assert_eq!(
            international_phone("+62 812 3456 7890", "62").unwrap(),
            "6281234567890"
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(international_phone("12345", "62").is_err());
        assert!(international_phone("0812abc", "62").is_err());
        assert!(international_phone("081234567890", "+62").is_err());
    }

    #[test]
    fn test_link_encodes_message() {
        let link = whatsapp_link("081234567890", "62", "Total: Rp99.900\nThanks & bye").unwrap();
        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/6281234567890");

        let text: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(
            text,
            vec![("text".to_string(), "Total: Rp99.900\nThanks & bye".to_string())]
        );
    }

    #[test]
    fn test_link_spaces_are_percent_encoded() {
        let link = whatsapp_link("081234567890", "62", "Kopi Susu x2 + Roti").unwrap();
        assert_eq!(link.query(), Some("text=Kopi%20Susu%20x2%20%2B%20Roti"));

        let text: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(text[0].1, "Kopi Susu x2 + Roti");
    }

    #[test]
    fn test_receipt_message() {
        let mut session = CheckoutSession::new(TaxRate::zero());
        session.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
        session.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
        session.set_tendered(Money::from_minor(50_000));
        let receipt = session
            .checkout(
                CashierRef {
                    id: "c1".to_string(),
                    name: "Sari".to_string(),
                },
                "0007".to_string(),
                Utc::now(),
            )
            .unwrap();

        let header = ReceiptHeader {
            store_name: "Warung Maju".to_string(),
            currency: CurrencyFormat::default(),
            ..ReceiptHeader::default()
        };
        let message = receipt_message(&receipt, &header);

        assert!(message.starts_with("Warung Maju\nReceipt 0007"));
        assert!(message.contains("Kopi Susu x2 Rp36.000"));
        assert!(message.contains("Total: Rp36.000"));
        assert!(message.contains("Change: Rp14.000"));
        assert!(!message.contains("Tax:"));
    }
}
