//! Plain-text rendering of scan results for the chat message.

use crate::{DateRange, DealRecord};

pub const NO_DEALS_LINE: &str = "- No SME deals found";

/// Render one exchange section, truncated to `max_rows` lines of deals.
pub fn format_section(title: &str, records: &[DealRecord], max_rows: usize) -> String {
    if records.is_empty() {
        return format!("{title}\n{NO_DEALS_LINE}");
    }

    let mut lines = Vec::with_capacity(records.len().min(max_rows) + 2);
    lines.push(title.to_owned());
    lines.extend(records.iter().take(max_rows).map(format_row));
    if records.len() > max_rows {
        lines.push(format!("- ... and {} more", records.len() - max_rows));
    }
    lines.join("\n")
}

fn format_row(record: &DealRecord) -> String {
    format!(
        "- {} | {} | {} | Qty: {} | Px: {}",
        record.date(),
        record.category(),
        record.symbol(),
        record.quantity(),
        record.price()
    )
}

/// Assemble the full message: header, one block per section, then warnings.
pub fn compose_message(range: &DateRange, sections: &[String], warnings: &[String]) -> String {
    let mut parts = vec![format!("SME block/bulk scan ({range})")];
    for section in sections {
        parts.push(String::new());
        parts.push(section.clone());
    }
    if !warnings.is_empty() {
        parts.push(String::new());
        parts.push(String::from("Warnings:"));
        parts.extend(warnings.iter().map(|warning| format!("- {warning}")));
    }
    parts.join("\n")
}
