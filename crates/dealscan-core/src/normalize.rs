//! Payload-to-record normalization.
//!
//! Upstream deal feeds have shipped several schema variants over time, so each
//! record field is resolved from an ordered list of candidate keys. The lists
//! live in [`FieldSchema`] constants rather than in matching code so that a new
//! variant is a one-line change.

use serde_json::{Map, Value};

use crate::{DealCategory, DealRecord, Exchange};

/// Candidate key lists, highest priority first, for every record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub symbol: &'static [&'static str],
    pub date: &'static [&'static str],
    pub quantity: &'static [&'static str],
    pub price: &'static [&'static str],
    pub buyer: &'static [&'static str],
    pub seller: &'static [&'static str],
}

/// NSE historical block/bulk deal rows.
pub const NSE_DEAL_FIELDS: FieldSchema = FieldSchema {
    symbol: &["symbol", "scripName", "Security"],
    date: &["date", "dt", "DealDate"],
    quantity: &["quantityTraded", "qty", "Quantity"],
    price: &["pricePerShare", "price", "Price"],
    buyer: &["clientName", "buyerName", "Buyer"],
    seller: &["sellerName", "Seller"],
};

/// BSE market-watch bulk/block deal rows.
pub const BSE_DEAL_FIELDS: FieldSchema = FieldSchema {
    symbol: &["Security", "scripname", "ScripName"],
    date: &["Date", "DealDate"],
    quantity: &["Qty", "Quantity"],
    price: &["Price", "DealPrice"],
    buyer: &["BuyerName", "ClientName"],
    seller: &["SellerName"],
};

/// Where the rows of a payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordContext {
    pub exchange: Exchange,
    pub category: DealCategory,
    /// Used when no date candidate is present.
    pub date_fallback: Option<String>,
}

impl RecordContext {
    pub fn new(exchange: Exchange, category: DealCategory) -> Self {
        Self {
            exchange,
            category,
            date_fallback: None,
        }
    }

    pub fn with_date_fallback(mut self, date: impl Into<String>) -> Self {
        self.date_fallback = Some(date.into());
        self
    }
}

/// First candidate key holding a usable scalar, rendered as trimmed text.
///
/// Strings count when non-blank, numbers (zero included) and `true` always
/// count. `false`, `null`, arrays and objects are skipped. No match yields an
/// empty string.
pub fn extract_field(entry: &Map<String, Value>, candidates: &[&str]) -> String {
    candidates
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(scalar_text)
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some(String::from("true")),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Normalize one payload entry; non-object entries yield `None`.
pub fn normalize_entry(
    entry: &Value,
    schema: &FieldSchema,
    context: &RecordContext,
) -> Option<DealRecord> {
    let object = entry.as_object()?;

    let mut date = extract_field(object, schema.date);
    if date.is_empty() {
        if let Some(fallback) = &context.date_fallback {
            date.clone_from(fallback);
        }
    }

    Some(DealRecord::new(
        context.exchange,
        context.category,
        extract_field(object, schema.symbol),
        date,
        extract_field(object, schema.quantity),
        extract_field(object, schema.price),
        extract_field(object, schema.buyer),
        extract_field(object, schema.seller),
    ))
}

pub fn normalize_rows(rows: &[Value], schema: &FieldSchema, context: &RecordContext) -> Vec<DealRecord> {
    rows.iter()
        .filter_map(|entry| normalize_entry(entry, schema, context))
        .collect()
}

/// Row array under the first container key holding a non-empty array.
///
/// Falls back to the first empty array found, and to `None` when no container
/// key holds an array at all.
pub fn rows_from_payload<'p>(payload: &'p Value, container_keys: &[&str]) -> Option<&'p [Value]> {
    let mut arrays = container_keys
        .iter()
        .filter_map(|key| payload.get(*key))
        .filter_map(Value::as_array);

    let first = arrays.next()?;
    if !first.is_empty() {
        return Some(first.as_slice());
    }
    Some(arrays.find(|rows| !rows.is_empty()).unwrap_or(first).as_slice())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn first_present_candidate_wins() {
        let entry = object(json!({ "qty": "10", "Quantity": "20" }));
        assert_eq!(extract_field(&entry, NSE_DEAL_FIELDS.quantity), "10");
    }

    #[test]
    fn blank_and_null_candidates_fall_through() {
        let entry = object(json!({ "symbol": "  ", "scripName": null, "Security": "ACME" }));
        assert_eq!(extract_field(&entry, NSE_DEAL_FIELDS.symbol), "ACME");
    }

    #[test]
    fn numbers_keep_their_json_text() {
        let entry = object(json!({ "Qty": 1500, "Price": 12.5 }));
        assert_eq!(extract_field(&entry, BSE_DEAL_FIELDS.quantity), "1500");
        assert_eq!(extract_field(&entry, BSE_DEAL_FIELDS.price), "12.5");
    }

    #[test]
    fn false_falls_through_while_zero_is_kept() {
        let entry = object(json!({ "clientName": false, "buyerName": "ALPHA FUND", "qty": 0 }));
        assert_eq!(extract_field(&entry, NSE_DEAL_FIELDS.buyer), "ALPHA FUND");
        assert_eq!(extract_field(&entry, NSE_DEAL_FIELDS.quantity), "0");
    }

    #[test]
    fn missing_candidates_yield_empty_string() {
        let entry = object(json!({ "unrelated": "x", "Seller": ["nested"] }));
        for candidates in [
            NSE_DEAL_FIELDS.symbol,
            NSE_DEAL_FIELDS.date,
            NSE_DEAL_FIELDS.quantity,
            NSE_DEAL_FIELDS.price,
            NSE_DEAL_FIELDS.buyer,
            NSE_DEAL_FIELDS.seller,
        ] {
            assert_eq!(extract_field(&entry, candidates), "");
        }
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let context = RecordContext::new(Exchange::Nse, DealCategory::Bulk);
        let rows = vec![json!("junk"), json!(42), json!({ "symbol": "abc" }), Value::Null];

        let records = normalize_rows(&rows, &NSE_DEAL_FIELDS, &context);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol(), "ABC");
    }

    #[test]
    fn date_fallback_applies_only_when_no_date_key_matches() {
        let context =
            RecordContext::new(Exchange::Bse, DealCategory::Block).with_date_fallback("2026-10-14");

        let without = normalize_entry(&json!({ "Security": "X" }), &BSE_DEAL_FIELDS, &context)
            .expect("object");
        let with = normalize_entry(
            &json!({ "Security": "X", "DealDate": "13/10/2026" }),
            &BSE_DEAL_FIELDS,
            &context,
        )
        .expect("object");

        assert_eq!(without.date(), "2026-10-14");
        assert_eq!(with.date(), "13/10/2026");
    }

    #[test]
    fn rows_come_from_first_array_container() {
        let payload = json!({ "Table": "not rows", "Data": [{ "Security": "A" }] });
        let rows = rows_from_payload(&payload, &["Table", "Data"]).expect("rows");
        assert_eq!(rows.len(), 1);
        assert!(rows_from_payload(&payload, &["data"]).is_none());
    }

    #[test]
    fn empty_container_defers_to_later_non_empty_one() {
        let payload = json!({ "Table": [], "Data": [{ "Security": "A" }, { "Security": "B" }] });
        let rows = rows_from_payload(&payload, &["Table", "Data"]).expect("rows");
        assert_eq!(rows.len(), 2);

        let empty = json!({ "Table": [] });
        assert_eq!(rows_from_payload(&empty, &["Table", "Data"]).map(<[Value]>::len), Some(0));
    }
}
