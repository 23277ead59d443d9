use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{fetch_json, DealSource, FetchReport, QueryFailure, QueryOutcome};
use crate::domain::{iso_date, ymd_compact};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalize::{
    extract_field, normalize_rows, rows_from_payload, RecordContext, BSE_DEAL_FIELDS,
};
use crate::{DateRange, DealCategory, Exchange, FetchError, SymbolUniverse};

const BSE_REFERER: &str = "https://www.bseindia.com/";

/// Listing queries tried in order; the parameter casing has changed upstream.
const LISTING_QUERIES: [&str; 2] = [
    "ListofScripData/w?group=&Scripcode=&industry=&segment=SME",
    "ListofScripData/w?Group=&Scripcode=&industry=&segment=SME",
];
const LISTING_CONTAINERS: [&str; 3] = ["Table", "Data", "table"];
const LISTING_SYMBOL_KEYS: [&str; 3] = ["SecurityId", "scrip_cd", "symbol"];

const DEAL_CONTAINERS: [&str; 2] = ["Table", "Data"];
/// Market-watch `strType` codes per category, in query order.
const DEAL_TYPES: [(DealCategory, &str); 2] = [(DealCategory::Bulk, "B"), (DealCategory::Block, "BL")];

/// Base URL used by [`BseAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BseEndpoints {
    pub api: String,
}

impl Default for BseEndpoints {
    fn default() -> Self {
        Self {
            api: String::from("https://api.bseindia.com/BseIndiaAPI/api"),
        }
    }
}

impl BseEndpoints {
    pub fn at(base: &str) -> Self {
        Self {
            api: base.trim_end_matches('/').to_owned(),
        }
    }
}

/// BSE adapter. The deal feed is day-granular, so a range costs two queries
/// per calendar day.
pub struct BseAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoints: BseEndpoints,
}

impl Default for BseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BseAdapter {
    pub fn new() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::browser()), BseEndpoints::default())
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, endpoints: BseEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{path}", self.endpoints.api)).with_header("referer", BSE_REFERER)
    }

    async fn resolve_universe(&self) -> SymbolUniverse {
        for query in LISTING_QUERIES {
            let payload = match fetch_json(self.http_client.as_ref(), self.request(query)).await {
                Ok(payload) => payload,
                Err(error) => {
                    debug!(exchange = %Exchange::Bse, query, %error, "listing query failed");
                    continue;
                }
            };

            let universe = listing_symbols(&payload);
            if !universe.is_empty() {
                return universe;
            }
        }
        SymbolUniverse::new()
    }

    async fn run_query(&self, category: DealCategory, code: &str, day: time::Date) -> QueryOutcome {
        let compact = ymd_compact(day);
        let label = format!("MktWatchBulkDealData[{code}@{compact}]");
        let context = RecordContext::new(Exchange::Bse, category).with_date_fallback(iso_date(day));
        let path = format!("MktWatchBulkDealData/w?strType={code}&strDate={compact}");

        let payload = fetch_json(self.http_client.as_ref(), self.request(&path))
            .await
            .map_err(|error| QueryFailure::new(label.as_str(), error))?;
        let rows = rows_from_payload(&payload, &DEAL_CONTAINERS).ok_or_else(|| {
            QueryFailure::new(
                label.as_str(),
                FetchError::Payload(String::from("response has no Table/Data array")),
            )
        })?;

        Ok(normalize_rows(rows, &BSE_DEAL_FIELDS, &context))
    }
}

impl DealSource for BseAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Bse
    }

    fn universe<'a>(&'a self) -> Pin<Box<dyn Future<Output = SymbolUniverse> + Send + 'a>> {
        Box::pin(async move {
            let universe = self.resolve_universe().await;
            if universe.is_empty() {
                warn!(exchange = %Exchange::Bse, "SME universe unavailable; deals will not be filtered");
            } else {
                info!(exchange = %Exchange::Bse, symbols = universe.len(), "resolved SME universe");
            }
            universe
        })
    }

    fn deals<'a>(&'a self, range: &'a DateRange) -> Pin<Box<dyn Future<Output = FetchReport> + Send + 'a>> {
        Box::pin(async move {
            let mut report = FetchReport::default();

            for day in range.days() {
                for (category, code) in DEAL_TYPES {
                    let outcome = self.run_query(category, code, day).await;
                    if let Err(failure) = &outcome {
                        warn!(exchange = %Exchange::Bse, query = %failure.label, error = %failure.error, "deal query failed");
                    }
                    report.absorb(outcome);
                }
            }

            info!(
                exchange = %Exchange::Bse,
                days = range.day_count(),
                records = report.records.len(),
                failed_queries = report.failures.len(),
                "fetched deals"
            );
            report
        })
    }
}

/// Symbols from every listing container present in the payload.
fn listing_symbols(payload: &Value) -> SymbolUniverse {
    LISTING_CONTAINERS
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .map(|row| extract_field(row, &LISTING_SYMBOL_KEYS))
        .collect()
}
