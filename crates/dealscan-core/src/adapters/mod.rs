//! Exchange adapters.
//!
//! Each adapter resolves its SME symbol universe and fetches raw block/bulk
//! disclosures for a date range. Adapters never fail a whole fetch because of
//! one query: every query produces a [`QueryOutcome`] and the failures are
//! collected in the [`FetchReport`].

mod bse;
mod nse;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{DateRange, DealRecord, Exchange, FetchError, SymbolUniverse};

pub use bse::{BseAdapter, BseEndpoints};
pub use nse::{NseAdapter, NseEndpoints};

/// One swallowed query failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub label: String,
    pub error: FetchError,
}

impl QueryFailure {
    pub fn new(label: impl Into<String>, error: FetchError) -> Self {
        Self {
            label: label.into(),
            error,
        }
    }
}

impl Display for QueryFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.error)
    }
}

/// Result of a single deal query.
pub type QueryOutcome = Result<Vec<DealRecord>, QueryFailure>;

/// Everything a source returned for one range, including what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub records: Vec<DealRecord>,
    pub failures: Vec<QueryFailure>,
    pub queries: usize,
}

impl FetchReport {
    pub fn absorb(&mut self, outcome: QueryOutcome) {
        self.queries += 1;
        match outcome {
            Ok(records) => self.records.extend(records),
            Err(failure) => self.failures.push(failure),
        }
    }

    /// True when at least one query ran and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.queries > 0 && self.failures.len() == self.queries
    }
}

/// Exchange adapter contract.
pub trait DealSource: Send + Sync {
    fn exchange(&self) -> Exchange;

    /// Prepare per-run session state. Must succeed before any data query.
    fn open_session<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), FetchError>> + Send + 'a>> {
        Box::pin(async { Ok::<(), FetchError>(()) })
    }

    /// SME tickers for this exchange; empty when the listing is unavailable.
    fn universe<'a>(&'a self) -> Pin<Box<dyn Future<Output = SymbolUniverse> + Send + 'a>>;

    fn deals<'a>(&'a self, range: &'a DateRange) -> Pin<Box<dyn Future<Output = FetchReport> + Send + 'a>>;
}

/// Execute a request and decode a successful body as JSON.
pub(crate) async fn fetch_json(client: &dyn HttpClient, request: HttpRequest) -> Result<Value, FetchError> {
    let response = client.execute(request).await?;
    if !response.is_success() {
        return Err(FetchError::Status {
            status: response.status,
        });
    }
    serde_json::from_str(&response.body).map_err(|e| FetchError::Payload(e.to_string()))
}

/// Execute a request and return a successful body as text.
pub(crate) async fn fetch_text(client: &dyn HttpClient, request: HttpRequest) -> Result<String, FetchError> {
    let response = client.execute(request).await?;
    if !response.is_success() {
        return Err(FetchError::Status {
            status: response.status,
        });
    }
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DealCategory;

    fn record(symbol: &str) -> DealRecord {
        DealRecord::new(Exchange::Nse, DealCategory::Bulk, symbol, "d", "1", "1", "", "")
    }

    #[test]
    fn report_counts_queries_and_keeps_failures() {
        let mut report = FetchReport::default();
        report.absorb(Ok(vec![record("A"), record("B")]));
        report.absorb(Err(QueryFailure::new("block", FetchError::Status { status: 503 })));

        assert_eq!(report.queries, 2);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(!report.all_failed());
    }

    #[test]
    fn report_with_only_failures_is_all_failed() {
        let mut report = FetchReport::default();
        assert!(!report.all_failed());

        report.absorb(Err(QueryFailure::new("bulk", FetchError::Transport("reset".into()))));
        assert!(report.all_failed());
    }

    #[test]
    fn failure_display_names_the_query() {
        let failure = QueryFailure::new("bulk-deals", FetchError::Status { status: 401 });
        assert_eq!(failure.to_string(), "bulk-deals: upstream returned status 401");
    }
}
