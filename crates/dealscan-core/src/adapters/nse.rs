use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{fetch_json, fetch_text, DealSource, FetchReport, QueryFailure, QueryOutcome};
use crate::domain::dmy_dashed;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalize::{normalize_rows, rows_from_payload, RecordContext, NSE_DEAL_FIELDS};
use crate::{DateRange, DealCategory, Exchange, FetchError, SymbolUniverse};

/// Series codes of the SME platform in the NSE security master.
const SME_SERIES: [&str; 2] = ["SM", "ST"];

const NSE_HEADERS: [(&str, &str); 3] = [
    ("accept", "application/json,text/html,application/xhtml+xml"),
    ("accept-language", "en-US,en;q=0.9"),
    ("referer", "https://www.nseindia.com/"),
];

struct DealQuery {
    category: DealCategory,
    path: &'static str,
    option_type: Option<&'static str>,
}

impl DealQuery {
    fn label(&self) -> String {
        match self.option_type {
            Some(option) => format!("{}[{option}]", self.path),
            None => self.path.to_owned(),
        }
    }

    fn url(&self, api: &str, from: &str, to: &str) -> String {
        let option = self
            .option_type
            .map(|value| format!("optionType={value}&"))
            .unwrap_or_default();
        format!("{api}/historicalOR/{}?{option}from={from}&to={to}", self.path)
    }
}

/// Dedicated and combined report endpoints; both are queried because NSE has
/// served the same data from either at different times.
const DEAL_QUERIES: [DealQuery; 4] = [
    DealQuery {
        category: DealCategory::Bulk,
        path: "bulk-deals",
        option_type: None,
    },
    DealQuery {
        category: DealCategory::Block,
        path: "block-deals",
        option_type: None,
    },
    DealQuery {
        category: DealCategory::Bulk,
        path: "bulk-block-short-deals",
        option_type: Some("bulk_deals"),
    },
    DealQuery {
        category: DealCategory::Block,
        path: "bulk-block-short-deals",
        option_type: Some("block_deals"),
    },
];

/// Base URLs used by [`NseAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NseEndpoints {
    /// Web front-end visited to seed session cookies.
    pub home: String,
    pub api: String,
    /// Host of the equity security master CSV.
    pub archives: String,
}

impl Default for NseEndpoints {
    fn default() -> Self {
        Self {
            home: String::from("https://www.nseindia.com"),
            api: String::from("https://www.nseindia.com/api"),
            archives: String::from("https://nsearchives.nseindia.com"),
        }
    }
}

impl NseEndpoints {
    /// All endpoints under one base URL (`{base}`, `{base}/api`, `{base}/archives`).
    pub fn at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            home: base.to_owned(),
            api: format!("{base}/api"),
            archives: format!("{base}/archives"),
        }
    }
}

/// NSE adapter.
///
/// The API only answers clients that have visited the web front-end first, so
/// the transport must retain cookies across requests. [`NseAdapter::new`]
/// builds such a transport; one adapter covers one run.
pub struct NseAdapter {
    http_client: Arc<dyn HttpClient>,
    endpoints: NseEndpoints,
    session_open: AtomicBool,
}

impl Default for NseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl NseAdapter {
    pub fn new() -> Self {
        Self::with_http_client(
            Arc::new(ReqwestHttpClient::with_cookie_jar()),
            NseEndpoints::default(),
        )
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, endpoints: NseEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
            session_open: AtomicBool::new(false),
        }
    }

    fn request(&self, url: impl Into<String>) -> HttpRequest {
        HttpRequest::get(url).with_headers(&NSE_HEADERS)
    }

    async fn warm_up(&self) -> Result<(), FetchError> {
        let request = self.request(self.endpoints.home.as_str());
        // Only the cookies matter; the page body is discarded.
        fetch_text(self.http_client.as_ref(), request).await?;
        self.session_open.store(true, Ordering::SeqCst);
        debug!(exchange = %Exchange::Nse, "session cookies seeded");
        Ok(())
    }

    async fn ensure_session(&self) -> Result<(), FetchError> {
        if self.session_open.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.warm_up().await
    }

    async fn fetch_universe(&self) -> Result<SymbolUniverse, FetchError> {
        self.ensure_session().await?;
        let url = format!("{}/content/equities/EQUITY_L.csv", self.endpoints.archives);
        let text = fetch_text(self.http_client.as_ref(), self.request(url)).await?;
        parse_security_master(&text)
    }

    async fn run_query(&self, query: &DealQuery, from: &str, to: &str) -> QueryOutcome {
        let url = query.url(&self.endpoints.api, from, to);
        let context = RecordContext::new(Exchange::Nse, query.category);

        let payload = fetch_json(self.http_client.as_ref(), self.request(url))
            .await
            .map_err(|error| QueryFailure::new(query.label(), error))?;
        let rows = rows_from_payload(&payload, &["data"]).ok_or_else(|| {
            QueryFailure::new(
                query.label(),
                FetchError::Payload(String::from("response has no 'data' array")),
            )
        })?;

        Ok(normalize_rows(rows, &NSE_DEAL_FIELDS, &context))
    }
}

impl DealSource for NseAdapter {
    fn exchange(&self) -> Exchange {
        Exchange::Nse
    }

    fn open_session<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), FetchError>> + Send + 'a>> {
        Box::pin(self.warm_up())
    }

    fn universe<'a>(&'a self) -> Pin<Box<dyn Future<Output = SymbolUniverse> + Send + 'a>> {
        Box::pin(async move {
            match self.fetch_universe().await {
                Ok(universe) => {
                    info!(exchange = %Exchange::Nse, symbols = universe.len(), "resolved SME universe");
                    universe
                }
                Err(error) => {
                    warn!(exchange = %Exchange::Nse, %error, "SME universe unavailable; deals will not be filtered");
                    SymbolUniverse::new()
                }
            }
        })
    }

    fn deals<'a>(&'a self, range: &'a DateRange) -> Pin<Box<dyn Future<Output = FetchReport> + Send + 'a>> {
        Box::pin(async move {
            let mut report = FetchReport::default();

            if let Err(error) = self.ensure_session().await {
                for query in &DEAL_QUERIES {
                    report.absorb(Err(QueryFailure::new(query.label(), error.clone())));
                }
                return report;
            }

            let from = dmy_dashed(range.from());
            let to = dmy_dashed(range.to());
            for query in &DEAL_QUERIES {
                let outcome = self.run_query(query, &from, &to).await;
                match &outcome {
                    Ok(records) => {
                        debug!(exchange = %Exchange::Nse, query = %query.label(), rows = records.len(), "deal query succeeded")
                    }
                    Err(failure) => {
                        warn!(exchange = %Exchange::Nse, query = %failure.label, error = %failure.error, "deal query failed")
                    }
                }
                report.absorb(outcome);
            }

            info!(
                exchange = %Exchange::Nse,
                records = report.records.len(),
                failed_queries = report.failures.len(),
                "fetched deals"
            );
            report
        })
    }
}

/// SME symbols from the NSE equity security master.
///
/// Header names are matched after trimming, since the published file pads
/// some of them with a leading space.
pub(crate) fn parse_security_master(text: &str) -> Result<SymbolUniverse, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FetchError::Payload(format!("security master header: {e}")))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| FetchError::Payload(format!("security master has no {name} column")))
    };
    let symbol_column = column("SYMBOL")?;
    let series_column = column("SERIES")?;

    let mut universe = SymbolUniverse::new();
    for row in reader.records() {
        let Ok(row) = row else {
            continue;
        };
        let series = row.get(series_column).unwrap_or_default().to_ascii_uppercase();
        if SME_SERIES.contains(&series.as_str()) {
            if let Some(symbol) = row.get(symbol_column) {
                universe.insert(symbol);
            }
        }
    }
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_master_keeps_only_sme_series() {
        let csv = "SYMBOL,NAME OF COMPANY, SERIES, DATE OF LISTING\n\
                   ABC,Abc Ltd,SM,01-JAN-2020\n\
                   BIG,Big Ltd,EQ,01-JAN-2001\n\
                   def,Def Ltd, st ,02-FEB-2021\n";

        let universe = parse_security_master(csv).expect("parse");
        assert_eq!(universe.iter().collect::<Vec<_>>(), vec!["ABC", "DEF"]);
    }

    #[test]
    fn security_master_without_series_column_is_rejected() {
        let err = parse_security_master("SYMBOL,NAME\nABC,Abc\n").expect_err("must fail");
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn query_urls_carry_option_type_before_dates() {
        let combined = &DEAL_QUERIES[2];
        assert_eq!(
            combined.url("https://x.test/api", "13-10-2026", "14-10-2026"),
            "https://x.test/api/historicalOR/bulk-block-short-deals?optionType=bulk_deals&from=13-10-2026&to=14-10-2026"
        );
        assert_eq!(
            DEAL_QUERIES[1].url("https://x.test/api", "a", "b"),
            "https://x.test/api/historicalOR/block-deals?from=a&to=b"
        );
    }

    #[test]
    fn endpoints_can_share_one_base() {
        let endpoints = NseEndpoints::at("http://127.0.0.1:9000/");
        assert_eq!(endpoints.home, "http://127.0.0.1:9000");
        assert_eq!(endpoints.api, "http://127.0.0.1:9000/api");
        assert_eq!(endpoints.archives, "http://127.0.0.1:9000/archives");
    }
}
