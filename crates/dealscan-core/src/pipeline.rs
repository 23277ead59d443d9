//! One scan run: sessions, universes, deals, filtering and the final message.
//!
//! Upstream trouble never escapes this module as an error. Each exchange ends
//! up as an [`ExchangeSection`], possibly empty, and anything the operator
//! should know about lands in [`ScanReport::warnings`].

use tracing::{info, warn};

use crate::adapters::DealSource;
use crate::filter::filter_and_dedup;
use crate::report::{compose_message, format_section};
use crate::{DateRange, DealRecord, Exchange};

/// Filtered deals of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeSection {
    pub exchange: Exchange,
    pub records: Vec<DealRecord>,
    /// Zero when the universe could not be resolved and no filter applied.
    pub universe_size: usize,
    pub failed_queries: usize,
}

impl ExchangeSection {
    fn empty(exchange: Exchange) -> Self {
        Self {
            exchange,
            records: Vec::new(),
            universe_size: 0,
            failed_queries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub range: DateRange,
    pub sections: Vec<ExchangeSection>,
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn section(&self, exchange: Exchange) -> Option<&ExchangeSection> {
        self.sections.iter().find(|section| section.exchange == exchange)
    }

    /// Render the chat message with at most `max_rows` deals per section.
    pub fn message(&self, max_rows: usize) -> String {
        let sections = self
            .sections
            .iter()
            .map(|section| format_section(section.exchange.as_str(), &section.records, max_rows))
            .collect::<Vec<_>>();
        compose_message(&self.range, &sections, &self.warnings)
    }
}

/// Scan every source in order, one after another.
pub async fn run_scan(sources: &[&dyn DealSource], range: &DateRange) -> ScanReport {
    let mut sections = Vec::with_capacity(sources.len());
    let mut warnings = Vec::new();

    for source in sources {
        let exchange = source.exchange();

        if let Err(error) = source.open_session().await {
            warn!(%exchange, %error, "session setup failed; skipping exchange");
            warnings.push(format!("{exchange} fetch warning: {error}"));
            sections.push(ExchangeSection::empty(exchange));
            continue;
        }

        let universe = source.universe().await;
        let report = source.deals(range).await;

        if report.all_failed() {
            let last = report
                .failures
                .last()
                .map(|failure| failure.to_string())
                .unwrap_or_default();
            warnings.push(format!(
                "{exchange} fetch warning: all {} deal queries failed (last: {last})",
                report.queries
            ));
        }

        let fetched = report.records.len();
        let records = filter_and_dedup(report.records, &universe);
        info!(
            %exchange,
            fetched,
            kept = records.len(),
            universe = universe.len(),
            "filtered deals"
        );

        sections.push(ExchangeSection {
            exchange,
            records,
            universe_size: universe.len(),
            failed_queries: report.failures.len(),
        });
    }

    ScanReport {
        range: *range,
        sections,
        warnings,
    }
}
