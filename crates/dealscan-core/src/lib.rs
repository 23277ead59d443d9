//! # Dealscan Core
//!
//! Building blocks of the SME block/bulk deal scanner.
//!
//! ## Overview
//!
//! A run resolves the SME listing tier of each exchange, pulls the block and
//! bulk deal disclosures for a short date range, keeps the deals of SME
//! symbols, and renders a compact text summary for a Telegram chat.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | NSE and BSE adapters behind the [`DealSource`] trait |
//! | [`domain`] | [`DealRecord`], [`SymbolUniverse`], [`DateRange`] |
//! | [`error`] | Validation, fetch and delivery errors |
//! | [`exchange`] | Exchange and deal category identifiers |
//! | [`filter`] | Universe filtering and duplicate removal |
//! | [`http_client`] | HTTP transport seam (reqwest and offline stub) |
//! | [`normalize`] | Declarative payload-to-record mapping |
//! | [`notify`] | Telegram delivery |
//! | [`pipeline`] | Sequential scan over all sources |
//! | [`report`] | Message rendering |
//!
//! ## Flow
//!
//! ```text
//! open_session ─▶ universe ─▶ deals ─▶ filter_and_dedup ─▶ format_section
//!      (NSE, then BSE)                                          │
//!                                                               ▼
//!                                      compose_message ─▶ TelegramNotifier
//! ```
//!
//! ## Error Handling
//!
//! Only delivery can fail a run. Fetch problems are absorbed per query into
//! [`FetchReport`] and surface as warning lines in the message:
//!
//! ```rust
//! use dealscan_core::{FetchError, FetchReport, QueryFailure};
//!
//! let mut report = FetchReport::default();
//! report.absorb(Err(QueryFailure::new("bulk-deals", FetchError::Status { status: 503 })));
//! assert!(report.all_failed());
//! assert!(report.records.is_empty());
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod filter;
pub mod http_client;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod report;

pub use adapters::{
    BseAdapter, BseEndpoints, DealSource, FetchReport, NseAdapter, NseEndpoints, QueryFailure,
    QueryOutcome,
};
pub use domain::{DateRange, DealRecord, SymbolUniverse};
pub use error::{FetchError, NotifyError, ValidationError};
pub use exchange::{DealCategory, Exchange};
pub use filter::{dedup, filter_and_dedup, filter_universe};
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    StubHttpClient,
};
pub use normalize::{FieldSchema, RecordContext, BSE_DEAL_FIELDS, NSE_DEAL_FIELDS};
pub use notify::TelegramNotifier;
pub use pipeline::{run_scan, ExchangeSection, ScanReport};
pub use report::{compose_message, format_section};
