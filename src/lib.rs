//! cecost - Query AWS Cost Explorer for common reporting windows
//!
//! This library provides:
//! - Date ranges for today, a given day, month-to-date, last month and year-to-date
//! - A `CostExplorer` facade that issues one Cost Explorer request per call
//! - Aggregation of the returned cost buckets into a single `Total`
//! - Tag listing passthrough
//! - Table and JSON formatters for the CLI
//!
//! # Examples
//!
//! ```no_run
//! use cecost::{explorer::CostExplorer, QueryOptions, RawCredentials};
//!
//! #[tokio::main]
//! async fn main() -> cecost::Result<()> {
//!     let explorer = CostExplorer::connect(RawCredentials::discover(None)?).await;
//!
//!     let report = explorer.get_last_month_costs(&QueryOptions::default()).await?;
//!     println!("Last month: {} {}", report.total.amount, report.total.unit);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod explorer;
pub mod output;

pub use cecost_core::{aggregation, credentials, date_range, error, service, timezone, types};

// Re-export commonly used types
pub use cecost_core::{
    AggregatedCostResponse, AggregatedTotal, CecostError, CostAggregator, CostQueryService,
    CostResponse, Granularity, GroupDefinition, Metric, QueryOptions, RawCredentials,
    ReportPeriod, Result, ServiceCredentials, TagResponse, TagsOptions, TimePeriod, UnitSource,
};
pub use explorer::CostExplorer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
