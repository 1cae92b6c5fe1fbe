//! Core types, date ranges, and cost aggregation for cecost
//!
//! This crate holds everything that does not touch the network: the error
//! taxonomy, query and response types, the reporting-window arithmetic, the
//! cost aggregator, credential loading, and the `CostQueryService` trait
//! that backends implement.

pub mod aggregation;
pub mod credentials;
pub mod date_range;
pub mod error;
pub mod service;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use aggregation::{CostAggregator, UnitSource};
pub use credentials::{RawCredentials, ServiceCredentials};
pub use date_range::{ReportPeriod, TimePeriod};
pub use error::{CecostError, Result};
pub use service::CostQueryService;
pub use types::{
    AggregatedCostResponse, AggregatedTotal, CostResponse, Granularity, GroupDefinition,
    Metric, QueryOptions, TagResponse, TagsOptions,
};
