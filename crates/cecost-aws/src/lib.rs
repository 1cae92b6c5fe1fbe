//! AWS Cost Explorer backend for cecost
//!
//! This crate implements `CostQueryService` on top of the AWS SDK,
//! translating between SDK types and the cecost wire types.

pub mod service;

pub use service::{AwsCostExplorerService, SUPPORTED_API_VERSION};
