//! The billing service seam
//!
//! This module defines the `CostQueryService` trait that backends implement.
//! The facade only ever talks to the service through this trait, so tests
//! can substitute an in-memory implementation.

use crate::error::Result;
use crate::types::{CostAndUsageRequest, CostResponse, TagResponse, TagsRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote operations the facade needs from the billing service.
///
/// Implementations own transport, authentication and retries. Failures
/// must be returned as [`crate::CecostError::Upstream`] without being
/// reinterpreted.
#[async_trait]
pub trait CostQueryService: Send + Sync {
    /// Fetch the cost series for one time period.
    async fn get_cost_and_usage(&self, request: CostAndUsageRequest) -> Result<CostResponse>;

    /// List cost allocation tags (or the values of one tag).
    async fn get_tags(&self, request: TagsRequest) -> Result<TagResponse>;
}

#[async_trait]
impl<S> CostQueryService for Arc<S>
where
    S: CostQueryService + ?Sized,
{
    async fn get_cost_and_usage(&self, request: CostAndUsageRequest) -> Result<CostResponse> {
        (**self).get_cost_and_usage(request).await
    }

    async fn get_tags(&self, request: TagsRequest) -> Result<TagResponse> {
        (**self).get_tags(request).await
    }
}
