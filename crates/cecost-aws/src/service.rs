//! `CostQueryService` backed by the AWS SDK Cost Explorer client

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::{
    Client,
    config::Credentials,
    types::{
        DateInterval as SdkDateInterval, Granularity as SdkGranularity, Group as SdkGroup,
        GroupDefinition as SdkGroupDefinition, GroupDefinitionType as SdkGroupDefinitionType,
        MetricValue as SdkMetricValue, ResultByTime as SdkResultByTime,
    },
};
use cecost_core::{
    CecostError, CostQueryService, Result, ServiceCredentials,
    date_range::TimePeriod,
    types::{
        CostAndUsageRequest, CostResponse, DateInterval, Group, GroupDefinition, MetricValue,
        Metrics, ResultByTime, TagResponse, TagsRequest,
    },
};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Cost Explorer API version this backend speaks
pub const SUPPORTED_API_VERSION: &str = "2017-10-25";

/// Name reported for the static credentials provider
const PROVIDER_NAME: &str = "cecost";

/// Cost Explorer client wrapper
#[derive(Debug, Clone)]
pub struct AwsCostExplorerService {
    client: Client,
}

impl AwsCostExplorerService {
    /// Build a client from validated credentials
    pub async fn from_credentials(credentials: &ServiceCredentials) -> Self {
        if credentials.api_version() != SUPPORTED_API_VERSION {
            warn!(
                "Requested Cost Explorer API version {} but the client speaks {}",
                credentials.api_version(),
                SUPPORTED_API_VERSION
            );
        }

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region().to_string()))
            .credentials_provider(Credentials::new(
                credentials.access_key_id(),
                credentials.secret_access_key(),
                None,
                None,
                PROVIDER_NAME,
            ))
            .load()
            .await;

        debug!("Created Cost Explorer client for region {}", credentials.region());
        Self::from_client(Client::new(&config))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CostQueryService for AwsCostExplorerService {
    async fn get_cost_and_usage(&self, request: CostAndUsageRequest) -> Result<CostResponse> {
        info!(
            "Querying Cost Explorer for {} ({}, {} group(s))",
            request.time_period,
            request.granularity,
            request.group_by.len()
        );

        let mut call = self
            .client
            .get_cost_and_usage()
            .time_period(sdk_interval(&request.time_period)?)
            .granularity(SdkGranularity::from(request.granularity.as_str()));

        for metric in &request.metrics {
            call = call.metrics(metric.as_str());
        }
        for group in &request.group_by {
            call = call.group_by(sdk_group_definition(group));
        }

        let output = call.send().await.map_err(CecostError::upstream)?;

        Ok(CostResponse {
            next_page_token: output.next_page_token().map(str::to_string),
            group_definitions: output
                .group_definitions()
                .iter()
                .filter_map(group_definition_from_sdk)
                .collect(),
            results_by_time: output
                .results_by_time()
                .iter()
                .map(result_from_sdk)
                .collect(),
            dimension_value_attributes: output
                .dimension_value_attributes()
                .iter()
                .map(|attr| json!({ "Value": attr.value(), "Attributes": attr.attributes() }))
                .collect(),
        })
    }

    async fn get_tags(&self, request: TagsRequest) -> Result<TagResponse> {
        info!(
            "Listing tags for {} (tag key: {:?})",
            request.time_period, request.tag_key
        );

        let output = self
            .client
            .get_tags()
            .time_period(sdk_interval(&request.time_period)?)
            .set_search_string(request.search_string)
            .set_tag_key(request.tag_key)
            .set_next_page_token(request.next_page_token)
            .send()
            .await
            .map_err(CecostError::upstream)?;

        Ok(TagResponse {
            tags: output.tags().to_vec(),
            next_page_token: output.next_page_token().map(str::to_string),
            return_size: output.return_size(),
            total_size: output.total_size(),
        })
    }
}

fn sdk_interval(period: &TimePeriod) -> Result<SdkDateInterval> {
    SdkDateInterval::builder()
        .start(period.start_str())
        .end(period.end_str())
        .build()
        .map_err(|e| CecostError::InvalidArgument(format!("time period {period}: {e}")))
}

fn sdk_group_definition(group: &GroupDefinition) -> SdkGroupDefinition {
    SdkGroupDefinition::builder()
        .r#type(SdkGroupDefinitionType::from(group.group_type.as_str()))
        .key(group.key.clone())
        .build()
}

fn group_definition_from_sdk(group: &SdkGroupDefinition) -> Option<GroupDefinition> {
    let group_type = group.r#type()?.as_str().parse().ok()?;
    Some(GroupDefinition::new(group_type, group.key().unwrap_or_default()))
}

fn metrics_from_sdk(metrics: Option<&HashMap<String, SdkMetricValue>>) -> Metrics {
    metrics
        .into_iter()
        .flatten()
        .map(|(name, value)| {
            (
                name.clone(),
                MetricValue {
                    amount: value.amount().map(str::to_string),
                    unit: value.unit().map(str::to_string),
                },
            )
        })
        .collect()
}

fn group_from_sdk(group: &SdkGroup) -> Group {
    Group {
        keys: group.keys().to_vec(),
        metrics: metrics_from_sdk(group.metrics()),
    }
}

fn result_from_sdk(result: &SdkResultByTime) -> ResultByTime {
    ResultByTime {
        time_period: result.time_period().map(|tp| DateInterval {
            start: tp.start().to_string(),
            end: tp.end().to_string(),
        }),
        total: metrics_from_sdk(result.total()),
        groups: result.groups().iter().map(group_from_sdk).collect(),
        estimated: result.estimated(),
    }
}
