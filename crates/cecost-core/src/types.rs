//! Core domain types for cecost
//!
//! This module holds the query options callers pass in, the request shapes
//! sent to the billing service, and the response shapes it sends back.
//! Response types mirror the Cost Explorer JSON layout (PascalCase keys) so
//! that a serialized result looks like the service's own output.

use crate::date_range::TimePeriod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cost metric family summed by the aggregator
///
/// Exactly one metric family is requested and summed per call.
///
/// # Examples
/// ```
/// use cecost_core::types::Metric;
/// use std::str::FromStr;
///
/// assert_eq!(Metric::from_str("UnblendedCost").unwrap(), Metric::UnblendedCost);
/// assert_eq!(Metric::default().to_string(), "BlendedCost");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Costs averaged across a consolidated billing family
    #[default]
    BlendedCost,
    /// Costs as charged to the individual account
    UnblendedCost,
}

impl Metric {
    /// Key used for this metric inside `Total` and `Metrics` maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BlendedCost => "BlendedCost",
            Self::UnblendedCost => "UnblendedCost",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blendedcost" | "blended" => Ok(Self::BlendedCost),
            "unblendedcost" | "unblended" => Ok(Self::UnblendedCost),
            _ => Err(format!(
                "Invalid metric: {s} (expected BlendedCost or UnblendedCost)"
            )),
        }
    }
}

/// Bucket size of the time series returned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
    Monthly,
    Hourly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Monthly => "MONTHLY",
            Self::Hourly => "HOURLY",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DAILY" => Ok(Self::Daily),
            "MONTHLY" => Ok(Self::Monthly),
            "HOURLY" => Ok(Self::Hourly),
            _ => Err(format!(
                "Invalid granularity: {s} (expected DAILY, MONTHLY or HOURLY)"
            )),
        }
    }
}

/// Kind of grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDefinitionType {
    Dimension,
    Tag,
    CostCategory,
}

impl GroupDefinitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dimension => "DIMENSION",
            Self::Tag => "TAG",
            Self::CostCategory => "COST_CATEGORY",
        }
    }
}

impl fmt::Display for GroupDefinitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupDefinitionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "DIMENSION" => Ok(Self::Dimension),
            "TAG" => Ok(Self::Tag),
            "COST_CATEGORY" => Ok(Self::CostCategory),
            _ => Err(format!(
                "Invalid group type: {s} (expected DIMENSION, TAG or COST_CATEGORY)"
            )),
        }
    }
}

/// One grouping dimension, e.g. `{Type: DIMENSION, Key: SERVICE}`
///
/// # Examples
/// ```
/// use cecost_core::types::{GroupDefinition, GroupDefinitionType};
///
/// let group: GroupDefinition = "DIMENSION:SERVICE".parse().unwrap();
/// assert_eq!(group.group_type, GroupDefinitionType::Dimension);
/// assert_eq!(group.key, "SERVICE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupDefinition {
    #[serde(rename = "Type")]
    pub group_type: GroupDefinitionType,
    #[serde(rename = "Key")]
    pub key: String,
}

impl GroupDefinition {
    pub fn new(group_type: GroupDefinitionType, key: impl Into<String>) -> Self {
        Self {
            group_type,
            key: key.into(),
        }
    }

    /// Group by a cost allocation tag
    pub fn tag(key: impl Into<String>) -> Self {
        Self::new(GroupDefinitionType::Tag, key)
    }

    /// Group by a built-in dimension such as `SERVICE` or `LINKED_ACCOUNT`
    pub fn dimension(key: impl Into<String>) -> Self {
        Self::new(GroupDefinitionType::Dimension, key)
    }
}

impl fmt::Display for GroupDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_type, self.key)
    }
}

impl std::str::FromStr for GroupDefinition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group_type, key) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid group definition: {s} (expected TYPE:KEY)"))?;
        if key.is_empty() {
            return Err(format!("Invalid group definition: {s} (empty key)"));
        }
        Ok(Self::new(group_type.parse()?, key))
    }
}

/// Options accepted by every cost report
///
/// `granularity` left as `None` means "use the report's default": DAILY for
/// single-day reports and MONTHLY for the others. Unknown keys are rejected
/// when deserializing.
///
/// # Examples
/// ```
/// use cecost_core::types::{Granularity, GroupDefinition, Metric, QueryOptions};
///
/// let options = QueryOptions::default()
///     .with_metric(Metric::UnblendedCost)
///     .with_granularity(Granularity::Daily)
///     .with_group_by(GroupDefinition::dimension("SERVICE"));
///
/// assert_eq!(options.granularity_or(Granularity::Monthly), Granularity::Daily);
/// assert!(options.is_grouped());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryOptions {
    #[serde(default)]
    pub metrics: Metric,
    #[serde(default)]
    pub granularity: Option<Granularity>,
    #[serde(default)]
    pub group_by: Vec<GroupDefinition>,
}

impl QueryOptions {
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics = metric;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn with_group_by(mut self, group: GroupDefinition) -> Self {
        self.group_by.push(group);
        self
    }

    /// Granularity to send, falling back to the report default
    pub fn granularity_or(&self, default: Granularity) -> Granularity {
        self.granularity.unwrap_or(default)
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }
}

/// Options for tag listing
///
/// Missing dates default to the first day of the current year and the last
/// day of the current month. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagsOptions {
    #[serde(default)]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub end_date: Option<chrono::NaiveDate>,
    /// Return the values of this tag instead of tag names
    #[serde(default)]
    pub tag_key: Option<String>,
    #[serde(default)]
    pub search_string: Option<String>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Request sent to the service's cost-and-usage operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostAndUsageRequest {
    pub time_period: TimePeriod,
    pub granularity: Granularity,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<GroupDefinition>,
}

/// Request sent to the service's tag-listing operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagsRequest {
    pub time_period: TimePeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A single `{Amount, Unit}` pair as reported by the service
///
/// Amounts are decimal strings on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl MetricValue {
    pub fn new(amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            amount: Some(amount.into()),
            unit: Some(unit.into()),
        }
    }
}

/// Metric name to value, e.g. `{"BlendedCost": {...}}`
pub type Metrics = BTreeMap<String, MetricValue>;

/// Time interval as echoed back by the service
///
/// Kept as strings since hourly results carry full timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateInterval {
    pub start: String,
    pub end: String,
}

/// Costs of one group within one time bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: Metrics,
}

/// One time bucket of the cost series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<DateInterval>,
    /// Flat totals, present on ungrouped queries
    #[serde(default)]
    pub total: Metrics,
    /// Per-group totals, present on grouped queries
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub estimated: bool,
}

/// Raw response of the cost-and-usage operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_definitions: Vec<GroupDefinition>,
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimension_value_attributes: Vec<serde_json::Value>,
}

impl CostResponse {
    /// Whether buckets carry `Groups` rather than a flat `Total`
    pub fn is_grouped(&self) -> bool {
        !self.group_definitions.is_empty()
    }
}

/// Summed cost for a whole response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AggregatedTotal {
    pub amount: f64,
    pub unit: String,
}

/// A [`CostResponse`] with its computed `Total` attached
///
/// Serializes as the original response plus a top-level `Total` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCostResponse {
    #[serde(flatten)]
    pub response: CostResponse,
    #[serde(rename = "Total")]
    pub total: AggregatedTotal,
}

/// Raw response of the tag-listing operation, returned unmodified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagResponse {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub return_size: i32,
    #[serde(default)]
    pub total_size: i32,
}
