//! Aggregation of cost responses into a single total
//!
//! The aggregator walks every time bucket of a [`CostResponse`] and sums the
//! selected metric. Grouped responses (those with `GroupDefinitions`) are
//! summed across every group of every bucket; ungrouped responses sum the
//! flat `Total` of each bucket. A missing metric or an amount that is not a
//! decimal number is reported as [`CecostError::MalformedResponse`] rather
//! than being counted as zero.
//!
//! # Examples
//!
//! ```
//! use cecost_core::aggregation::CostAggregator;
//! use cecost_core::types::{CostResponse, Metric, MetricValue, ResultByTime};
//!
//! let mut bucket = ResultByTime::default();
//! bucket
//!     .total
//!     .insert("BlendedCost".to_string(), MetricValue::new("10.50", "USD"));
//! let response = CostResponse {
//!     results_by_time: vec![bucket],
//!     ..Default::default()
//! };
//!
//! let aggregated = CostAggregator::new().aggregate(response, Metric::BlendedCost).unwrap();
//! assert_eq!(aggregated.total.amount, 10.5);
//! assert_eq!(aggregated.total.unit, "USD");
//! ```

use crate::error::{CecostError, Result};
use crate::types::{AggregatedCostResponse, AggregatedTotal, CostResponse, Metric, Metrics};
use tracing::debug;

/// Unit reported when no line contributed to the sum
pub const DEFAULT_UNIT: &str = "USD";

/// Where the currency unit of the total is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnitSource {
    /// The metric that was actually summed
    #[default]
    SelectedMetric,
    /// Always `BlendedCost` on ungrouped buckets, even when summing
    /// `UnblendedCost`. Matches the output of older clients of this API.
    BlendedCost,
}

/// Sums one metric family across a cost response
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAggregator {
    unit_source: UnitSource,
}

impl CostAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit_source(mut self, unit_source: UnitSource) -> Self {
        self.unit_source = unit_source;
        self
    }

    pub fn unit_source(&self) -> UnitSource {
        self.unit_source
    }

    /// Attach the summed `Total` to `response`
    pub fn aggregate(
        &self,
        response: CostResponse,
        metric: Metric,
    ) -> Result<AggregatedCostResponse> {
        let total = self.total(&response, metric)?;
        Ok(AggregatedCostResponse { response, total })
    }

    /// Compute the total without taking ownership of the response
    ///
    /// The unit of the last contributing line wins; all lines of one
    /// account are expected to share a currency.
    pub fn total(&self, response: &CostResponse, metric: Metric) -> Result<AggregatedTotal> {
        let grouped = response.is_grouped();
        let mut amount = 0.0;
        let mut unit: Option<String> = None;
        let mut lines = 0usize;

        for (index, bucket) in response.results_by_time.iter().enumerate() {
            if grouped {
                for group in &bucket.groups {
                    let context = || format!("group {:?} of bucket {index}", group.keys);
                    amount += parse_amount(&group.metrics, metric, &context)?;
                    if let Some(u) = metric_unit(&group.metrics, metric) {
                        unit = Some(u.to_string());
                    }
                    lines += 1;
                }
            } else {
                let context = || format!("total of bucket {index}");
                amount += parse_amount(&bucket.total, metric, &context)?;
                let unit_metric = match self.unit_source {
                    UnitSource::SelectedMetric => metric,
                    UnitSource::BlendedCost => Metric::BlendedCost,
                };
                match metric_unit(&bucket.total, unit_metric) {
                    Some(u) => unit = Some(u.to_string()),
                    None if self.unit_source == UnitSource::BlendedCost => {
                        return Err(missing_metric(unit_metric, &context()));
                    }
                    None => {}
                }
                lines += 1;
            }
        }

        let unit = unit.unwrap_or_else(|| DEFAULT_UNIT.to_string());
        debug!(
            "Aggregated {} {} line(s) across {} bucket(s): {} {}",
            lines,
            metric,
            response.results_by_time.len(),
            amount,
            unit
        );

        Ok(AggregatedTotal { amount, unit })
    }
}

fn missing_metric(metric: Metric, context: &str) -> CecostError {
    CecostError::MalformedResponse(format!("{metric} missing from {context}"))
}

fn parse_amount(metrics: &Metrics, metric: Metric, context: &dyn Fn() -> String) -> Result<f64> {
    let value = metrics
        .get(metric.as_str())
        .ok_or_else(|| missing_metric(metric, &context()))?;
    let raw = value.amount.as_deref().ok_or_else(|| {
        CecostError::MalformedResponse(format!("{metric} has no Amount in {}", context()))
    })?;
    let amount = raw.trim().parse::<f64>().map_err(|_| {
        CecostError::MalformedResponse(format!(
            "{metric} Amount '{raw}' in {} is not a decimal number",
            context()
        ))
    })?;
    if !amount.is_finite() {
        return Err(CecostError::MalformedResponse(format!(
            "{metric} Amount '{raw}' in {} is not finite",
            context()
        )));
    }
    Ok(amount)
}

fn metric_unit(metrics: &Metrics, metric: Metric) -> Option<&str> {
    metrics.get(metric.as_str()).and_then(|v| v.unit.as_deref())
}
