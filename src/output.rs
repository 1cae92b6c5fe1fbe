//! Output formatting module for cecost
//!
//! This module provides formatters for displaying cost reports:
//! - Table format for human-readable terminal output
//! - JSON format, which is the augmented service response with its `Total`
//!
//! # Examples
//!
//! ```
//! use cecost::output::get_formatter;
//! use cecost_core::types::{AggregatedCostResponse, AggregatedTotal, CostResponse};
//!
//! let report = AggregatedCostResponse {
//!     response: CostResponse::default(),
//!     total: AggregatedTotal { amount: 12.5, unit: "USD".to_string() },
//! };
//!
//! let formatter = get_formatter(true);
//! assert!(formatter.format_costs("today", &report).contains("\"Total\""));
//! ```

use cecost_core::types::{AggregatedCostResponse, Metrics, ResultByTime, TagResponse};
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format one cost report
    fn format_costs(&self, label: &str, report: &AggregatedCostResponse) -> String;

    /// Format several labelled reports side by side
    fn format_summary(&self, reports: &[(String, AggregatedCostResponse)]) -> String;

    /// Format a tag listing
    fn format_tags(&self, tags: &TagResponse) -> String;
}

/// Table formatter for human-readable output
pub struct TableFormatter;

impl TableFormatter {
    /// Format an amount with its currency, dollar sign for USD
    fn format_amount(amount: f64, unit: &str) -> String {
        if unit == "USD" {
            format!("${amount:.2}")
        } else {
            format!("{amount:.2} {unit}")
        }
    }

    /// First metric amount in a map, as the service reported it
    fn first_amount(metrics: &Metrics) -> String {
        metrics
            .iter()
            .next()
            .map(|(_, value)| {
                let amount = value.amount.as_deref().unwrap_or("-");
                match value.unit.as_deref() {
                    Some(unit) => format!("{amount} {unit}"),
                    None => amount.to_string(),
                }
            })
            .unwrap_or_else(|| "-".to_string())
    }

    fn period_label(bucket: &ResultByTime) -> String {
        bucket
            .time_period
            .as_ref()
            .map(|tp| format!("{} .. {}", tp.start, tp.end))
            .unwrap_or_else(|| "-".to_string())
    }

    fn estimated_marker(bucket: &ResultByTime) -> &'static str {
        if bucket.estimated { "yes" } else { "" }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_costs(&self, label: &str, report: &AggregatedCostResponse) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        let grouped = report.response.is_grouped();
        if grouped {
            table.set_titles(row![b -> "Period", b -> "Group", b -> "Cost", b -> "Estimated"]);
            for bucket in &report.response.results_by_time {
                for group in &bucket.groups {
                    table.add_row(row![
                        Self::period_label(bucket),
                        group.keys.join(", "),
                        r -> Self::first_amount(&group.metrics),
                        c -> Self::estimated_marker(bucket)
                    ]);
                }
            }
        } else {
            table.set_titles(row![b -> "Period", b -> "Cost", b -> "Estimated"]);
            for bucket in &report.response.results_by_time {
                table.add_row(row![
                    Self::period_label(bucket),
                    r -> Self::first_amount(&bucket.total),
                    c -> Self::estimated_marker(bucket)
                ]);
            }
        }

        let columns = if grouped { 4 } else { 3 };
        table.add_row(Row::new(vec![Cell::new(""); columns]));

        let total = Self::format_amount(report.total.amount, &report.total.unit);
        if grouped {
            table.add_row(row![b -> format!("TOTAL ({label})"), "", rb -> total, ""]);
        } else {
            table.add_row(row![b -> format!("TOTAL ({label})"), rb -> total, ""]);
        }

        table.to_string()
    }

    fn format_summary(&self, reports: &[(String, AggregatedCostResponse)]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Report", b -> "Buckets", b -> "Total"]);

        for (label, report) in reports {
            table.add_row(row![
                label,
                r -> report.response.results_by_time.len(),
                r -> Self::format_amount(report.total.amount, &report.total.unit)
            ]);
        }

        table.to_string()
    }

    fn format_tags(&self, tags: &TagResponse) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Tag"]);

        for tag in &tags.tags {
            table.add_row(row![tag]);
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "{} of {} tag(s)\n",
            tags.return_size, tags.total_size
        ));
        if let Some(token) = &tags.next_page_token {
            output.push_str(&format!("More results: --next-page-token {token}\n"));
        }
        output
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn pretty(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_costs(&self, _label: &str, report: &AggregatedCostResponse) -> String {
        Self::pretty(&json!(report))
    }

    fn format_summary(&self, reports: &[(String, AggregatedCostResponse)]) -> String {
        let output: serde_json::Map<String, serde_json::Value> = reports
            .iter()
            .map(|(label, report)| (label.clone(), json!(report.total)))
            .collect();
        Self::pretty(&serde_json::Value::Object(output))
    }

    fn format_tags(&self, tags: &TagResponse) -> String {
        Self::pretty(&json!(tags))
    }
}

/// Get appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cecost_core::types::{
        AggregatedTotal, CostResponse, DateInterval, Group, GroupDefinition, MetricValue,
    };

    fn bucket(start: &str, end: &str) -> ResultByTime {
        ResultByTime {
            time_period: Some(DateInterval {
                start: start.to_string(),
                end: end.to_string(),
            }),
            ..Default::default()
        }
    }

    fn ungrouped_report() -> AggregatedCostResponse {
        let mut first = bucket("2024-03-01", "2024-03-02");
        first
            .total
            .insert("BlendedCost".to_string(), MetricValue::new("10.50", "USD"));
        let mut second = bucket("2024-03-02", "2024-03-03");
        second
            .total
            .insert("BlendedCost".to_string(), MetricValue::new("5.25", "USD"));
        second.estimated = true;

        AggregatedCostResponse {
            response: CostResponse {
                results_by_time: vec![first, second],
                ..Default::default()
            },
            total: AggregatedTotal {
                amount: 15.75,
                unit: "USD".to_string(),
            },
        }
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(TableFormatter::format_amount(15.75, "USD"), "$15.75");
        assert_eq!(TableFormatter::format_amount(3.0, "EUR"), "3.00 EUR");
    }

    #[test]
    fn test_table_ungrouped() {
        let output = TableFormatter.format_costs("month-to-date", &ungrouped_report());
        assert!(output.contains("2024-03-01 .. 2024-03-02"));
        assert!(output.contains("10.50 USD"));
        assert!(output.contains("TOTAL (month-to-date)"));
        assert!(output.contains("$15.75"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_table_grouped() {
        let mut period = bucket("2024-03-01", "2024-04-01");
        let mut metrics = Metrics::new();
        metrics.insert("BlendedCost".to_string(), MetricValue::new("3.00", "USD"));
        period.groups.push(Group {
            keys: vec!["Amazon EC2".to_string()],
            metrics,
        });
        let report = AggregatedCostResponse {
            response: CostResponse {
                group_definitions: vec![GroupDefinition::dimension("SERVICE")],
                results_by_time: vec![period],
                ..Default::default()
            },
            total: AggregatedTotal {
                amount: 3.0,
                unit: "USD".to_string(),
            },
        };

        let output = TableFormatter.format_costs("last-month", &report);
        assert!(output.contains("Amazon EC2"));
        assert!(output.contains("Group"));
        assert!(output.contains("$3.00"));
    }

    #[test]
    fn test_json_costs_is_augmented_response() {
        let output = JsonFormatter.format_costs("today", &ungrouped_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["Total"]["Amount"], 15.75);
        assert_eq!(value["Total"]["Unit"], "USD");
        assert_eq!(value["ResultsByTime"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["ResultsByTime"][0]["Total"]["BlendedCost"]["Amount"],
            "10.50"
        );
    }

    #[test]
    fn test_json_summary() {
        let reports = vec![
            ("today".to_string(), ungrouped_report()),
            ("year-to-date".to_string(), ungrouped_report()),
        ];
        let output = JsonFormatter.format_summary(&reports);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["today"]["Amount"], 15.75);
        assert_eq!(value["year-to-date"]["Unit"], "USD");
    }

    #[test]
    fn test_tags_output() {
        let tags = TagResponse {
            tags: vec!["Project".to_string(), "Team".to_string()],
            next_page_token: Some("abc".to_string()),
            return_size: 2,
            total_size: 5,
        };

        let table = TableFormatter.format_tags(&tags);
        assert!(table.contains("Project"));
        assert!(table.contains("2 of 5 tag(s)"));
        assert!(table.contains("--next-page-token abc"));

        let json = JsonFormatter.format_tags(&tags);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Tags"][1], "Team");
        assert_eq!(value["TotalSize"], 5);
    }
}
