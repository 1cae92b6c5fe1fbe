//! CLI interface for cecost
//!
//! # Example
//!
//! ```bash
//! # Month-to-date blended cost, grouped by service
//! cecost month-to-date --group-by DIMENSION:SERVICE
//!
//! # Unblended cost for one day as JSON
//! cecost --json day 2024-03-15 --metric UnblendedCost
//!
//! # Values of the "Project" tag this year
//! cecost tags --tag-key Project
//! ```

use cecost_core::{
    CecostError, RawCredentials, Result, TagsOptions, UnitSource,
    date_range::DATE_FORMAT,
    types::{Granularity, GroupDefinition, Metric, QueryOptions},
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query AWS Cost Explorer for common reporting windows
#[derive(Parser, Debug, Clone)]
#[command(name = "cecost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON configuration file with an AWS.CostExplorer section
    /// (default: config/default.json when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Timezone deciding which calendar day is "today" (e.g. "America/New_York", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC to decide which calendar day is "today" (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    pub date: Option<String>,

    /// Always read the currency unit of ungrouped totals from BlendedCost
    #[arg(long, global = true)]
    pub legacy_unit: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn unit_source(&self) -> UnitSource {
        if self.legacy_unit {
            UnitSource::BlendedCost
        } else {
            UnitSource::SelectedMetric
        }
    }

    /// Anchor date from `--date`, if given
    pub fn anchor_date(&self) -> Result<Option<NaiveDate>> {
        self.date.as_deref().map(parse_date).transpose()
    }
}

/// Credential overrides; these win over the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Cost Explorer API version
    #[arg(long, env = "CECOST_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID", global = true, hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", global = true, hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,
}

impl From<CredentialArgs> for RawCredentials {
    fn from(args: CredentialArgs) -> Self {
        Self {
            api_version: args.api_version,
            access_key_id: args.access_key_id,
            secret_access_key: args.secret_access_key,
            region: args.region,
        }
    }
}

/// Options shared by every cost report
#[derive(Args, Debug, Clone, Default)]
pub struct CostArgs {
    /// Metric to sum: BlendedCost or UnblendedCost
    #[arg(long, short = 'm', default_value = "BlendedCost")]
    pub metric: Metric,

    /// Bucket size: DAILY, MONTHLY or HOURLY (default depends on the report)
    #[arg(long, short = 'g')]
    pub granularity: Option<Granularity>,

    /// Group results, as TYPE:KEY (e.g. DIMENSION:SERVICE, TAG:Project); repeatable
    #[arg(long = "group-by", short = 'b')]
    pub group_by: Vec<GroupDefinition>,
}

impl CostArgs {
    pub fn to_options(&self) -> QueryOptions {
        QueryOptions {
            metrics: self.metric,
            granularity: self.granularity,
            group_by: self.group_by.clone(),
        }
    }
}

/// Options for the tags command
#[derive(Args, Debug, Clone, Default)]
pub struct TagsArgs {
    /// Start date (YYYY-MM-DD), default first day of the current year
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD), default last day of the current month
    #[arg(long)]
    pub end: Option<String>,

    /// List the values of this tag instead of tag names
    #[arg(long)]
    pub tag_key: Option<String>,

    /// Only return tags containing this string
    #[arg(long)]
    pub search: Option<String>,

    /// Pagination token from a previous response
    #[arg(long)]
    pub next_page_token: Option<String>,
}

impl TagsArgs {
    pub fn to_options(&self) -> Result<TagsOptions> {
        let start_date = self.start.as_deref().map(parse_date).transpose()?;
        let end_date = self.end.as_deref().map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(CecostError::InvalidArgument(format!(
                    "--start {start} is after --end {end}"
                )));
            }
        }

        Ok(TagsOptions {
            start_date,
            end_date,
            tag_key: self.tag_key.clone(),
            search_string: self.search.clone(),
            next_page_token: self.next_page_token.clone(),
        })
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Costs for today
    Today(CostArgs),

    /// Costs for a specific day
    Day {
        /// The day, as YYYY-MM-DD
        date: String,

        #[command(flatten)]
        cost: CostArgs,
    },

    /// Costs from the first of this month through today
    #[command(name = "month-to-date", alias = "mtd")]
    MonthToDate(CostArgs),

    /// Costs for the previous month
    #[command(name = "last-month")]
    LastMonth(CostArgs),

    /// Costs from January 1 through the end of this month
    #[command(name = "year-to-date", alias = "ytd")]
    YearToDate(CostArgs),

    /// Today, month-to-date, last-month and year-to-date totals side by side
    Summary(CostArgs),

    /// List cost allocation tags
    Tags(TagsArgs),
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|_| {
        CecostError::InvalidDate(format!("'{date_str}' (expected YYYY-MM-DD)"))
    })
}
