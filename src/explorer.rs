//! The `CostExplorer` facade
//!
//! `CostExplorer` owns the credentials and a [`CostQueryService`]. It
//! resolves the reporting window, builds the request, issues exactly one
//! call to the service, and runs the raw response through the
//! [`CostAggregator`].
//!
//! Credentials are validated once at construction. A client built from
//! incomplete credentials is permanently invalid: every operation fails with
//! [`CecostError::Configuration`] and the service is never called.
//!
//! # Examples
//!
//! ```no_run
//! use cecost::explorer::CostExplorer;
//! use cecost::{QueryOptions, RawCredentials};
//! use cecost_core::types::GroupDefinition;
//!
//! # async fn example() -> cecost::Result<()> {
//! let raw = RawCredentials::discover(None)?;
//! let explorer = CostExplorer::connect(raw).await;
//!
//! let options = QueryOptions::default().with_group_by(GroupDefinition::dimension("SERVICE"));
//! let report = explorer.get_month_to_date_costs(&options).await?;
//! println!("{} {}", report.total.amount, report.total.unit);
//! # Ok(())
//! # }
//! ```

use cecost_aws::AwsCostExplorerService;
use cecost_core::{
    CecostError, CostAggregator, CostQueryService, QueryOptions, RawCredentials, ReportPeriod,
    Result, ServiceCredentials, TagResponse, TagsOptions, UnitSource,
    date_range::{self, TimePeriod},
    timezone::TimezoneConfig,
    types::{AggregatedCostResponse, CostAndUsageRequest, TagsRequest},
};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Readiness of a client, fixed at construction
enum ClientState<S> {
    Ready {
        credentials: ServiceCredentials,
        service: S,
    },
    Invalid {
        reason: String,
    },
}

/// Entry point for cost and tag queries
pub struct CostExplorer<S = AwsCostExplorerService> {
    state: ClientState<S>,
    aggregator: CostAggregator,
    timezone: TimezoneConfig,
    fixed_today: Option<NaiveDate>,
}

impl CostExplorer<AwsCostExplorerService> {
    /// Validate `raw` and, if complete, build an AWS-backed client
    ///
    /// Never fails: incomplete credentials produce an invalid client whose
    /// operations all return a configuration error.
    pub async fn connect(raw: RawCredentials) -> Self {
        match raw.validate() {
            Ok(credentials) => {
                let service = AwsCostExplorerService::from_credentials(&credentials).await;
                Self::ready(credentials, service)
            }
            Err(e) => Self::invalid(e),
        }
    }
}

impl<S: CostQueryService> CostExplorer<S> {
    /// Validate `raw` and use `service` for every request
    ///
    /// The service is dropped unused when validation fails.
    pub fn with_service(raw: RawCredentials, service: S) -> Self {
        match raw.validate() {
            Ok(credentials) => Self::ready(credentials, service),
            Err(e) => Self::invalid(e),
        }
    }

    fn ready(credentials: ServiceCredentials, service: S) -> Self {
        debug!("Cost explorer ready for region {}", credentials.region());
        Self::from_state(ClientState::Ready {
            credentials,
            service,
        })
    }

    fn invalid(error: CecostError) -> Self {
        warn!("Invalid configuration loaded: {}", error);
        Self::from_state(ClientState::Invalid {
            reason: error.to_string(),
        })
    }

    fn from_state(state: ClientState<S>) -> Self {
        Self {
            state,
            aggregator: CostAggregator::new(),
            timezone: TimezoneConfig::default(),
            fixed_today: None,
        }
    }

    /// Use this zone to decide which calendar day "today" is
    pub fn with_timezone(mut self, timezone: TimezoneConfig) -> Self {
        self.timezone = timezone;
        self
    }

    /// Pin "today" to a fixed date instead of the clock
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    /// Choose where the currency unit of totals is read from
    pub fn with_unit_source(mut self, unit_source: UnitSource) -> Self {
        self.aggregator = self.aggregator.with_unit_source(unit_source);
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ClientState::Ready { .. })
    }

    /// Validated credentials, if construction succeeded
    pub fn credentials(&self) -> Option<&ServiceCredentials> {
        match &self.state {
            ClientState::Ready { credentials, .. } => Some(credentials),
            ClientState::Invalid { .. } => None,
        }
    }

    /// Anchor date for reporting windows
    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| self.timezone.today())
    }

    fn service(&self) -> Result<&S> {
        match &self.state {
            ClientState::Ready { service, .. } => Ok(service),
            ClientState::Invalid { reason } => Err(CecostError::Configuration(format!(
                "Invalid configuration loaded: {reason}"
            ))),
        }
    }

    /// Costs for one calendar day
    pub async fn get_cost_for_day(
        &self,
        date: NaiveDate,
        options: &QueryOptions,
    ) -> Result<AggregatedCostResponse> {
        self.get_costs(ReportPeriod::Day(date), options).await
    }

    /// Costs for the current calendar day
    pub async fn get_today_costs(&self, options: &QueryOptions) -> Result<AggregatedCostResponse> {
        self.get_costs(ReportPeriod::Today, options).await
    }

    /// Costs from the first of this month through today
    pub async fn get_month_to_date_costs(
        &self,
        options: &QueryOptions,
    ) -> Result<AggregatedCostResponse> {
        self.get_costs(ReportPeriod::MonthToDate, options).await
    }

    /// Costs for the whole previous month
    pub async fn get_last_month_costs(
        &self,
        options: &QueryOptions,
    ) -> Result<AggregatedCostResponse> {
        self.get_costs(ReportPeriod::LastMonth, options).await
    }

    /// Costs from January 1 through the end of this month
    pub async fn get_year_to_date_costs(
        &self,
        options: &QueryOptions,
    ) -> Result<AggregatedCostResponse> {
        self.get_costs(ReportPeriod::YearToDate, options).await
    }

    /// Costs for any named reporting window
    pub async fn get_costs(
        &self,
        period: ReportPeriod,
        options: &QueryOptions,
    ) -> Result<AggregatedCostResponse> {
        let service = self.service()?;
        let request = self.cost_request(period, options)?;

        info!(
            "Requesting {} costs for {} ({})",
            period, request.time_period, options.metrics
        );

        let response = service
            .get_cost_and_usage(request)
            .await
            .inspect_err(|e| warn!("Cost query for {} failed: {}", period, e))?;

        self.aggregator.aggregate(response, options.metrics)
    }

    /// Build the request for `period` without sending it
    pub fn cost_request(
        &self,
        period: ReportPeriod,
        options: &QueryOptions,
    ) -> Result<CostAndUsageRequest> {
        Ok(CostAndUsageRequest {
            time_period: period.resolve(self.today())?,
            granularity: options.granularity_or(period.default_granularity()),
            metrics: vec![options.metrics],
            group_by: options.group_by.clone(),
        })
    }

    /// List cost allocation tags, returned as the service sent them
    pub async fn get_tags(&self, options: &TagsOptions) -> Result<TagResponse> {
        let service = self.service()?;
        let request = self.tags_request(options)?;

        info!("Requesting tags for {}", request.time_period);

        service
            .get_tags(request)
            .await
            .inspect_err(|e| warn!("Tag query failed: {}", e))
    }

    /// Build the tag-listing request, filling in default dates
    pub fn tags_request(&self, options: &TagsOptions) -> Result<TagsRequest> {
        let today = self.today();
        let start = match options.start_date {
            Some(date) => date,
            None => date_range::first_day_of_year(today)?,
        };
        let end = match options.end_date {
            Some(date) => date,
            None => date_range::last_day_of_month(today)?,
        };

        Ok(TagsRequest {
            time_period: TimePeriod::new(start, end),
            search_string: options.search_string.clone(),
            tag_key: options.tag_key.clone(),
            next_page_token: options.next_page_token.clone(),
        })
    }
}
