//! cecost - Query AWS Cost Explorer for common reporting windows

use cecost::{
    QueryOptions, RawCredentials, ReportPeriod, Result,
    cli::{Cli, Command, CostArgs, parse_date},
    explorer::CostExplorer,
    output::{OutputFormatter, get_formatter},
    timezone::TimezoneConfig,
};
use cecost_aws::SUPPORTED_API_VERSION;
use clap::Parser;
use colored::Colorize;
use futures::future::try_join_all;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Periods shown by the summary command
const SUMMARY_PERIODS: [ReportPeriod; 4] = [
    ReportPeriod::Today,
    ReportPeriod::MonthToDate,
    ReportPeriod::LastMonth,
    ReportPeriod::YearToDate,
];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // --verbose overrides RUST_LOG; logs go to stderr so JSON on stdout stays clean
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("cecost=info,cecost_core=info,cecost_aws=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // File values override the built-in API version; flags and env override the file
    let raw = RawCredentials {
        api_version: Some(SUPPORTED_API_VERSION.to_string()),
        ..Default::default()
    }
    .merge(RawCredentials::discover(cli.config.as_deref())?)
    .merge(cli.credentials.clone().into());

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", tz_config.display_name());

    let mut explorer = CostExplorer::connect(raw)
        .await
        .with_timezone(tz_config)
        .with_unit_source(cli.unit_source());
    if let Some(today) = cli.anchor_date()? {
        explorer = explorer.with_fixed_date(today);
    }

    let formatter = get_formatter(cli.json);

    match &cli.command {
        Command::Today(args) => {
            print_report(&explorer, ReportPeriod::Today, args, formatter.as_ref()).await
        }
        Command::Day { date, cost } => {
            let date = parse_date(date)?;
            print_report(&explorer, ReportPeriod::Day(date), cost, formatter.as_ref()).await
        }
        Command::MonthToDate(args) => {
            print_report(&explorer, ReportPeriod::MonthToDate, args, formatter.as_ref()).await
        }
        Command::LastMonth(args) => {
            print_report(&explorer, ReportPeriod::LastMonth, args, formatter.as_ref()).await
        }
        Command::YearToDate(args) => {
            print_report(&explorer, ReportPeriod::YearToDate, args, formatter.as_ref()).await
        }
        Command::Summary(args) => {
            info!("Running summary report");
            let options: QueryOptions = args.to_options();
            let totals = try_join_all(
                SUMMARY_PERIODS
                    .iter()
                    .map(|period| explorer.get_costs(*period, &options)),
            )
            .await?;

            let reports: Vec<_> = SUMMARY_PERIODS
                .iter()
                .map(ToString::to_string)
                .zip(totals)
                .collect();
            println!("{}", formatter.format_summary(&reports));
            Ok(())
        }
        Command::Tags(args) => {
            info!("Running tags report");
            let tags = explorer.get_tags(&args.to_options()?).await?;
            println!("{}", formatter.format_tags(&tags));
            Ok(())
        }
    }
}

async fn print_report(
    explorer: &CostExplorer,
    period: ReportPeriod,
    args: &CostArgs,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    info!("Running {} report", period);
    let report = explorer.get_costs(period, &args.to_options()).await?;
    println!("{}", formatter.format_costs(&period.to_string(), &report));
    Ok(())
}
