//! Command-line interface for the investment research pipeline

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use invest_agents::{AnalysisRequest, ResearchPipeline};
use invest_core::{DateRange, FiscalYear, ResearchConfig, SystemClock};
use invest_data::{FinnhubClient, HttpWarehouse};
use invest_llm::providers::AnthropicProvider;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "invest-cli")]
#[command(about = "Generate an investment research report for a company", long_about = None)]
struct Args {
    /// Company name to analyze (free text, e.g. "Vodafone")
    company: String,

    /// Analysis start date (YYYY-MM-DD); defaults to Jan 1 of the current year
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Analysis end date (YYYY-MM-DD); defaults to Dec 31 of the current year
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Fiscal year for ESG indicators; defaults to the documented fallback
    #[arg(long)]
    fiscal_year: Option<i32>,

    /// Model override for both analysis and synthesis
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    invest_core::logging::init_tracing();

    let args = Args::parse();

    // Credentials and endpoints are resolved once, before anything executes
    let mut builder = ResearchConfig::builder();
    if let Some(model) = &args.model {
        builder = builder
            .analysis_model(model.clone())
            .synthesis_model(model.clone());
    }
    let config = Arc::new(
        builder
            .build()
            .context("invalid configuration")?
            .with_env_credentials(),
    );
    config.validate().context("invalid configuration")?;

    let warehouse_url = config
        .warehouse_url
        .clone()
        .context("WAREHOUSE_URL is not set")?;
    let warehouse = Arc::new(HttpWarehouse::new(
        warehouse_url,
        config.warehouse_token.clone(),
        config.request_timeout,
    )?);

    let api_key = config
        .market_data_api_key
        .clone()
        .context("MARKET_DATA_API_KEY is not set")?;
    let market = Arc::new(FinnhubClient::new(api_key, config.request_timeout)?);

    let llm = Arc::new(AnthropicProvider::from_env()?);

    let pipeline = ResearchPipeline::standard(
        warehouse,
        market,
        llm,
        Arc::new(SystemClock),
        Arc::clone(&config),
    );

    let date_range = match (args.start_date, args.end_date) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        (None, None) => None,
        _ => anyhow::bail!("--start-date and --end-date must be given together"),
    };

    let request = AnalysisRequest {
        company: args.company.clone(),
        date_range,
        fiscal_year: args.fiscal_year.map(FiscalYear),
    };

    info!(company = %args.company, "Running analysis");
    let outcome = pipeline.run(request).await?;

    println!("{}", outcome.text());
    Ok(())
}
