use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use solar_sizer::{config::Config, telemetry::init_tracing, Pipeline};
use tracing::info;

#[derive(Parser)]
#[command(name = "solar-sizer")]
#[command(
    author,
    version,
    about = "Size, match and cost a solar power system from an appliance list"
)]
struct Cli {
    /// Path to the JSON pipeline request
    #[arg(required_unless_present = "list_catalog")]
    request: Option<PathBuf>,

    /// Component catalog (TOML); overrides the configured path
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Configuration file layered over the built-in defaults
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Print the catalog rows of one component type (panel, battery, inverter, controller) and exit
    #[arg(long, value_name = "KIND")]
    list_catalog: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut cfg = Config::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(path) = &cli.catalog {
        cfg.catalog.path = path.display().to_string();
    }

    let pipeline = Pipeline::from_config(&cfg)?;

    if let Some(kind) = &cli.list_catalog {
        let rows = pipeline.catalog().lookup(kind)?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(request_path) = cli.request else {
        anyhow::bail!("a request file is required");
    };
    let body = std::fs::read_to_string(&request_path)
        .with_context(|| format!("reading request {}", request_path.display()))?;

    info!(request = %request_path.display(), "running pipeline");
    let response = pipeline.run_json(&body).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
