//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point. Prints the page view model as JSON.
// FORMAT: logs go to stderr as seq|level|category|message

use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use dashboard_lib::{
    create_app_state, get_filter_options, init_logging, log_error, log_info, refresh_data,
    render_page, DashboardConfig, PageRequest,
};
use metrics_engine::{BreakdownDimension, FilterDimension, FilterSelection};

#[derive(Parser)]
#[command(version, about = "Employee demographics dashboard")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page: total, gender, generation, religion, tenure, region or age
    #[arg(short, long, default_value = "")]
    page: String,

    #[arg(short, long, default_value = "unit")]
    breakdown: BreakdownDimension,

    #[arg(long)]
    unit: Vec<String>,
    #[arg(long)]
    subunit: Vec<String>,
    #[arg(long)]
    layer: Vec<String>,
    #[arg(long)]
    gender: Vec<String>,
    #[arg(long)]
    generation: Vec<String>,
    #[arg(long)]
    religion: Vec<String>,
    /// Tenure cohort label, e.g. "4-6 Year"
    #[arg(long)]
    tenure: Vec<String>,

    /// Print the filter options instead of a page
    #[arg(long)]
    options: bool,
}

impl Cli {
    fn filters(&self) -> FilterSelection {
        FilterSelection::new()
            .with(FilterDimension::Unit, self.unit.iter().cloned())
            .with(FilterDimension::Subunit, self.subunit.iter().cloned())
            .with(FilterDimension::Layer, self.layer.iter().cloned())
            .with(FilterDimension::Gender, self.gender.iter().cloned())
            .with(FilterDimension::Generation, self.generation.iter().cloned())
            .with(FilterDimension::Religion, self.religion.iter().cloned())
            .with(FilterDimension::Tenure, self.tenure.iter().cloned())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!("SYS", "{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path).map_err(|e| e.to_string())?,
        None => DashboardConfig::default(),
    };

    if let Some(path) = init_logging(config.log_level, config.log_file.as_deref())? {
        log_info!("SYS", "Dashboard starting, log={}", path.display());
    }

    let state = create_app_state(config);
    let summary = refresh_data(&state)?;
    log_info!("SYS", "Loaded {} rows from {}", summary.rows, summary.source);

    if cli.options {
        let options = get_filter_options(&state)?;
        return serde_json::to_string_pretty(&options).map_err(|e| e.to_string());
    }

    let request = PageRequest::new(&cli.page)
        .with_breakdown(cli.breakdown)
        .with_filters(cli.filters());
    let view = render_page(&state, &request)?;
    serde_json::to_string_pretty(&view).map_err(|e| e.to_string())
}
