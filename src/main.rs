use clap::{Parser, Subcommand};
use report_registry::config::{self, DashboardConfig};
use report_registry::modules::{builtin_modules, builtin_shared_attachments};
use report_registry::registry::Registry;
use report_registry::scan::DiscoverySummary;
use report_registry::server::{self, AppState};
use report_registry::{logging, output, startup};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "report-registry")]
#[command(about = "Report catalog and navigation for the reporting dashboard")]
#[command(long_about = "\
Report catalog and navigation for the reporting dashboard

At startup the registry seeds the configured report groups, attaches the
shared reports, and discovers every report module. The sealed catalog then
drives the group dashboards and the /api/reports endpoint.

Module discovery (first available wins):
  id:    module metadata → last name segment (finance.budget → \"budget\")
  name:  module metadata → title-cased id (hydrant_history → \"Hydrant History\")
  url:   module metadata → module url prefix → \"/{id}/\"
  group: module metadata → first name segment

Run 'report-registry gen-config' to generate a documented dashboard.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults are used when it does not exist)
    #[arg(long, default_value = "dashboard.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the registry and serve the dashboards and /api/reports
    Serve {
        /// Override [server] host
        #[arg(long)]
        host: Option<String>,
        /// Override [server] port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build the registry and print the group/report tree
    Check,
    /// Print the /api/reports JSON body
    List,
    /// Print a stock dashboard.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            let (mut config, registry, _) = build_registry(&cli.config)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::new(registry, &config.colors);
            server::serve(state, &config.bind_addr()).await?;
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let (_, registry, summary) = build_registry(&cli.config)?;
            output::print_registry_tree(&registry);
            output::print_discovery_summary(&summary);
            if !summary.failed.is_empty() {
                return Err(format!("{} modules failed discovery", summary.failed.len()).into());
            }
            println!("==> Registry is valid");
        }
        Command::List => {
            let (_, registry, _) = build_registry(&cli.config)?;
            println!("{}", output::format_listing_json(&registry)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config, install logging, and run the startup sequence.
fn build_registry(
    path: &Path,
) -> Result<(DashboardConfig, Registry, DiscoverySummary), config::ConfigError> {
    let config = config::load_config(path)?;
    logging::init_logging(&config.logging.level);

    let mut modules = builtin_modules();
    startup::attach_config_modules(&mut modules, &config);
    let (registry, summary) =
        startup::initialize(&config, &modules, &builtin_shared_attachments());
    Ok((config, registry, summary))
}
