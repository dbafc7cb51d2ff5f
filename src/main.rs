use anyhow::Result;
use clap::Parser;
use infra_manager::{init_logging, Command, InfraConfig, InfraManager, LogOptions};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "infra-manager")]
#[command(about = "Start, stop and inspect the local infrastructure containers")]
#[command(version)]
#[command(long_about = "Manages the supporting containers (Prometheus, Grafana) used during \
development: starts them idempotently, waits for their health endpoints, reports port \
and container status, and tears everything down again.")]
struct Args {
    /// start, stop, restart, status, test, docker or help
    #[arg(value_name = "COMMAND")]
    command: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "infra.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let _guards = init_logging(&LogOptions {
        default_directive: format!("infra_manager={}", log_level),
        format: args.log_format.clone(),
        verbose_source: args.debug,
        file_dir: None,
    })?;

    info!("Configuration file: {}", args.config);

    // help and unknown verbs only print usage, so a broken file must not block them
    let needs_config = args.validate_config
        || args
            .command
            .as_deref()
            .unwrap_or("help")
            .parse::<Command>()
            .is_ok_and(|command| command.needs_config());

    let config = match InfraConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) if !needs_config => {
            warn!("Ignoring unusable configuration: {}", e);
            InfraConfig::default()
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if needs_config {
        if let Err(e) = config.validate() {
            error!("Configuration validation failed: {}", e);
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
    }

    if args.validate_config {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let manager = InfraManager::from_config(config);
    let exit_code = manager.dispatch(args.command.as_deref()).await;

    info!("infra-manager exiting with code {}", exit_code);
    std::process::exit(exit_code);
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Infrastructure manager configuration");
    println!("# Every key is optional; INFRA_<SECTION>__<KEY> environment variables override the file");
    println!();
    println!("{}", toml::to_string_pretty(&InfraConfig::default())?);
    Ok(())
}
