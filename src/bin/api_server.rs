use anyhow::Result;
use clap::Parser;
use infra_manager::{
    init_logging, ApiServer, InfraConfig, LogOptions, ServerEnvironment, ShutdownCoordinator,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "api-server")]
#[command(about = "API server with signal-driven graceful shutdown")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "infra.toml")]
    config: String,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = InfraConfig::load_from_file(&args.config)?;
    config.validate()?;
    let server_config = config.server.clone();

    let level = &server_config.log_level;
    let file_dir = (server_config.environment == ServerEnvironment::Production)
        .then(|| PathBuf::from(&server_config.log_dir));
    let guards = init_logging(&LogOptions {
        default_directive: format!(
            "infra_manager={level},api_server={level},tower_http={level}"
        ),
        format: args.log_format.clone(),
        verbose_source: false,
        file_dir,
    })?;

    info!(
        "Starting API server v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        server_config.environment
    );

    let coordinator = ShutdownCoordinator::new(server_config.shutdown_deadline());
    coordinator.install_signal_handlers()?;
    coordinator.install_panic_hook();

    let server = ApiServer::new(server_config);
    let listener = server.bind().await.map_err(|e| {
        error!("Failed to start server: {}", e);
        e
    })?;

    let exit_code = coordinator
        .run(ApiServer::serve(listener, coordinator.clone()))
        .await;

    info!("API server exiting with code {}", exit_code);

    // process::exit skips destructors, flush file logs first
    drop(guards);
    std::process::exit(exit_code);
}
