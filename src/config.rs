use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InfraConfig {
    /// Pause between the stop and start halves of `restart`
    #[serde(default = "default_restart_pause_ms")]
    pub restart_pause_ms: u64,

    /// `pkill -f` pattern matching locally spawned dev processes
    #[serde(default = "default_dev_process_pattern")]
    pub dev_process_pattern: String,

    /// Script run by the `test` command
    #[serde(default = "default_test_script")]
    pub test_script: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub compose: ComposeConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Containers managed by start/stop, in start order
    #[serde(default = "default_dependencies")]
    pub dependencies: Vec<DependencyConfig>,

    /// Ports reported by start/status diagnostics
    #[serde(default = "default_ports")]
    pub ports: Vec<PortConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Command whose success proves the container engine is reachable
    #[serde(default = "default_engine_check_command")]
    pub check_command: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HealthConfig {
    /// Probe attempts before a dependency is reported as timed out
    #[serde(default = "default_health_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between failed probe attempts
    #[serde(default = "default_health_interval_ms")]
    pub interval_ms: u64,

    /// Per-request connect/read timeout
    #[serde(default = "default_health_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComposeConfig {
    /// Compose file used by the `docker` command
    #[serde(default = "default_compose_file")]
    pub file: String,

    /// Links printed once the full stack is up
    #[serde(default = "default_compose_services")]
    pub services: Vec<ServiceLink>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// IP address to bind to
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,

    #[serde(default)]
    pub environment: ServerEnvironment,

    /// Default tracing level when RUST_LOG is unset
    #[serde(default = "default_server_log_level")]
    pub log_level: String,

    /// Directory receiving combined.log and error.log in production
    #[serde(default = "default_server_log_dir")]
    pub log_dir: String,

    /// Hard deadline between the first shutdown trigger and forced exit
    #[serde(default = "default_shutdown_deadline_secs")]
    pub shutdown_deadline_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerEnvironment {
    #[default]
    Development,
    Production,
    Test,
}

/// One container this tool starts and stops.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DependencyConfig {
    /// Container name, also used as the engine's name filter
    pub name: String,

    /// Human-facing label used in health and summary lines
    pub display_name: String,

    /// Opaque shell invocation that creates the container
    pub start_command: String,

    /// Readiness endpoint; dependencies without one skip the health phase
    pub health_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PortConfig {
    pub port: u16,
    pub name: String,
    pub url: String,
}

impl InfraConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let defaults = toml::to_string(&InfraConfig::default())
            .map_err(|e| ConfigError::Message(format!("Failed to encode defaults: {}", e)))?;

        let settings = Config::builder()
            // Start with default values
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with INFRA_ prefix, e.g. INFRA_SERVER__PORT
            .add_source(
                Environment::with_prefix("INFRA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut config: InfraConfig = settings.try_deserialize()?;

        // Plain PORT is honoured for the API server, as container platforms set it
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => warn!("Ignoring unparsable PORT value: {}", port),
            }
        }

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health.max_attempts == 0 {
            return Err(ConfigError::Message(
                "Health max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.health.interval_ms == 0 {
            return Err(ConfigError::Message(
                "Health interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.dependencies.is_empty() {
            return Err(ConfigError::Message(
                "At least one dependency must be declared".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for dependency in &self.dependencies {
            if !seen.insert(dependency.name.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate dependency name: {}",
                    dependency.name
                )));
            }

            if dependency.start_command.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "Dependency {} has an empty start_command",
                    dependency.name
                )));
            }
        }

        if let Some(port) = self.ports.iter().find(|p| p.port == 0) {
            return Err(ConfigError::Message(format!(
                "Port for {} must be greater than 0",
                port.name
            )));
        }

        if self.server.shutdown_deadline_secs == 0 {
            return Err(ConfigError::Message(
                "Server shutdown_deadline_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_millis(self.restart_pause_ms)
    }
}

impl HealthConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl ServerConfig {
    pub fn shutdown_deadline(&self) -> Duration {
        Duration::from_secs(self.shutdown_deadline_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for InfraConfig {
    fn default() -> Self {
        Self {
            restart_pause_ms: default_restart_pause_ms(),
            dev_process_pattern: default_dev_process_pattern(),
            test_script: default_test_script(),
            engine: EngineConfig::default(),
            health: HealthConfig::default(),
            compose: ComposeConfig::default(),
            server: ServerConfig::default(),
            dependencies: default_dependencies(),
            ports: default_ports(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_command: default_engine_check_command(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_health_max_attempts(),
            interval_ms: default_health_interval_ms(),
            request_timeout_ms: default_health_request_timeout_ms(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            file: default_compose_file(),
            services: default_compose_services(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            environment: ServerEnvironment::default(),
            log_level: default_server_log_level(),
            log_dir: default_server_log_dir(),
            shutdown_deadline_secs: default_shutdown_deadline_secs(),
        }
    }
}

// Default value functions
fn default_restart_pause_ms() -> u64 {
    2000
}
fn default_dev_process_pattern() -> String {
    "turbo.*dev".to_string()
}
fn default_test_script() -> String {
    "./scripts/infra/test-infrastructure.sh".to_string()
}

fn default_engine_check_command() -> String {
    "docker info".to_string()
}

fn default_health_max_attempts() -> u32 {
    15
}
fn default_health_interval_ms() -> u64 {
    2000
}
fn default_health_request_timeout_ms() -> u64 {
    2000
}

fn default_compose_file() -> String {
    "docker-compose.dev.yml".to_string()
}
fn default_compose_services() -> Vec<ServiceLink> {
    [
        ("Web App", "http://localhost:3011"),
        ("API Server", "http://localhost:3012"),
        ("Prometheus", "http://localhost:9090"),
        ("Grafana", "http://localhost:3013 (admin/admin)"),
        ("Sentry", "http://localhost:9000"),
        ("OpenTelemetry", "http://localhost:8888"),
    ]
    .into_iter()
    .map(|(name, url)| ServiceLink {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}
fn default_server_port() -> u16 {
    3012
}
fn default_server_log_level() -> String {
    "info".to_string()
}
fn default_server_log_dir() -> String {
    ".".to_string()
}
fn default_shutdown_deadline_secs() -> u64 {
    10
}

fn default_dependencies() -> Vec<DependencyConfig> {
    vec![
        DependencyConfig {
            name: "prometheus".to_string(),
            display_name: "Prometheus".to_string(),
            start_command: "docker run -d --name prometheus -p 9090:9090 \
                -v $(pwd)/prometheus:/etc/prometheus prom/prometheus:latest \
                --config.file=/etc/prometheus/prometheus.yml"
                .to_string(),
            health_url: Some("http://localhost:9090/api/v1/targets".to_string()),
        },
        DependencyConfig {
            name: "grafana".to_string(),
            display_name: "Grafana".to_string(),
            start_command: "docker run -d --name grafana -p 3013:3000 \
                -e \"GF_SECURITY_ADMIN_PASSWORD=admin\" grafana/grafana:latest"
                .to_string(),
            health_url: Some("http://localhost:3013/login".to_string()),
        },
    ]
}

fn default_ports() -> Vec<PortConfig> {
    [
        (3012, "Server"),
        (3011, "Web App"),
        (9090, "Prometheus"),
        (3013, "Grafana"),
    ]
    .into_iter()
    .map(|(port, name)| PortConfig {
        port,
        name: name.to_string(),
        url: format!("http://localhost:{}", port),
    })
    .collect()
}
