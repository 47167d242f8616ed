use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Everything the service and the CLI read from `.env` and the process
/// environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match env::var("APP_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            Err(_) => 3000,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            export: ExportConfig::from_env()?,
        })
    }
}

/// Where the assessment API listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` maps to the IPv4 loopback; anything else must be an IP literal.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Default log filter; `RUST_LOG` still takes precedence.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Timing and external tooling used by the print and PDF export paths.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub print_settle: Duration,
    pub pdf_settle: Duration,
    pub render_timeout: Duration,
    pub wkhtmltopdf_path: String,
    pub print_command: String,
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            print_settle: Duration::from_millis(500),
            pdf_settle: Duration::from_millis(800),
            render_timeout: Duration::from_secs(30),
            wkhtmltopdf_path: "wkhtmltopdf".to_string(),
            print_command: "lp".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let print_settle = duration_var("APP_EXPORT_PRINT_SETTLE_MS", Duration::from_millis)?
            .unwrap_or(defaults.print_settle);
        let pdf_settle = duration_var("APP_EXPORT_PDF_SETTLE_MS", Duration::from_millis)?
            .unwrap_or(defaults.pdf_settle);
        let render_timeout = duration_var("APP_EXPORT_RENDER_TIMEOUT_SECS", Duration::from_secs)?
            .unwrap_or(defaults.render_timeout);

        Ok(Self {
            print_settle,
            pdf_settle,
            render_timeout,
            wkhtmltopdf_path: env::var("APP_EXPORT_WKHTMLTOPDF")
                .unwrap_or(defaults.wkhtmltopdf_path),
            print_command: env::var("APP_EXPORT_PRINT_COMMAND").unwrap_or(defaults.print_command),
            output_dir: env::var("APP_EXPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }
}

fn duration_var(
    name: &'static str,
    to_duration: fn(u64) -> Duration,
) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|value| Some(to_duration(value)))
            .map_err(|_| ConfigError::InvalidDuration { variable: name }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDuration { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
