use clap::Parser;
use tokio::time::Duration;
use tracing::Level;

use crate::frame::DEFAULT_MAX_BULK_LEN;

pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_DATABASES: usize = 16;

/// Server settings, read from the command line or the environment.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "memdis", about = "In-memory Redis compatible server")]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "MEMDIS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// The port to listen on. 0 picks a free port
    #[arg(short, long, env = "MEMDIS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Number of logical databases
    #[arg(long, env = "MEMDIS_DATABASES", default_value_t = DEFAULT_DATABASES)]
    pub databases: usize,

    /// Largest accepted bulk string, in bytes
    #[arg(long, env = "MEMDIS_MAX_BULK_LEN", default_value_t = DEFAULT_MAX_BULK_LEN)]
    pub max_bulk_len: usize,

    /// How often expired keys are swept, in milliseconds. 0 disables the sweeper
    #[arg(long, env = "MEMDIS_EXPIRY_SWEEP_MS", default_value_t = 100)]
    pub expiry_sweep_ms: u64,

    /// Maximum log level
    #[arg(long, env = "MEMDIS_LOG_LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Config {
    pub fn expiry_sweep_interval(&self) -> Option<Duration> {
        (self.expiry_sweep_ms > 0).then(|| Duration::from_millis(self.expiry_sweep_ms))
    }

    /// Name/value pairs reported by CONFIG GET.
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bind", self.host.clone()),
            ("port", self.port.to_string()),
            ("databases", self.databases.to_string()),
            ("proto-max-bulk-len", self.max_bulk_len.to_string()),
            ("expiry-sweep-ms", self.expiry_sweep_ms.to_string()),
            ("loglevel", self.log_level.to_string().to_lowercase()),
            ("save", String::new()),
            ("appendonly", "no".to_string()),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            databases: DEFAULT_DATABASES,
            max_bulk_len: DEFAULT_MAX_BULK_LEN,
            expiry_sweep_ms: 100,
            log_level: Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let config = Config::try_parse_from([
            "memdis",
            "--port",
            "7000",
            "--databases",
            "4",
            "--expiry-sweep-ms",
            "0",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.databases, 4);
        assert_eq!(config.expiry_sweep_interval(), None);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.port, 6379);
        assert_eq!(
            config.expiry_sweep_interval(),
            Some(Duration::from_millis(100))
        );
    }
}
