use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "TETHER_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "TETHER_BASE_URL";
pub const DATA_FILE_ENV: &str = "TETHER_DATA_FILE";
pub const SWEEP_INTERVAL_ENV: &str = "TETHER_SWEEP_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "TETHER_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_DATA_FILE: &str = "tether-data.json";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tether-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public origin prepended to short codes in responses.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Keep state in memory only; nothing survives a restart.
    #[arg(long, conflicts_with = "data_file")]
    pub in_memory: bool,

    /// Seconds between expiration sweeps. 0 disables the sweeper.
    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["tether-gateway"]).unwrap();
        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert!(!cli.in_memory);
        assert_eq!(cli.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = CLI::try_parse_from([
            "tether-gateway",
            "--listen-addr",
            "0.0.0.0:9000",
            "--base-url",
            "https://tthr.io",
            "--sweep-interval-secs",
            "0",
            "--log-format",
            "json",
            "--in-memory",
        ])
        .unwrap();
        assert_eq!(cli.listen_addr.port(), 9000);
        assert_eq!(cli.base_url, "https://tthr.io");
        assert_eq!(cli.sweep_interval_secs, 0);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.in_memory);
    }
}
