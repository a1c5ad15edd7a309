//! Command-line settings for the terminal client.

use crate::domain::API_URL;
use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kating",
    version,
    about = "Ubah teks mentah menjadi bahasa skripsi yang formal dan natural."
)]
pub struct Settings {
    /// Rewriting endpoint
    #[arg(long, default_value = API_URL, value_parser = parse_endpoint)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Log file (defaults to kating.log in the system temp directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `kating=debug`; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("kating.log"))
    }
}

fn parse_endpoint(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|err| format!("invalid URL: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        other => Err(format!("unsupported scheme `{other}`, expected http or https")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["kating"]).unwrap();
        assert_eq!(settings.api_url, API_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.log_path(), std::env::temp_dir().join("kating.log"));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::try_parse_from([
            "kating",
            "--api-url",
            "https://kating.example/api/humanize",
            "--timeout-secs",
            "5",
            "--log-file",
            "/tmp/k.log",
        ])
        .unwrap();
        assert_eq!(settings.api_url, "https://kating.example/api/humanize");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.log_path(), PathBuf::from("/tmp/k.log"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::try_parse_from(["kating", "--api-url", "not a url"]).is_err());
        assert!(Settings::try_parse_from(["kating", "--api-url", "ftp://host/x"]).is_err());
        assert!(Settings::try_parse_from(["kating", "--timeout-secs", "0"]).is_err());
    }
}
