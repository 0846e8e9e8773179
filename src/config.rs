// Configuration module: resolves where the credential lives and which
// Pinata endpoints to talk to. Everything is resolved once, in `main`, and
// handed to the store and the client as plain values.

use clap::Args;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_UPLOADS_URL: &str = "https://uploads.pinata.cloud";

/// Directory (under the home directory) holding the credential file.
pub const CONFIG_DIR_NAME: &str = ".pinata";
pub const CREDENTIALS_FILE_NAME: &str = ".credentials";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory, set --config-dir or PINATA_CONFIG_DIR")]
    NoHomeDir,

    #[error("invalid {name} '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection and storage options. Every option can also come from the
/// environment, which is how the integration tests point the CLI at a
/// local mock server.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Base URL of the Pinata API
    #[arg(long = "api-url", env = "PINATA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL of the Pinata uploads API
    #[arg(long = "uploads-url", env = "PINATA_UPLOADS_URL", default_value = DEFAULT_UPLOADS_URL)]
    pub uploads_url: String,

    /// Directory holding the stored token (default: ~/.pinata)
    #[arg(long = "config-dir", env = "PINATA_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Default for ConfigArgs {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            uploads_url: DEFAULT_UPLOADS_URL.to_string(),
            config_dir: None,
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials_path: PathBuf,
    pub api_url: Url,
    pub uploads_url: Url,
}

impl Config {
    /// Resolve the raw arguments: pick the config directory (falling back to
    /// `~/.pinata`) and validate both base URLs.
    pub fn resolve(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let dir = match &args.config_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDir)?
                .join(CONFIG_DIR_NAME),
        };

        Ok(Config {
            credentials_path: dir.join(CREDENTIALS_FILE_NAME),
            api_url: parse_base_url("API URL", &args.api_url)?,
            uploads_url: parse_base_url("uploads URL", &args.uploads_url)?,
        })
    }
}

fn parse_base_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".into()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_dir_is_used_verbatim() {
        let args = ConfigArgs {
            config_dir: Some(PathBuf::from("/tmp/pinata-test")),
            ..ConfigArgs::default()
        };
        let config = Config::resolve(&args).unwrap();
        assert_eq!(
            config.credentials_path,
            PathBuf::from("/tmp/pinata-test/.credentials")
        );
        assert_eq!(config.api_url.as_str(), "https://api.pinata.cloud/");
        assert_eq!(config.uploads_url.host_str(), Some("uploads.pinata.cloud"));
    }

    #[test]
    fn rejects_non_http_urls() {
        let args = ConfigArgs {
            api_url: "ftp://example.com".into(),
            config_dir: Some(PathBuf::from("/tmp")),
            ..ConfigArgs::default()
        };
        let err = Config::resolve(&args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "API URL", .. }));
    }

    #[test]
    fn rejects_garbage_urls() {
        let args = ConfigArgs {
            uploads_url: "not a url".into(),
            config_dir: Some(PathBuf::from("/tmp")),
            ..ConfigArgs::default()
        };
        assert!(Config::resolve(&args).is_err());
    }
}
