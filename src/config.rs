//! Resolve the connection settings for a single invocation.
//!
//! Values come, in decreasing order of precedence, from the command line, the
//! environment (including a `.env` file), and a YAML config file:
//!
//! ```yaml
//! url: https://mattermost.example.com
//! access-token: 2bff151e935e4017a5222076c6f77311
//! connection-timeout: 30
//! skip-tls-verify: false
//! ```

use crate::{
    cli::GlobalArgs,
    mattermost::{auth::AccessToken, error::MattermostError},
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;

/// The names of the config files looked up in the home directory, in order.
/// The second is the name used by the Go version of this tool.
const CONFIG_FILE_NAMES: [&str; 2] = [".mattermost-notify.yaml", ".go-mattermost-notify.yaml"];

/// Used when no connection timeout is configured anywhere.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the API client needs to reach the server. Built once, never
/// mutated.
///
/// An empty URL or token is allowed here and rejected at request time.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub access_token: AccessToken,
    pub connection_timeout: Duration,
    pub skip_tls_verify: bool,
}

/// The on-disk config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileConfig {
    url: Option<String>,
    access_token: Option<AccessToken>,
    #[serde(default, deserialize_with = "crate::de::opt_seconds")]
    connection_timeout: Option<Duration>,
    skip_tls_verify: Option<bool>,
}

/// Merge the command line and environment, as parsed by clap, over the config
/// file.
pub fn resolve(args: &GlobalArgs) -> Result<Options, MattermostError> {
    let file = match &args.config {
        Some(path) => read_config_file(path)?,
        None => match dirs::home_dir().and_then(|h| find_default_config(&h)) {
            Some(path) => read_config_file(&path)?,
            None => FileConfig::default(),
        },
    };

    merge(args, file)
}

fn merge(args: &GlobalArgs, file: FileConfig) -> Result<Options, MattermostError> {
    let connection_timeout = match args.connection_timeout {
        Some(0) => {
            return Err(MattermostError::InvalidConfig(
                "the connection timeout must be greater than zero".into(),
            ))
        }
        Some(secs) => Duration::from_secs(secs),
        None => file
            .connection_timeout
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT),
    };

    Ok(Options {
        base_url: args.url.clone().or(file.url).unwrap_or_default(),
        access_token: args
            .access_token
            .clone()
            .map(AccessToken)
            .or(file.access_token)
            .unwrap_or_default(),
        connection_timeout,
        skip_tls_verify: args
            .skip_tls_verify
            .or(file.skip_tls_verify)
            .unwrap_or(false),
    })
}

/// The first config file found in `home`, if any.
fn find_default_config(home: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| home.join(name))
        .find(|p| p.is_file())
}

fn read_config_file(path: &Path) -> Result<FileConfig, MattermostError> {
    let invalid = |e: String| MattermostError::InvalidConfig(format!("{}: {}", path.display(), e));

    let raw = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let file = parse_config(&raw).map_err(|e| invalid(e.to_string()))?;

    info!("Using config file: {}", path.display());
    Ok(file)
}

fn parse_config(raw: &str) -> Result<FileConfig, serde_yaml::Error> {
    // An empty YAML document is `null`, not an empty mapping.
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(raw)
}
