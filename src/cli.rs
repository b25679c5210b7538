//! Command-line surface.
//!
//! ```bash
//! mattermost-notify get /users/me
//! mattermost-notify post -c rybfbdi9ojy8xxxjjxc88kh3me -A CI -t "Job Status" \
//!     -m "The job #BEEF has failed :bug:" -l critical
//! mattermost-notify post -c @alice -A CI -t "Job Status" \
//!     -m "The job #BEEF ended successfully :tada:" -l success
//! ```

use clap::{builder::FalseyValueParser, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Post a message to a Mattermost channel using its REST APIv4 interface.
#[derive(Parser)]
#[command(name = "mattermost-notify")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings shared by every subcommand. The command line takes
/// precedence over the environment, which takes precedence over the config
/// file.
#[derive(Args, Default)]
pub struct GlobalArgs {
    /// Mattermost URL
    #[arg(short, long, env = "MATTERMOST_URL", global = true)]
    pub url: Option<String>,

    /// Mattermost Access Token
    #[arg(
        short,
        long,
        env = "MATTERMOST_ACCESS_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub access_token: Option<String>,

    /// Config file (default is $HOME/.mattermost-notify.yaml, falling back to
    /// $HOME/.go-mattermost-notify.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Connection timeout in seconds (default 10)
    #[arg(long, env = "MATTERMOST_CONNECTION_TIMEOUT", global = true)]
    pub connection_timeout: Option<u64>,

    /// Do not verify the server's TLS certificate
    // `Option` so that `--skip-tls-verify=false` can override the config file.
    #[arg(
        long,
        env = "MATTERMOST_SKIP_TLS_VERIFY",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = FalseyValueParser::new()
    )]
    pub skip_tls_verify: Option<bool>,

    /// Quiet mode
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a Get query to Mattermost (see https://api.mattermost.com/)
    Get {
        /// API endpoint, e.g. /users/me, /channels or /bots
        endpoint: String,
    },

    /// Post a message to a Mattermost channel or user
    Post(PostArgs),

    /// Print the version number
    Version,
}

#[derive(Args)]
pub struct PostArgs {
    /// Author of the message
    #[arg(short = 'A', long)]
    pub author: String,

    /// Mattermost channel ID or username, e.g. rybfbdi9ojy8xxxjjxc88kh3me or @alice
    #[arg(short, long)]
    pub channel: String,

    /// The Mattermost team
    // Accepted for compatibility with existing scripts; posts are addressed
    // by channel ID alone.
    #[allow(dead_code)]
    #[arg(short = 'T', long)]
    pub team: Option<String>,

    /// Criticality level: info, success, warning, or critical
    #[arg(short, long, default_value = "info")]
    pub level: String,

    /// The (markdown-formatted) message to send to the Mattermost channel
    #[arg(short, long)]
    pub message: String,

    /// The title that will precede the text message
    #[arg(short, long)]
    pub title: String,
}
