//! Command-line options.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::*;
use crate::config::types::{BucketSettings, ClientConfig, LogFormat, LogLevel, RetryPolicy};
use crate::pagination::CollectLimits;

/// Command-line options for the `ats_client` binary.
///
/// # Examples
///
/// ```bash
/// # Candidates in a stage, by name
/// ats_client candidates --stage "Phone Screen" --limit 200
///
/// # Postings owned by someone
/// ats_client postings --owner smith
///
/// # A requisition by its code, against a sandbox
/// ATS_BASE_URL=https://api.sandbox.lever.co/v1 ats_client requisition --code ENG-12
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "ats_client",
    about = "Rate-limited, retrying client for the Lever recruiting API."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// API key (bearer token)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// API root URL
    #[arg(long, env = "ATS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Sustained requests per second
    ///
    /// The upstream enforces roughly 10; keep this below that.
    #[arg(long, default_value_t = BUCKET_REFILL_PER_SECOND, global = true)]
    pub rps: f64,

    /// Burst capacity (tokens)
    #[arg(long, default_value_t = BUCKET_CAPACITY, global = true)]
    pub burst: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// Stop conditions shared by list subcommands.
#[derive(Debug, Clone, Args)]
pub struct LimitArgs {
    /// Maximum number of items to return
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
    pub limit: usize,

    /// Maximum number of upstream page requests
    #[arg(long, default_value_t = DEFAULT_MAX_CALLS)]
    pub max_calls: u32,

    /// Wall-clock budget for the whole listing, in seconds
    #[arg(long, default_value_t = DEFAULT_COLLECT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl LimitArgs {
    pub fn limits(&self) -> CollectLimits {
        CollectLimits::default()
            .with_max_items(self.limit)
            .with_max_calls(self.max_calls)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List candidates
    Candidates {
        /// Stage name or id (repeatable)
        #[arg(long = "stage")]
        stages: Vec<String>,
        #[arg(long)]
        posting_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// List archived candidates instead (filters by posting only)
        #[arg(long, conflicts_with_all = ["stages", "email", "tags", "search"])]
        archived: bool,
        /// Keep only candidates whose name or headline contains this text
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Show one candidate
    Candidate { id: String },
    /// List postings
    Postings {
        #[arg(long, default_value = "published")]
        state: String,
        /// Keep only postings whose owner name contains this text
        #[arg(long)]
        owner: Option<String>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// List pipeline stages
    Stages,
    /// List archive reasons
    ArchiveReasons,
    /// List requisitions
    Requisitions {
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Show one requisition, by id or by code
    Requisition {
        #[arg(required_unless_present = "code", conflicts_with = "code")]
        id: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// List a candidate's interviews
    Interviews {
        opportunity_id: String,
        #[command(flatten)]
        limits: LimitArgs,
    },
}

impl Cli {
    /// Client configuration derived from the options.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            bucket: BucketSettings {
                capacity: self.burst,
                refill_per_second: self.rps,
            },
            retry: RetryPolicy::default(),
            ..ClientConfig::default()
        }
    }
}
