//! CLI argument definitions for Bearing.

use clap::{Parser, Subcommand};

use crate::config::{ChatEndpoint, ConfigOverrides, FallbackPolicy, OutputFormat};

/// Version string with the commit and build time baked in by `build.rs`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BEARING_GIT_COMMIT"),
    ", built ",
    env!("BEARING_BUILD_TIMESTAMP"),
    ")"
);

/// Bearing - project tasks, risks, health reports and an assistant, from the
/// command line or the browser.
///
/// Start with `bearing dashboard` for an overview, or `bearing serve` for the
/// web dashboard.
#[derive(Parser, Debug)]
#[command(name = "bearing")]
#[command(author, version, long_version = LONG_VERSION, about = "Project dashboard over a hosted workflow API", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Log requests and responses to stderr (same as BEARING_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workflow service base URL (overrides BEARING_BASE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read the API key from this environment variable instead of BEARING_API_KEY
    #[arg(long, global = true, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// On failure: "mock" shows flagged sample data, "off" reports the error
    #[arg(long, global = true, value_name = "POLICY", value_parser = parse_fallback)]
    pub fallback: Option<FallbackPolicy>,

    /// Assistant wire shape: "workflow" or "chat-messages"
    #[arg(long, global = true, value_name = "SHAPE", value_parser = parse_chat_endpoint)]
    pub chat_endpoint: Option<ChatEndpoint>,

    /// End-user identifier sent with every call
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flags that take part in configuration precedence.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            timeout_secs: self.timeout,
            fallback: self.fallback,
            chat_endpoint: self.chat_endpoint,
            user: self.user.clone(),
            output_format: self.human_readable.then_some(OutputFormat::Human),
        }
    }
}

fn parse_fallback(s: &str) -> Result<FallbackPolicy, String> {
    FallbackPolicy::parse(s).ok_or_else(|| format!("expected \"mock\" or \"off\", got \"{}\"", s))
}

fn parse_chat_endpoint(s: &str) -> Result<ChatEndpoint, String> {
    ChatEndpoint::parse(s)
        .ok_or_else(|| format!("expected \"workflow\" or \"chat-messages\", got \"{}\"", s))
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Overview statistics, trends, activity and upcoming deadlines
    Dashboard,

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Risk alert commands
    Risk {
        #[command(subcommand)]
        command: RiskCommands,
    },

    /// Project health report
    Report {
        /// Reporting window: 7d, 30d or 90d
        #[arg(short, long, default_value = "30d")]
        range: String,

        /// Also ask a natural-language question about project health
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Talk to the project assistant
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Start the web dashboard
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "BEARING_PORT", default_value = "3000")]
        port: u16,

        /// Host address to bind to (use 0.0.0.0 for network access)
        #[arg(long, env = "BEARING_HOST", default_value = "127.0.0.1")]
        host: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks
    List {
        /// Filter by status (TODO, IN_PROGRESS, DONE or all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// Case-insensitive search over title and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a new task
    Create {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority (LOW, MEDIUM, HIGH)
        #[arg(short, long)]
        priority: Option<String>,

        /// Assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },

    /// Move a task to its next status (TODO -> IN_PROGRESS -> DONE)
    Advance {
        /// Task ID
        id: String,
    },

    /// Update task fields
    Update {
        /// Task ID
        id: String,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<String>,

        /// New assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// New due date
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// Risk subcommands
#[derive(Subcommand, Debug)]
pub enum RiskCommands {
    /// List risk alerts (active only unless --all)
    List {
        /// Filter by severity (HIGH, MEDIUM, LOW or all)
        #[arg(long)]
        severity: Option<String>,

        /// Filter by type (e.g. SCHEDULE_DELAY or all)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Search title, description and project
        #[arg(short, long)]
        search: Option<String>,

        /// Include resolved alerts
        #[arg(long)]
        all: bool,
    },

    /// Mark a risk alert resolved
    Resolve {
        /// Alert ID
        id: String,
    },

    /// Generate a risk assessment report
    Report {
        /// Project ID
        #[arg(long, default_value = crate::api::risks::ALL_PROJECTS)]
        project: String,
    },
}

/// Assistant subcommands
#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Ask one question
    Ask {
        /// The message to send
        message: String,

        /// Conversation context
        #[arg(long, default_value = crate::api::chat::DEFAULT_CONTEXT)]
        context: String,

        /// Continue an earlier conversation
        #[arg(long)]
        conversation: Option<String>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved settings and where each came from
    Show,

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::parse_from([
            "bearing",
            "task",
            "list",
            "-H",
            "--base-url",
            "http://localhost:5001/v1",
            "--fallback",
            "off",
            "--timeout",
            "5",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("http://localhost:5001/v1"));
        assert_eq!(overrides.fallback, Some(FallbackPolicy::Off));
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(overrides.output_format, Some(OutputFormat::Human));
        assert!(matches!(
            cli.command,
            Commands::Task {
                command: TaskCommands::List { .. }
            }
        ));
    }

    #[test]
    fn test_bad_fallback_is_rejected() {
        assert!(Cli::try_parse_from(["bearing", "--fallback", "maybe", "dashboard"]).is_err());
    }

    #[test]
    fn test_report_defaults() {
        let cli = Cli::parse_from(["bearing", "report"]);
        match cli.command {
            Commands::Report { range, query } => {
                assert_eq!(range, "30d");
                assert!(query.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
