use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::Value;
use std::io;

use crate::gateway::Resource;

#[derive(Parser)]
#[command(name = "schooldesk")]
#[command(about = "Administrative client for the school management backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records of a resource, one page at a time
    Ls {
        /// Resource (students, teachers, classrooms, attendance, fee-posts,
        /// fee-receipts, notifications, gallery, events)
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Offset of the first record to fetch
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Records per page (default: page_size from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Number of pages to fetch
        #[arg(long, default_value = "1", conflicts_with = "all")]
        pages: usize,

        /// Fetch pages until the list is exhausted
        #[arg(long)]
        all: bool,

        /// Filter as key=value, can be repeated
        #[arg(long = "filter", value_parser = parse_pair, action = clap::ArgAction::Append)]
        filters: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a single record
    #[command(visible_alias = "s")]
    Show {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record
    #[command(visible_alias = "c")]
    Create {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Field as key=value; JSON literals are accepted as values
        #[arg(long = "field", short = 'f', value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a record
    Update {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Field as key=value; JSON literals are accepted as values
        #[arg(long = "field", short = 'f', value_parser = parse_field, required = true)]
        fields: Vec<(String, Value)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    Rm {
        #[arg(value_parser = parse_resource)]
        resource: Resource,

        /// Record ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Send a notification to one recipient or to everyone
    Notify {
        /// Recipient ID
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        to: Option<String>,

        /// Broadcast to everyone
        #[arg(long)]
        all: bool,

        /// Notification title
        #[arg(long)]
        title: String,

        /// Notification body
        #[arg(long)]
        message: String,
    },

    /// Search a resource on the server
    Search {
        /// Search text (at least search.min_query_len characters)
        query: String,

        #[arg(long, short = 'r', default_value = "students", value_parser = parse_resource)]
        resource: Resource,

        /// Maximum number of results (default: search.limit from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a bearer token for later commands
    Login {
        /// Bearer token issued by the backend
        token: String,
    },

    /// Forget the stored bearer token
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, page_size, request_timeout, search.*, toasts.*)
        key: String,
        /// Value to set
        value: String,
    },
}

impl Commands {
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            LsOptions, cmd_config_set, cmd_config_show, cmd_create, cmd_login, cmd_logout, cmd_ls,
            cmd_notify, cmd_rm, cmd_search, cmd_show, cmd_update,
        };
        use crate::gateway::Recipient;

        match self {
            Commands::Ls {
                resource,
                offset,
                limit,
                pages,
                all,
                filters,
                json,
            } => {
                cmd_ls(LsOptions {
                    resource,
                    offset,
                    limit,
                    pages: if all { None } else { Some(pages) },
                    filters,
                    json,
                })
                .await
            }
            Commands::Show { resource, id, json } => cmd_show(resource, &id, json).await,
            Commands::Create {
                resource,
                fields,
                json,
            } => cmd_create(resource, fields.into_iter().collect(), json).await,
            Commands::Update {
                resource,
                id,
                fields,
                json,
            } => cmd_update(resource, &id, fields.into_iter().collect(), json).await,
            Commands::Rm { resource, id, yes } => cmd_rm(resource, &id, yes).await,
            Commands::Notify {
                to,
                all: _,
                title,
                message,
            } => {
                let recipient = match to {
                    Some(id) => Recipient::One(id),
                    None => Recipient::All,
                };
                cmd_notify(recipient, &title, &message).await
            }
            Commands::Search {
                query,
                resource,
                limit,
                json,
            } => cmd_search(resource, &query, limit, json).await,
            Commands::Login { token } => cmd_login(&token),
            Commands::Logout => cmd_logout(),
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse().map_err(|_| {
        let valid: Vec<&str> = Resource::ALL.iter().map(|r| r.path()).collect();
        format!("Invalid resource. Must be one of: {}", valid.join(", "))
    })
}

/// Parse `key=value` where the value is kept as text
fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse `key=value` where the value may be a JSON literal (number, bool,
/// null, array, object or quoted string); anything else is a plain string.
///
/// Quoting forces a string: `code="12"` stores `12` as text.
fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = parse_pair(s)?;
    let value = serde_json::from_str(&raw).unwrap_or_else(|_| Value::String(raw));
    Ok((key, value))
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "schooldesk", &mut io::stdout());
}
