//! CLI entry point for liminaldb.

pub mod auth;
pub mod prompts;
pub mod service;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{CliOverrides, LiminalConfig};
use crate::error::Result;
use crate::output::format_json;

/// LiminalDB CLI
#[derive(Parser, Debug)]
#[command(
    name = "liminaldb",
    version,
    about = "CLI for LiminalDB — agent-ergonomic prompt and skill management"
)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override API base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Show quick reference for agents
    #[arg(long)]
    pub quickstart: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate via OAuth device flow (opens browser)
    Login(LoginArgs),
    /// Clear stored authentication credentials
    Logout,
    /// Show current authenticated user
    Whoami,
    /// Check LiminalDB service status
    Health(HealthArgs),
    /// Prompt management
    Prompts(PromptsArgs),
    /// Tag catalog
    Tags(TagsArgs),
    /// Theme preferences
    Prefs(PrefsArgs),
}

/// Arguments for `liminaldb login`.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// WorkOS client ID (default: from WORKOS_CLIENT_ID env)
    #[arg(long)]
    pub client_id: Option<String>,
}

/// Arguments for `liminaldb health`.
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Use authenticated health check (includes user info)
    #[arg(long)]
    pub auth: bool,
}

#[derive(Args, Debug)]
pub struct PromptsArgs {
    #[command(subcommand)]
    pub command: PromptCommands,
}

#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// List prompts (ranked by usage, recency, favorites)
    List(ListArgs),
    /// Full-text search prompts
    Search(SearchArgs),
    /// Get a prompt by slug
    Get(SlugArgs),
    /// Save one or more prompts
    Save(SaveArgs),
    /// Update a prompt by slug (partial updates supported)
    Update(UpdateArgs),
    /// Delete a prompt by slug
    Delete(SlugArgs),
    /// Track prompt usage (increments usage count)
    Use(SlugArgs),
    /// Export all prompts as YAML
    Export(ExportArgs),
    /// Import prompts from YAML file
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of prompts to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Comma-separated tag filter
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Comma-separated tag filter
    #[arg(long)]
    pub tags: Option<String>,

    /// Maximum results
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SlugArgs {
    /// Prompt slug
    pub slug: String,
}

/// Input for `prompts save`: stdin, a JSON file, or inline fields.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Read prompt JSON from stdin
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,

    /// Read prompt JSON from file
    #[arg(short, long)]
    pub file: Option<std::path::PathBuf>,

    /// Prompt slug (inline mode)
    #[arg(long)]
    pub slug: Option<String>,

    /// Prompt name (inline mode)
    #[arg(long)]
    pub name: Option<String>,

    /// Prompt description (inline mode, defaults to the name)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Prompt content (inline mode)
    #[arg(short, long)]
    pub content: Option<String>,

    /// Comma-separated tags (inline mode)
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Prompt slug to update
    pub slug: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Comma-separated tags (replaces existing)
    #[arg(long)]
    pub tags: Option<String>,

    /// Pin the prompt
    #[arg(long, conflicts_with = "unpin")]
    pub pin: bool,

    /// Unpin the prompt
    #[arg(long)]
    pub unpin: bool,

    /// Favorite the prompt
    #[arg(long, conflicts_with = "unfavorite")]
    pub favorite: bool,

    /// Unfavorite the prompt
    #[arg(long)]
    pub unfavorite: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to file instead of stdout
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to YAML file
    pub file: std::path::PathBuf,

    /// Preview import without applying changes
    #[arg(long)]
    pub preview: bool,

    /// Comma-separated slugs to import (subset of file)
    #[arg(long)]
    pub slugs: Option<String>,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagCommands,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List all available tags
    List,
}

#[derive(Args, Debug)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Get theme preference for a surface
    Get {
        /// Surface: webapp, chatgpt, or vscode (default: webapp)
        #[arg(long)]
        surface: Option<String>,
    },
    /// Set theme preference for a surface
    Set {
        /// Surface: webapp, chatgpt, or vscode
        #[arg(long)]
        surface: String,

        /// Theme: light-1, light-2, light-3, dark-1, dark-2, dark-3
        #[arg(long)]
        theme: String,
    },
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            json: self.json,
            verbose: self.verbose,
            url: self.url.clone(),
        }
    }
}

/// Print `data` as JSON, or through `human` otherwise.
pub(crate) fn emit<T, F>(config: &LiminalConfig, data: &T, human: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if config.is_json() {
        println!("{}", format_json(data)?);
    } else {
        println!("{}", human(data));
    }
    Ok(())
}
