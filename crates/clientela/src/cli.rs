//! Clap derive structures for the `clientela` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use clientela_core::ViewMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clientela -- administer the clientes registry from the command line
#[derive(Debug, Parser)]
#[command(
    name = "clientela",
    version,
    about = "Manage customer records in the clientes registry",
    long_about = "Browse, search, validate, and edit customer records held by a\n\
        clientes registry service. Records can be listed plain, annotated\n\
        with the service's validation pass, or narrowed to flagged ones.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service profile to use
    #[arg(long, short = 'p', env = "CLIENTELA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service URL (overrides profile)
    #[arg(long, short = 'u', env = "CLIENTELA_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIENTELA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "CLIENTELA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CLIENTELA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Records per page (overrides profile)
    #[arg(long, env = "CLIENTELA_PAGE_SIZE", global = true)]
    pub page_size: Option<usize>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one key per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Which record set to browse.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum View {
    /// Every record, no annotations
    #[default]
    All,
    /// Every record, annotated by the service's validation pass
    Validation,
    /// Only records with validation errors
    Errors,
}

impl From<View> for ViewMode {
    fn from(view: View) -> Self {
        match view {
            View::All => Self::All,
            View::Validation => Self::WithValidation,
            View::Errors => Self::ErrorsOnly,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List records, one page at a time
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search records by free text
    #[command(alias = "find")]
    Search(SearchArgs),

    /// Create a record
    Create(CreateArgs),

    /// Update an existing record (the key cannot change)
    #[command(alias = "edit")]
    Update(UpdateArgs),

    /// Delete a record
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Validate field values locally without contacting the service
    Check(CheckArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Browse Arguments ─────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Record set to browse
    #[arg(long, value_enum, default_value = "all")]
    pub view: View,

    /// Page to show (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub browse: BrowseArgs,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to search for (name, key, email, or phone)
    pub term: String,

    #[command(flatten)]
    pub browse: BrowseArgs,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RECORD MUTATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Record key (digits only)
    #[arg(long)]
    pub key: String,

    /// Contact name
    #[arg(long)]
    pub name: String,

    /// Contact email
    #[arg(long)]
    pub email: String,

    /// Contact phone (10 digits including area code)
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("changes").required(true).multiple(true)))]
pub struct UpdateArgs {
    /// Key of the record to update
    pub key: String,

    /// New contact name
    #[arg(long, group = "changes")]
    pub name: Option<String>,

    /// New contact email
    #[arg(long, group = "changes")]
    pub email: Option<String>,

    /// New contact phone
    #[arg(long, group = "changes")]
    pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Key of the record to delete
    pub key: String,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("fields").required(true).multiple(true)))]
pub struct CheckArgs {
    /// Record key
    #[arg(long, group = "fields")]
    pub key: Option<String>,

    /// Contact name
    #[arg(long, group = "fields")]
    pub name: Option<String>,

    /// Contact email
    #[arg(long, group = "fields")]
    pub email: Option<String>,

    /// Contact phone
    #[arg(long, group = "fields")]
    pub phone: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current resolved configuration
    Show,

    /// List configured profiles (the default is marked with *)
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Create or extend the config file with a profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Service URL for the profile (prompted for when omitted)
        #[arg(long = "service-url")]
        service_url: Option<String>,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
