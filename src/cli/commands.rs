//! CLI commands and argument parsing

use crate::types::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Workflow connectors for Jobber and Reform
#[derive(Parser, Debug)]
#[command(name = "flowlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Jobber field-service management
    #[command(subcommand)]
    Jobber(JobberCommand),

    /// Reform document extraction
    #[command(subcommand)]
    Reform(ReformCommand),

    /// List built-in connectors
    List,
}

/// Jobber subcommands
#[derive(Subcommand, Debug)]
pub enum JobberCommand {
    /// Options for the client picker
    Clients,

    /// Options for the property picker
    Properties {
        /// Only properties of this client
        #[arg(long)]
        client_id: Option<String>,
    },

    /// List clients
    ListClients {
        /// Stop once this many clients are fetched (rounded up to a page)
        #[arg(long, default_value = "100")]
        max: usize,
    },

    /// List properties
    ListProperties {
        /// Only properties of this client
        #[arg(long)]
        client_id: Option<String>,

        /// Stop once this many properties are fetched (rounded up to a page)
        #[arg(long, default_value = "100")]
        max: usize,
    },

    /// Run a paginated GraphQL query
    Query(QueryArgs),
}

/// Arguments of `jobber query`
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text; must accept `$after` and `$first`
    #[arg(long, conflicts_with = "query_file", required_unless_present = "query_file")]
    pub query: Option<String>,

    /// File holding the query text
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// Field of the response `data` holding the connection
    #[arg(long)]
    pub resource_key: String,

    /// Stop once this many nodes are fetched (rounded up to a page)
    #[arg(long, default_value = "100")]
    pub max: usize,

    /// Extra variables as a JSON object
    #[arg(long)]
    pub args_json: Option<String>,
}

/// Reform subcommands
#[derive(Subcommand, Debug)]
pub enum ReformCommand {
    /// Extract fields from a document
    Extract {
        /// Local path or http(s) URL of the document
        #[arg(long)]
        document: String,

        /// Field to extract: a name or a JSON definition (repeatable)
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },

    /// Extract fields from text
    ExtractText {
        /// Text to extract from
        #[arg(long)]
        text: String,

        /// Field to extract: a name or a JSON definition (repeatable)
        #[arg(long = "field", required = true)]
        fields: Vec<String>,
    },
}
