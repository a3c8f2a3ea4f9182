//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, JobberCommand, QueryArgs, ReformCommand};
use crate::config::Settings;
use crate::connectors::{self, reform, DocumentSource, JobberApp, ReformApp};
use crate::error::{Error, Result};
use crate::pagination::PaginationRequest;
use crate::types::{JsonValue, Variables};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Jobber(command) => {
                let app = self.load_settings()?.jobber_app()?;
                self.jobber(&app, command).await
            }
            Commands::Reform(command) => {
                let app = self.load_settings()?.reform_app()?;
                self.reform(&app, command).await
            }
            Commands::List => self.print(&connectors::list_builtin()),
        }
    }

    /// Settings from `-C`, or from the environment alone
    fn load_settings(&self) -> Result<Settings> {
        match &self.cli.config {
            Some(path) => Settings::load(path),
            None => Ok(Settings::from_env()),
        }
    }

    async fn jobber(&self, app: &JobberApp, command: &JobberCommand) -> Result<()> {
        match command {
            JobberCommand::Clients => self.print(&app.client_options().await?),
            JobberCommand::Properties { client_id } => {
                self.print(&app.property_options(client_id.as_deref()).await?)
            }
            JobberCommand::ListClients { max } => {
                let start = Instant::now();
                let clients = app.list_clients(*max).await?;
                info!("Fetched {} clients in {:?}", clients.len(), start.elapsed());
                self.print(&clients)
            }
            JobberCommand::ListProperties { client_id, max } => {
                let start = Instant::now();
                let properties = app.list_properties(client_id.as_deref(), *max).await?;
                info!(
                    "Fetched {} properties in {:?}",
                    properties.len(),
                    start.elapsed()
                );
                self.print(&properties)
            }
            JobberCommand::Query(args) => {
                let request = build_query_request(args)?;
                let start = Instant::now();
                let nodes: Vec<JsonValue> = app.get_paginated_resources(request).await?;
                info!(
                    "Fetched {} {} in {:?}",
                    nodes.len(),
                    args.resource_key,
                    start.elapsed()
                );
                self.print(&nodes)
            }
        }
    }

    async fn reform(&self, app: &ReformApp, command: &ReformCommand) -> Result<()> {
        match command {
            ReformCommand::Extract { document, fields } => {
                let source: DocumentSource = document.parse()?;
                let fields = reform::parse_fields(fields)?;
                let result = app.extract_data_from_document(&source, &fields).await?;
                info!("Extracted data from {}", source.file_name());
                self.print(&result)
            }
            ReformCommand::ExtractText { text, fields } => {
                let fields = reform::parse_fields(fields)?;
                let result = app.extract_data_from_text(text, &fields).await?;
                self.print(&result)
            }
        }
    }

    /// Write a result to stdout in the selected format
    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.cli.format.render(value)?);
        Ok(())
    }
}

/// Build the pagination request for `jobber query`
fn build_query_request(args: &QueryArgs) -> Result<PaginationRequest> {
    let query = match (&args.query, &args.query_file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => read_query_file(path)?,
        (None, None) => return Err(Error::missing_field("query")),
    };
    let vars = parse_args_json(args.args_json.as_deref())?;

    Ok(PaginationRequest::new(query, args.resource_key.clone(), args.max).with_args(vars))
}

fn read_query_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Extra query variables; must be a JSON object
fn parse_args_json(raw: Option<&str>) -> Result<Variables> {
    let Some(raw) = raw else {
        return Ok(Variables::new());
    };
    match serde_json::from_str::<JsonValue>(raw)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(Error::invalid_value(
            "args_json",
            format!("expected a JSON object, got {other}"),
        )),
    }
}
