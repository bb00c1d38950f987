//! Argument parsing and command execution for the `flightdeck` binary.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightdeck_model::{Package, PackageKind, PrimaryKey, Syncable};
use flightdeck_sync::{PackageFilter, ServerSync, ServerSyncConfig, SyncChannel};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "flightdeck")]
#[command(about = "Browse and manage Flightdeck add-ons and libraries")]
pub struct Args {
    /// Server base URL (overrides the config file)
    #[arg(long, env = "FLIGHTDECK_URL")]
    pub url: Option<String>,

    /// Bearer token for authenticated requests
    #[arg(long, env = "FLIGHTDECK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// JSON file holding server settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address packages by `id_number` instead of `id`
    #[arg(long)]
    pub by_id_number: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List packages, optionally narrowed by type and author
    List {
        /// `a`/`addon` or `l`/`library`
        #[arg(long = "type")]
        kind: Option<PackageKind>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Print one package as JSON
    Show { id: i64 },
    /// Create a new add-on or library
    Create {
        #[arg(long = "type")]
        kind: PackageKind,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change a package's full name
    Rename { id: i64, full_name: String },
    /// Delete a package
    Delete { id: i64 },
}

impl Args {
    /// Server settings: the config file (or defaults), then flag overrides.
    pub fn server_config(&self) -> Result<ServerSyncConfig> {
        let mut config = match &self.config {
            Some(path) => ServerSyncConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ServerSyncConfig::default(),
        };

        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        Ok(config)
    }

    pub fn primary_key(&self) -> PrimaryKey {
        if self.by_id_number {
            PrimaryKey::IdNumber
        } else {
            PrimaryKey::Id
        }
    }
}

/// Runs the parsed command, writing its output to `out`.
pub async fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let config = args.server_config()?;
    info!("Using server {}", config.base_url);

    let driver = ServerSync::new(config).context("failed to set up HTTP driver")?;
    let key = args.primary_key();
    let packages =
        SyncChannel::<Package>::default_channel(Arc::new(driver))?.with_primary_key(key);

    match &args.command {
        Command::List { kind, author } => {
            let filter = PackageFilter {
                kind: *kind,
                author: author.clone(),
            };
            let found = packages
                .list_filtered(&filter)
                .await
                .context("failed to list packages")?;
            debug!("{} packages matched", found.len());

            for package in &found {
                writeln!(out, "{}", summary_line(package, key))?;
            }
        }
        Command::Show { id } => {
            let package = packages
                .fetch(*id)
                .await
                .with_context(|| format!("failed to fetch package {id}"))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&package)?)?;
        }
        Command::Create {
            kind,
            full_name,
            description,
        } => {
            let mut package = Package::new(*kind, full_name.clone());
            package.description = description.clone();
            packages
                .save(&mut package)
                .await
                .with_context(|| format!("failed to create {kind}"))?;
            writeln!(out, "created {}", summary_line(&package, key))?;
        }
        Command::Rename { id, full_name } => {
            let mut package = packages
                .fetch(*id)
                .await
                .with_context(|| format!("failed to fetch package {id}"))?;
            package.full_name = Some(full_name.clone());
            packages
                .update(*id, &mut package)
                .await
                .with_context(|| format!("failed to rename package {id}"))?;
            writeln!(out, "renamed {}", summary_line(&package, key))?;
        }
        Command::Delete { id } => {
            let mut package = Package::default();
            package.set(key.field_name(), Some((*id).into()))?;
            packages
                .destroy(&package)
                .await
                .with_context(|| format!("failed to delete package {id}"))?;
            writeln!(out, "deleted {id}")?;
        }
    }

    Ok(())
}

/// One-line listing form: the id under `key`, type and full name.
///
/// The id printed is the one `show`, `rename` and `delete` accept under the same key.
pub fn summary_line(package: &Package, key: PrimaryKey) -> String {
    let id = package
        .primary_key(key)
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let kind = package
        .type_name()
        .or(package.package_type.as_deref())
        .unwrap_or("?");
    let version = package
        .version_name
        .as_deref()
        .map(|v| format!(" ({v})"))
        .unwrap_or_default();

    format!("{id:>6}  {kind:<7}  {package}{version}")
}
