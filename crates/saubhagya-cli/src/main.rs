use clap::{Parser, Subcommand};
use saubhagya_audit::{AuditLogger, EventCategory, ExportFormat, Outcome, Severity};
use saubhagya_core::AuditConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::FilterArgs;

#[derive(Parser, Debug)]
#[command(name = "saubhagya-audit", version, about = "Inspect and manage Saubhagya audit events")]
struct Cli {
    /// Path to the audit config file (default: saubhagya-audit.yaml)
    #[arg(long, global = true, env = "SAUBHAGYA_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record one audit event using the identity from SAUBHAGYA_* variables.
    Log {
        #[arg(long)]
        action: String,

        #[arg(long)]
        resource: String,

        #[arg(long = "resource-id")]
        resource_id: Option<String>,

        #[arg(long, default_value = "low")]
        severity: Severity,

        #[arg(long, default_value = "user_action")]
        category: EventCategory,

        #[arg(long, default_value = "success")]
        outcome: Outcome,

        /// Detail entry as key=value (repeatable). JSON values keep their type.
        #[arg(long = "detail")]
        details: Vec<String>,
    },

    /// List matching events, newest first.
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show at most this many events
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print counts by category, severity, outcome, user and action.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Export matching events.
    Export {
        /// json | csv
        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List authorization and high/critical severity events.
    Security {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete every stored event and the persisted slot.
    Clear {
        /// Confirm the irreversible clear
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so exports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AuditConfig::load(cli.config.as_deref())?;
    let logger = AuditLogger::new(config).await?;

    match cli.cmd {
        Command::Log {
            action,
            resource,
            resource_id,
            severity,
            category,
            outcome,
            details,
        } => {
            let request = commands::log::LogRequest {
                action,
                resource,
                resource_id,
                severity,
                category,
                outcome,
                details,
            };
            let id = commands::log::run(&logger, request).await?;
            println!("{}", id);
        }

        Command::List { filter, limit } => {
            let out = commands::list::list(&logger, filter.to_filter().as_ref(), limit);
            if !out.is_empty() {
                println!("{}", out);
            }
        }

        Command::Summary { filter } => {
            println!("{}", commands::list::summary(&logger, filter.to_filter().as_ref())?);
        }

        Command::Export {
            format,
            output,
            filter,
        } => {
            let printed = commands::export::run(
                &logger,
                filter.to_filter().as_ref(),
                format,
                output.as_deref(),
            )?;
            if let Some(body) = printed {
                println!("{}", body);
            }
        }

        Command::Security { limit } => {
            let out = commands::list::security(&logger, limit);
            if !out.is_empty() {
                println!("{}", out);
            }
        }

        Command::Clear { yes } => {
            let cleared = commands::clear::run(&logger, yes).await?;
            println!("✔ Cleared {} audit events", cleared);
        }
    }

    Ok(())
}
