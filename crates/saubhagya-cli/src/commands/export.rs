//! `saubhagya-audit export` - write events as JSON or CSV.

use anyhow::{Context, Result};
use saubhagya_audit::{AuditFilter, AuditLogger, ExportFormat};
use std::fs;
use std::path::Path;

/// Export matching events. With `output`, writes the file and returns `None`;
/// otherwise returns the serialized text for stdout.
pub fn run(
    logger: &AuditLogger,
    filter: Option<&AuditFilter>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<Option<String>> {
    let body = logger.export_events(filter, format)?;

    let Some(path) = output else {
        return Ok(Some(body));
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, &body).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), %format, bytes = body.len(), "exported audit events");

    Ok(None)
}
