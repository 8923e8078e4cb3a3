use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use chrono::{DateTime, Local};
use regex::Regex;

use super::{Request, Response};
use crate::config::Config;
use crate::log::{FilterParams, apply_filters, segment};
use crate::render::{self, LogEntry};

// Only flat, plainly named .txt files are served. Anything else is
// rejected before the filesystem is touched.
static LOG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)[a-z0-9_-]*\.txt$").unwrap());

/// Route a parsed request to a response. Pure apart from reading the
/// log directory; safe to call from any connection task.
pub fn handle(request: &Request, config: &Config) -> Response {
    if request.method != "GET" {
        return Response::text(405, "method not allowed");
    }
    match request.path.as_str() {
        "/" => index(config),
        path => {
            let name = path.strip_prefix('/').unwrap_or(path);
            if !LOG_NAME_RE.is_match(name) {
                tracing::warn!(name, "rejected log name");
                return Response::text(401, "invalid name");
            }
            view(name, request, config)
        }
    }
}

fn index(config: &Config) -> Response {
    match list_logs(&config.log_dir) {
        Ok(entries) => Response::html(render::index_page(&entries)),
        Err(err) => {
            tracing::error!(error = %err, dir = %config.log_dir.display(), "failed to list logs");
            Response::text(500, "failed to list logs")
        }
    }
}

fn list_logs(dir: &Path) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".txt") {
            continue;
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        entries.push(LogEntry {
            name,
            size: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Local>::from),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn view(name: &str, request: &Request, config: &Config) -> Response {
    let path = config.log_dir.join(name);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Response::text(404, "no such log");
        }
        Err(err) => {
            tracing::error!(error = %err, path = %path.display(), "failed to read log");
            return Response::text(500, "failed to read log");
        }
    };

    let params = FilterParams::from_query(&request.query);
    let batches = apply_filters(segment(&text), &params);
    tracing::debug!(
        name,
        batches = batches.len(),
        filtered = !params.is_noop(),
        "rendered log view"
    );

    if request.query.get("format").is_some_and(|f| f == "json") {
        match render::batches_json(&batches) {
            Ok(body) => Response::json(body),
            Err(err) => {
                tracing::error!(error = %err, name, "failed to serialize batches");
                Response::text(500, "failed to serialize batches")
            }
        }
    } else {
        Response::html(render::log_page(&batches))
    }
}
