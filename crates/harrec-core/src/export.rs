//! Export sink boundary: serialize an archive and hand it off under a file
//! name derived from the page host.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::har::Archive;

/// File name used when the page URL has no host.
const FALLBACK_FILE_NAME: &str = "capture.har";

/// Serializes an archive to JSON.
pub fn to_json(archive: &Archive, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(archive)
    } else {
        serde_json::to_string(archive)
    };
    json.context("serialize HAR archive")
}

/// `<host>.har` for the page URL (port included, like `URL.host`).
///
/// # Examples
///
/// - `suggested_file_name("https://example.com/a?b")` → `"example.com.har"`
/// - `suggested_file_name("http://localhost:8080/")` → `"localhost:8080.har"`
pub fn suggested_file_name(page_url: &str) -> String {
    let Ok(url) = Url::parse(page_url) else {
        return FALLBACK_FILE_NAME.to_string();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}.har"),
        (Some(host), None) if !host.is_empty() => format!("{host}.har"),
        _ => FALLBACK_FILE_NAME.to_string(),
    }
}

/// Receives a finished, serialized archive.
pub trait ExportSink {
    fn export(&mut self, serialized: &str, file_name: &str) -> Result<()>;
}

/// Writes archives into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DirectorySink {
    fn export(&mut self, serialized: &str, file_name: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        fs::write(&path, serialized).with_context(|| format!("write {}", path.display()))?;
        tracing::info!(bytes = serialized.len(), "wrote archive to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Serializes `archive` and exports it under the name suggested by `page_url`.
pub fn export_archive(
    sink: &mut dyn ExportSink,
    archive: &Archive,
    page_url: Option<&str>,
    pretty: bool,
) -> Result<String> {
    let file_name = page_url
        .map(suggested_file_name)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    let json = to_json(archive, pretty)?;
    sink.export(&json, &file_name)?;
    Ok(file_name)
}
