//! Project document codec.
//!
//! A project file is a single pretty-printed JSON document:
//!
//! ```json
//! { "version": "1.0", "timestamp": "…", "nodes": [ … ], "links": [ … ] }
//! ```
//!
//! Decoding is all-or-nothing. Anything short of a well-formed document
//! with a valid graph yields [`CoreError::MalformedDocument`], and the
//! caller's in-memory topology is never touched.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Link, Node, Topology};

/// Document format version written on save.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Media type for exported documents.
pub const CONTENT_TYPE: &str = "application/json";

/// On-disk representation of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub version: String,
    /// ISO-8601 save time. Informational only.
    pub timestamp: String,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl ProjectDocument {
    pub fn new(topology: &Topology, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_owned(),
            timestamp: saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            nodes: topology.nodes.clone(),
            links: topology.links.clone(),
        }
    }

    pub fn into_topology(self) -> Topology {
        Topology::new(self.nodes, self.links)
    }
}

/// Serialize `topology` stamped with `saved_at`. A graph that would not
/// decode again (say, a node at `NaN`) is refused before anything is written.
pub fn encode(topology: &Topology, saved_at: DateTime<Utc>) -> Result<String, CoreError> {
    topology.validate()?;
    let doc = ProjectDocument::new(topology, saved_at);
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse and validate a project document.
pub fn decode(text: &str) -> Result<Topology, CoreError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CoreError::malformed(format!("not valid JSON: {e}")))?;
    let Value::Object(mut root) = value else {
        return Err(CoreError::malformed("document root is not an object"));
    };

    let nodes = take_array(&mut root, "nodes")?;
    let links = take_array(&mut root, "links")?;

    match root.get("version").and_then(Value::as_str) {
        Some(DOCUMENT_VERSION) => {}
        other => debug!(version = ?other, "unexpected document version, loading anyway"),
    }

    let nodes: Vec<Node> = serde_json::from_value(nodes)
        .map_err(|e| CoreError::malformed(format!("invalid node: {e}")))?;
    let links: Vec<Link> = serde_json::from_value(links)
        .map_err(|e| CoreError::malformed(format!("invalid link: {e}")))?;

    let topology = Topology::new(nodes, links);
    topology.validate()?;
    Ok(topology)
}

fn take_array(root: &mut serde_json::Map<String, Value>, field: &str) -> Result<Value, CoreError> {
    match root.remove(field) {
        Some(v @ Value::Array(_)) => Ok(v),
        Some(_) => Err(CoreError::malformed(format!("`{field}` is not an array"))),
        None => Err(CoreError::malformed(format!("missing `{field}` array"))),
    }
}

/// Save file name for a given day: `network-project-YYYY-MM-DD.json`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("network-project-{}.json", date.format("%Y-%m-%d"))
}

/// Encode and write `topology` to `path`.
pub fn save_to_path(path: &Path, topology: &Topology) -> Result<(), CoreError> {
    let text = encode(topology, Utc::now())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    info!(
        path = %path.display(),
        nodes = topology.nodes.len(),
        links = topology.links.len(),
        "project saved"
    );
    Ok(())
}

/// Read and decode the document at `path`.
pub fn load_from_path(path: &Path) -> Result<Topology, CoreError> {
    let text = std::fs::read_to_string(path)?;
    let topology = decode(&text).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "rejected project document");
    })?;
    info!(
        path = %path.display(),
        nodes = topology.nodes.len(),
        links = topology.links.len(),
        "project loaded"
    );
    Ok(topology)
}
