use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A partner link declaration as it appears in a process document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartnerLinkDecl {
    pub name: String,
    pub link_type: Option<String>,
    pub my_role: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkDecision {
    Used,
    InboundRole,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkOutcome {
    pub document: String,
    pub partner_link: String,
    pub decision: LinkDecision,
}

/// Paths that could not be fully processed, with the first reason seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: BTreeMap<String, String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reason for a path. The earliest reason wins; later
    /// entries for the same path are dropped.
    pub fn record(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.entries.entry(path.into()).or_insert_with(|| reason.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub documents_seen: usize,
    pub documents_changed: usize,
    pub removed_links: usize,
    pub decisions: Vec<LinkOutcome>,
    pub diagnostics: Diagnostics,
}

impl SweepReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            documents_seen: 0,
            documents_changed: 0,
            removed_links: 0,
            decisions: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }
}

impl Default for SweepReport {
    fn default() -> Self {
        Self::new()
    }
}
