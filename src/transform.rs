//! Conversions between board export payloads and portable documents.
//!
//! All functions here are pure; network effects of an import live in
//! [`crate::import`].

use crate::protocol::ExportPayload;
use chrono::{DateTime, Local};
use eyre::{Context, Result};
use std::collections::HashSet;

/// Distinct category names in first-occurrence order.
///
/// Categories are compared by name only, so two categories with different
/// ids but the same name collapse into one.
pub fn distinct_categories(payload: &ExportPayload) -> Vec<&str> {
    let mut seen = HashSet::new();
    payload
        .notes
        .iter()
        .map(|note| note.category.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Render a payload as a Markdown document.
///
/// One `##` section per distinct category, notes as bullets in payload order.
pub fn to_markdown(payload: &ExportPayload) -> String {
    let mut out = format!("# {}\n\n", payload.board_name);

    for category in distinct_categories(payload) {
        out.push_str(&format!("## {}\n", category));
        for note in payload.notes.iter().filter(|n| n.category == category) {
            out.push_str(&format!("- {}\n", note.description));
        }
        out.push('\n');
    }

    out
}

/// Serialize a payload as the portable JSON document (2-space indent).
pub fn to_json(payload: &ExportPayload) -> Result<String> {
    serde_json::to_string_pretty(payload).context("Failed to serialize export payload")
}

/// One category of an import, with the descriptions of its notes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPlan {
    pub name: String,
    pub notes: Vec<String>,
}

/// Ordered reconstruction steps for an imported board.
///
/// Carries no ids: every id is assigned by the target server
/// while the plan runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub board_name: String,
    pub categories: Vec<CategoryPlan>,
}

impl ImportPlan {
    /// Build the plan for a payload.
    pub fn from_payload(payload: &ExportPayload) -> Self {
        let categories = distinct_categories(payload)
            .into_iter()
            .map(|name| CategoryPlan {
                name: name.to_string(),
                notes: payload
                    .notes
                    .iter()
                    .filter(|n| n.category == name)
                    .map(|n| n.description.clone())
                    .collect(),
            })
            .collect();

        Self {
            board_name: payload.board_name.clone(),
            categories,
        }
    }

    /// Total number of notes the plan will create.
    pub fn note_count(&self) -> usize {
        self.categories.iter().map(|c| c.notes.len()).sum()
    }
}

/// Parse a JSON document produced by [`to_json`].
pub fn parse_document(raw: &str) -> Result<ExportPayload> {
    serde_json::from_str(raw).context("Failed to parse import document")
}

/// Default file name for a JSON export.
pub fn export_filename(board_name: &str, at: DateTime<Local>) -> String {
    format!("export_{}_{}.json", at.format("%Y_%m_%d_%H_%M_%S"), board_name)
}
