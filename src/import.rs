//! Recreate a board on the server from an exported document.
//!
//! The pipeline is strictly ordered: create the board, then each category in
//! turn (capturing the id the server assigns), then that category's notes
//! tagged with the captured id. Ids embedded in the document are never sent.

use crate::client::{ApiClient, ApiError};
use crate::protocol::{NewBoard, NewCategory, NewNote};
use crate::transform::{ImportPlan, parse_document};
use crate::types::{Id, ValidationError, validate_new_note};
use eyre::Result;
use futures::future::join_all;

/// Errors that abort an import.
#[derive(Debug)]
pub enum ImportError {
    /// Document could not be parsed; nothing was created.
    Parse(String),
    /// Document failed validation; nothing was created.
    Validation(ValidationError),
    /// The target board could not be created; nothing was created.
    Board(ApiError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Parse(msg) => write!(f, "invalid import document: {}", msg),
            ImportError::Validation(e) => write!(f, "validation error: {}", e),
            ImportError::Board(e) => write!(f, "failed to create board: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

/// A step of the import that failed without aborting it.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportFailure {
    /// Category creation failed; its notes were skipped.
    Category { name: String, error: String },
    /// A single note could not be created.
    Note { category: String, description: String, error: String },
}

/// Outcome of a completed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Id of the newly created board
    pub board_id: Id,

    /// Category names mapped to the ids the server assigned, in creation order
    pub categories: Vec<(String, Id)>,

    /// Number of notes created
    pub notes_created: usize,

    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// True when every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse a JSON document and run its import plan.
pub async fn import_document(api: &dyn ApiClient, raw: &str) -> Result<ImportReport> {
    let payload = parse_document(raw).map_err(|e| eyre::eyre!(ImportError::Parse(format!("{:#}", e))))?;
    run_plan(api, &ImportPlan::from_payload(&payload)).await
}

/// Execute an import plan against the server.
///
/// Notes of one category are created concurrently and all of them are awaited
/// before the next category is created, so no failure goes unreported.
pub async fn run_plan(api: &dyn ApiClient, plan: &ImportPlan) -> Result<ImportReport> {
    if plan.board_name.is_empty() {
        return Err(eyre::eyre!(ImportError::Validation(ValidationError::EmptyBoardName)));
    }

    let board = api
        .create_board(&NewBoard {
            name: plan.board_name.clone(),
        })
        .await
        .map_err(|e| eyre::eyre!(ImportError::Board(e)))?;

    let board_id = board.board_id;
    log::info!("Importing '{}' into board {}", plan.board_name, board_id);

    let mut report = ImportReport {
        board_id,
        categories: Vec::new(),
        notes_created: 0,
        failures: Vec::new(),
    };

    for category in &plan.categories {
        let created = match api
            .create_category(&NewCategory {
                name: category.name.clone(),
                board_id,
            })
            .await
        {
            Ok(created) => created,
            Err(e) => {
                log::error!("Error adding category {}, err: {}", category.name, e);
                report.failures.push(ImportFailure::Category {
                    name: category.name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let category_id = created.category_id;
        log::debug!("Adding category {} with id {}", category.name, category_id);
        report.categories.push((category.name.clone(), category_id));

        let pending = category.notes.iter().map(|description| async move {
            if let Err(e) = validate_new_note(description, category_id) {
                return Err(e.to_string());
            }
            api.create_note(&NewNote {
                description: description.clone(),
                category: category_id,
                tags: Vec::new(),
                board_id,
            })
            .await
            .map_err(|e| e.to_string())
        });

        for (description, result) in category.notes.iter().zip(join_all(pending).await) {
            match result {
                Ok(_) => report.notes_created += 1,
                Err(error) => {
                    log::error!("Error creating note '{}': {}", description, error);
                    report.failures.push(ImportFailure::Note {
                        category: category.name.clone(),
                        description: description.clone(),
                        error,
                    });
                }
            }
        }
    }

    log::info!(
        "Imported {} categories and {} notes ({} failures)",
        report.categories.len(),
        report.notes_created,
        report.failures.len()
    );

    Ok(report)
}
