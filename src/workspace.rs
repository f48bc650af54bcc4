//! Board workspace: notes, categories and the selected category of one board.
//!
//! Every mutation is request-then-refetch. Local collections only change when
//! a fetch succeeds, and then they are replaced wholesale. A failed fetch
//! leaves the previous snapshot in place.

use crate::client::{ApiClient, ApiError};
use crate::import::{ImportReport, import_document};
use crate::protocol::{NewCategory, NewNote};
use crate::transform;
use crate::types::{Category, CategoryCreated, Id, Note, NoteCreated, Selection, ValidationError, validate_new_note};
use eyre::Result;
use std::sync::Arc;

/// Errors that can occur during workspace operations.
#[derive(Debug)]
pub enum WorkspaceError {
    /// Input rejected before any network call.
    Validation(ValidationError),
    /// The API call failed; local state is unchanged.
    Api(ApiError),
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkspaceError::Validation(e) => write!(f, "validation error: {}", e),
            WorkspaceError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WorkspaceError {}

fn invalid(e: ValidationError) -> eyre::Report {
    eyre::eyre!(WorkspaceError::Validation(e))
}

fn api_failure(e: ApiError) -> eyre::Report {
    eyre::eyre!(WorkspaceError::Api(e))
}

/// Which halves of a [`Workspace::load_board`] were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    pub notes: bool,
    pub categories: bool,
}

impl LoadOutcome {
    /// True when both fetches succeeded.
    pub fn is_complete(&self) -> bool {
        self.notes && self.categories
    }
}

/// In-memory view of one board, kept in sync with the server.
pub struct Workspace {
    api: Arc<dyn ApiClient>,
    board_id: Option<Id>,
    notes: Vec<Note>,
    categories: Vec<Category>,
    selection: Selection,
}

impl Workspace {
    /// Create an empty workspace talking through the given client.
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            board_id: None,
            notes: Vec::new(),
            categories: Vec::new(),
            selection: Selection::Unset,
        }
    }

    /// Board most recently loaded, at least partially, by [`Workspace::load_board`].
    pub fn board_id(&self) -> Option<Id> {
        self.board_id
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Categories in server order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Notes passing the current selection, recomputed on every call.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.notes.iter().filter(|n| self.selection.matches(n.category)).collect()
    }

    /// Name of a loaded category.
    pub fn category_name(&self, category_id: Id) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }

    /// Change the selection explicitly.
    ///
    /// A single category must be one of the loaded categories. With no
    /// categories loaded the selection stays unset.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        if let Selection::Category(id) = selection
            && !self.has_category(id)
        {
            return Err(invalid(ValidationError::UnknownCategory(id)));
        }
        self.selection = selection;
        self.reconcile_selection(false);
        Ok(())
    }

    fn has_category(&self, category_id: Id) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    /// Re-derive the selection from the current categories.
    ///
    /// `invalidated` forces a reset to the first category even if the old id
    /// is still listed. `All` is kept while any category exists.
    fn reconcile_selection(&mut self, invalidated: bool) {
        self.selection = match self.selection {
            Selection::All if !self.categories.is_empty() => Selection::All,
            Selection::Category(id) if !invalidated && self.has_category(id) => Selection::Category(id),
            _ => self
                .categories
                .first()
                .map_or(Selection::Unset, |c| Selection::Category(c.id)),
        };
    }

    /// Activate a board: fetch its notes and categories concurrently.
    ///
    /// Each half is applied independently; a failure of one is logged and does
    /// not discard the other. If categories arrive, the selection is derived
    /// from them afresh (the previous board's selection does not carry over).
    pub async fn load_board(&mut self, board_id: Id) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        let (notes, categories) = tokio::join!(api.list_notes(board_id), api.list_categories(board_id));

        let notes_loaded = match notes {
            Ok(notes) => {
                self.notes = notes;
                true
            }
            Err(e) => {
                log::error!("Error fetching notes for board {}: {}", board_id, e);
                false
            }
        };

        let categories_loaded = match categories {
            Ok(categories) => {
                self.categories = categories;
                if self.selection != Selection::All {
                    self.selection = Selection::Unset;
                }
                self.reconcile_selection(false);
                true
            }
            Err(e) => {
                log::error!("Error fetching categories for board {}: {}", board_id, e);
                false
            }
        };

        if notes_loaded || categories_loaded {
            self.board_id = Some(board_id);
        }

        log::debug!(
            "Loaded board {}: {} notes, {} categories, selection {:?}",
            board_id,
            self.notes.len(),
            self.categories.len(),
            self.selection
        );

        LoadOutcome {
            notes: notes_loaded,
            categories: categories_loaded,
        }
    }

    /// Replace the notes with the server's current list.
    pub async fn list_notes(&mut self, board_id: Id) -> Result<()> {
        match self.api.list_notes(board_id).await {
            Ok(notes) => {
                self.notes = notes;
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching notes: {}", e);
                Err(api_failure(e))
            }
        }
    }

    /// Replace the categories with the server's current list.
    ///
    /// Pass `selection_invalidated` when the selected category may have been
    /// removed, so the selection falls back to the first category.
    pub async fn list_categories(&mut self, board_id: Id, selection_invalidated: bool) -> Result<()> {
        match self.api.list_categories(board_id).await {
            Ok(categories) => {
                self.categories = categories;
                self.reconcile_selection(selection_invalidated);
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching categories: {}", e);
                Err(api_failure(e))
            }
        }
    }

    /// Refetch notes after a successful write; failures only get logged.
    async fn refresh_notes(&mut self, board_id: Id) {
        if let Err(e) = self.list_notes(board_id).await {
            log::warn!("Notes for board {} may be stale: {}", board_id, e);
        }
    }

    async fn refresh_categories(&mut self, board_id: Id, selection_invalidated: bool) {
        if let Err(e) = self.list_categories(board_id, selection_invalidated).await {
            log::warn!("Categories for board {} may be stale: {}", board_id, e);
        }
    }

    /// Create a note, then refetch the board's notes.
    ///
    /// Returns the server's creation result carrying the new note id.
    pub async fn create_note(&mut self, board_id: Id, description: &str, category_id: Id) -> Result<NoteCreated> {
        if let Err(e) = validate_new_note(description, category_id) {
            log::error!("Empty note content or category");
            return Err(invalid(e));
        }

        let created = self
            .api
            .create_note(&NewNote {
                description: description.to_string(),
                category: category_id,
                tags: Vec::new(),
                board_id,
            })
            .await
            .map_err(|e| {
                log::error!("Error creating new note: {}", e);
                api_failure(e)
            })?;

        self.refresh_notes(board_id).await;
        Ok(created)
    }

    /// Delete a note, then refetch the board's notes.
    pub async fn delete_note(&mut self, board_id: Id, note_id: Id) -> Result<()> {
        if note_id == 0 {
            log::error!("Note id cannot be 0");
            return Err(invalid(ValidationError::ZeroNoteId));
        }

        self.api.delete_note(note_id).await.map_err(|e| {
            log::error!("Error deleting note {}, err: {}", note_id, e);
            api_failure(e)
        })?;

        self.refresh_notes(board_id).await;
        Ok(())
    }

    /// Move a note to another category, then refetch the board's notes.
    pub async fn update_note_category(&mut self, note_id: Id, category_id: Id, board_id: Id) -> Result<()> {
        self.api
            .update_note_category(note_id, category_id)
            .await
            .map_err(|e| {
                log::error!(
                    "Error modifying category of note (id {}) to category {}: {}",
                    note_id,
                    category_id,
                    e
                );
                api_failure(e)
            })?;

        self.refresh_notes(board_id).await;
        Ok(())
    }

    /// Replace a note's tags, then refetch the board's notes.
    pub async fn update_note_tags(&mut self, note_id: Id, tags: &[String], board_id: Id) -> Result<()> {
        self.api.update_note_tags(note_id, tags).await.map_err(|e| {
            log::error!("Error modifying tags of note (id {}): {}", note_id, e);
            api_failure(e)
        })?;

        self.refresh_notes(board_id).await;
        Ok(())
    }

    /// Create a category, then refetch the board's categories.
    pub async fn add_category(&mut self, board_id: Id, name: &str) -> Result<CategoryCreated> {
        if name.is_empty() {
            return Err(invalid(ValidationError::EmptyCategoryName));
        }

        let created = self
            .api
            .create_category(&NewCategory {
                name: name.to_string(),
                board_id,
            })
            .await
            .map_err(|e| {
                log::error!("Error adding category {}, err: {}", name, e);
                api_failure(e)
            })?;

        self.refresh_categories(board_id, false).await;
        Ok(created)
    }

    /// Delete a category, then refetch the board's categories.
    ///
    /// Removing the selected category moves the selection to the first
    /// remaining one, or clears it when none remain.
    pub async fn remove_category(&mut self, board_id: Id, category_id: Id) -> Result<()> {
        self.api.delete_category(category_id).await.map_err(|e| {
            log::error!("Error deleting category {}, err: {}", category_id, e);
            api_failure(e)
        })?;

        let was_selected = self.selection == Selection::Category(category_id);
        self.refresh_categories(board_id, was_selected).await;
        Ok(())
    }

    /// Fetch a board's export and render it as Markdown.
    pub async fn export_markdown(&self, board_id: Id) -> Result<String> {
        let payload = self.api.export_board(board_id).await.map_err(|e| {
            log::error!("Error exporting board to markdown: {}", e);
            api_failure(e)
        })?;
        Ok(transform::to_markdown(&payload))
    }

    /// Fetch a board's export as the portable JSON document.
    pub async fn export_json(&self, board_id: Id) -> Result<String> {
        let payload = self.api.export_board(board_id).await.map_err(|e| {
            log::error!("Error exporting board to string: {}", e);
            api_failure(e)
        })?;
        transform::to_json(&payload)
    }

    /// Recreate a board from a JSON document as a new board.
    ///
    /// The active board is not touched.
    pub async fn import_json(&self, raw: &str) -> Result<ImportReport> {
        import_document(self.api.as_ref(), raw).await.inspect_err(|e| {
            log::error!("Error importing board: {:#}", e);
        })
    }
}
