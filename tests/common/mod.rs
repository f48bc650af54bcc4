//! Shared test infrastructure for RetroBoard integration tests.
//!
//! Provides an in-memory `FakeApi` server and a `TestEnv` helper.

#![allow(dead_code)]

use async_trait::async_trait;
use retroboard::protocol::{Ack, ExportNote, ExportPayload, NewBoard, NewCategory, NewNote, RawSetting, SettingUpdate};
use retroboard::{
    ApiClient, ApiError, Board, BoardCreated, Category, CategoryCreated, Id, Note, NoteCreated, Workspace,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

/// One endpoint of the API, for failure injection and call logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListNotes,
    ListCategories,
    CreateNote,
    DeleteNote,
    UpdateNoteCategory,
    UpdateNoteTags,
    CreateCategory,
    DeleteCategory,
    ListBoards,
    CreateBoard,
    DeleteBoard,
    ExportBoard,
    ListSettings,
    UpdateSetting,
}

#[derive(Default)]
struct ServerState {
    next_id: Id,
    boards: Vec<Board>,
    /// (board id, category)
    categories: Vec<(Id, Category)>,
    /// (board id, note)
    notes: Vec<(Id, Note)>,
    settings: Vec<RawSetting>,
}

impl ServerState {
    fn allocate(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for the RetroBoard server.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<ServerState>,
    failing: Mutex<HashSet<Endpoint>>,
    calls: Mutex<Vec<Endpoint>>,
    /// When set, list fetches wait here before answering
    list_gate: Mutex<Option<Arc<Barrier>>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call to an endpoint fail with HTTP 500.
    pub fn fail(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    /// Stop failing an endpoint.
    pub fn recover(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().remove(&endpoint);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    /// Hold `list_notes` and `list_categories` until both have been entered.
    pub fn gate_list_fetches(&self) {
        *self.list_gate.lock().unwrap() = Some(Arc::new(Barrier::new(2)));
    }

    async fn pass_list_gate(&self) {
        let gate = self.list_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count_of(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().unwrap().iter().filter(|e| **e == endpoint).count()
    }

    // Direct seeding, bypassing the call log

    pub fn seed_board(&self, name: &str) -> Id {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.boards.push(Board {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn seed_category(&self, board_id: Id, name: &str) -> Id {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.categories.push((
            board_id,
            Category {
                id,
                name: name.to_string(),
            },
        ));
        id
    }

    pub fn seed_note(&self, board_id: Id, description: &str, category: Id) -> Id {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.notes.push((
            board_id,
            Note {
                id,
                description: description.to_string(),
                category: Some(category),
                tags: vec![],
            },
        ));
        id
    }

    pub fn seed_setting(&self, name: &str, setting_type: &str, value: &str) {
        self.state.lock().unwrap().settings.push(RawSetting {
            setting_name: name.to_string(),
            setting_value: value.to_string(),
            setting_type: setting_type.to_string(),
            setting_display_name: name.to_string(),
            setting_description: String::new(),
        });
    }

    /// Boards currently on the server.
    pub fn boards(&self) -> Vec<Board> {
        self.state.lock().unwrap().boards.clone()
    }

    /// Categories of a board in server order.
    pub fn categories_of(&self, board_id: Id) -> Vec<Category> {
        self.state
            .lock()
            .unwrap()
            .categories
            .iter()
            .filter(|(b, _)| *b == board_id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Notes of a board in server order.
    pub fn notes_of(&self, board_id: Id) -> Vec<Note> {
        self.state
            .lock()
            .unwrap()
            .notes
            .iter()
            .filter(|(b, _)| *b == board_id)
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn setting_value(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .settings
            .iter()
            .find(|s| s.setting_name == name)
            .map(|s| s.setting_value.clone())
    }

    fn enter(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(endpoint);
        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(ApiError::Http {
                status: 500,
                text: format!("injected failure on {:?}", endpoint),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        text: format!("{} not found", what),
    }
}

fn success() -> Ack {
    Ack {
        status: "Success".to_string(),
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn list_notes(&self, board_id: Id) -> Result<Vec<Note>, ApiError> {
        self.enter(Endpoint::ListNotes)?;
        self.pass_list_gate().await;
        Ok(self.notes_of(board_id))
    }

    async fn list_categories(&self, board_id: Id) -> Result<Vec<Category>, ApiError> {
        self.enter(Endpoint::ListCategories)?;
        self.pass_list_gate().await;
        Ok(self.categories_of(board_id))
    }

    async fn create_note(&self, note: &NewNote) -> Result<NoteCreated, ApiError> {
        self.enter(Endpoint::CreateNote)?;
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.notes.push((
            note.board_id,
            Note {
                id,
                description: note.description.clone(),
                category: Some(note.category),
                tags: note.tags.clone(),
            },
        ));
        Ok(NoteCreated {
            status: "Success".to_string(),
            note_id: id,
        })
    }

    async fn delete_note(&self, note_id: Id) -> Result<Ack, ApiError> {
        self.enter(Endpoint::DeleteNote)?;
        let mut state = self.state.lock().unwrap();
        let before = state.notes.len();
        state.notes.retain(|(_, n)| n.id != note_id);
        if state.notes.len() == before {
            return Err(not_found("Note"));
        }
        Ok(success())
    }

    async fn update_note_category(&self, note_id: Id, category: Id) -> Result<Ack, ApiError> {
        self.enter(Endpoint::UpdateNoteCategory)?;
        let mut state = self.state.lock().unwrap();
        let note = state
            .notes
            .iter_mut()
            .find(|(_, n)| n.id == note_id)
            .ok_or_else(|| not_found("Note"))?;
        note.1.category = Some(category);
        Ok(success())
    }

    async fn update_note_tags(&self, note_id: Id, tags: &[String]) -> Result<Ack, ApiError> {
        self.enter(Endpoint::UpdateNoteTags)?;
        let mut state = self.state.lock().unwrap();
        let note = state
            .notes
            .iter_mut()
            .find(|(_, n)| n.id == note_id)
            .ok_or_else(|| not_found("Note"))?;
        note.1.tags = tags.to_vec();
        Ok(success())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryCreated, ApiError> {
        self.enter(Endpoint::CreateCategory)?;
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.categories.push((
            category.board_id,
            Category {
                id,
                name: category.name.clone(),
            },
        ));
        Ok(CategoryCreated {
            status: "Success".to_string(),
            category_id: id,
        })
    }

    async fn delete_category(&self, category_id: Id) -> Result<Ack, ApiError> {
        self.enter(Endpoint::DeleteCategory)?;
        let mut state = self.state.lock().unwrap();
        if !state.categories.iter().any(|(_, c)| c.id == category_id) {
            return Err(not_found("Category"));
        }
        if state.notes.iter().any(|(_, n)| n.category == Some(category_id)) {
            return Err(ApiError::Http {
                status: 400,
                text: "Cannot delete: notes still associated with this category".to_string(),
            });
        }
        state.categories.retain(|(_, c)| c.id != category_id);
        Ok(success())
    }

    async fn list_boards(&self) -> Result<Vec<Board>, ApiError> {
        self.enter(Endpoint::ListBoards)?;
        Ok(self.boards())
    }

    async fn create_board(&self, board: &NewBoard) -> Result<BoardCreated, ApiError> {
        self.enter(Endpoint::CreateBoard)?;
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.boards.push(Board {
            id,
            name: board.name.clone(),
        });
        Ok(BoardCreated {
            status: "Success".to_string(),
            board_id: id,
        })
    }

    async fn delete_board(&self, board_id: Id) -> Result<Ack, ApiError> {
        self.enter(Endpoint::DeleteBoard)?;
        let mut state = self.state.lock().unwrap();
        let before = state.boards.len();
        state.boards.retain(|b| b.id != board_id);
        if state.boards.len() == before {
            return Err(not_found("Board"));
        }
        Ok(success())
    }

    async fn export_board(&self, board_id: Id) -> Result<ExportPayload, ApiError> {
        self.enter(Endpoint::ExportBoard)?;
        let board = self
            .boards()
            .into_iter()
            .find(|b| b.id == board_id)
            .ok_or_else(|| not_found("Board"))?;
        let categories = self.categories_of(board_id);
        let notes = self
            .notes_of(board_id)
            .into_iter()
            .map(|n| ExportNote {
                description: n.description,
                category: categories
                    .iter()
                    .find(|c| Some(c.id) == n.category)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                category_id: n.category,
                tags: n.tags,
            })
            .collect();
        Ok(ExportPayload {
            board_name: board.name,
            notes,
        })
    }

    async fn list_settings(&self) -> Result<Vec<RawSetting>, ApiError> {
        self.enter(Endpoint::ListSettings)?;
        Ok(self.state.lock().unwrap().settings.clone())
    }

    async fn update_setting(&self, name: &str, value: &SettingUpdate) -> Result<Ack, ApiError> {
        self.enter(Endpoint::UpdateSetting)?;
        let mut state = self.state.lock().unwrap();
        let setting = state
            .settings
            .iter_mut()
            .find(|s| s.setting_name == name)
            .ok_or_else(|| not_found("Setting"))?;
        setting.setting_value = value.new_value.clone();
        Ok(success())
    }
}

/// Test environment: a fake server with one seeded board and a workspace.
pub struct TestEnv {
    pub api: Arc<FakeApi>,
    pub workspace: Workspace,
    pub board: Id,
}

impl TestEnv {
    /// Create a new environment with an empty board named "Retro".
    pub fn new() -> Self {
        let api = FakeApi::new();
        let board = api.seed_board("Retro");
        let workspace = Workspace::new(api.clone());
        Self { api, workspace, board }
    }

    /// Seed a category on the environment's board.
    pub fn category(&self, name: &str) -> Id {
        self.api.seed_category(self.board, name)
    }

    /// Seed a note on the environment's board.
    pub fn note(&self, description: &str, category: Id) -> Id {
        self.api.seed_note(self.board, description, category)
    }

    /// Load the environment's board, asserting both halves succeed.
    pub async fn load(&mut self) {
        let outcome = self.workspace.load_board(self.board).await;
        assert!(outcome.is_complete(), "Expected full load, got {:?}", outcome);
    }

    /// Ids of the workspace's categories.
    pub fn category_ids(&self) -> Vec<Id> {
        self.workspace.categories().iter().map(|c| c.id).collect()
    }

    /// Descriptions of the workspace's notes.
    pub fn note_descriptions(&self) -> Vec<String> {
        self.workspace.notes().iter().map(|n| n.description.clone()).collect()
    }

    /// Assert the selection invariant: unset iff no categories, otherwise a
    /// listed category or all of them.
    pub fn assert_selection_valid(&self) {
        let ids = self.category_ids();
        match self.workspace.selection() {
            retroboard::Selection::Unset => assert!(ids.is_empty(), "Selection unset with categories {:?}", ids),
            retroboard::Selection::Category(id) => assert!(
                ids.contains(&id),
                "Selected category {} not among {:?}",
                id,
                ids
            ),
            retroboard::Selection::All => assert!(!ids.is_empty(), "Selection is all with no categories"),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
