//! Board directory: the list of boards on the server.

use crate::client::ApiClient;
use crate::protocol::NewBoard;
use crate::types::{Board, BoardCreated, Id, ValidationError};
use crate::workspace::WorkspaceError;
use eyre::Result;
use std::sync::Arc;

/// Cached list of boards with create/remove pass-throughs.
pub struct BoardDirectory {
    api: Arc<dyn ApiClient>,
    boards: Vec<Board>,
}

impl BoardDirectory {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            boards: Vec::new(),
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Name of a listed board.
    pub fn board_name(&self, board_id: Id) -> Option<&str> {
        self.boards.iter().find(|b| b.id == board_id).map(|b| b.name.as_str())
    }

    /// Replace the board list with the server's.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.list_boards().await {
            Ok(boards) => {
                self.boards = boards;
                Ok(())
            }
            Err(e) => {
                log::error!("Error fetching boards: {}", e);
                Err(eyre::eyre!(WorkspaceError::Api(e)))
            }
        }
    }

    /// Create a board and refresh the list.
    pub async fn create_board(&mut self, name: &str) -> Result<BoardCreated> {
        if name.is_empty() {
            log::error!("Empty board name");
            return Err(eyre::eyre!(WorkspaceError::Validation(ValidationError::EmptyBoardName)));
        }

        let created = self
            .api
            .create_board(&NewBoard { name: name.to_string() })
            .await
            .map_err(|e| {
                log::error!("Error creating new board: {}", e);
                eyre::eyre!(WorkspaceError::Api(e))
            })?;

        if let Err(e) = self.refresh().await {
            log::warn!("Board list may be stale: {}", e);
        }
        Ok(created)
    }

    /// Delete a board and drop it from the list.
    pub async fn remove_board(&mut self, board_id: Id) -> Result<()> {
        if board_id == 0 {
            log::error!("Board id cannot be 0");
            return Err(eyre::eyre!(WorkspaceError::Validation(ValidationError::ZeroBoardId)));
        }

        self.api.delete_board(board_id).await.map_err(|e| {
            log::error!("Error deleting board {}, err: {}", board_id, e);
            eyre::eyre!(WorkspaceError::Api(e))
        })?;

        if let Err(e) = self.refresh().await {
            log::warn!("Board list may be stale: {}", e);
        }
        Ok(())
    }
}
