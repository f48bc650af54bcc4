//! RetroBoard: board workspace synchronization and import/export.
//!
//! A [`Workspace`] keeps the notes, categories and selected category of one
//! board in step with a RetroBoard server. The [`transform`] and [`import`]
//! modules convert boards to and from portable JSON and Markdown documents.
//!
//! # Example
//!
//! ```no_run
//! use retroboard::{ClientConfig, HttpClient, Selection, Workspace};
//! use std::sync::Arc;
//!
//! # async fn demo() -> eyre::Result<()> {
//! let api = Arc::new(HttpClient::new(ClientConfig::from_env())?);
//! let mut workspace = Workspace::new(api);
//!
//! // Fetch notes and categories of board 1
//! workspace.load_board(1).await;
//!
//! // Add a note to the selected category
//! if let Selection::Category(category) = workspace.selection() {
//!     let created = workspace.create_note(1, "Deploys are slow", category).await?;
//!     println!("created note {}", created.note_id);
//! }
//!
//! // Render the board as Markdown
//! println!("{}", workspace.export_markdown(1).await?);
//! # Ok(())
//! # }
//! ```

mod types;

pub mod client;
pub mod config;
pub mod directory;
pub mod import;
pub mod protocol;
pub mod settings;
pub mod transform;
pub mod workspace;

// Re-export public API
pub use client::{ApiClient, ApiError, HttpClient};
pub use config::ClientConfig;
pub use directory::BoardDirectory;
pub use import::{ImportError, ImportFailure, ImportReport};
pub use protocol::{ExportNote, ExportPayload};
pub use settings::Settings;
pub use transform::{CategoryPlan, ImportPlan};
pub use types::{
    Board, BoardCreated, Category, CategoryCreated, Id, Note, NoteCreated, Selection, Setting, SettingValue,
    ValidationError,
};
pub use workspace::{LoadOutcome, Workspace, WorkspaceError};
