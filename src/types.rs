//! Core data types for RetroBoard workspaces.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the server to boards, categories and notes.
pub type Id = i64;

/// Top-level container owning categories and notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub id: Id,
    pub name: String,
}

/// Named grouping of notes within one board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

/// A described item belonging to one category and board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: Id,

    pub description: String,

    /// Owning category id; absent when the server has none on record
    #[serde(default)]
    pub category: Option<Id>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// The category currently used to filter the notes view.
///
/// Pure client state layered over the category collection; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected (no categories loaded yet, or none exist).
    #[default]
    Unset,
    /// A single category id, always present in the loaded categories.
    Category(Id),
    /// Show every note regardless of category.
    All,
}

impl Selection {
    /// The selected category id, if a single category is selected.
    pub fn category_id(&self) -> Option<Id> {
        match self {
            Selection::Category(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns true if a note with the given category passes this filter.
    ///
    /// With nothing selected only uncategorized notes pass.
    pub fn matches(&self, category: Option<Id>) -> bool {
        match self {
            Selection::All => true,
            Selection::Category(id) => category == Some(*id),
            Selection::Unset => category.is_none(),
        }
    }
}

/// Result of `POST /notes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteCreated {
    #[serde(default)]
    pub status: String,
    pub note_id: Id,
}

/// Result of `POST /categories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCreated {
    #[serde(default)]
    pub status: String,
    pub category_id: Id,
}

/// Result of `POST /boards`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardCreated {
    #[serde(default)]
    pub status: String,
    pub board_id: Id,
}

/// Decoded value of a server setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

impl SettingValue {
    /// Decode a raw wire value according to its declared type.
    ///
    /// Booleans travel as strings; only `"1"` is true.
    pub fn decode(setting_type: &str, raw: &str) -> Self {
        match setting_type {
            "boolean" => SettingValue::Bool(raw == "1"),
            _ => SettingValue::Text(raw.to_string()),
        }
    }

    /// Encode back to the wire representation.
    pub fn encode(&self) -> String {
        match self {
            SettingValue::Bool(true) => "1".to_string(),
            SettingValue::Bool(false) => "0".to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }
}

/// A user setting with its decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: SettingValue,
    pub display_name: String,
    pub description: String,
}

/// Validation errors raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDescription,
    MissingCategory,
    EmptyBoardName,
    EmptyCategoryName,
    ZeroNoteId,
    ZeroBoardId,
    UnknownCategory(Id),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyDescription => write!(f, "note description cannot be empty"),
            ValidationError::MissingCategory => write!(f, "note category must be set"),
            ValidationError::EmptyBoardName => write!(f, "board name cannot be empty"),
            ValidationError::EmptyCategoryName => write!(f, "category name cannot be empty"),
            ValidationError::ZeroNoteId => write!(f, "note id cannot be 0"),
            ValidationError::ZeroBoardId => write!(f, "board id cannot be 0"),
            ValidationError::UnknownCategory(id) => write!(f, "category {} is not on this board", id),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the inputs of a note creation.
///
/// A category id of 0 means "no category chosen".
pub fn validate_new_note(description: &str, category: Id) -> Result<(), ValidationError> {
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    if category == 0 {
        return Err(ValidationError::MissingCategory);
    }
    Ok(())
}
