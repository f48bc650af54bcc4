//! Wire types for the RetroBoard HTTP API.

use crate::types::Id;
use serde::{Deserialize, Serialize};

/// Body of `POST /notes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewNote {
    pub description: String,
    pub category: Id,
    pub tags: Vec<String>,
    pub board_id: Id,
}

/// Body of `PUT /notes/{id}/category`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryUpdate {
    pub category: Id,
}

/// Body of `PUT /notes/{id}/tags`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagsUpdate {
    pub tags: Vec<String>,
}

/// Body of `POST /categories`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub board_id: Id,
}

/// Body of `POST /boards`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBoard {
    pub name: String,
}

/// Body of `PUT /settings/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingUpdate {
    pub new_value: String,
}

/// A setting as the server sends it, before value decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawSetting {
    pub setting_name: String,
    pub setting_value: String,
    pub setting_type: String,
    #[serde(default)]
    pub setting_display_name: String,
    #[serde(default)]
    pub setting_description: String,
}

/// Plain status body returned by deletes and updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ack {
    #[serde(default)]
    pub status: String,
}

/// Denormalized board snapshot from `GET /boards/export`.
///
/// This is also the exact shape of the portable JSON document consumed by
/// import. Categories are identified by name; `category_id` is only
/// meaningful on the server that produced the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportPayload {
    pub board_name: String,
    pub notes: Vec<ExportNote>,
}

/// One note inside an export payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportNote {
    pub description: String,

    /// Category name
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,

    #[serde(default)]
    pub tags: Vec<String>,
}
