//! CLI argument parsing for RetroBoard.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rb",
    about = "Organize notes into categories on RetroBoard boards",
    version,
    after_help = "Logs are written to: ~/.local/share/retroboard/logs/retroboard.log"
)]
pub struct Cli {
    /// Server base URL (default: $RETROBOARD_URL or http://localhost:5000)
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
pub enum Command {
    /// List boards
    Boards,

    /// Create a new board
    BoardCreate {
        /// Board name
        name: String,
    },

    /// Delete a board
    BoardRm {
        /// Board ID
        id: i64,
    },

    /// Show the notes of a board
    Notes {
        /// Board ID
        board: i64,

        /// Only notes of this category (default: first category)
        #[arg(short, long, conflicts_with = "all")]
        category: Option<i64>,

        /// Show notes of every category
        #[arg(short, long)]
        all: bool,
    },

    /// Add a note to a board
    NoteAdd {
        /// Board ID
        board: i64,

        /// Note text
        description: String,

        /// Category ID
        #[arg(short, long)]
        category: i64,
    },

    /// Delete a note
    NoteRm {
        /// Board ID
        board: i64,

        /// Note ID
        note: i64,
    },

    /// Move a note to another category
    NoteMove {
        /// Board ID
        board: i64,

        /// Note ID
        note: i64,

        /// Target category ID
        category: i64,
    },

    /// Replace the tags of a note
    NoteTags {
        /// Board ID
        board: i64,

        /// Note ID
        note: i64,

        /// Tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List the categories of a board
    Categories {
        /// Board ID
        board: i64,
    },

    /// Add a category to a board
    CategoryAdd {
        /// Board ID
        board: i64,

        /// Category name
        name: String,
    },

    /// Delete a category (must have no notes)
    CategoryRm {
        /// Board ID
        board: i64,

        /// Category ID
        id: i64,
    },

    /// Export a board
    Export {
        /// Board ID
        board: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (default: generated name for JSON, stdout for Markdown)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a JSON export as a new board
    Import {
        /// Path to the exported JSON document
        path: PathBuf,
    },

    /// Show settings
    Settings,
}
