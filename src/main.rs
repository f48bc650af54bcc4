//! RetroBoard CLI - organize notes into categories on RetroBoard boards.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use retroboard::transform::export_filename;
use retroboard::{
    ApiClient, BoardDirectory, ClientConfig, HttpClient, ImportFailure, Selection, SettingValue, Settings, Workspace,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::{Cli, Command, ExportFormat};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("retroboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("retroboard.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_config(cli: &Cli) -> ClientConfig {
    cli.url.as_deref().map(ClientConfig::new).unwrap_or_else(ClientConfig::from_env)
}

/// Load a board and fail if neither half could be fetched.
async fn open_board(api: Arc<dyn ApiClient>, board: i64) -> Result<Workspace> {
    let mut workspace = Workspace::new(api);
    let outcome = workspace.load_board(board).await;
    if !outcome.notes && !outcome.categories {
        eyre::bail!("Failed to load board {}", board);
    }
    if !outcome.is_complete() {
        println!("{} Board {} only partially loaded", "!".yellow(), board);
    }
    Ok(workspace)
}

async fn run(cli: Cli) -> Result<()> {
    let config = get_config(&cli);
    info!("Using server {}", config.base_url);
    let api: Arc<dyn ApiClient> = Arc::new(HttpClient::new(config)?);

    match cli.command {
        Command::Boards => {
            let mut directory = BoardDirectory::new(api);
            directory.refresh().await.context("Failed to list boards")?;

            if directory.boards().is_empty() {
                println!("No boards found");
            } else {
                for board in directory.boards() {
                    println!("{} {}", board.id.to_string().cyan(), board.name);
                }
            }
        }

        Command::BoardCreate { name } => {
            let mut directory = BoardDirectory::new(api);
            let created = directory.create_board(&name).await.context("Failed to create board")?;
            println!("{} Created board: {} {}", "✓".green(), created.board_id.to_string().cyan(), name);
        }

        Command::BoardRm { id } => {
            let mut directory = BoardDirectory::new(api);
            directory.remove_board(id).await.context("Failed to delete board")?;
            println!("{} Deleted board {}", "✓".green(), id.to_string().cyan());
        }

        Command::Notes { board, category, all } => {
            let mut workspace = open_board(api, board).await?;
            if all {
                workspace.select(Selection::All)?;
            } else if let Some(category) = category {
                workspace.select(Selection::Category(category))?;
            }

            let heading = match workspace.selection() {
                Selection::All => "all categories".to_string(),
                Selection::Category(id) => workspace.category_name(id).unwrap_or("?").to_string(),
                Selection::Unset => "uncategorized".to_string(),
            };
            println!("{}", heading.bold());

            let notes = workspace.filtered_notes();
            if notes.is_empty() {
                println!("  No notes");
            }
            for note in notes {
                let tags = if note.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", note.tags.join(", "))
                };
                println!("  {} {}{}", note.id.to_string().cyan(), note.description, tags.dimmed());
            }
        }

        Command::NoteAdd {
            board,
            description,
            category,
        } => {
            let mut workspace = Workspace::new(api);
            let created = workspace
                .create_note(board, &description, category)
                .await
                .context("Failed to create note")?;
            println!("{} Created note: {} {}", "✓".green(), created.note_id.to_string().cyan(), description);
        }

        Command::NoteRm { board, note } => {
            let mut workspace = Workspace::new(api);
            workspace.delete_note(board, note).await.context("Failed to delete note")?;
            println!("{} Deleted note {}", "✓".green(), note.to_string().cyan());
        }

        Command::NoteMove { board, note, category } => {
            let mut workspace = Workspace::new(api);
            workspace
                .update_note_category(note, category, board)
                .await
                .context("Failed to move note")?;
            println!(
                "{} Moved note {} to category {}",
                "✓".green(),
                note.to_string().cyan(),
                category.to_string().cyan()
            );
        }

        Command::NoteTags { board, note, tags } => {
            let mut workspace = Workspace::new(api);
            workspace
                .update_note_tags(note, &tags, board)
                .await
                .context("Failed to update tags")?;
            println!("{} Tagged note {}: {}", "✓".green(), note.to_string().cyan(), tags.join(", "));
        }

        Command::Categories { board } => {
            let workspace = open_board(api, board).await?;
            if workspace.categories().is_empty() {
                println!("No categories");
            }
            for category in workspace.categories() {
                let count = workspace.notes().iter().filter(|n| n.category == Some(category.id)).count();
                println!(
                    "{} {} {}",
                    category.id.to_string().cyan(),
                    category.name,
                    format!("({} notes)", count).dimmed()
                );
            }
        }

        Command::CategoryAdd { board, name } => {
            let mut workspace = Workspace::new(api);
            let created = workspace
                .add_category(board, &name)
                .await
                .context("Failed to add category")?;
            println!(
                "{} Created category: {} {}",
                "✓".green(),
                created.category_id.to_string().cyan(),
                name
            );
        }

        Command::CategoryRm { board, id } => {
            let mut workspace = Workspace::new(api);
            workspace
                .remove_category(board, id)
                .await
                .context("Failed to delete category")?;
            println!("{} Deleted category {}", "✓".green(), id.to_string().cyan());
        }

        Command::Export { board, format, output } => {
            let workspace = Workspace::new(Arc::clone(&api));
            match format {
                ExportFormat::Markdown => {
                    let markdown = workspace.export_markdown(board).await.context("Failed to export board")?;
                    match output {
                        Some(path) => {
                            fs::write(&path, markdown).context("Failed to write export")?;
                            println!("{} Exported to {}", "✓".green(), path.display());
                        }
                        None => print!("{}", markdown),
                    }
                }
                ExportFormat::Json => {
                    let json = workspace.export_json(board).await.context("Failed to export board")?;
                    let path = match output {
                        Some(path) => path,
                        None => {
                            let mut directory = BoardDirectory::new(api);
                            directory.refresh().await.context("Failed to list boards")?;
                            let name = directory.board_name(board).unwrap_or_default();
                            PathBuf::from(export_filename(name, chrono::Local::now()))
                        }
                    };
                    fs::write(&path, json).context("Failed to write export")?;
                    println!("{} Exported to {}", "✓".green(), path.display());
                }
            }
        }

        Command::Import { path } => {
            let raw = fs::read_to_string(&path).context("Failed to read import document")?;
            let workspace = Workspace::new(api);
            let report = workspace.import_json(&raw).await.context("Failed to import board")?;

            println!(
                "{} Imported board {} ({} categories, {} notes)",
                "✓".green(),
                report.board_id.to_string().cyan(),
                report.categories.len(),
                report.notes_created
            );
            for failure in &report.failures {
                match failure {
                    ImportFailure::Category { name, error } => {
                        println!("  {} category {}: {}", "✗".red(), name, error)
                    }
                    ImportFailure::Note {
                        category,
                        description,
                        error,
                    } => println!("  {} note '{}' in {}: {}", "✗".red(), description, category, error),
                }
            }
        }

        Command::Settings => {
            let mut settings = Settings::new(api);
            settings.fetch().await.context("Failed to fetch settings")?;
            for setting in settings.all() {
                let value = match &setting.value {
                    SettingValue::Bool(true) => "on".green(),
                    SettingValue::Bool(false) => "off".red(),
                    SettingValue::Text(text) => text.normal(),
                };
                println!("{} {} {}", setting.name.cyan(), value, setting.display_name.dimmed());
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
    if let Err(e) = rt.block_on(run(cli)) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
