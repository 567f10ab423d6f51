//! Scripted edit session against a file on disk.
//!
//! Usage: `cargo run -p piece-document --example edit_session -- <path>`
//!
//! Set `RUST_LOG=piece_document=debug` to see load/save and history events.

use piece_document::{CursorCommand, Document, DocumentConfig, EditCommand, SearchOptions};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: edit_session <path>");
        return ExitCode::FAILURE;
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "edit session failed");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> piece_document::Result<()> {
    let config = DocumentConfig::default().with_history_limit(Some(100));
    let mut doc = Document::load_from_file_with_config(path, config)?;
    tracing::info!(
        bytes = doc.len(),
        lines = doc.line_count(),
        "loaded {path}"
    );

    doc.execute(CursorCommand::MoveTo { offset: 0 });
    doc.execute(EditCommand::InsertAtCursor {
        text: "// edited by piece-document".to_string(),
    });
    doc.execute(EditCommand::Newline);

    for (line, text) in doc.visible_lines(0, 5).iter().enumerate() {
        println!("{line:>4} | {text}");
    }

    let matches = doc.find_all("piece", SearchOptions::default())?;
    tracing::info!(count = matches.len(), "occurrences of 'piece'");

    doc.save_to_file(path)?;
    tracing::info!(
        pieces = doc.piece_count(),
        undo_depth = doc.undo_depth(),
        "saved {path}"
    );
    Ok(())
}
