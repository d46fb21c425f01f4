//! CLI output formatting.
//!
//! Each message has a `format_*` function returning lines (pure, testable)
//! and the CLI prints them. Messages are short status notices:
//!
//! ```text
//! Loaded beach.jpg (1200x800)
//! Applied negative → 1200x800
//! Applied rotate by 90° → 800x1200
//! Warning: no operations have been applied to this image
//! Saved /home/ada/Pictures/beach-edit.jpg
//! ```

use crate::editor::{Opened, SaveOutcome};
use crate::imaging::{OperationSpec, RowBand};

pub fn format_opened(opened: &Opened) -> Vec<String> {
    vec![format!(
        "Loaded {} ({}x{})",
        opened.file_name, opened.width, opened.height
    )]
}

/// One line per applied operation, with the resulting dimensions.
pub fn format_applied(op: &OperationSpec, dimensions: (u32, u32)) -> Vec<String> {
    vec![format!("Applied {op} → {}x{}", dimensions.0, dimensions.1)]
}

pub fn format_saved(outcome: &SaveOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    if outcome.unmodified {
        lines.push("Warning: no operations have been applied to this image".to_string());
    }
    lines.push(format!("Saved {}", outcome.path.display()));
    lines
}

/// Image summary for the `info` command, with the row band each worker
/// would take.
pub fn format_info(opened: &Opened, bands: &[RowBand]) -> Vec<String> {
    let mut lines = vec![
        opened.file_name.clone(),
        format!("    Size: {}x{}", opened.width, opened.height),
        format!("    Row bands: {}", bands.len()),
    ];
    lines.extend(bands.iter().enumerate().map(|(i, band)| {
        if band.is_empty() {
            format!("      {i}: idle")
        } else {
            format!("      {i}: rows {}-{}", band.start_row, band.end_row - 1)
        }
    }));
    lines
}

pub fn format_error(err: &dyn std::error::Error) -> Vec<String> {
    vec![format!("Error: {err}")]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
