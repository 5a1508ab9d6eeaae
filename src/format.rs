use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::links::Menu;

/// Output rendering for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Header line, then one menu line per line.
    #[default]
    Text,
    /// One JSON object per document.
    Json,
}

/// Build the standard header line:
/// `# path/to/doc.md — Title (N headings, M links)`
pub fn menu_header(path: &Path, menu: &Menu) -> String {
    let title = match &menu.title {
        Some(t) => format!(" — {t}"),
        None => String::new(),
    };
    format!(
        "# {}{title} ({} headings, {} links)",
        path.display(),
        menu.headings,
        menu.links
    )
}

/// Header, blank line, menu lines.
pub fn render_text(path: &Path, menu: &Menu) -> String {
    let mut out = menu_header(path, menu);
    out.push_str("\n\n");
    for line in &menu.lines {
        let _ = writeln!(out, "{line}");
    }
    out
}

#[derive(Serialize)]
struct JsonMenu<'a> {
    path: &'a Path,
    #[serde(flatten)]
    menu: &'a Menu,
}

/// Single-line JSON object with the path and every menu field.
pub fn render_json(path: &Path, menu: &Menu) -> String {
    serde_json::to_string(&JsonMenu { path, menu }).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "menu serialization failed");
        String::from("{}")
    })
}

pub fn render(path: &Path, menu: &Menu, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(path, menu),
        OutputFormat::Json => render_json(path, menu),
    }
}
