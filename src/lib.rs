//! Numbered section menus for documents.
//!
//! A [`Document`] is a flat list of headings, paragraphs and lists plus a
//! link stream. [`build_menu`] turns it into display lines: every heading
//! numbered by position (`1`, `1.2`, `1.2.3`), every top-level section
//! annotated with its most frequent words, every hyperlink listed under the
//! section it was found in.

pub mod cache;
pub mod config;
pub mod counter;
pub mod error;
pub mod format;
pub mod frequency;
pub mod links;
pub mod mcp;
pub mod outline;
pub mod read;
pub mod tokenize;
pub mod types;

use std::path::Path;

pub use config::Config;
pub use error::DocmenuError;
pub use links::{LinkPlacer, Menu};
pub use outline::{Outline, OutlineBuilder};
pub use tokenize::{StopwordFilter, Stoplist};
pub use types::{ContentBlock, Document, Hyperlink, LinkItem, TocAnchor};

/// Outline pass then link pass. The document is only read.
pub fn build_menu<F>(doc: &Document, config: &Config, filter: &F) -> Menu
where
    F: StopwordFilter + ?Sized,
{
    let outline = OutlineBuilder::new(config, filter).build(doc);
    let mut menu = LinkPlacer::new(config).place(&outline, &doc.links);
    menu.title.clone_from(&doc.title);
    menu
}

/// English stoplist plus the configured extra words.
#[must_use]
pub fn stoplist(config: &Config) -> Stoplist {
    Stoplist::english().with_extra(&config.extra_stopwords)
}

/// Read, parse and build the menu for one file.
pub fn menu_for_path(path: &Path, config: &Config, filter: &Stoplist) -> Result<Menu, DocmenuError> {
    let doc = read::read_document(path, config)?;
    let menu = build_menu(&doc, config, filter);
    tracing::info!(
        path = %path.display(),
        headings = menu.headings,
        links = menu.links,
        "built menu"
    );
    Ok(menu)
}
