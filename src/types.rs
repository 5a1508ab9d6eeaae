use std::fmt;

use serde::{Deserialize, Serialize};

/// Shallowest heading that gets a section number. Depth 1 is the document
/// title.
pub const MIN_DEPTH: u8 = 2;
/// Deepest heading the numbering scheme accepts.
pub const MAX_DEPTH: u8 = 6;

/// One block of document content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading { depth: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
}

impl ContentBlock {
    pub fn heading(depth: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            depth,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// A hyperlink in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

/// Marks where a heading falls in the link stream.
///
/// `block` is the index of the matching `ContentBlock::Heading` in
/// `Document::blocks`. Readers that know it should set it; without it the
/// marker is matched on depth and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingMarker {
    pub depth: u8,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
}

/// One element of the link pass input: hyperlinks interleaved with the
/// headings they appear under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkItem {
    Link(Hyperlink),
    Heading(HeadingMarker),
}

impl LinkItem {
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Link(Hyperlink {
            href: href.into(),
            text: text.into(),
        })
    }

    pub fn heading(depth: u8, text: impl Into<String>, block: Option<usize>) -> Self {
        Self::Heading(HeadingMarker {
            depth,
            text: text.into(),
            block,
        })
    }
}

/// Table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocAnchor {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

impl TocAnchor {
    /// Words the anchor contributes to the contents summary: the fragment
    /// with `#` dropped and `_` read as a space.
    pub fn words(&self) -> String {
        self.href.replace('_', " ").replace('#', "")
    }
}

/// Parsed input for one menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub links: Vec<LinkItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<Vec<TocAnchor>>,
}

impl Document {
    /// Check the invariants the core relies on. Returns the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        for (i, block) in self.blocks.iter().enumerate() {
            if let ContentBlock::Heading { depth, .. } = block {
                check_depth(*depth).map_err(|r| format!("block {i}: {r}"))?;
            }
        }
        for (i, item) in self.links.iter().enumerate() {
            let LinkItem::Heading(marker) = item else {
                continue;
            };
            check_depth(marker.depth).map_err(|r| format!("link item {i}: {r}"))?;
            if let Some(b) = marker.block {
                match self.blocks.get(b) {
                    Some(ContentBlock::Heading { .. }) => {}
                    _ => return Err(format!("link item {i}: block {b} is not a heading")),
                }
            }
        }
        Ok(())
    }
}

fn check_depth(depth: u8) -> Result<(), String> {
    if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        Ok(())
    } else {
        Err(format!(
            "heading depth {depth} outside {MIN_DEPTH}..={MAX_DEPTH}"
        ))
    }
}

/// Input format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Markdown,
    Json,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Json => f.write_str("json"),
        }
    }
}
