//! Second pass: hyperlinks placed under the section they occur in.
//!
//! Every emitted line is keyed by the outline line it follows. Keys are
//! collected first and merged into the outline in one stable pass, so
//! placing a line never shifts the position of another.

use serde::Serialize;

use crate::config::Config;
use crate::outline::{HeadingAnchor, Outline};
use crate::types::{HeadingMarker, LinkItem};

/// The finished menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Menu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub lines: Vec<String>,
    /// Heading lines in the menu (the intro line not counted).
    pub headings: usize,
    /// Hyperlink lines placed.
    pub links: usize,
    /// Heading markers that matched no outline line.
    pub unmatched: usize,
}

struct Placement {
    after: usize,
    text: String,
}

/// Walks the link stream with a cursor on the current section's line.
pub struct LinkPlacer<'a> {
    config: &'a Config,
}

impl<'a> LinkPlacer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn place(&self, outline: &Outline, items: &[LinkItem]) -> Menu {
        let anchors = outline.anchors();
        let mut placements: Vec<Placement> = Vec::new();

        // intro line, one indent level
        let mut cursor = 0usize;
        let mut indent = self.config.indent(1);
        let mut next_anchor = 0usize;
        let mut section_has_links = false;
        let mut links = 0usize;
        let mut unmatched = 0usize;

        for item in items {
            match item {
                LinkItem::Link(link) => {
                    placements.push(Placement {
                        after: cursor,
                        text: format!("{indent}{}", link.href),
                    });
                    section_has_links = true;
                    links += 1;
                }
                LinkItem::Heading(marker) => {
                    if section_has_links && self.config.section_separators {
                        placements.push(Placement {
                            after: cursor,
                            text: String::new(),
                        });
                    }
                    let Some(found) = self.resolve(anchors, marker, next_anchor) else {
                        tracing::debug!(heading = %marker.text, "no outline line for heading, links stay in previous section");
                        unmatched += 1;
                        continue;
                    };
                    let anchor = &anchors[found];
                    cursor = anchor.line;
                    indent = self
                        .config
                        .indent(usize::from(anchor.depth.saturating_sub(1)));
                    next_anchor = found + 1;
                    section_has_links = false;
                }
            }
        }

        // stable: equal keys keep emission order
        placements.sort_by_key(|p| p.after);
        let prefix = outline.summary_prefix();
        let mut lines = Vec::with_capacity(outline.lines().len() + placements.len());
        let mut pending = placements.into_iter().peekable();
        for (i, line) in outline.lines().iter().enumerate() {
            lines.push(line.render(prefix));
            while let Some(p) = pending.next_if(|p| p.after == i) {
                lines.push(p.text);
            }
        }

        Menu {
            title: None,
            lines,
            headings: anchors.len(),
            links,
            unmatched,
        }
    }

    /// Index into `anchors` for `marker`: by block index when the marker
    /// carries one, else the first anchor from `from` on with the same depth
    /// and text.
    fn resolve(&self, anchors: &[HeadingAnchor], marker: &HeadingMarker, from: usize) -> Option<usize> {
        if let Some(block) = marker.block {
            return anchors.binary_search_by_key(&block, |a| a.block).ok();
        }
        let text = self.config.clean_heading(&marker.text);
        anchors
            .get(from..)?
            .iter()
            .position(|a| a.depth == marker.depth && a.text == text)
            .map(|i| from + i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlineBuilder;
    use crate::tokenize::Stoplist;
    use crate::types::{ContentBlock, Document};

    fn outline(doc: &Document, cfg: &Config) -> Outline {
        let stop = Stoplist::english();
        OutlineBuilder::new(cfg, &stop).build(doc)
    }

    fn two_sections() -> Document {
        Document {
            blocks: vec![
                ContentBlock::heading(2, "Alpha"),
                ContentBlock::heading(3, "Beta"),
                ContentBlock::heading(2, "Gamma"),
            ],
            ..Document::default()
        }
    }

    #[test]
    fn no_links_leaves_outline_untouched() {
        let cfg = Config::default();
        let doc = two_sections();
        let out = outline(&doc, &cfg);
        let markers = vec![
            LinkItem::heading(2, "Alpha", None),
            LinkItem::heading(3, "Beta", None),
            LinkItem::heading(2, "Gamma", None),
        ];
        let menu = LinkPlacer::new(&cfg).place(&out, &markers);
        assert_eq!(menu.lines, out.render());
        assert_eq!(menu.links, 0);
        assert_eq!(LinkPlacer::new(&cfg).place(&out, &[]).lines, out.render());
    }

    #[test]
    fn links_nest_under_their_section() {
        let cfg = Config::default();
        let doc = two_sections();
        let out = outline(&doc, &cfg);
        let items = vec![
            LinkItem::link("/lead", ""),
            LinkItem::heading(2, "Alpha", None),
            LinkItem::link("/a1", ""),
            LinkItem::link("/a2", ""),
            LinkItem::heading(3, "Beta", None),
            LinkItem::link("/b1", ""),
            LinkItem::heading(2, "Gamma", None),
        ];
        let menu = LinkPlacer::new(&cfg).place(&out, &items);
        let body: Vec<&str> = menu
            .lines
            .iter()
            .map(|l| l.split(" - ").next().unwrap_or(l))
            .collect();
        assert_eq!(
            body,
            vec![
                "\t0 Intro Section",
                "\t/lead",
                "",
                "\t1 Alpha",
                "\t/a1",
                "\t/a2",
                "",
                "\t\t1.1 Beta",
                "\t\t/b1",
                "",
                "\t2 Gamma",
            ]
        );
        assert_eq!(menu.links, 4);
        assert_eq!(menu.headings, 3);
    }

    #[test]
    fn separators_can_be_disabled() {
        let cfg = Config {
            section_separators: false,
            ..Config::default()
        };
        let doc = two_sections();
        let out = outline(&doc, &cfg);
        let items = vec![
            LinkItem::heading(2, "Alpha", None),
            LinkItem::link("/a1", ""),
            LinkItem::heading(3, "Beta", None),
        ];
        let menu = LinkPlacer::new(&cfg).place(&out, &items);
        assert!(!menu.lines.iter().any(String::is_empty));
        assert_eq!(menu.lines.len(), out.lines().len() + 1);
    }

    #[test]
    fn duplicate_headings_resolved_in_order() {
        let cfg = Config::default();
        let doc = Document {
            blocks: vec![
                ContentBlock::heading(2, "See also"),
                ContentBlock::heading(2, "See also"),
            ],
            ..Document::default()
        };
        let out = outline(&doc, &cfg);
        let items = vec![
            LinkItem::heading(2, "See also", None),
            LinkItem::link("/first", ""),
            LinkItem::heading(2, "See also", None),
            LinkItem::link("/second", ""),
        ];
        let menu = LinkPlacer::new(&cfg).place(&out, &items);
        let first = menu.lines.iter().position(|l| l == "\t/first").unwrap();
        let second = menu.lines.iter().position(|l| l == "\t/second").unwrap();
        assert!(menu.lines[first - 1].starts_with("\t1 See also"));
        assert!(menu.lines[second - 1].starts_with("\t2 See also"));
    }

    #[test]
    fn block_index_wins_over_text() {
        let cfg = Config::default();
        let doc = two_sections();
        let out = outline(&doc, &cfg);
        // text says Alpha, block points at Gamma
        let items = vec![LinkItem::heading(2, "Alpha", Some(2)), LinkItem::link("/g", "")];
        let menu = LinkPlacer::new(&cfg).place(&out, &items);
        assert_eq!(menu.lines.last().map(String::as_str), Some("\t/g"));
    }

    #[test]
    fn unmatched_marker_is_silent() {
        let cfg = Config::default();
        let doc = two_sections();
        let out = outline(&doc, &cfg);
        let items = vec![
            LinkItem::heading(2, "Alpha", None),
            LinkItem::heading(2, "Nowhere", None),
            LinkItem::link("/x", ""),
        ];
        let menu = LinkPlacer::new(&cfg).place(&out, &items);
        assert_eq!(menu.unmatched, 1);
        let x = menu.lines.iter().position(|l| l == "\t/x").unwrap();
        assert!(menu.lines[x - 1].starts_with("\t1 Alpha"));
    }
}
