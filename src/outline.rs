//! First pass: numbered heading lines with per-section word summaries.
//!
//! Walks the content blocks once. Every depth-2 heading closes the word
//! window of the section before it and opens its own. After the final block
//! has been absorbed the open window is flushed onto the last line, whatever
//! its depth. Each
//! heading's line index is recorded as a [`HeadingAnchor`] when the line is
//! appended, so summaries and links find their line without searching text.

use crate::config::Config;
use crate::counter::SectionCounter;
use crate::frequency::FrequencyWindow;
use crate::tokenize::StopwordFilter;
use crate::types::{ContentBlock, Document, TocAnchor, MIN_DEPTH};

/// One rendered heading entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    text: String,
    summary: Option<String>,
}

impl OutlineLine {
    fn new(text: String) -> Self {
        Self {
            text,
            summary: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Set the summary unless one is already there. Returns whether it was set.
    fn annotate(&mut self, summary: String) -> bool {
        if self.summary.is_some() {
            return false;
        }
        self.summary = Some(summary);
        true
    }

    pub fn render(&self, summary_prefix: &str) -> String {
        match &self.summary {
            Some(s) => format!("{}{summary_prefix}{s}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Links a heading block to the outline line generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingAnchor {
    /// Index into `Document::blocks`.
    pub block: usize,
    /// Index into `Outline::lines`.
    pub line: usize,
    pub depth: u8,
    /// Cleaned heading text, as displayed.
    pub text: String,
}

/// Result of the first pass. Line 0 is always the intro line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    lines: Vec<OutlineLine>,
    anchors: Vec<HeadingAnchor>,
    summary_prefix: String,
}

impl Outline {
    pub fn lines(&self) -> &[OutlineLine] {
        &self.lines
    }

    /// Anchors in block order.
    pub fn anchors(&self) -> &[HeadingAnchor] {
        &self.anchors
    }

    pub fn summary_prefix(&self) -> &str {
        &self.summary_prefix
    }

    pub fn render(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|l| l.render(&self.summary_prefix))
            .collect()
    }
}

/// Builds an [`Outline`] from a document.
pub struct OutlineBuilder<'a, F: StopwordFilter + ?Sized> {
    config: &'a Config,
    filter: &'a F,
}

/// Mutable state of one build. Owned by `build`, dropped when it returns.
struct Pass<'a, F: StopwordFilter + ?Sized> {
    config: &'a Config,
    lines: Vec<OutlineLine>,
    anchors: Vec<HeadingAnchor>,
    counter: SectionCounter,
    window: FrequencyWindow<'a, F>,
    /// Line that receives the open window's summary.
    owner: usize,
}

impl<'a, F: StopwordFilter + ?Sized> OutlineBuilder<'a, F> {
    pub fn new(config: &'a Config, filter: &'a F) -> Self {
        Self { config, filter }
    }

    pub fn build(&self, doc: &Document) -> Outline {
        let intro = format!("{}0 {}", self.config.indent(1), self.config.intro_label);
        let mut pass = Pass {
            config: self.config,
            lines: vec![OutlineLine::new(intro)],
            anchors: Vec::new(),
            counter: SectionCounter::new(),
            window: FrequencyWindow::new(self.filter, self.config.top_n),
            owner: 0,
        };

        let toc = doc.toc.as_deref();
        let mut toc_pending = toc.is_some();
        let last = doc.blocks.len().checked_sub(1);

        for (i, block) in doc.blocks.iter().enumerate() {
            match block {
                ContentBlock::Heading { depth, text } => {
                    let line = pass.heading(i, *depth, text);
                    if let Some(anchors) = toc.filter(|_| toc_pending) {
                        if pass.heading_text(line) == Some(self.config.toc_heading.as_str()) {
                            pass.attach_toc(line, anchors);
                            toc_pending = false;
                        }
                    }
                }
                ContentBlock::Paragraph { text } => pass.window.absorb(text),
                ContentBlock::List { items } => pass.window.absorb_items(items),
            }

            if Some(i) == last {
                pass.close_terminal();
            }
        }

        if toc_pending {
            tracing::debug!(
                heading = %self.config.toc_heading,
                "table of contents present but no matching heading, summary skipped"
            );
        }

        Outline {
            lines: pass.lines,
            anchors: pass.anchors,
            summary_prefix: self.config.summary_prefix(),
        }
    }
}

impl<F: StopwordFilter + ?Sized> Pass<'_, F> {
    /// Append the line for one heading. Returns its line index.
    fn heading(&mut self, block: usize, depth: u8, raw: &str) -> usize {
        let top_level = depth <= MIN_DEPTH;
        if top_level {
            self.close_window();
        }

        let text = self.config.clean_heading(raw);
        let line = self.lines.len();
        let rendered = self.counter.line(depth, &text, &self.config.indent_unit);
        self.lines.push(OutlineLine::new(rendered));
        self.anchors.push(HeadingAnchor {
            block,
            line,
            depth,
            text,
        });

        if top_level {
            self.owner = line;
        }
        line
    }

    fn heading_text(&self, line: usize) -> Option<&str> {
        self.anchors
            .last()
            .filter(|a| a.line == line)
            .map(|a| a.text.as_str())
    }

    /// Flush the open window onto its owner line.
    ///
    /// The intro window is only attached if some content came before the
    /// first heading; windows of real headings are always attached.
    fn close_window(&mut self) {
        let absorbed = self.window.blocks_seen();
        let summary = self.window.flush();
        if self.owner == 0 && absorbed == 0 {
            return;
        }
        self.attach(self.owner, summary);
    }

    /// Flush the open window onto the last line appended.
    fn close_terminal(&mut self) {
        self.owner = self.lines.len().saturating_sub(1);
        self.close_window();
    }

    fn attach(&mut self, line: usize, summary: String) {
        if summary.is_empty() && self.config.suppress_empty_summary {
            return;
        }
        if !self.lines[line].annotate(summary) {
            tracing::debug!(line, "line already annotated, summary dropped");
        }
    }

    /// Summarise the contents anchors in a throwaway window and attach it to
    /// the contents heading.
    fn attach_toc(&mut self, line: usize, anchors: &[TocAnchor]) {
        let words: Vec<String> = anchors.iter().map(TocAnchor::words).collect();
        let filter = self.window.filter();
        let mut toc_window = FrequencyWindow::new(filter, self.config.top_n);
        toc_window.absorb_items(&words);
        let summary = toc_window.flush();
        self.attach(line, summary);
    }
}
