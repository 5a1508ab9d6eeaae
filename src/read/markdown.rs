use crate::config::Config;
use crate::types::{ContentBlock, Document, LinkItem, TocAnchor, MAX_DEPTH, MIN_DEPTH};

/// Markdown to [`Document`] with a memchr line scan.
///
/// `#` is the title; `##`..`######` are headings; blank lines end
/// paragraphs and lists; `-`, `*`, `+` and `N.` start list items; fenced code
/// is skipped. Inline `[text](href)` links join the link stream in order,
/// and links under the contents heading also become the table of contents.
pub fn parse(buf: &[u8], config: &Config) -> Document {
    let mut scan = Scan::new(config);
    let mut pos = 0;

    while pos < buf.len() {
        let line_end = memchr::memchr(b'\n', &buf[pos..]).map_or(buf.len(), |i| pos + i);
        let raw = String::from_utf8_lossy(&buf[pos..line_end]);
        scan.line(raw.trim_end_matches('\r'));
        pos = line_end + 1;
    }

    scan.finish()
}

struct Scan<'a> {
    config: &'a Config,
    doc: Document,
    paragraph: Vec<String>,
    list: Vec<String>,
    in_code_block: bool,
    in_toc: bool,
    toc: Vec<TocAnchor>,
}

impl<'a> Scan<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            doc: Document::default(),
            paragraph: Vec::new(),
            list: Vec::new(),
            in_code_block: false,
            in_toc: false,
            toc: Vec::new(),
        }
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim_start();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            self.flush();
            self.in_code_block = !self.in_code_block;
            return;
        }
        if self.in_code_block {
            return;
        }

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if let Some((level, text)) = heading(trimmed) {
            self.flush();
            self.heading(level, text);
            return;
        }

        if let Some(item) = list_item(trimmed) {
            self.close_paragraph();
            let text = self.inline(item);
            self.list.push(text);
            return;
        }

        let text = self.inline(trimmed);
        // indented line under an open list continues its last item
        if line.starts_with([' ', '\t']) {
            if let Some(last) = self.list.last_mut() {
                last.push(' ');
                last.push_str(&text);
                return;
            }
        }
        self.close_list();
        self.paragraph.push(text);
    }

    fn heading(&mut self, level: usize, raw: &str) {
        let (text, found) = extract_links(raw);
        if level == 1 {
            if self.doc.title.is_none() {
                self.doc.title = Some(text);
            }
            self.record(found);
            return;
        }

        let depth = level.min(usize::from(MAX_DEPTH)) as u8;
        let block = self.doc.blocks.len();
        self.doc.links.push(LinkItem::heading(depth, text.clone(), Some(block)));
        if depth == MIN_DEPTH {
            self.in_toc = self.config.clean_heading(&text) == self.config.toc_heading;
        }
        self.doc.blocks.push(ContentBlock::heading(depth, text));
        // links in a heading belong to the section it opens
        self.record(found);
    }

    /// Replace `[text](href)` with `text`, recording each link.
    fn inline(&mut self, line: &str) -> String {
        let (text, found) = extract_links(line);
        self.record(found);
        text
    }

    fn record(&mut self, found: Vec<(String, String)>) {
        for (label, href) in found {
            if self.in_toc {
                self.toc.push(TocAnchor {
                    href: href.clone(),
                    text: label.clone(),
                });
            }
            self.doc.links.push(LinkItem::link(href, label));
        }
    }

    fn close_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.doc.blocks.push(ContentBlock::paragraph(text));
        }
    }

    fn close_list(&mut self) {
        if !self.list.is_empty() {
            let items = std::mem::take(&mut self.list);
            self.doc.blocks.push(ContentBlock::List { items });
        }
    }

    fn flush(&mut self) {
        self.close_paragraph();
        self.close_list();
    }

    fn finish(mut self) -> Document {
        self.flush();
        if !self.toc.is_empty() {
            self.doc.toc = Some(self.toc);
        }
        self.doc
    }
}

/// `## Text ##` → (2, "Text"). Needs a space after the hashes.
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level, rest.trim().trim_end_matches('#').trim_end()))
}

/// Text of a `- item`, `* item`, `+ item`, `1. item` or `1) item` line.
fn list_item(line: &str) -> Option<&str> {
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return Some(rest.trim());
        }
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(str::trim)
}

/// Split inline links out of `line`. Images keep their alt text and are
/// not links.
fn extract_links(line: &str) -> (String, Vec<(String, String)>) {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut links = Vec::new();
    let mut pos = 0;

    while let Some(open) = memchr::memchr(b'[', &bytes[pos..]).map(|i| pos + i) {
        let Some(close) = memchr::memchr(b']', &bytes[open..]).map(|i| open + i) else {
            break;
        };
        if bytes.get(close + 1) != Some(&b'(') {
            out.push_str(&line[pos..=close]);
            pos = close + 1;
            continue;
        }
        let Some(end) = memchr::memchr(b')', &bytes[close..]).map(|i| close + i) else {
            break;
        };

        let is_image = open > 0 && bytes[open - 1] == b'!';
        let before_end = if is_image { open - 1 } else { open };
        out.push_str(&line[pos..before_end]);

        let label = &line[open + 1..close];
        out.push_str(label);
        let href = line[close + 2..end].split_whitespace().next().unwrap_or("");
        if !is_image && !href.is_empty() {
            links.push((label.to_string(), href.to_string()));
        }
        pos = end + 1;
    }

    out.push_str(&line[pos..]);
    (out, links)
}
