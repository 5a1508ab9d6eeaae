use std::collections::HashMap;
use std::fmt::Write;

use crate::tokenize::{self, StopwordFilter};

/// Word counts for one window of content, ranked on flush.
///
/// Ties are broken by first appearance, so ranking is deterministic for a
/// given input order.
pub struct FrequencyWindow<'a, F: StopwordFilter + ?Sized> {
    filter: &'a F,
    top_n: usize,
    /// token -> (count, first-seen ordinal)
    counts: HashMap<String, (u32, u32)>,
    next_ordinal: u32,
    blocks: usize,
}

impl<'a, F: StopwordFilter + ?Sized> FrequencyWindow<'a, F> {
    pub fn new(filter: &'a F, top_n: usize) -> Self {
        Self {
            filter,
            top_n,
            counts: HashMap::new(),
            next_ordinal: 0,
            blocks: 0,
        }
    }

    /// Tokenize `text` and add its words to the window.
    pub fn absorb(&mut self, text: &str) {
        self.blocks += 1;
        for token in tokenize::tokens(text, self.filter) {
            let ordinal = self.next_ordinal;
            let entry = self.counts.entry(token).or_insert_with(|| (0, ordinal));
            if entry.0 == 0 {
                self.next_ordinal += 1;
            }
            entry.0 += 1;
        }
    }

    /// Absorb raw sub-items as one space-joined string.
    pub fn absorb_items<S: AsRef<str>>(&mut self, items: &[S]) {
        let joined = items
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.absorb(&joined);
    }

    pub fn filter(&self) -> &'a F {
        self.filter
    }

    /// Number of `absorb` calls since the last flush.
    pub fn blocks_seen(&self) -> usize {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ranked `(token, count)` pairs without clearing the window.
    pub fn top(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32, u32)> = self
            .counts
            .iter()
            .map(|(tok, &(count, ord))| (tok.as_str(), count, ord))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
        ranked
            .into_iter()
            .take(self.top_n)
            .map(|(tok, count, _)| (tok, count))
            .collect()
    }

    /// Format the top words as `cat (2 times), sat (1 times)` and reset.
    /// An empty window yields an empty string.
    pub fn flush(&mut self) -> String {
        let mut out = String::new();
        for (i, (tok, count)) in self.top().into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{tok} ({count} times)");
        }
        self.counts.clear();
        self.next_ordinal = 0;
        self.blocks = 0;
        out
    }
}
