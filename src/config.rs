use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DocmenuError;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docmenu.toml";

/// Knobs for menu construction. Every field has a default, so an empty
/// `docmenu.toml` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How many words each frequency summary lists.
    pub top_n: usize,
    /// One level of indentation in rendered lines.
    pub indent_unit: String,
    /// Text of the synthetic section-0 line.
    pub intro_label: String,
    /// Heading whose line receives the table-of-contents summary.
    pub toc_heading: String,
    /// Substrings removed from heading text before it is displayed.
    pub strip_markers: Vec<String>,
    /// Added to the built-in English stoplist.
    pub extra_stopwords: Vec<String>,
    /// Emit a blank line before each section's links.
    pub section_separators: bool,
    /// Skip the summary suffix entirely when a window saw no words.
    pub suppress_empty_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: 5,
            indent_unit: "\t".to_string(),
            intro_label: "Intro Section".to_string(),
            toc_heading: "Contents".to_string(),
            strip_markers: vec!["[edit]".to_string()],
            extra_stopwords: Vec::new(),
            section_separators: true,
            suppress_empty_summary: false,
        }
    }
}

impl Config {
    /// `indent_unit` repeated `levels` times.
    pub fn indent(&self, levels: usize) -> String {
        self.indent_unit.repeat(levels)
    }

    /// Heading text as displayed: markers stripped, surrounding space trimmed.
    pub fn clean_heading(&self, text: &str) -> String {
        let mut cleaned = text.trim().to_string();
        for marker in &self.strip_markers {
            if !marker.is_empty() {
                cleaned = cleaned.replace(marker.as_str(), "");
            }
        }
        cleaned.trim().to_string()
    }

    /// Literal joining a heading line to its word summary.
    pub fn summary_prefix(&self) -> String {
        format!(" - {} Most Frequent Words: ", self.top_n)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Self, DocmenuError> {
        toml::from_str(text).map_err(|e| DocmenuError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load an explicit config file, or `docmenu.toml` from `cwd` when it
    /// exists, or the defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, DocmenuError> {
        let path: PathBuf = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocmenuError::NotFound {
                path: path.clone(),
                suggestion: None,
            },
            _ => DocmenuError::IoError {
                path: path.clone(),
                source: e,
            },
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::parse(&text, &path)
    }
}
