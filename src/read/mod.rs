pub mod json;
pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use memmap2::Mmap;

use crate::config::Config;
use crate::error::DocmenuError;
use crate::types::{Document, InputFormat};

/// Directories never descended into when expanding a directory argument.
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target", "vendor", ".venv", "__pycache__"];

/// Read and parse one document. Routes on extension.
pub fn read_document(path: &Path, config: &Config) -> Result<Document, DocmenuError> {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocmenuError::NotFound {
                path: path.to_path_buf(),
                suggestion: suggest_similar(path),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DocmenuError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(DocmenuError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let format = detect_format(path).ok_or_else(|| DocmenuError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    if meta.is_dir() {
        return Err(DocmenuError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    // mmap of a zero-byte file fails on some platforms
    if meta.len() == 0 {
        return parse(&[], path, format, config);
    }

    let file = fs::File::open(path).map_err(|e| DocmenuError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| DocmenuError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), %format, bytes = meta.len(), "parsing document");
    parse(&mmap[..], path, format, config)
}

fn parse(buf: &[u8], path: &Path, format: InputFormat, config: &Config) -> Result<Document, DocmenuError> {
    match format {
        InputFormat::Markdown => Ok(markdown::parse(buf, config)),
        InputFormat::Json => json::parse(buf, path),
    }
}

/// Input format by extension.
pub fn detect_format(path: &Path) -> Option<InputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md" | "markdown" | "mdx") => Some(InputFormat::Markdown),
        Some("json") => Some(InputFormat::Json),
        _ => None,
    }
}

/// Expand arguments into the documents to process, in a stable order.
///
/// Files are taken as given. Directories are walked for supported
/// extensions (hidden and ignored files included, junk dirs skipped), and
/// the optional glob filters what the walk finds.
pub fn discover(paths: &[PathBuf], glob: Option<&str>) -> Result<Vec<PathBuf>, DocmenuError> {
    let matcher: Option<GlobMatcher> = match glob {
        Some(g) => Some(
            Glob::new(g)
                .map_err(|e| DocmenuError::InvalidGlob {
                    pattern: g.to_string(),
                    reason: e.to_string(),
                })?
                .compile_matcher(),
        ),
        None => None,
    };

    let mut out = Vec::new();
    for path in paths {
        if !path.is_dir() {
            out.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkBuilder::new(path)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .filter_entry(|entry| {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if let Some(name) = entry.file_name().to_str() {
                        return !SKIP_DIRS.contains(&name);
                    }
                }
                true
            })
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.file_type()?.is_file() {
                    return None;
                }
                let p = entry.into_path();
                detect_format(&p)?;
                match &matcher {
                    Some(m) if !m.is_match(p.file_name()?) && !m.is_match(&p) => None,
                    _ => Some(p),
                }
            })
            .collect();
        found.sort();
        tracing::debug!(dir = %path.display(), files = found.len(), "expanded directory");
        out.extend(found);
    }
    Ok(out)
}

/// Suggest a similar file name from the parent directory (edit distance).
fn suggest_similar(path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let name = path.file_name()?.to_str()?;
    let entries = fs::read_dir(parent).ok()?;

    let mut best: Option<(usize, String)> = None;
    for entry in entries.flatten() {
        let candidate = entry.file_name();
        let candidate = candidate.to_string_lossy();
        let dist = edit_distance(name, &candidate);
        if dist <= 3 {
            match &best {
                Some((d, _)) if dist < *d => best = Some((dist, candidate.into_owned())),
                None => best = Some((dist, candidate.into_owned())),
                _ => {}
            }
        }
    }
    best.map(|(_, name)| name)
}

/// Levenshtein distance, only used on short file names.
fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost)
                .min(prev[j + 1] + 1)
                .min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
