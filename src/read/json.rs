use std::path::{Path, PathBuf};

use crate::error::DocmenuError;
use crate::types::Document;

/// Pre-parsed document in the tagged JSON form (see [`Document`]).
pub fn parse(buf: &[u8], path: &Path) -> Result<Document, DocmenuError> {
    let doc: Document = serde_json::from_slice(buf).map_err(|e| DocmenuError::InvalidDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    doc.validate().map_err(|reason| DocmenuError::InvalidDocument {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(doc)
}

/// Same as [`parse`] for an already-decoded JSON value (MCP arguments).
pub fn from_value(value: serde_json::Value) -> Result<Document, DocmenuError> {
    let doc: Document =
        serde_json::from_value(value).map_err(|e| DocmenuError::InvalidDocument {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
    doc.validate().map_err(|reason| DocmenuError::InvalidDocument {
        path: PathBuf::new(),
        reason,
    })?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentBlock;

    #[test]
    fn valid_document() {
        let doc = parse(
            br#"{"title": "Cats", "blocks": [{"type": "heading", "depth": 2, "text": "Diet"}]}"#,
            Path::new("cats.json"),
        )
        .unwrap();
        assert_eq!(doc.title.as_deref(), Some("Cats"));
        assert_eq!(doc.blocks, vec![ContentBlock::heading(2, "Diet")]);
    }

    #[test]
    fn syntax_error_names_file() {
        let err = parse(b"{", Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().starts_with("broken.json: invalid document"));
    }

    #[test]
    fn bad_depth_rejected() {
        let err = parse(
            br#"{"blocks": [{"type": "heading", "depth": 1, "text": "Title"}]}"#,
            Path::new("t.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("heading depth 1"));
    }

    #[test]
    fn value_form() {
        let doc = from_value(serde_json::json!({
            "blocks": [{"type": "paragraph", "text": "hi"}]
        }))
        .unwrap();
        assert_eq!(doc.blocks.len(), 1);
    }
}
