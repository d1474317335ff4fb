use serde::Serialize;
use sha2::{Digest, Sha256};

/// Where a knowledge base document was loaded from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Remote,
    LocalFallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeDocument {
    pub doc_id: String,
    pub text: String,
    pub source: SourceTag,
}

impl KnowledgeDocument {
    /// Sanitizes `raw` and wraps it. Returns `None` when nothing is left after sanitizing.
    pub fn from_raw(raw: &str, source: SourceTag) -> Option<Self> {
        let text = sanitize(raw);
        if text.is_empty() {
            return None;
        }

        let doc_id = Self::generate_doc_id(&text);

        Some(Self {
            doc_id,
            text,
            source,
        })
    }

    fn generate_doc_id(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..16]) // Use first 16 bytes (32 hex chars)
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// Strip a leading BOM, normalize line endings to `\n`, drop NUL bytes and trim.
pub fn sanitize(raw: &str) -> String {
    let without_bom = raw.trim_start_matches('\u{feff}');

    let mut text = String::with_capacity(without_bom.len());
    let mut chars = without_bom.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                text.push('\n');
            }
            '\0' => {}
            _ => text.push(c),
        }
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_line_endings_and_bom() {
        let raw = "\u{feff}# Title\r\nName: Jane\rAge: 70\n";
        assert_eq!(sanitize(raw), "# Title\nName: Jane\nAge: 70");
    }

    #[test]
    fn test_sanitize_strips_nul_and_whitespace() {
        assert_eq!(sanitize("  \0Dosage:\0 5mg \n\n"), "Dosage: 5mg");
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(KnowledgeDocument::from_raw("\u{feff}\r\n \0 ", SourceTag::Remote).is_none());
    }

    #[test]
    fn test_doc_id_is_stable_across_line_endings() {
        let crlf = KnowledgeDocument::from_raw("# A\r\nB\r\n", SourceTag::Remote).unwrap();
        let lf = KnowledgeDocument::from_raw("# A\nB", SourceTag::LocalFallback).unwrap();

        assert_eq!(crlf.doc_id, lf.doc_id);
        assert_eq!(crlf.doc_id.len(), 32);
        assert_eq!(lf.line_count(), 2);
    }
}
