//! Show command implementation.

use scratchpad_store::{DocumentStore, FileStore};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// The document as a client would receive it.
#[derive(Debug, Serialize)]
pub struct ShowResult {
    /// Document path.
    pub path: String,
    /// Size in bytes.
    pub bytes: usize,
    /// Number of lines.
    pub lines: usize,
    /// Whether the file could be read.
    pub readable: bool,
    /// Why the file could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Document text (empty if unreadable).
    pub content: String,
}

/// Runs the show command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            if let Some(error) = &result.error {
                warn!(path = %result.path, %error, "document unreadable, showing empty text");
            }
            print!("{}", result.content);
        }
    }

    Ok(())
}

/// Reads the document without creating it.
pub fn inspect(path: &Path) -> ShowResult {
    let outcome = FileStore::at(path).fetch();
    let error = outcome.failure().map(ToString::to_string);
    let content = outcome.into_content();

    ShowResult {
        path: path.display().to_string(),
        bytes: content.len(),
        lines: content.lines().count(),
        readable: error.is_none(),
        error,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pad.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let result = inspect(&path);
        assert!(result.readable);
        assert_eq!(result.bytes, 8);
        assert_eq!(result.lines, 2);
        assert_eq!(result.content, "one\ntwo\n");
    }

    #[test]
    fn inspect_missing_document_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let result = inspect(&path);
        assert!(!result.readable);
        assert!(result.error.is_some());
        assert_eq!(result.content, "");
        assert!(!path.exists());
    }

    #[test]
    fn json_omits_error_when_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pad.txt");
        std::fs::write(&path, "hi").unwrap();

        let json = serde_json::to_value(inspect(&path)).unwrap();
        assert_eq!(json["content"], "hi");
        assert_eq!(json["readable"], true);
        assert!(json.get("error").is_none());
    }
}
