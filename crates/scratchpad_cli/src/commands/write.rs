//! Write command implementation.

use scratchpad_protocol::decode_request_body;
use scratchpad_store::{DocumentStore, FileStore, StoreResult};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Runs the write command. Without `text`, the document is read from stdin.
pub fn run(path: &Path, text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let content = match text {
        Some(text) => text,
        None => {
            let mut raw = Vec::new();
            std::io::stdin().read_to_end(&mut raw)?;
            decode_request_body(&raw)
        }
    };

    let bytes = replace_document(path, &content)?;
    info!(path = %path.display(), bytes, "document replaced");
    Ok(())
}

/// Replaces the whole document, creating the file if needed.
pub fn replace_document(path: &Path, content: &str) -> StoreResult<usize> {
    let store = FileStore::open_with_create_dirs(path)?;
    store.replace(content)?;
    Ok(content.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_creates_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes").join("pad.txt");

        assert_eq!(replace_document(&path, "first version").unwrap(), 13);
        assert_eq!(replace_document(&path, "v2").unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v2");
    }
}
