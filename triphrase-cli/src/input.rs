//! Input sources: standard input or a list of paths.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use triphrase_core::Document;

/// Display name of the standard input document.
pub const STDIN_NAME: &str = "<stdin>";

/// Reads all of standard input as one document.
pub async fn read_stdin() -> Result<Document> {
    let mut bytes = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut bytes)
        .await
        .context("error reading stdin")?;
    Ok(Document::from_bytes(0, STDIN_NAME, bytes))
}

/// One document per path, numbered in argument order.
pub fn from_paths(paths: &[PathBuf]) -> Vec<Document> {
    paths
        .iter()
        .zip(0u32..)
        .map(|(path, id)| Document::from_path(id, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use triphrase_core::DocumentSource;

    #[test]
    fn paths_keep_argument_order() {
        let docs = from_paths(&[PathBuf::from("b.txt"), PathBuf::from("a.txt")]);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, 0);
        assert_eq!(docs[0].name, "b.txt");
        assert_eq!(docs[1].id, 1);
        assert_eq!(docs[1].source, DocumentSource::Path(PathBuf::from("a.txt")));
    }

    #[test]
    fn no_paths_no_documents() {
        assert!(from_paths(&[]).is_empty());
    }
}
