pub mod forget;
pub mod graph;
pub mod import;
pub mod init;
pub mod keys;
pub mod select;
pub mod sign;
pub mod verify;
pub mod version;

pub use forget::Forget;
pub use graph::Graph;
pub use import::Import;
pub use init::Init;
pub use keys::Keys;
pub use select::Select;
pub use sign::Sign;
pub use verify::Verify;
pub use version::Version;

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Read a whole input file, or stdin when the path is absent or `-`
pub async fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path).await,
        _ => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

/// One line per imported key, marking the selected one
pub fn format_keys(keys: &[common::crypto::Identifier], selected: Option<usize>) -> String {
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let marker = if Some(index) == selected { "*" } else { " " };
            format!("{} {:>2} {}", marker, index, key)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keys() {
        let keys = vec![
            "kAlAffNeTSfhooM0641keP9tI7GoGATYQpCtYmuZ7ew=".parse().unwrap(),
            "BxlVtQhjHVYGsA9bYomX35SMgwSVLc77G4qJpbRR0dI=".parse().unwrap(),
        ];
        assert_eq!(
            format_keys(&keys, Some(1)),
            "   0 kAlAffNeTSfhooM0641keP9tI7GoGATYQpCtYmuZ7ew=\n\
             *  1 BxlVtQhjHVYGsA9bYomX35SMgwSVLc77G4qJpbRR0dI="
        );
    }

    #[tokio::test]
    async fn test_read_input_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("graph.dot");
        std::fs::write(&path, "digraph {}").unwrap();
        assert_eq!(read_input(Some(&path)).await.unwrap(), "digraph {}");
        assert!(read_input(Some(&dir.path().join("missing"))).await.is_err());
    }
}
