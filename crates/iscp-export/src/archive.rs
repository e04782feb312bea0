//! Release archive

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{ExportError, Result};

/// Bundle `inputs` into a ZIP at `archive_path`, each stored under its file
/// name. Returns the entry names in order.
pub fn build_archive(archive_path: &Path, inputs: &[PathBuf]) -> Result<Vec<String>> {
    // Check everything up front so a failed run leaves no partial archive
    let mut entries = Vec::with_capacity(inputs.len());
    for input in inputs {
        if !input.is_file() {
            return Err(ExportError::MissingInput(input.clone()));
        }
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ExportError::InvalidInput(input.clone()))?;
        entries.push((input, name.to_string()));
    }

    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (input, name) in &entries {
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(input)?;
        io::copy(&mut source, &mut zip)?;
        tracing::debug!(entry = %name, "Added archive entry");
    }

    zip.finish()?;

    tracing::info!(
        path = %archive_path.display(),
        entries = entries.len(),
        "Wrote archive"
    );

    Ok(entries.into_iter().map(|(_, name)| name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_archive_contains_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("README.md");
        let b = dir.path().join("architecture.mmd");
        std::fs::write(&a, "# readme").unwrap();
        std::fs::write(&b, "flowchart LR").unwrap();

        let archive_path = dir.path().join("bundle.zip");
        let names = build_archive(&archive_path, &[a, b]).unwrap();
        assert_eq!(names, vec!["README.md", "architecture.mmd"]);

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("README.md")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "# readme");
    }

    #[test]
    fn test_missing_input_leaves_no_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");

        let err = build_archive(&archive_path, &[dir.path().join("absent.xlsx")]).unwrap_err();

        assert!(matches!(err, ExportError::MissingInput(_)));
        assert!(!archive_path.exists());
    }
}
