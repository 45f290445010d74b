//! All-or-nothing artifact writes.
//!
//! Every artifact is first written to a sibling temp file. Only when all temp
//! files exist are they renamed over their destinations, so a failure while
//! writing leaves the previous artifacts untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GenerateError, Result};

/// A rendered file and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// True when the destination already holds exactly these contents.
    pub fn is_current(&self) -> bool {
        fs::read_to_string(&self.path).is_ok_and(|existing| existing == self.contents)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_temps(temps: &[PathBuf]) {
    for temp in temps {
        let _ = fs::remove_file(temp);
    }
}

/// Write every artifact whose destination differs from its contents.
///
/// Returns the paths that were replaced.
pub fn write_all(artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    let pending: Vec<&Artifact> = artifacts.iter().filter(|a| !a.is_current()).collect();

    let mut temps = Vec::with_capacity(pending.len());
    for artifact in &pending {
        if let Some(parent) = artifact.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(err) = fs::create_dir_all(parent)
        {
            remove_temps(&temps);
            return Err(GenerateError::io(parent, err));
        }
        let temp = temp_path(&artifact.path);
        if let Err(err) = fs::write(&temp, &artifact.contents) {
            remove_temps(&temps);
            let _ = fs::remove_file(&temp);
            return Err(GenerateError::io(&temp, err));
        }
        temps.push(temp);
    }

    let mut written = Vec::with_capacity(pending.len());
    for (index, (artifact, temp)) in pending.iter().zip(&temps).enumerate() {
        if let Err(err) = fs::rename(temp, &artifact.path) {
            remove_temps(&temps[index..]);
            return Err(GenerateError::io(&artifact.path, err));
        }
        debug!(path = %artifact.path.display(), bytes = artifact.contents.len(), "Wrote artifact.");
        written.push(artifact.path.clone());
    }
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let a = Artifact::new(dir.path().join("out/A.swift"), "a\n");
        let b = Artifact::new(dir.path().join("out/B.swift"), "b\n");
        let written = write_all(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(written, vec![a.path.clone(), b.path.clone()]);
        assert_eq!(fs::read_to_string(&a.path).unwrap(), "a\n");
        assert!(!temp_path(&a.path).exists());
        assert!(a.is_current());
    }

    #[test]
    fn test_unchanged_artifacts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let a = Artifact::new(dir.path().join("A.swift"), "same\n");
        write_all(std::slice::from_ref(&a)).unwrap();
        let written = write_all(std::slice::from_ref(&a)).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn test_failure_leaves_existing_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Good.swift");
        fs::write(&good, "previous\n").unwrap();
        // A regular file where a directory is needed makes the second write fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = write_all(&[
            Artifact::new(&good, "next\n"),
            Artifact::new(blocker.join("Bad.swift"), "bad\n"),
        ]);
        assert!(matches!(result, Err(GenerateError::Io { .. })));
        assert_eq!(fs::read_to_string(&good).unwrap(), "previous\n");
        assert!(!temp_path(&good).exists());
    }
}
