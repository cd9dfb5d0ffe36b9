use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Defines fns for resolving configured paths against the project root
mod paths;

/// Deleting the contents of output directories
mod clean;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
    #[error("Invalid exclusion pattern \"{0}\"")]
    InvalidExclusion(String),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is inside one
/// of the whitelisted output directories, otherwise they will not be performed.
/// A dry run never constructs an `Fs`, so nothing can be modified.
#[derive(Debug)]
pub struct Fs {
    /// Relative config paths are resolved against this
    root: PathBuf,
    /// The directories we are allowed to modify
    output_prefixes: Vec<PathBuf>,
}

impl Fs {
    /// Create a new `Fs` rooted at `root`, allowed to modify `output_dirs`
    /// (which are resolved against `root` if relative).
    pub fn new<S: AsRef<str>>(root: &Path, output_dirs: &[S]) -> Self {
        let mut fs = Self {
            root: root.to_path_buf(),
            output_prefixes: Vec::with_capacity(output_dirs.len()),
        };
        let prefixes = output_dirs
            .iter()
            .map(|d| fs.resolve_dir(d.as_ref()))
            .collect();
        fs.output_prefixes = prefixes;
        fs
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Check if path exists and is a directory.
    pub fn is_dir<T: AsRef<Path>>(&self, path: T) -> Result<bool> {
        let path = path.as_ref();
        if path.is_dir() || (path.is_symlink() && path.canonicalize()?.is_dir()) {
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Create parent directory of a given path.
    pub fn create_parent_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if self.exists(parent) && !self.is_dir(parent)? {
            return Err(Error::NotDirectory(to_string(parent)?).into());
        }
        self.check_whitelist(parent)?;
        fs::create_dir_all(parent).context("creating parent dir")?;
        Ok(())
    }

    /// Write entire str to a file.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::write(path, text).with_context(|| format!("writing file {path:?}"))?;
        Ok(())
    }

    /// Delete a file (or a symlink).
    pub fn delete_file<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_file(path).with_context(|| format!("deleting file {path:?}"))?;
        Ok(())
    }

    /// Delete a directory, which must already be empty.
    pub fn delete_empty_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::remove_dir(path).with_context(|| format!("deleting dir {path:?}"))?;
        Ok(())
    }

    /// Read entire file into memory, without checking its encoding.
    pub fn read<T: AsRef<Path>>(&self, path: T) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).with_context(|| format!("reading file {path:?}"))
    }

    /// List entries in a directory
    pub fn read_dir<T: AsRef<Path>>(&self, path: T) -> Result<fs::ReadDir, io::Error> {
        fs::read_dir(path)
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        self.output_prefixes.iter().any(|p| path.starts_with(p))
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(to_string(path)?).into())
        } else {
            Ok(())
        }
    }
}

fn to_string(path: &Path) -> Result<String, PathEncodingError> {
    Ok(path.to_str().ok_or(PathEncodingError)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_inside_whitelist() -> Result<()> {
        let dir = tempdir()?;
        let fs = Fs::new(dir.path(), &["out"]);
        let file = dir.path().join("out/nested/file.css");
        fs.create_parent_dir(&file)?;
        fs.write_file(&file, "a{}")?;
        assert_eq!(b"a{}".to_vec(), fs.read(&file)?);
        Ok(())
    }

    #[test]
    fn test_write_outside_whitelist() -> Result<()> {
        let dir = tempdir()?;
        let fs = Fs::new(dir.path(), &["out"]);
        let e = fs.write_file(dir.path().join("elsewhere.css"), "a{}").unwrap_err();
        assert!(matches!(e.downcast_ref::<Error>(), Some(Error::NotWhitelisted(_))));
        Ok(())
    }

    #[test]
    fn test_parent_is_a_file() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("out"), "not a dir")?;
        let fs = Fs::new(dir.path(), &["out"]);
        let e = fs.create_parent_dir(dir.path().join("out/a.css")).unwrap_err();
        assert!(matches!(e.downcast_ref::<Error>(), Some(Error::NotDirectory(_))));
        Ok(())
    }
}
