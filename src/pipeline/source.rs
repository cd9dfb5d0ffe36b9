use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::fs::Fs;

use super::{Error, FileRecord};

/// Lazily yields the files matching a glob, one record at a time.
///
/// Matches are produced in the glob's order (sorted within each directory).
/// Directories that happen to match are skipped. Contents are yielded as raw
/// bytes, so an oddly encoded file only fails the stage that decodes it.
pub struct Source<'a> {
    fs: &'a Fs,
    base: PathBuf,
    paths: glob::Paths,
}

impl<'a> Source<'a> {
    /// Start discovering files matching `pattern`, relative to the project root.
    pub fn glob(fs: &'a Fs, pattern: &str) -> Result<Self> {
        let full = fs.resolve_glob(pattern)?;
        log::debug!("globbing {full:?}");
        let paths = glob::glob(&full)
            .map_err(|e| Error::InvalidPattern(pattern.to_owned(), e.msg.to_owned()))?;
        Ok(Self {
            fs,
            base: fs.glob_base(pattern),
            paths,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn read(&self, path: PathBuf) -> Result<FileRecord> {
        let bytes = self.fs.read(&path)?;
        Ok(FileRecord::undecoded(self.base.clone(), path, bytes))
    }
}

impl Iterator for Source<'_> {
    type Item = Result<FileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e).context("while matching input files")),
            };
            if path.is_file() {
                log::trace!("discovered {path:?}");
                return Some(self.read(path));
            }
        }
    }
}
