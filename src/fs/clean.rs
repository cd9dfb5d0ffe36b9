use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::{to_string, Error, Fs};

impl Fs {
    /// Delete everything under `dir`, keeping `dir` itself.
    ///
    /// Entries whose path relative to `dir` (or any of whose ancestors)
    /// matches `exclude` are left in place, along with the directories
    /// that contain them. A missing `dir` is not an error.
    /// Returns the number of entries deleted.
    pub fn clean_dir(&self, dir: &Path, exclude: Option<&str>) -> Result<usize> {
        if !self.exists(dir) {
            log::debug!("{dir:?} does not exist; nothing to clean");
            return Ok(0);
        }
        if !self.is_dir(dir)? {
            return Err(Error::NotDirectory(to_string(dir)?).into());
        }
        let exclude = exclude
            .map(|p| glob::Pattern::new(p).map_err(|_| Error::InvalidExclusion(p.to_owned())))
            .transpose()?;

        let mut deleted = 0;
        // contents first, so dirs are emptied before we get to them:
        for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
            let entry = entry.with_context(|| format!("while listing {dir:?}"))?;
            let path = entry.path();
            let rel = path.strip_prefix(dir)?;

            if let Some(pattern) = &exclude {
                if rel.ancestors().any(|a| !a.as_os_str().is_empty() && pattern.matches_path(a)) {
                    log::debug!("keeping excluded path {rel:?}");
                    continue;
                }
            }

            if entry.file_type().is_dir() {
                if self.read_dir(path)?.next().is_none() {
                    self.delete_empty_dir(path)?;
                    deleted += 1;
                }
            } else {
                self.delete_file(path)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn populate(out: &Path) -> Result<()> {
        fs::create_dir_all(out.join("nested/deeper"))?;
        fs::create_dir_all(out.join("css"))?;
        fs::write(out.join("site.css"), "a{}")?;
        fs::write(out.join("site.css.map"), "{}")?;
        fs::write(out.join("nested/deeper/x.css"), "b{}")?;
        fs::write(out.join("css/keep.css"), "c{}")?;
        Ok(())
    }

    #[test]
    fn test_clean_everything() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        populate(&out)?;
        let fs = Fs::new(dir.path(), &["out"]);

        assert_eq!(7, fs.clean_dir(&out, None)?);
        assert!(out.is_dir());
        assert_eq!(0, fs::read_dir(&out)?.count());
        Ok(())
    }

    #[test]
    fn test_clean_with_exclusion() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        populate(&out)?;
        let fs = Fs::new(dir.path(), &["out"]);

        fs.clean_dir(&out, Some("css"))?;
        assert!(out.join("css/keep.css").exists());
        assert!(!out.join("site.css").exists());
        assert!(!out.join("nested").exists());
        Ok(())
    }

    #[test]
    fn test_clean_twice() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        populate(&out)?;
        let fs = Fs::new(dir.path(), &["out"]);

        fs.clean_dir(&out, Some("css"))?;
        fs.clean_dir(&out, None)?;
        assert_eq!(0, fs.clean_dir(&out, None)?);
        assert_eq!(0, fs::read_dir(&out)?.count());
        Ok(())
    }

    #[test]
    fn test_clean_missing_dir() -> Result<()> {
        let dir = tempdir()?;
        let fs = Fs::new(dir.path(), &["out"]);
        assert_eq!(0, fs.clean_dir(&dir.path().join("out"), None)?);
        Ok(())
    }

    #[test]
    fn test_clean_outside_whitelist() -> Result<()> {
        let dir = tempdir()?;
        let other = dir.path().join("other");
        populate(&other)?;
        let fs = Fs::new(dir.path(), &["out"]);
        assert!(fs.clean_dir(&other, None).is_err());
        assert!(other.join("site.css").exists());
        Ok(())
    }
}
