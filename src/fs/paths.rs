use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use util::PathEncodingError;

use super::Fs;

const GLOB_MAGIC: [char; 3] = ['*', '?', '['];

/// Utility fns for turning configured paths into real ones.
/// Config paths are written relative to the project root, usually with a
/// leading "./", e.g. "./wwwroot/dist/css/".
impl Fs {
    /// $ROOT/dir
    pub fn resolve_dir(&self, dir: &str) -> PathBuf {
        let dir = Path::new(dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(strip_cur_dir(dir))
        }
    }

    /// $ROOT/pattern, with the root escaped so that only
    /// the configured part of the pattern is interpreted as a glob.
    pub fn resolve_glob(&self, pattern: &str) -> Result<String> {
        if Path::new(pattern).is_absolute() {
            return Ok(pattern.to_owned());
        }
        let root = self.root.to_str().ok_or(PathEncodingError)?;
        let rel = strip_cur_dir(Path::new(pattern));
        let rel = rel.to_str().ok_or(PathEncodingError)?;
        let mut full = glob::Pattern::escape(root);
        if !full.ends_with(std::path::MAIN_SEPARATOR) {
            full.push(std::path::MAIN_SEPARATOR);
        }
        full.push_str(rel);
        Ok(full)
    }

    /// The leading directories of `pattern` that contain no wildcards,
    /// resolved against the root. Matched files are placed in the output
    /// directory relative to this base.
    pub fn glob_base(&self, pattern: &str) -> PathBuf {
        let mut base = PathBuf::new();
        let mut has_magic = false;
        for part in Path::new(pattern).components() {
            if part.as_os_str().to_string_lossy().contains(GLOB_MAGIC) {
                has_magic = true;
                break;
            }
            base.push(part);
        }
        // a plain file path: its base is the dir containing it.
        if !has_magic {
            base.pop();
        }
        self.resolve_dir(&base.to_string_lossy())
    }
}

fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
