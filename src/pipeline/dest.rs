use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::fs::Fs;

use super::FileRecord;

/// Writes records under an output directory, along with any source maps.
pub struct Dest<'a> {
    fs: &'a Fs,
    dir: PathBuf,
}

impl<'a> Dest<'a> {
    pub fn new(fs: &'a Fs, dir: &str) -> Self {
        Self {
            fs,
            dir: fs.resolve_dir(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a record (and its source map, if it has one).
    /// Returns the number of files written.
    pub fn write(&self, mut record: FileRecord) -> Result<usize> {
        let path = self.dir.join(&record.relative);
        self.fs.create_parent_dir(&path)?;

        let mut written = 0;
        if let Some(mut map) = record.source_map.take() {
            let name = record.file_name().to_owned();
            let map_name = format!("{name}.map");
            map.file = Some(name);
            let json = serde_json::to_string(&map)
                .with_context(|| format!("while serializing source map for {path:?}"))?;
            self.fs.write_file(path.with_file_name(&map_name), &json)?;
            written += 1;

            record
                .contents
                .push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));
        }

        self.fs.write_file(&path, &record.contents)?;
        log::debug!("wrote {path:?}");
        Ok(written + 1)
    }
}
