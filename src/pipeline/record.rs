use std::path::{Path, PathBuf};

use serde::Serialize;

/// Version 3 source map, serialized as written next to emitted CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    /// name of the generated file; filled in when the map is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

/// One file moving through a pipeline.
///
/// Stages may change `contents` and the output path (`relative`),
/// but `origin` always points at the file that was discovered.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// glob base the file was discovered under
    pub base: PathBuf,
    /// absolute path of the discovered file
    pub origin: PathBuf,
    /// output path, relative to the destination dir
    pub relative: PathBuf,
    pub contents: String,
    /// file contents as read from disk, until a [`Decode`](super::Decode) stage runs
    pub raw: Option<Vec<u8>>,
    pub source_map: Option<SourceMap>,
}

impl FileRecord {
    /// Create a record for `origin`, found under `base`.
    pub fn new(base: PathBuf, origin: PathBuf, contents: String) -> Self {
        let relative = match origin.strip_prefix(&base) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => origin.file_name().map(PathBuf::from).unwrap_or_default(),
        };
        Self {
            base,
            origin,
            relative,
            contents,
            raw: None,
            source_map: None,
        }
    }

    /// Create a record whose contents haven't been decoded as text yet.
    pub fn undecoded(base: PathBuf, origin: PathBuf, bytes: Vec<u8>) -> Self {
        let mut record = Self::new(base, origin, String::new());
        record.raw = Some(bytes);
        record
    }

    /// File name of the output path.
    pub fn file_name(&self) -> &str {
        self.relative
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Output file name without its extension.
    pub fn stem(&self) -> &str {
        self.relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Replace the output file's stem, keeping its extension.
    pub fn set_stem(&mut self, stem: &str) {
        let name = match self.relative.extension().and_then(|s| s.to_str()) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_owned(),
        };
        self.relative.set_file_name(name);
    }

    pub fn set_extension(&mut self, ext: &str) {
        self.relative.set_extension(ext);
    }

    /// Path of the discovered file relative to its glob base,
    /// as recorded in source maps.
    pub fn source_name(&self) -> String {
        self.origin
            .strip_prefix(&self.base)
            .unwrap_or(Path::new(self.file_name()))
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(
            PathBuf::from("/project/Styles"),
            PathBuf::from(path),
            String::new(),
        )
    }

    #[test]
    fn test_relative_to_base() {
        let r = record("/project/Styles/admin/Dashboard.scss");
        assert_eq!(Path::new("admin/Dashboard.scss"), r.relative);
        assert_eq!("Dashboard", r.stem());
        assert_eq!("admin/Dashboard.scss", r.source_name());
    }

    #[test]
    fn test_rename() {
        let mut r = record("/project/Styles/Landing.scss");
        r.set_extension("css");
        let stem = r.stem().to_lowercase();
        r.set_stem(&format!("{stem}.min"));
        assert_eq!("landing.min.css", r.file_name());
        // origin is untouched:
        assert_eq!("Landing.scss", r.source_name());
    }

    #[test]
    fn test_outside_base() {
        let r = record("/elsewhere/site.scss");
        assert_eq!(Path::new("site.scss"), r.relative);
    }
}
