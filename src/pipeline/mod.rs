//!
//! Streaming file pipelines: a [`Source`] yields records one at a time,
//! each record passes through an ordered list of [`Stage`]s, and the
//! survivors are written by a [`Dest`].
//!
//! A stage failing on one file is not fatal: the failure goes to the
//! [`Reporter`] under the stage's title and that file is dropped.
//! Discovery and write failures are returned to the caller.

/// The in-flight file representation
mod record;
pub use record::{FileRecord, SourceMap};

/// Glob-driven file discovery
mod source;
pub use source::Source;

/// Writing records to an output dir
mod dest;
pub use dest::Dest;

/// Per-file error channel
mod report;
pub use report::Reporter;

use anyhow::Result;

use crate::tools::ToolError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, String),
}

/// One transformation applied to every record in a pipeline.
pub trait Stage {
    /// Title that failures of this stage are reported under.
    fn title(&self) -> &'static str;
    fn apply(&self, record: FileRecord) -> Result<FileRecord, ToolError>;
}

/// Stage that only changes the output path of a record.
pub struct Rename(pub fn(&mut FileRecord));

impl Stage for Rename {
    fn title(&self) -> &'static str {
        "Rename"
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, ToolError> {
        (self.0)(&mut record);
        Ok(record)
    }
}

/// Stage that turns a record's raw bytes into text.
/// The title is that of the step the text is read for.
pub struct Decode(pub &'static str);

impl Stage for Decode {
    fn title(&self) -> &'static str {
        self.0
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, ToolError> {
        if let Some(bytes) = record.raw.take() {
            record.contents = String::from_utf8(bytes)
                .map_err(|e| ToolError(format!("file is not valid UTF-8: {}", e.utf8_error())))?;
        }
        Ok(record)
    }
}

/// Number of files seen and written during one pipeline run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineCounters {
    pub discovered: usize,
    pub emitted: usize,
}

/// Ordered list of stages, sharing one error channel.
pub struct Pipeline<'a> {
    stages: Vec<Box<dyn Stage + 'a>>,
    reporter: &'a Reporter<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(reporter: &'a Reporter<'a>) -> Self {
        Self {
            stages: Vec::with_capacity(4),
            reporter,
        }
    }

    /// Append a stage.
    pub fn pipe(mut self, stage: impl Stage + 'a) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Pass one record through every stage.
    /// Returns `None` if a stage failed; the failure has already been reported.
    pub fn process(&self, mut record: FileRecord) -> Option<FileRecord> {
        let name = record.origin.to_string_lossy().into_owned();
        for stage in &self.stages {
            match stage.apply(record) {
                Ok(next) => record = next,
                Err(e) => {
                    self.reporter.stage_error(stage.title(), &name, &e);
                    return None;
                }
            }
        }
        Some(record)
    }

    /// Pull every record from `source` through the stages into `dest`.
    pub fn run(&self, source: Source, dest: &Dest) -> Result<PipelineCounters> {
        let mut counters = PipelineCounters::default();
        log::debug!("writing to {:?}", dest.dir());
        for record in source {
            let record = record?;
            counters.discovered += 1;
            if let Some(record) = self.process(record) {
                counters.emitted += dest.write(record)?;
            }
        }
        log::debug!("pipeline finished: {counters:?}");
        Ok(counters)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::Fs;
    use crate::ui::Ui;
    use std::fs;
    use tempfile::tempdir;

    struct Upper;
    impl Stage for Upper {
        fn title(&self) -> &'static str {
            "Upper"
        }
        fn apply(&self, mut record: FileRecord) -> Result<FileRecord, ToolError> {
            if record.contents.contains('!') {
                return Err(ToolError("no shouting".to_owned()));
            }
            record.contents = record.contents.to_uppercase();
            Ok(record)
        }
    }

    #[test]
    fn test_failed_file_is_skipped() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("in"))?;
        fs::write(dir.path().join("in/a.txt"), "a")?;
        fs::write(dir.path().join("in/b.txt"), "b!")?;
        fs::write(dir.path().join("in/c.txt"), "c")?;

        let fs = Fs::new(dir.path(), &["out"]);
        let ui = Ui::new(0);
        let reporter = Reporter::new(&ui);
        let counters = Pipeline::new(&reporter)
            .pipe(Decode("Decode"))
            .pipe(Upper)
            .pipe(Rename(|r| r.set_extension("up")))
            .run(Source::glob(&fs, "in/*.txt")?, &Dest::new(&fs, "out"))?;

        assert_eq!(PipelineCounters { discovered: 3, emitted: 2 }, counters);
        assert_eq!(1, reporter.error_count());
        assert_eq!("A", fs::read_to_string(dir.path().join("out/a.up"))?);
        assert!(!dir.path().join("out/b.up").exists());
        Ok(())
    }

    #[test]
    fn test_decode_failure_is_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("in"))?;
        fs::write(dir.path().join("in/a.txt"), "a")?;
        fs::write(dir.path().join("in/b.txt"), b"caf\xe9")?;

        let fs = Fs::new(dir.path(), &["out"]);
        let ui = Ui::new(0);
        let reporter = Reporter::new(&ui);
        let counters = Pipeline::new(&reporter)
            .pipe(Decode("Reading"))
            .run(Source::glob(&fs, "in/*.txt")?, &Dest::new(&fs, "out"))?;

        assert_eq!(PipelineCounters { discovered: 2, emitted: 1 }, counters);
        assert_eq!(1, reporter.error_count());
        assert_eq!("a", fs::read_to_string(dir.path().join("out/a.txt"))?);
        Ok(())
    }
}
