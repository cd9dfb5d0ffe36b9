use std::cell::Cell;

use crate::tools::ToolError;
use crate::ui::Ui;

/// Error channel for per-file failures.
///
/// A stage that fails on one file reports here and the pipeline moves on
/// to the next file; the count is kept for the end-of-run summary.
pub struct Reporter<'a> {
    ui: &'a Ui,
    errors: Cell<usize>,
}

impl<'a> Reporter<'a> {
    pub fn new(ui: &'a Ui) -> Self {
        Self {
            ui,
            errors: Cell::new(0),
        }
    }

    pub fn stage_error(&self, title: &str, file: &str, err: &ToolError) {
        self.errors.set(self.errors.get() + 1);
        log::debug!("{title} in {file}");
        self.ui.file_error(title, &format!("{file}: {err}"));
    }

    /// Number of per-file errors reported so far.
    pub fn error_count(&self) -> usize {
        self.errors.get()
    }
}
