use std::fmt;

use crate::{OutputKind, StyleTarget, TaskId};

/// The single transformation an atomic task performs.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Action {
    /// Delete everything under the output dir(s) of this kind.
    Clean(OutputKind),
    /// Sass → expanded CSS, with source maps.
    CompileStyles(StyleTarget),
    /// Sass → prefixed, minified CSS, with source maps.
    MinifyStyles(StyleTarget),
    /// Concatenate scripts into one file.
    BundleScripts,
    /// Concatenate scripts, then also write a minified copy.
    BundleAndMinifyScripts,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean(OutputKind::Styles) => write!(f, "delete built stylesheets"),
            Self::Clean(OutputKind::Scripts) => write!(f, "delete built scripts"),
            Self::CompileStyles(t) => write!(f, "compile {} styles", t.label()),
            Self::MinifyStyles(t) => write!(f, "compile and minify {} styles", t.label()),
            Self::BundleScripts => write!(f, "bundle scripts"),
            Self::BundleAndMinifyScripts => write!(f, "bundle and minify scripts"),
        }
    }
}

/// A task whose members have been resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Atomic(Action),
    /// Members run strictly in this order.
    Composite(Vec<TaskId>),
}

/// A registered task along with the names it can be invoked by.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Name used on the command line, e.g. "clean:css"
    pub name: String,
    /// Optional descriptive alias, e.g. "cleanStyles"
    pub alias: Option<String>,
    pub task: Task,
}
