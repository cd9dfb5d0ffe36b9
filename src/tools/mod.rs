//!
//! The external transformations a pipeline delegates to, behind traits
//! so that pipelines can be tested with fakes.

/// Sass/SCSS compilation
mod sass;
pub use sass::Grass;

/// CSS printing, prefixing, and minification
mod css;
pub use css::Lightning;

/// JavaScript minification
mod js;
pub use js::Minifier;

use std::path::Path;

use crate::pipeline::SourceMap;

/// A transformation failed on one input.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ToolError(pub String);

/// CSS text along with a map back to its input.
#[derive(Debug)]
pub struct Printed {
    pub code: String,
    pub map: SourceMap,
}

pub trait StyleCompiler {
    /// Compile Sass or SCSS `source`, read from `path`, into expanded CSS.
    fn compile(&self, source: &str, path: &Path) -> Result<String, ToolError>;
}

pub trait CssProcessor {
    /// Re-print `css` with a source map naming `source_name` as its input.
    /// When `minify` is set, also add vendor prefixes and minify.
    fn process(&self, css: &str, source_name: &str, minify: bool) -> Result<Printed, ToolError>;
}

pub trait ScriptMinifier {
    fn minify(&self, script: &str) -> Result<String, ToolError>;
}

/// The set of tools used by a run.
pub struct Toolchain {
    pub styles: Box<dyn StyleCompiler>,
    pub css: Box<dyn CssProcessor>,
    pub scripts: Box<dyn ScriptMinifier>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            styles: Box::new(Grass),
            css: Box::new(Lightning::default()),
            scripts: Box::new(Minifier),
        }
    }
}
