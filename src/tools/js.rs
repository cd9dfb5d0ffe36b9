use super::{ScriptMinifier, ToolError};

/// Minifies scripts with the `minifier` crate.
pub struct Minifier;

impl ScriptMinifier for Minifier {
    fn minify(&self, script: &str) -> Result<String, ToolError> {
        Ok(minifier::js::minify(script).to_string())
    }
}
