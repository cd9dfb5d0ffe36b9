use std::path::Path;

use super::{StyleCompiler, ToolError};

/// Compiles stylesheets with `grass`.
/// Imports are resolved relative to the stylesheet's own directory.
pub struct Grass;

impl StyleCompiler for Grass {
    fn compile(&self, source: &str, path: &Path) -> Result<String, ToolError> {
        let syntax = match path.extension().and_then(|e| e.to_str()) {
            Some("sass") => grass::InputSyntax::Sass,
            Some("css") => grass::InputSyntax::Css,
            _ => grass::InputSyntax::Scss,
        };
        let mut options = grass::Options::default()
            .style(grass::OutputStyle::Expanded)
            .input_syntax(syntax);
        if let Some(dir) = path.parent() {
            options = options.load_path(dir);
        }
        grass::from_string(source, &options).map_err(|e| ToolError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_compile_scss() -> Result<(), ToolError> {
        let css = Grass.compile(
            "$brand: #336699;\n.nav { a { color: $brand; } }\n",
            Path::new("/tmp/landing.scss"),
        )?;
        assert!(css.contains(".nav a"), "{css}");
        assert!(css.contains("#336699"), "{css}");
        Ok(())
    }

    #[test]
    fn test_undefined_variable() {
        let e = Grass
            .compile(".a { color: $nope; }", Path::new("/tmp/broken.scss"))
            .unwrap_err();
        assert!(e.to_string().contains("Undefined variable"), "{e}");
    }
}
