use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::pipeline::SourceMap;

use super::{CssProcessor, Printed, ToolError};

// lightningcss encodes versions as major << 16 | minor << 8 | patch.
const fn version(major: u32) -> Option<u32> {
    Some(major << 16)
}

/// Prints CSS with `lightningcss`, generating source maps with `parcel_sourcemap`.
pub struct Lightning {
    /// browsers that minified output is prefixed for
    browsers: Browsers,
}

impl Default for Lightning {
    fn default() -> Self {
        Self {
            browsers: Browsers {
                chrome: version(87),
                edge: version(88),
                firefox: version(78),
                safari: version(13),
                ios_saf: version(13),
                samsung: version(14),
                ..Browsers::default()
            },
        }
    }
}

impl CssProcessor for Lightning {
    fn process(&self, css: &str, source_name: &str, minify: bool) -> Result<Printed, ToolError> {
        let targets = if minify {
            Targets::from(self.browsers)
        } else {
            Targets::default()
        };

        let mut sheet = StyleSheet::parse(
            css,
            // anything the Sass compiler accepted must still print;
            // declarations lightningcss can't parse are dropped.
            ParserOptions {
                filename: source_name.to_owned(),
                error_recovery: true,
                ..ParserOptions::default()
            },
        )
        .map_err(|e| ToolError(e.to_string()))?;

        if minify {
            sheet
                .minify(MinifyOptions {
                    targets,
                    ..MinifyOptions::default()
                })
                .map_err(|e| ToolError(e.to_string()))?;
        }

        let mut map = parcel_sourcemap::SourceMap::new("/");
        map.add_source(source_name);
        map.set_source_content(0, css)
            .map_err(|e| ToolError(format!("{e:?}")))?;

        let printed = sheet
            .to_css(PrinterOptions {
                minify,
                source_map: Some(&mut map),
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| ToolError(e.to_string()))?;

        Ok(Printed {
            code: printed.code,
            map: to_json_map(&mut map)?,
        })
    }
}

fn to_json_map(map: &mut parcel_sourcemap::SourceMap) -> Result<SourceMap, ToolError> {
    let mut mappings = Vec::with_capacity(256);
    map.write_vlq(&mut mappings)
        .map_err(|e| ToolError(format!("{e:?}")))?;
    Ok(SourceMap {
        version: 3,
        file: None,
        sources: map.get_sources().clone(),
        sources_content: map.get_sources_content().clone(),
        names: map.get_names().clone(),
        mappings: String::from_utf8(mappings).map_err(|e| ToolError(e.to_string()))?,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const CSS: &str = ".box {\n  display: flex;\n  user-select: none;\n  color: #ff0000;\n}\n";

    #[test]
    fn test_print_expanded() -> Result<(), ToolError> {
        let printed = Lightning::default().process(CSS, "site.scss", false)?;
        assert!(printed.code.contains("display: flex"), "{}", printed.code);
        assert_eq!(vec!["site.scss".to_owned()], printed.map.sources);
        assert!(!printed.map.mappings.is_empty());
        Ok(())
    }

    #[test]
    fn test_minify_and_prefix() -> Result<(), ToolError> {
        let printed = Lightning::default().process(CSS, "site.scss", true)?;
        assert!(!printed.code.contains('\n'), "{}", printed.code);
        assert!(printed.code.contains("-webkit-user-select"), "{}", printed.code);
        Ok(())
    }

    #[test]
    fn test_legacy_hack_is_tolerated() -> Result<(), ToolError> {
        let css = ".a {\n  *zoom: 1;\n  color: blue;\n}\n";
        for minify in [false, true] {
            let printed = Lightning::default().process(css, "legacy.scss", minify)?;
            assert!(printed.code.contains(".a"), "{}", printed.code);
            assert!(printed.code.contains("color"), "{}", printed.code);
        }
        Ok(())
    }
}
