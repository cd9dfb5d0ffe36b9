use anyhow::Result;

use crate::exec::Env;
use crate::pipeline::{
    Decode, Dest, FileRecord, Pipeline, PipelineCounters, Rename, Source, Stage,
};
use crate::tools::{CssProcessor, StyleCompiler, ToolError};

pub const SASS_ERROR: &str = "Processing SASS Error";
pub const POSTCSS_ERROR: &str = "Error in Autoprefixer and cssnano";
pub const SOURCE_MAP_ERROR: &str = "Source map Error";

/// Sass/SCSS → CSS.
struct CompileSass<'a>(&'a dyn StyleCompiler);

impl Stage for CompileSass<'_> {
    fn title(&self) -> &'static str {
        SASS_ERROR
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, ToolError> {
        record.contents = self.0.compile(&record.contents, &record.origin)?;
        record.set_extension("css");
        Ok(record)
    }
}

/// Re-prints compiled CSS with a source map, optionally prefixed and minified.
struct PrintCss<'a> {
    processor: &'a dyn CssProcessor,
    minify: bool,
}

impl Stage for PrintCss<'_> {
    fn title(&self) -> &'static str {
        if self.minify {
            POSTCSS_ERROR
        } else {
            SOURCE_MAP_ERROR
        }
    }

    fn apply(&self, mut record: FileRecord) -> Result<FileRecord, ToolError> {
        let printed = self
            .processor
            .process(&record.contents, &record.source_name(), self.minify)?;
        record.contents = printed.code;
        record.source_map = Some(printed.map);
        Ok(record)
    }
}

fn lowercase_stem(record: &mut FileRecord) {
    let stem = record.stem().to_lowercase();
    record.set_stem(&stem);
}

fn minified_stem(record: &mut FileRecord) {
    let stem = format!("{}.min", record.stem().to_lowercase());
    record.set_stem(&stem);
}

/// Compile every stylesheet matching `input` into `output`, with source maps.
pub fn compile(env: &Env, input: &str, output: &str) -> Result<PipelineCounters> {
    env.ui.log(&format!("Starting to convert the SASS files in {input}"));

    let counters = Pipeline::new(env.reporter)
        .pipe(Decode(SASS_ERROR))
        .pipe(CompileSass(env.tools.styles.as_ref()))
        .pipe(Rename(lowercase_stem))
        .pipe(PrintCss {
            processor: env.tools.css.as_ref(),
            minify: false,
        })
        .run(Source::glob(env.fs, input)?, &Dest::new(env.fs, output))?;

    env.ui.counts(&counters);
    env.ui.log(&format!(
        "Conversion of SASS files to CSS in {input} is done and outputted to {output}"
    ));
    Ok(counters)
}

/// Like [`compile`], then prefix and minify, writing `<name>.min.css`.
pub fn compile_and_minify(env: &Env, input: &str, output: &str) -> Result<PipelineCounters> {
    env.ui.log(&format!(
        "Starting to convert the SASS files to CSS in {input} and minify them"
    ));

    let counters = Pipeline::new(env.reporter)
        .pipe(Decode(SASS_ERROR))
        .pipe(CompileSass(env.tools.styles.as_ref()))
        .pipe(PrintCss {
            processor: env.tools.css.as_ref(),
            minify: true,
        })
        .pipe(Rename(minified_stem))
        .run(Source::glob(env.fs, input)?, &Dest::new(env.fs, output))?;

    env.ui.counts(&counters);
    env.ui.log(&format!(
        "Conversion of SASS files to CSS and minification in {input} is done and outputted to {output}"
    ));
    Ok(counters)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::exec::test_env;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_compile_lowercases_name() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Styles/pages"))?;
        fs::write(dir.path().join("Styles/pages/Landing.scss"), "$c: red;\n.a { color: $c; }\n")?;

        test_env(dir.path(), |env| {
            let counters = compile(env, "./Styles/**/landing.scss", "./out/")?;
            // glob matching is case sensitive:
            assert_eq!(0, counters.discovered);
            let counters = compile(env, "./Styles/**/*.scss", "./out/")?;
            assert_eq!(PipelineCounters { discovered: 1, emitted: 2 }, counters);
            Ok(())
        })?;

        let css = fs::read_to_string(dir.path().join("out/pages/landing.css"))?;
        assert!(css.contains("color: red"), "{css}");
        assert!(css.contains("sourceMappingURL=landing.css.map"));
        assert!(dir.path().join("out/pages/landing.css.map").exists());
        Ok(())
    }

    #[test]
    fn test_minify_is_smaller() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Styles"))?;
        fs::write(
            dir.path().join("Styles/dashboard.scss"),
            ".panel {\n  .title { margin: 0px 0px 0px 0px; }\n  .body { padding: 10px; }\n}\n",
        )?;

        test_env(dir.path(), |env| {
            compile(env, "./Styles/**/dashboard.scss", "./out/")?;
            compile_and_minify(env, "./Styles/**/dashboard.scss", "./out/")?;
            Ok(())
        })?;

        let expanded = fs::read_to_string(dir.path().join("out/dashboard.css"))?;
        let minified = fs::read_to_string(dir.path().join("out/dashboard.min.css"))?;
        assert!(minified.len() <= expanded.len());
        assert!(minified.contains("sourceMappingURL=dashboard.min.css.map"));
        assert!(dir.path().join("out/dashboard.min.css.map").exists());
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Styles"))?;
        fs::write(dir.path().join("Styles/a.scss"), ".a { color: blue; }")?;
        fs::write(dir.path().join("Styles/b.scss"), ".b { color: $nope; }")?;
        fs::write(dir.path().join("Styles/c.scss"), ".c { color: green; }")?;

        let errors = test_env(dir.path(), |env| {
            let counters = compile(env, "Styles/*.scss", "out")?;
            assert_eq!(3, counters.discovered);
            assert_eq!(4, counters.emitted);
            Ok(env.reporter.error_count())
        })?;
        assert_eq!(1, errors);
        assert!(dir.path().join("out/a.css").exists());
        assert!(!dir.path().join("out/b.css").exists());
        assert!(dir.path().join("out/c.css").exists());
        Ok(())
    }

    #[test]
    fn test_legacy_hack_still_compiles() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Styles"))?;
        fs::write(dir.path().join("Styles/legacy.scss"), ".a { *zoom: 1; color: blue; }\n")?;

        let (counters, errors) = test_env(dir.path(), |env| {
            let counters = compile(env, "Styles/*.scss", "out")?;
            Ok((counters, env.reporter.error_count()))
        })?;
        assert_eq!(0, errors);
        assert_eq!(PipelineCounters { discovered: 1, emitted: 2 }, counters);
        let css = fs::read_to_string(dir.path().join("out/legacy.css"))?;
        assert!(css.contains("color: #00f") || css.contains("color: blue"), "{css}");
        Ok(())
    }

    #[test]
    fn test_non_utf8_file_is_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("Styles"))?;
        fs::write(dir.path().join("Styles/a.scss"), ".a { color: blue; }")?;
        fs::write(dir.path().join("Styles/b.scss"), b".b { content: \"caf\xe9\"; }")?;
        fs::write(dir.path().join("Styles/c.scss"), ".c { color: green; }")?;

        let errors = test_env(dir.path(), |env| {
            let counters = compile_and_minify(env, "Styles/*.scss", "out")?;
            assert_eq!(3, counters.discovered);
            Ok(env.reporter.error_count())
        })?;
        assert_eq!(1, errors);
        assert!(dir.path().join("out/a.min.css").exists());
        assert!(!dir.path().join("out/b.min.css").exists());
        assert!(dir.path().join("out/c.min.css").exists());
        Ok(())
    }
}
