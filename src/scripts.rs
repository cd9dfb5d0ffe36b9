use anyhow::{Context, Result};

use crate::exec::Env;
use crate::pipeline::{Decode, Dest, FileRecord, Pipeline, PipelineCounters, Source};

/// Name of the concatenated bundle.
pub const BUNDLE_NAME: &str = "scripts.js";
pub const READ_ERROR: &str = "Reading JS Error";
const MINIFIED_EXT: &str = "min.js";
const SEPARATOR: &str = "\n";

/// Concatenate every script matching `input` into `output/scripts.js`,
/// and if `minify` is set, also write `output/scripts.min.js`.
///
/// No matching scripts means no bundle at all. A script that can't be
/// read as text is reported and left out of the bundle.
pub fn bundle(env: &Env, input: &str, output: &str, minify: bool) -> Result<PipelineCounters> {
    if minify {
        env.ui.log(&format!(
            "Starting to build the JS files in {input} into one file and minify them"
        ));
    } else {
        env.ui.log(&format!("Starting to build the JS files in {input} into one file"));
    }

    let mut counters = PipelineCounters::default();
    let source = Source::glob(env.fs, input)?;
    let base = source.base().to_path_buf();
    let decode = Pipeline::new(env.reporter).pipe(Decode(READ_ERROR));
    let mut parts = Vec::with_capacity(16);
    for record in source {
        counters.discovered += 1;
        if let Some(record) = decode.process(record?) {
            parts.push(record.contents);
        }
    }

    if parts.is_empty() {
        log::info!("no scripts match {input}; nothing to bundle");
    } else {
        let dest = Dest::new(env.fs, output);
        let text = parts.join(SEPARATOR);
        let origin = base.join(BUNDLE_NAME);

        counters.emitted += dest.write(FileRecord::new(base.clone(), origin.clone(), text.clone()))?;

        if minify {
            let minified = env
                .tools
                .scripts
                .minify(&text)
                .with_context(|| format!("while minifying {BUNDLE_NAME}"))?;
            let mut record = FileRecord::new(base, origin, minified);
            record.set_extension(MINIFIED_EXT);
            counters.emitted += dest.write(record)?;
        }
    }

    env.ui.counts(&counters);
    if minify {
        env.ui.log(&format!(
            "Concatenation and minification of JS files in {input} is done and outputted to {output}"
        ));
    } else {
        env.ui.log(&format!(
            "Concatenation of JS files in {input} is done and outputted to {output}"
        ));
    }
    Ok(counters)
}
