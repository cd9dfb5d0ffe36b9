use anyhow::Result;

use syntax::ast;

use crate::Error;

/// Which stylesheet tree a style task works on.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum StyleTarget {
    Landing,
    Dashboard,
}

impl StyleTarget {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Dashboard => "dashboard",
        }
    }
}

/// Which kind of build output a clean task removes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum OutputKind {
    Styles,
    Scripts,
}

/// Maps logical roles to input globs and output directories.
///
/// Paths are kept as written; relative ones are resolved against the
/// project root by the filesystem layer. Nothing here is validated:
/// a glob that matches no files simply produces an empty pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    pub landing_styles: String,
    pub dashboard_styles: String,
    pub landing_output: String,
    pub dashboard_output: String,
    pub scripts: String,
    pub scripts_output: String,
    /// entries under the styles output dir(s) that clean tasks leave alone;
    /// by default clean tasks delete everything
    pub styles_exclude: Option<String>,
    /// entries under the scripts output dir that clean tasks leave alone
    pub scripts_exclude: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            landing_styles: "./Styles/**/landing.scss".to_owned(),
            dashboard_styles: "./Styles/**/dashboard.scss".to_owned(),
            landing_output: "./wwwroot/dist/css/".to_owned(),
            dashboard_output: "./wwwroot/dist/css/".to_owned(),
            scripts: "./Scripts/**/*.js".to_owned(),
            scripts_output: "./wwwroot/dist/js/".to_owned(),
            styles_exclude: None,
            scripts_exclude: None,
        }
    }
}

impl PathConfig {
    /// Default paths, overridden by any values in the given config file text.
    pub fn load(text: &str) -> Result<Self> {
        let blocks = syntax::parse(text)?;
        let mut paths = Self::default();
        paths.apply(blocks)?;
        Ok(paths)
    }

    /// Override values with the assignments in parsed config blocks.
    pub fn apply(&mut self, blocks: Vec<ast::Block>) -> Result<()> {
        for block in blocks {
            for (key, val) in block.assignments {
                log::debug!("config {}.{key} = {val:?}", block.name);
                let slot = match (block.name, key) {
                    ("paths", "landing_styles") => &mut self.landing_styles,
                    ("paths", "dashboard_styles") => &mut self.dashboard_styles,
                    ("paths", "landing_output") => &mut self.landing_output,
                    ("paths", "dashboard_output") => &mut self.dashboard_output,
                    ("paths", "scripts") => &mut self.scripts,
                    ("paths", "scripts_output") => &mut self.scripts_output,
                    ("clean", "styles_exclude") => {
                        self.styles_exclude = exclusion(val);
                        continue;
                    }
                    ("clean", "scripts_exclude") => {
                        self.scripts_exclude = exclusion(val);
                        continue;
                    }
                    ("paths", _) | ("clean", _) => {
                        return Err(Error::UnknownKey(block.name.to_owned(), key.to_owned()).into())
                    }
                    _ => return Err(Error::UnknownBlock(block.name.to_owned()).into()),
                };
                *slot = val.to_owned();
            }
        }
        Ok(())
    }

    /// Input glob for the given stylesheet tree.
    pub fn style_input(&self, target: StyleTarget) -> &str {
        match target {
            StyleTarget::Landing => &self.landing_styles,
            StyleTarget::Dashboard => &self.dashboard_styles,
        }
    }

    /// Output dir for the given stylesheet tree.
    pub fn style_output(&self, target: StyleTarget) -> &str {
        match target {
            StyleTarget::Landing => &self.landing_output,
            StyleTarget::Dashboard => &self.dashboard_output,
        }
    }

    /// Distinct output dirs for the given kind of output.
    pub fn output_dirs(&self, kind: OutputKind) -> Vec<&str> {
        match kind {
            OutputKind::Styles if self.landing_output == self.dashboard_output => {
                vec![&self.landing_output]
            }
            OutputKind::Styles => vec![&self.landing_output, &self.dashboard_output],
            OutputKind::Scripts => vec![&self.scripts_output],
        }
    }

    /// Exclusion pattern used when cleaning the given kind of output.
    pub fn clean_exclude(&self, kind: OutputKind) -> Option<&str> {
        match kind {
            OutputKind::Styles => self.styles_exclude.as_deref(),
            OutputKind::Scripts => self.scripts_exclude.as_deref(),
        }
    }
}

// an empty value turns the exclusion off.
fn exclusion(val: &str) -> Option<String> {
    if val.is_empty() {
        None
    } else {
        Some(val.to_owned())
    }
}
