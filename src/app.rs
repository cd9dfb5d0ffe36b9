use anyhow::{Context, Result};
use colored::Colorize;

use traverse::Traversal;
use workflow::{OutputKind, PathConfig, Registry, Task};

use crate::exec::{Env, Outcome, TaskRunner};
use crate::fs::Fs;
use crate::pipeline::Reporter;
use crate::settings::Settings;
use crate::tools::Toolchain;
use crate::ui::Ui;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// User interface
    ui: Ui,
    /// Transformations used by style and script tasks
    tools: Toolchain,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let ui = Ui::new(settings.verbose);
        Self {
            settings,
            ui,
            tools: Toolchain::default(),
        }
    }

    /// Run the app, using settings to determine which task to run.
    pub fn run(&self) -> Result<Outcome> {
        let reg = Registry::standard().context("while building task registry")?;

        if self.settings.list {
            print_tasks(&reg);
            return Ok(Outcome::default());
        }

        let paths = self.load_paths()?;
        let traversal = self.make_traversal(&reg)?;

        if self.ui.is_verbose() || self.settings.dry_run {
            traversal.print(&reg);
        }
        if self.settings.dry_run {
            return Ok(Outcome::default());
        }

        self.run_traversal(&reg, &paths, &traversal)
    }

    fn load_paths(&self) -> Result<PathConfig> {
        let Some(config) = &self.settings.config else {
            log::info!("no config file; using default paths");
            return Ok(PathConfig::default());
        };
        self.ui.verbose_msg(&format!("Reading path config from {config:?}"));
        let text = std::fs::read_to_string(config)
            .with_context(|| format!("while reading config file {config:?}"))?;
        PathConfig::load(&text).with_context(|| format!("while parsing config file {config:?}"))
    }

    fn make_traversal(&self, reg: &Registry) -> Result<Traversal> {
        let Some(task) = &self.settings.task else {
            return Err(crate::settings::Error::NoTaskSpecified.into());
        };
        let goal = reg.find(task)?;
        Traversal::create(reg, goal)
    }

    fn run_traversal(
        &self,
        reg: &Registry,
        paths: &PathConfig,
        traversal: &Traversal,
    ) -> Result<Outcome> {
        let mut output_dirs = paths.output_dirs(OutputKind::Styles);
        output_dirs.extend(paths.output_dirs(OutputKind::Scripts));
        log::debug!("output dirs: {output_dirs:?}");
        let fs = Fs::new(&self.settings.root, &output_dirs[..]);

        let reporter = Reporter::new(&self.ui);
        let env = Env {
            fs: &fs,
            ui: &self.ui,
            tools: &self.tools,
            paths,
            reporter: &reporter,
        };
        let report = TaskRunner::new(reg, env).run(traversal);

        if self.ui.is_verbose() {
            report.print_summary(traversal, reg);
        }
        report.into_result(traversal, reg)
    }
}

fn print_tasks(reg: &Registry) {
    for (_, entry) in reg.iter() {
        let alias = entry.alias.as_deref().unwrap_or("");
        let desc = match &entry.task {
            Task::Atomic(action) => action.to_string(),
            Task::Composite(members) => members
                .iter()
                .map(|m| reg.name(*m))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("{:<28} {:<24} {}", entry.name.cyan(), alias, desc);
    }
}
