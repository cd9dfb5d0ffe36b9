use std::ops::Range;

use anyhow::Result;
use colored::Colorize;

use workflow::{Action, Registry, TaskId, PATH_DELIM};

use crate::dfs;

/// One atomic task to run, in context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub task: TaskId,
    pub action: Action,
    /// composite tasks enclosing this step, outermost first.
    pub parents: Vec<TaskId>,
}

/// The steps covered by one composite task in the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub task: TaskId,
    pub steps: Range<usize>,
}

/// A goal task expanded into run order.
#[derive(Debug)]
pub struct Traversal {
    pub goal: TaskId,
    /// atomic steps in the order they must run.
    pub steps: Vec<Step>,
    /// composite tasks, in the order they were entered.
    pub spans: Vec<Span>,
}

impl Traversal {
    /// Expand `goal` into a list of atomic steps.
    pub fn create(reg: &Registry, goal: TaskId) -> Result<Self> {
        let mut traversal = Self {
            goal,
            steps: Vec::with_capacity(8),
            spans: Vec::with_capacity(4),
        };
        let mut parents = Vec::with_capacity(4);
        dfs::expand(reg, goal, &mut parents, &mut traversal)?;

        log::debug!(
            "expanded '{}' into {} steps and {} composite tasks",
            reg.name(goal),
            traversal.steps.len(),
            traversal.spans.len(),
        );
        Ok(traversal)
    }

    /// e.g. "build:dev > clean > clean:css"
    pub fn step_path(&self, idx: usize, reg: &Registry) -> String {
        let step = &self.steps[idx];
        let mut parts: Vec<&str> = step.parents.iter().map(|t| reg.name(*t)).collect();
        parts.push(reg.name(step.task));
        parts.join(PATH_DELIM)
    }

    /// Print the execution order to stderr.
    pub fn print(&self, reg: &Registry) {
        eprintln!(
            "{} {}:",
            "Execution order for".magenta(),
            reg.name(self.goal).cyan()
        );
        for (i, step) in self.steps.iter().enumerate() {
            eprintln!(
                "{:>3}. {} ({})",
                i + 1,
                self.step_path(i, reg),
                step.action
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use workflow::{OutputKind, RegistryBuilder, StyleTarget};

    fn names(t: &Traversal, reg: &Registry) -> Vec<String> {
        t.steps.iter().map(|s| reg.name(s.task).to_owned()).collect()
    }

    #[test]
    fn test_atomic_goal() -> Result<()> {
        let reg = Registry::standard()?;
        let t = Traversal::create(&reg, reg.find("build:js")?)?;
        assert_eq!(vec!["build:js"], names(&t, &reg));
        assert!(t.spans.is_empty());
        assert!(t.steps[0].parents.is_empty());
        assert_eq!(Action::BundleScripts, t.steps[0].action);
        Ok(())
    }

    #[test]
    fn test_build_dev_order() -> Result<()> {
        let reg = Registry::standard()?;
        let t = Traversal::create(&reg, reg.find("build:dev")?)?;
        assert_eq!(
            vec![
                "clean:css",
                "clean:js",
                "process:SassLandingStyles",
                "process:SassDashBoardStyles",
                "build:js",
            ],
            names(&t, &reg)
        );
        assert_eq!(
            vec![
                Span { task: reg.find("build:dev")?, steps: 0..5 },
                Span { task: reg.find("clean")?, steps: 0..2 },
            ],
            t.spans
        );
        assert_eq!("build:dev > clean > clean:js", t.step_path(1, &reg));
        assert_eq!(Action::Clean(OutputKind::Scripts), t.steps[1].action);
        Ok(())
    }

    #[test]
    fn test_build_prod_order() -> Result<()> {
        let reg = Registry::standard()?;
        let t = Traversal::create(&reg, reg.find("buildProd")?)?;
        assert_eq!(
            vec![
                "clean:css",
                "clean:js",
                "minify:LandingStyles",
                "minify:DashBoardStyles",
                "minify:js",
            ],
            names(&t, &reg)
        );
        assert_eq!(
            Action::MinifyStyles(StyleTarget::Dashboard),
            t.steps[3].action
        );
        Ok(())
    }

    #[test]
    fn test_repeated_member_runs_twice() -> Result<()> {
        let mut b = RegistryBuilder::default();
        b.atomic("js", None, Action::BundleScripts)
            .composite("twice", None, &["js", "js"]);
        let reg = b.build()?;
        let t = Traversal::create(&reg, reg.find("twice")?)?;
        assert_eq!(vec!["js", "js"], names(&t, &reg));
        Ok(())
    }
}
