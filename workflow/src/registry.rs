use anyhow::Result;

use util::{HashMap, Hasher, IdVec};

use crate::{Action, Error, Errors, OutputKind, StyleTarget, Task, TaskEntry, TaskId};

/// Task definition before member names are resolved.
#[derive(Debug)]
enum Body {
    Atomic(Action),
    Composite(Vec<String>),
}

#[derive(Debug)]
struct TaskDef {
    name: String,
    alias: Option<String>,
    body: Body,
}

/// Collects task declarations in any order;
/// names are resolved and checked all at once in [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: Vec<TaskDef>,
}

impl RegistryBuilder {
    /// Declare a task that performs a single action.
    pub fn atomic(&mut self, name: &str, alias: Option<&str>, action: Action) -> &mut Self {
        self.defs.push(TaskDef {
            name: name.to_owned(),
            alias: alias.map(str::to_owned),
            body: Body::Atomic(action),
        });
        self
    }

    /// Declare a task that runs other tasks, in order.
    pub fn composite(&mut self, name: &str, alias: Option<&str>, members: &[&str]) -> &mut Self {
        self.defs.push(TaskDef {
            name: name.to_owned(),
            alias: alias.map(str::to_owned),
            body: Body::Composite(members.iter().map(|&m| m.to_owned()).collect()),
        });
        self
    }

    /// Resolve member names and reject duplicates, unknown members,
    /// empty composites, and dependency cycles.
    pub fn build(self) -> Result<Registry> {
        let mut lookup = HashMap::with_capacity_and_hasher(self.defs.len() * 2, Hasher::default());
        for (i, def) in self.defs.iter().enumerate() {
            let id = TaskId::from(i);
            for name in std::iter::once(&def.name).chain(def.alias.as_ref()) {
                if lookup.insert(name.clone(), id).is_some() {
                    return Err(Error::DuplicateTask(name.clone()).into());
                }
            }
        }

        let mut errors = Errors::default();
        let mut tasks = IdVec::with_capacity(self.defs.len());
        for def in self.defs {
            let task = match def.body {
                Body::Atomic(action) => Task::Atomic(action),
                Body::Composite(members) => {
                    if members.is_empty() {
                        errors.add(Error::EmptyComposite(def.name.clone()).into());
                    }
                    let mut ids = Vec::with_capacity(members.len());
                    for member in members {
                        match lookup.get(&member) {
                            Some(id) => ids.push(*id),
                            None => errors.add_context(
                                Error::ItemNotFound("Task".to_owned(), member).into(),
                                format!("in members of '{}'", def.name),
                            ),
                        }
                    }
                    Task::Composite(ids)
                }
            };
            tasks.push(TaskEntry {
                name: def.name,
                alias: def.alias,
                task,
            });
        }
        errors.print_recap("building task registry")?;

        let registry = Registry { tasks, lookup };
        registry.check_cycles()?;
        Ok(registry)
    }
}

/// All tasks that can be invoked, built once at startup.
#[derive(Debug)]
pub struct Registry {
    tasks: IdVec<TaskId, TaskEntry>,
    lookup: HashMap<String, TaskId>,
}

impl Registry {
    /// The fixed set of site build tasks.
    #[rustfmt::skip]
    pub fn standard() -> Result<Self> {
        use Action::*;
        use StyleTarget::*;

        let mut b = RegistryBuilder::default();
        b.atomic("clean:css", Some("cleanStyles"), Clean(OutputKind::Styles))
            .atomic("clean:js", Some("cleanScripts"), Clean(OutputKind::Scripts))
            .composite("clean", None, &["clean:css", "clean:js"])
            .atomic("process:SassLandingStyles", Some("compileLandingStyles"), CompileStyles(Landing))
            .atomic("process:SassDashBoardStyles", Some("compileDashboardStyles"), CompileStyles(Dashboard))
            .atomic("minify:LandingStyles", Some("minifyLandingStyles"), MinifyStyles(Landing))
            .atomic("minify:DashBoardStyles", Some("minifyDashboardStyles"), MinifyStyles(Dashboard))
            .atomic("build:js", Some("bundleScripts"), BundleScripts)
            .atomic("minify:js", Some("bundleAndMinifyScripts"), BundleAndMinifyScripts)
            .composite("build:styles", Some("buildStyles"), &[
                "process:SassLandingStyles",
                "process:SassDashBoardStyles",
                "minify:LandingStyles",
                "minify:DashBoardStyles",
            ])
            .composite("build:dev", Some("buildDev"), &[
                "clean",
                "process:SassLandingStyles",
                "process:SassDashBoardStyles",
                "build:js",
            ])
            .composite("build:prod", Some("buildProd"), &[
                "clean",
                "minify:LandingStyles",
                "minify:DashBoardStyles",
                "minify:js",
            ]);
        b.build()
    }

    /// Look up a task by its name or alias.
    pub fn find(&self, name: &str) -> Result<TaskId> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| Error::ItemNotFound("Task".to_owned(), name.to_owned()).into())
    }

    /// Get the task with the given id.
    #[inline]
    pub fn get(&self, id: TaskId) -> &TaskEntry {
        self.tasks.get(id)
    }

    /// Name of the task with the given id.
    #[inline]
    pub fn name(&self, id: TaskId) -> &str {
        &self.tasks.get(id).name
    }

    /// Iterate over all tasks in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &TaskEntry)> {
        self.tasks.enumerate()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Depth-first search from every task, failing if any task
    /// can reach itself through composite members.
    fn check_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks: IdVec<TaskId, Mark> = IdVec::fill(Mark::Unvisited, self.tasks.len());
        let mut stack: Vec<TaskId> = Vec::with_capacity(8);

        fn visit(
            reg: &Registry,
            id: TaskId,
            marks: &mut IdVec<TaskId, Mark>,
            stack: &mut Vec<TaskId>,
        ) -> Result<()> {
            match *marks.get(id) {
                Mark::Done => return Ok(()),
                Mark::InProgress => {
                    let start = stack.iter().position(|t| *t == id).unwrap_or(0);
                    if stack.len() - start == 1 {
                        return Err(Error::ReflexiveTask(reg.name(id).to_owned()).into());
                    }
                    let mut path: Vec<&str> = stack[start..].iter().map(|t| reg.name(*t)).collect();
                    path.push(reg.name(id));
                    return Err(Error::CircularDependency(path.join(" -> ")).into());
                }
                Mark::Unvisited => (),
            }
            *marks.get_mut(id) = Mark::InProgress;
            stack.push(id);
            if let Task::Composite(members) = &reg.get(id).task {
                for member in members {
                    visit(reg, *member, marks, stack)?;
                }
            }
            stack.pop();
            *marks.get_mut(id) = Mark::Done;
            Ok(())
        }

        for (id, _) in self.tasks.enumerate() {
            visit(self, id, &mut marks, &mut stack)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_standard_registry() -> Result<()> {
        let reg = Registry::standard()?;
        assert_eq!(12, reg.len());
        for name in [
            "clean",
            "clean:css",
            "clean:js",
            "process:SassLandingStyles",
            "process:SassDashBoardStyles",
            "minify:LandingStyles",
            "minify:DashBoardStyles",
            "build:js",
            "minify:js",
            "build:styles",
            "build:dev",
            "build:prod",
        ] {
            let id = reg.find(name)?;
            assert_eq!(name, reg.name(id));
        }
        assert_eq!(reg.find("buildDev")?, reg.find("build:dev")?);
        assert_eq!(
            Task::Atomic(Action::Clean(OutputKind::Styles)),
            reg.get(reg.find("cleanStyles")?).task
        );
        Ok(())
    }

    #[test]
    fn test_unknown_task() -> Result<()> {
        let reg = Registry::standard()?;
        let e = reg.find("watch").unwrap_err();
        assert_eq!("Task does not exist: 'watch'", e.to_string());
        Ok(())
    }

    #[test]
    fn test_forward_reference_is_resolved() -> Result<()> {
        let mut b = RegistryBuilder::default();
        b.composite("all", None, &["js"])
            .atomic("js", None, Action::BundleScripts);
        let reg = b.build()?;
        assert_eq!(
            Task::Composite(vec![reg.find("js")?]),
            reg.get(reg.find("all")?).task
        );
        Ok(())
    }

    #[test]
    fn test_unknown_member() {
        let mut b = RegistryBuilder::default();
        b.composite("all", None, &["js", "css"])
            .atomic("js", None, Action::BundleScripts);
        let e = b.build().unwrap_err();
        assert_eq!(
            "building task registry failed due to 1 errors",
            e.to_string()
        );
    }

    #[test]
    fn test_duplicate_name() {
        let mut b = RegistryBuilder::default();
        b.atomic("js", None, Action::BundleScripts)
            .atomic("min", Some("js"), Action::BundleAndMinifyScripts);
        let e = b.build().unwrap_err();
        assert!(matches!(e.downcast_ref::<Error>(), Some(Error::DuplicateTask(n)) if n == "js"));
    }

    #[test]
    fn test_reflexive_task() {
        let mut b = RegistryBuilder::default();
        b.composite("loop", None, &["loop"]);
        let e = b.build().unwrap_err();
        assert!(matches!(e.downcast_ref::<Error>(), Some(Error::ReflexiveTask(n)) if n == "loop"));
    }

    #[test]
    fn test_transitive_cycle() {
        let mut b = RegistryBuilder::default();
        b.composite("a", None, &["b"])
            .composite("b", None, &["js", "c"])
            .composite("c", None, &["a"])
            .atomic("js", None, Action::BundleScripts);
        let e = b.build().unwrap_err();
        match e.downcast_ref::<Error>() {
            Some(Error::CircularDependency(path)) => assert_eq!("a -> b -> c -> a", path),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_composite() {
        let mut b = RegistryBuilder::default();
        b.composite("nothing", None, &[]);
        assert!(b.build().is_err());
    }
}
