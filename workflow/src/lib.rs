mod error;
pub use error::{AggregatedErrors, Errors};

mod id;
pub use id::TaskId;

mod paths;
pub use paths::{OutputKind, PathConfig, StyleTarget};

mod task;
pub use task::{Action, Task, TaskEntry};

mod registry;
pub use registry::{Registry, RegistryBuilder};

/// Separates composite task members when printing execution paths,
/// e.g. "build:dev > clean > clean:css"
pub const PATH_DELIM: &str = " > ";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} does not exist: '{1}'")]
    ItemNotFound(String, String),
    #[error("Task declared more than once: '{0}'")]
    DuplicateTask(String),
    #[error("Task depends on itself: {0}")]
    ReflexiveTask(String),
    #[error("Circular task dependency: {0}")]
    CircularDependency(String),
    #[error("Composite task has no members: '{0}'")]
    EmptyComposite(String),
    #[error("Unknown config block '{0}' (expected 'paths' or 'clean')")]
    UnknownBlock(String),
    #[error("Unknown key '{1}' in config block '{0}'")]
    UnknownKey(String, String),
}
