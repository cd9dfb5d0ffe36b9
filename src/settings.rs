use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::args::Args;

/// Looked for in the project root when no config file is given.
pub const DEFAULT_CONFIG: &str = "sitebuild.conf";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no task specified")]
    NoTaskSpecified,
    #[error("Project root \"{0}\" is not a directory")]
    RootNotDirectory(String),
    #[error("Config file \"{0}\" does not exist")]
    ConfigNotFound(String),
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    /// None only when listing tasks
    pub task: Option<String>,
    /// canonicalized project root
    pub root: PathBuf,
    /// None means built-in default paths
    pub config: Option<PathBuf>,
    pub list: bool,
    pub dry_run: bool,
    pub verbose: u8,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.task.is_none() && !args.list {
            return Err(Error::NoTaskSpecified.into());
        }

        let root = PathBuf::from(&args.root);
        if !root.is_dir() {
            return Err(Error::RootNotDirectory(args.root).into());
        }
        let root = root
            .canonicalize()
            .with_context(|| format!("while resolving project root \"{}\"", args.root))?;

        let config = match args.config {
            Some(config) => {
                let path = PathBuf::from(&config);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(config).into());
                }
                Some(path.canonicalize()?)
            }
            None => Some(root.join(DEFAULT_CONFIG)).filter(|p| p.exists()),
        };

        Ok(Self {
            task: args.task,
            root,
            config,
            list: args.list,
            dry_run: args.dry_run,
            verbose: args.verbose,
        })
    }
}
