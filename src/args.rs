use clap::{ArgAction, Parser};

const CMD_NAME: &str = "sitebuild";
const DEFAULT_ROOT: &str = ".";

/// Stores our command-line args format.
#[derive(Parser, Debug, Default)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Name or alias of the task to run
    #[arg(value_name = "TASK", required_unless_present = "list")]
    pub task: Option<String>,

    /// Project root; relative paths are resolved against it
    #[arg(short = 'C', long, value_name = "DIR", default_value = DEFAULT_ROOT)]
    #[arg(env = "SITEBUILD_ROOT")]
    pub root: String,

    /// Path config file (defaults to 'sitebuild.conf' in the project root, if present)
    #[arg(short, long, value_name = "FILE")]
    #[arg(env = "SITEBUILD_CONFIG")]
    pub config: Option<String>,

    /// List available tasks and exit
    #[arg(short, long)]
    pub list: bool,

    /// Dry run; print execution order but don't modify anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print additional info (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
