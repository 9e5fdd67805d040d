//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for confine
#[derive(Parser, Debug)]
#[command(name = "confine")]
#[command(author, version, about = "Run a model-driven coding agent confined to one directory")]
#[command(long_about = r#"
confine sends your prompt to a Gemini model together with a fixed set of
tools (file, search, execution, git, analysis, refactoring). Every path a
tool touches is resolved inside the working directory; anything outside it
is refused.

The model gets a bounded number of rounds to call tools and answer.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./confine.toml      Project-level config
3. ~/.config/confine/config.toml   Global config

GEMINI_API_KEY must be set (a .env file in the current directory is read).

Example:
  confine -w ./calculator "Fix the bug in the calculator and run its tests"
  confine --max-iterations 10 -v "Summarize the git history"
"#)]
pub struct Cli {
    /// What the agent should do
    #[arg(required_unless_present = "show_config")]
    pub prompt: Option<String>,

    /// Directory the tools are confined to
    #[arg(short = 'w', long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Gemini model to use
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Maximum model rounds before giving up
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide tool results and the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append the conversation as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
