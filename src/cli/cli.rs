use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Ref path to look up; prints the subtree under it instead of the whole tree
    pub path: Option<String>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The root directory of the repository
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,
}
