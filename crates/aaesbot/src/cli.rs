use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aaesbot")]
#[command(author, version, about = "Study bot for the aerospace engineering students' association", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Rebuild the flat materials index from the INDEX_ROOT_* folders
    SyncIndex,

    /// Run one search and print the matching files
    Search {
        /// Course name, code or topic
        term: String,

        /// Category filter: all, slides, pastq, skill, other
        #[arg(short, long, default_value = "all")]
        mode: String,

        /// Academic level, e.g. 200, L300 or "Level 400"
        #[arg(short, long)]
        level: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
