use clap::{Parser, Subcommand};

mod args;


pub use args::{BuildIndexArgs, InspectArgs, SearchArgs, WebArgs};

#[derive(Debug, Parser)]
#[command(name = "blogdex")]
#[command(about = "Keyword and tag search over a published blog index", version)]
pub struct Cli {
    /// Log at debug level unless `RUST_LOG` is set.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Log warnings and errors only unless `RUST_LOG` is set.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a search index artifact from markdown articles.
    BuildIndex(BuildIndexArgs),
    /// Run one search and print the response JSON.
    Search(SearchArgs),
    /// Print artifact metadata and counts.
    Inspect(InspectArgs),
    /// Serve `/api/search` over HTTP.
    Web(WebArgs),
}
