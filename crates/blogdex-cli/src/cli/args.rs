use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct BuildIndexArgs {
    /// Directory holding `<slug>/index.md` articles.
    #[arg(long, value_name = "DIR")]
    pub articles: PathBuf,
    #[arg(long, value_name = "FILE", default_value = "public/search-index.json")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: Option<String>,
    /// Comma separated tags; results must carry all of them.
    #[arg(long)]
    pub tags: Option<String>,
    /// Read this artifact file instead of the configured source.
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8787)]
    pub port: u16,
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
}
