use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the static site from a records directory.
    Build(BuildArgs),
    /// Check record files and report every problem found.
    Validate(ValidateArgs),
    /// Write only the search index.
    Index(IndexArgs),
    /// Query a published search index the way the search page does.
    Search(SearchArgs),
    /// Preview a built site over HTTP.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Directory of record metadata files (`*.json`, `*.md`).
    #[arg(long, default_value = "_records")]
    pub records: String,

    /// Output directory for the generated site.
    #[arg(long, default_value = "docs")]
    pub out: String,

    /// Site title shown in the header and page titles.
    #[arg(long, default_value = "Waypoint Digital Library")]
    pub title: String,

    /// Number of records embedded in the hero spotlight.
    #[arg(long, default_value_t = 8)]
    pub spotlight: usize,

    /// Maximum records per home-page shelf.
    #[arg(long, default_value_t = 12)]
    pub shelf_size: usize,

    /// Number of genres shown in the genre browser.
    #[arg(long, default_value_t = 6)]
    pub top_genres: usize,

    /// Additional path the search index is copied to.
    #[arg(long)]
    pub mirror_index: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Directory of record metadata files.
    #[arg(long, default_value = "_records")]
    pub records: String,

    /// JSON array of allowed subject headings.
    #[arg(long)]
    pub vocabulary: Option<String>,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory of record metadata files.
    #[arg(long, default_value = "_records")]
    pub records: String,

    /// Output path for the search index.
    #[arg(long, default_value = "search/index.json")]
    pub out: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Published search index (`search/index.json`).
    #[arg(long, default_value = "docs/search/index.json")]
    pub index: String,

    /// URL query string (`q=...&subject=...`) to start from.
    #[arg(long)]
    pub state: Option<String>,

    /// Keyword query.
    #[arg(long)]
    pub q: Option<String>,

    #[arg(long)]
    pub collection: Option<String>,

    /// Required subject; repeat to require several.
    #[arg(long)]
    pub subject: Vec<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Case-insensitive creator substring.
    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub era: Option<String>,

    /// Maximum rows to print.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Print facet counts after the results.
    #[arg(long)]
    pub facets: bool,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Built site directory.
    #[arg(long, default_value = "docs")]
    pub dir: String,

    #[arg(long, default_value = "127.0.0.1:4000")]
    pub addr: SocketAddr,
}
