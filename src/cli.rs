use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "aiopl",
    version,
    about = "Build, share and convert Adventures in Odyssey playlists"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive playlist builder
    Tui {
        /// Start from an .aiopl, .json or .txt playlist file
        #[arg(long)]
        open: Option<PathBuf>,
        /// Start from a share link or its query string
        #[arg(long)]
        url: Option<String>,
    },
    /// Search episode names
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Convert a playlist between formats (reads stdin when no input is given)
    Convert {
        input: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        to: Format,
        /// Write full ids in share links instead of short aliases
        #[arg(long)]
        full_ids: bool,
    },
    /// Browse published community playlists
    Community {
        file: PathBuf,
        #[arg(long, conflicts_with = "creator")]
        playlist: Option<String>,
        #[arg(long)]
        creator: Option<String>,
        #[arg(long, value_enum, default_value_t = CommunityFormat::Summary)]
        format: CommunityFormat,
    },
    /// Show catalog statistics
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Share link query string
    Url,
    /// name:/imageURL: clipboard text
    Text,
    /// [name](url) inline links
    Links,
    /// .aiopl JSON document
    Aiopl,
    Names,
    Urls,
    Ids,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommunityFormat {
    Summary,
    Text,
    Aiopl,
    Url,
}
