mod app;
mod catalog;
mod cli;
mod codec;
mod community;
mod config;
mod http;
mod logging;
mod paths;
mod playlist;
mod search;
mod session;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    app::run(cli)
}
