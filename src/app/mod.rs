mod display;
mod tui;


use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::catalog::{Catalog, load_catalog};
use crate::cli::{Cli, Command, CommunityFormat, Format};
use crate::codec::{
    ExportKind, content_url, encode_aiopl, encode_links, encode_query, encode_text, export,
    read_playlist,
};
use crate::community::{
    CommunityPlaylist, by_creator, find_by_id, group_by_category, load_community,
};
use crate::config::Config;
use crate::logging;
use crate::playlist::Playlist;
use crate::search::{direct_link, search};

use self::display::{community_summary, truncate};

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let verbose = cli.verbose;

    match cli.command {
        Some(Command::Tui { open, url }) => run_tui(&config, verbose, open, url),
        None => run_tui(&config, verbose, None, None),
        Some(Command::Search { query }) => {
            let catalog = open_catalog(&config, verbose)?;
            run_search(&catalog, &query.join(" "))
        }
        Some(Command::Convert {
            input,
            to,
            full_ids,
        }) => {
            let catalog = open_catalog(&config, verbose)?;
            run_convert(&catalog, &config, input.as_deref(), to, full_ids)
        }
        Some(Command::Community {
            file,
            playlist,
            creator,
            format,
        }) => {
            let catalog = open_catalog(&config, verbose)?;
            run_community(&catalog, &config, &file, playlist, creator, format)
        }
        Some(Command::Info) => {
            let catalog = open_catalog(&config, verbose)?;
            run_info(&catalog, &config)
        }
    }
}

fn open_catalog(config: &Config, verbose: bool) -> Result<Catalog> {
    logging::init_stderr(verbose)?;
    Ok(load_catalog(config))
}

fn run_tui(
    config: &Config,
    verbose: bool,
    open: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    let _guard = logging::init_file(verbose)?;
    let catalog = load_catalog(config);
    tui::run_tui(catalog, config, open.as_deref(), url.as_deref())
}

fn run_search(catalog: &Catalog, query: &str) -> Result<()> {
    if let Some(id) = direct_link(query) {
        println!("Direct link: {} -> {}", catalog.name_of(&id), content_url(&id));
        return Ok(());
    }

    let matches = search(query, catalog);
    if matches.is_empty() {
        println!("No matching episode found.");
        return Ok(());
    }

    println!("{:<52} URL", "EPISODE");
    for record in matches {
        println!("{:<52} {}", truncate(&record.name, 52), content_url(&record.id));
    }
    Ok(())
}

fn run_convert(
    catalog: &Catalog,
    config: &Config,
    input: Option<&Path>,
    to: Format,
    full_ids: bool,
) -> Result<()> {
    let raw = read_input(input)?;
    let playlist = read_playlist(&raw, catalog).context("could not read a playlist from input")?;
    debug!(episodes = playlist.len(), ?to, "converting playlist");
    println!("{}", convert_playlist(&playlist, catalog, to, config.use_short_ids && !full_ids)?);
    Ok(())
}

pub(crate) fn convert_playlist(
    playlist: &Playlist,
    catalog: &Catalog,
    to: Format,
    use_short_ids: bool,
) -> Result<String> {
    let out = match to {
        Format::Url => encode_query(playlist, catalog, use_short_ids),
        Format::Text => encode_text(playlist),
        Format::Links => encode_links(playlist, catalog),
        Format::Aiopl => encode_aiopl(playlist),
        Format::Names => export(ExportKind::Names, playlist, catalog)?,
        Format::Urls => export(ExportKind::Urls, playlist, catalog)?,
        Format::Ids => export(ExportKind::Ids, playlist, catalog)?,
    };
    Ok(out)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

fn run_community(
    catalog: &Catalog,
    config: &Config,
    file: &Path,
    playlist_id: Option<String>,
    creator: Option<String>,
    format: CommunityFormat,
) -> Result<()> {
    let playlists = load_community(file)?;

    let selected: Vec<&CommunityPlaylist> = match (playlist_id.as_deref(), creator.as_deref()) {
        (Some(id), _) => match find_by_id(&playlists, id) {
            Some(playlist) => vec![playlist],
            None => bail!("No playlist found with ID: {id}"),
        },
        (None, Some(name)) => {
            let found = by_creator(&playlists, name);
            if found.is_empty() {
                bail!("No playlists found by creator: {name}");
            }
            let count = found.len();
            println!(
                "Showing {count} playlist{} by {name}\n",
                if count == 1 { "" } else { "s" }
            );
            found
        }
        (None, None) => playlists.iter().collect(),
    };

    let render = |playlist: &CommunityPlaylist| match format {
        CommunityFormat::Summary => None,
        CommunityFormat::Text => Some(playlist.clipboard_text(catalog)),
        CommunityFormat::Aiopl => Some(playlist.aiopl(catalog)),
        CommunityFormat::Url => Some(playlist.creator_url(&config.creator_url)),
    };
    if format != CommunityFormat::Summary {
        for out in selected.into_iter().filter_map(render) {
            println!("{out}");
        }
        return Ok(());
    }

    let owned = selected.into_iter().cloned().collect::<Vec<_>>();
    for (category, members) in group_by_category(&owned) {
        println!("== {category} ==");
        for playlist in members {
            println!("{}", community_summary(playlist, catalog));
        }
    }
    Ok(())
}

fn run_info(catalog: &Catalog, config: &Config) -> Result<()> {
    let with_short = catalog
        .records()
        .iter()
        .filter(|record| record.short_id.is_some())
        .count();
    println!("Episodes:        {}", catalog.len());
    println!("With short ids:  {with_short}");
    println!("Highest episode: #{}", catalog.highest_episode_number());
    println!("Catalog URL:     {}", config.catalog_url);
    if let Ok(path) = config.catalog_path() {
        println!("Catalog file:    {}", path.display());
    }
    println!("{}", catalog.search_hint());
    if let Some(first) = catalog.records().first() {
        println!("First entry:     {} -> {}", first.name, content_url(&first.id));
    }
    Ok(())
}
