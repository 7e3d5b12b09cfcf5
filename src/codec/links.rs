use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::Catalog;
use crate::playlist::Playlist;

use super::content_url;

static HYPERLINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(https://app\.adventuresinodyssey\.com/content/([^)]+)\)")
        .expect("hyperlink pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedEpisode {
    pub name: String,
    pub id: String,
}

/// Markdown-style `[name](url)` per episode, separated by blank lines.
pub fn encode_links(playlist: &Playlist, catalog: &Catalog) -> String {
    playlist
        .episodes
        .iter()
        .map(|id| format!("[{}]({})", catalog.label_of(id), content_url(id)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn decode_links(raw: &str) -> Vec<LinkedEpisode> {
    HYPERLINK_RE
        .captures_iter(raw)
        .map(|caps| LinkedEpisode {
            name: caps[1].to_string(),
            id: caps[2].to_string(),
        })
        .collect()
}
