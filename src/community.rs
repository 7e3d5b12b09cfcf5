use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::catalog::Catalog;
use crate::codec::{encode_aiopl_compact, encode_text};
use crate::playlist::Playlist;

/// Category sections shown first, in this order; others follow as first seen.
pub const CATEGORY_ORDER: [&str; 4] = ["Characters & Arcs", "Themes", "Personal Favorites", "Other"];

/// Above this many episodes the club app becomes sluggish.
pub const SOFT_EPISODE_LIMIT: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct CommunityPlaylist {
    #[serde(default)]
    pub id: Value,
    pub name: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    #[serde(default)]
    pub createdby: String,
    #[serde(default)]
    pub creatorlink: Option<String>,
    #[serde(default)]
    pub lastupdated: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub episodes: Vec<String>,
}

fn default_category() -> String {
    "Other".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEpisode {
    pub id: String,
    pub name: String,
}

impl CommunityPlaylist {
    pub fn id_text(&self) -> String {
        match &self.id {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn exceeds_soft_limit(&self) -> bool {
        self.episodes.len() > SOFT_EPISODE_LIMIT
    }

    /// Episodes as full ids with display names; short ids are expanded.
    pub fn resolved_episodes(&self, catalog: &Catalog) -> Vec<ResolvedEpisode> {
        self.episodes
            .iter()
            .map(|id| ResolvedEpisode {
                id: catalog.resolve(id),
                name: catalog.name_of(id).to_string(),
            })
            .collect()
    }

    pub fn to_playlist(&self, catalog: &Catalog) -> Playlist {
        Playlist::new(
            self.name.clone(),
            self.image_url.clone(),
            self.episodes.iter().map(|id| catalog.resolve(id)).collect(),
        )
    }

    pub fn clipboard_text(&self, catalog: &Catalog) -> String {
        encode_text(&self.to_playlist(catalog))
    }

    pub fn aiopl(&self, catalog: &Catalog) -> String {
        encode_aiopl_compact(&self.to_playlist(catalog))
    }

    /// Link that opens this playlist in the builder; ids are passed through as stored.
    pub fn creator_url(&self, base_url: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("n", &self.name)
            .append_pair("i", &self.image_url)
            .append_pair("e", &self.episodes.join("."))
            .finish();
        format!("{base_url}?{query}")
    }
}

pub fn load_community(path: &Path) -> Result<Vec<CommunityPlaylist>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not load playlist data from {}", path.display()))?;
    parse_community(&raw).with_context(|| format!("invalid playlist data in {}", path.display()))
}

pub fn parse_community(raw: &str) -> Result<Vec<CommunityPlaylist>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn group_by_category(playlists: &[CommunityPlaylist]) -> Vec<(String, Vec<&CommunityPlaylist>)> {
    let mut groups: Vec<(String, Vec<&CommunityPlaylist>)> = Vec::new();
    for playlist in playlists {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == playlist.category)
        {
            Some((_, members)) => members.push(playlist),
            None => groups.push((playlist.category.clone(), vec![playlist])),
        }
    }

    let rank = |category: &str| {
        CATEGORY_ORDER
            .iter()
            .position(|known| *known == category)
            .unwrap_or(CATEGORY_ORDER.len())
    };
    groups.sort_by_key(|(category, _)| rank(category));
    groups
}

pub fn find_by_id<'a>(playlists: &'a [CommunityPlaylist], id: &str) -> Option<&'a CommunityPlaylist> {
    playlists.iter().find(|playlist| playlist.id_text() == id)
}

pub fn by_creator<'a>(playlists: &'a [CommunityPlaylist], creator: &str) -> Vec<&'a CommunityPlaylist> {
    let target = creator.to_lowercase();
    playlists
        .iter()
        .filter(|playlist| !playlist.createdby.is_empty() && playlist.createdby.to_lowercase() == target)
        .collect()
}

/// `2024-03-05` -> `March 5, 2024`; unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"));
    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
