use url::form_urlencoded;

use crate::catalog::Catalog;
use crate::playlist::Playlist;

use super::FULL_ID_PREFIX;

/// Shareable query string (`?n=..&i=..&e=..`).
pub fn encode_query(playlist: &Playlist, catalog: &Catalog, use_short_ids: bool) -> String {
    let episodes = playlist
        .episodes
        .iter()
        .map(|id| match catalog.short_id(id) {
            Some(short_id) if use_short_ids => short_id,
            _ => id.as_str(),
        })
        .collect::<Vec<_>>()
        .join(".");

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("n", &playlist.name)
        .append_pair("i", &playlist.image_url)
        .append_pair("e", &episodes)
        .finish();
    format!("?{query}")
}

/// Reads a full URL, a `?query` or a bare query. `None` when there is no
/// episode list to load.
pub fn decode_query(input: &str, catalog: &Catalog) -> Option<Playlist> {
    let trimmed = input.trim();
    let query = match trimmed.split_once('?') {
        Some((_, query)) => query,
        None => trimmed,
    };
    let query = query.split('#').next().unwrap_or_default();

    let mut name = String::new();
    let mut image_url = String::new();
    let mut encoded = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "n" => name = value.into_owned(),
            "i" => image_url = value.into_owned(),
            "e" => encoded = Some(value.into_owned()),
            _ => {}
        }
    }

    let encoded = encoded.filter(|value| !value.is_empty())?;
    let episodes = encoded
        .split('.')
        .filter_map(|token| resolve_token(token, catalog))
        .collect();
    Some(Playlist::new(name, image_url, episodes))
}

fn resolve_token(token: &str, catalog: &Catalog) -> Option<String> {
    if let Some(full) = catalog.full_id(token) {
        return Some(full.to_string());
    }
    if token.starts_with(FULL_ID_PREFIX) || catalog.is_catalogued(token) {
        return Some(token.to_string());
    }
    None
}
