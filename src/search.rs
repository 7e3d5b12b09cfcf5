use crate::catalog::{Catalog, EpisodeRecord};
use crate::codec::CONTENT_URL_PREFIX;

pub const MAX_RESULTS: usize = 15;

/// Case-insensitive substring search over display names, earliest match first.
pub fn search<'a>(query: &str, catalog: &'a Catalog) -> Vec<&'a EpisodeRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches = catalog
        .records()
        .iter()
        .filter_map(|record| {
            record
                .name
                .to_lowercase()
                .find(&query)
                .map(|position| (position, record))
        })
        .collect::<Vec<_>>();
    matches.sort_by_key(|(position, _)| *position);
    matches
        .into_iter()
        .take(MAX_RESULTS)
        .map(|(_, record)| record)
        .collect()
}

/// Identifier named by a pasted or typed content link, if the query is one.
pub fn direct_link(query: &str) -> Option<String> {
    let rest = query.trim().strip_prefix(CONTENT_URL_PREFIX)?;
    let id = rest
        .split(|ch: char| ch == '/' || ch == '?' || ch.is_whitespace())
        .next()
        .unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}
