use crate::catalog::Catalog;
use crate::codec::content_url;
use crate::community::{CommunityPlaylist, SOFT_EPISODE_LIMIT, format_date};

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

pub(crate) fn episode_count_label(count: usize) -> String {
    if count > SOFT_EPISODE_LIMIT {
        format!("{count} Episodes (over the {SOFT_EPISODE_LIMIT} episode soft limit, expect slow loading)")
    } else {
        format!("{count} Episodes")
    }
}

pub(crate) fn community_summary(playlist: &CommunityPlaylist, catalog: &Catalog) -> String {
    let mut lines = vec![format!("{}  [{}]", playlist.name, playlist.id_text())];
    match playlist.creatorlink.as_deref() {
        Some(link) if !link.is_empty() => {
            lines.push(format!("  Created by: {} <{link}>", playlist.createdby));
        }
        _ => lines.push(format!("  Created by: {}", playlist.createdby)),
    }
    if let Some(updated) = playlist.lastupdated.as_deref()
        && !updated.trim().is_empty()
    {
        lines.push(format!("  Last updated: {}", format_date(updated)));
    }
    if !playlist.image_url.is_empty() {
        lines.push(format!("  Image: {}", playlist.image_url));
    }
    lines.push(format!("  {} Episodes", playlist.episodes.len()));
    if playlist.exceeds_soft_limit() {
        lines.push(format!(
            "  Warning: more than {SOFT_EPISODE_LIMIT} episodes may load slowly in the club app."
        ));
    }
    for episode in playlist.resolved_episodes(catalog) {
        lines.push(format!(
            "    {:<48} {}",
            truncate(&episode.name, 48),
            content_url(&episode.id)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis_past_limit() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("#123: A Very Long Title", 10), "#123: A...");
    }

    #[test]
    fn count_label_warns_over_soft_limit() {
        assert_eq!(episode_count_label(3), "3 Episodes");
        assert!(episode_count_label(SOFT_EPISODE_LIMIT + 1).contains("soft limit"));
        assert!(!episode_count_label(SOFT_EPISODE_LIMIT).contains("soft limit"));
    }
}
