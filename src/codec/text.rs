use std::sync::LazyLock;

use regex::Regex;

use crate::playlist::Playlist;

use super::{CONTENT_URL_PREFIX, content_url};

static NAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^name:\s*"(.*)"$"#).expect("name line pattern is valid"));
static IMAGE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^imageURL:\s*"(.*)"$"#).expect("imageURL line pattern is valid")
});

/// Clipboard form: quoted name and image lines, then space-joined content URLs.
pub fn encode_text(playlist: &Playlist) -> String {
    let links = playlist
        .episodes
        .iter()
        .map(|id| content_url(id))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "name: \"{}\"\nimageURL: \"{}\"\n{links}",
        playlist.name, playlist.image_url
    )
}

pub fn has_text_markers(raw: &str) -> bool {
    raw.contains("name:") && raw.contains("imageURL:")
}

pub fn decode_text(raw: &str) -> Option<Playlist> {
    let lines = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();
    if lines.len() < 3 {
        return None;
    }

    let name = NAME_LINE_RE.captures(lines[0])?[1].to_string();
    let image_url = IMAGE_LINE_RE.captures(lines[1])?[1].to_string();
    let episodes = lines[2..]
        .join(" ")
        .split_whitespace()
        .filter_map(|link| link.strip_prefix(CONTENT_URL_PREFIX))
        .map(str::to_string)
        .collect();
    Some(Playlist::new(name, image_url, episodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_expected_layout() {
        let playlist = Playlist::new("Mix", "", vec!["a3A".to_string(), "a3B".to_string()]);
        assert_eq!(
            encode_text(&playlist),
            "name: \"Mix\"\nimageURL: \"\"\nhttps://app.adventuresinodyssey.com/content/a3A https://app.adventuresinodyssey.com/content/a3B"
        );
    }

    #[test]
    fn ignores_foreign_tokens_and_blank_lines() {
        let raw = "\n  name: \"Mix\"\n\nimageURL:\"https://i\"\nhttps://app.adventuresinodyssey.com/content/a3A junk\nhttps://other.site/a3Z https://app.adventuresinodyssey.com/content/a3B\n";
        let playlist = decode_text(raw).expect("should decode");
        assert_eq!(playlist.name, "Mix");
        assert_eq!(playlist.image_url, "https://i");
        assert_eq!(playlist.episodes, vec!["a3A", "a3B"]);
    }

    #[test]
    fn rejects_unquoted_or_short_input() {
        assert!(decode_text("name: Mix\nimageURL: \"\"\nx").is_none());
        assert!(decode_text("name: \"Mix\"\nimageURL: \"\"").is_none());
        assert!(has_text_markers("name: \"a\" imageURL: \"b\""));
        assert!(!has_text_markers("name: only"));
    }
}
