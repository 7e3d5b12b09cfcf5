mod load;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

pub use load::load_catalog;

pub const UNKNOWN_EPISODE: &str = "Unknown Episode";

static EPISODE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+):").expect("episode number pattern is valid"));

/// How catalog lines are split into identifier and name columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogLayout {
    /// Per line: 3+ tokens carry a short id, exactly 2 tokens are `id name`.
    #[default]
    Auto,
    /// Every line is `id name...`, no short ids anywhere.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub short_id: Option<String>,
    pub id: String,
    pub name: String,
}

impl EpisodeRecord {
    pub fn is_placeholder(&self) -> bool {
        self.name == UNKNOWN_EPISODE
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EpisodeRecord>,
    // full id -> index into `records`
    by_id: HashMap<String, usize>,
    short_to_full: HashMap<String, String>,
    full_to_short: HashMap<String, String>,
    // records present at load; later ones are placeholders or pasted names
    loaded: usize,
}

impl Catalog {
    #[cfg(test)]
    pub fn parse(raw: &str) -> Self {
        Self::parse_with_layout(raw, CatalogLayout::Auto)
    }

    pub fn parse_with_layout(raw: &str, layout: CatalogLayout) -> Self {
        let mut catalog = Self::default();
        let mut skipped_lines = 0usize;
        for line in raw.lines() {
            match parse_catalog_line(line, layout) {
                Some(record) => catalog.push(record),
                None if !line.trim().is_empty() => skipped_lines += 1,
                None => {}
            }
        }
        if skipped_lines > 0 {
            debug!(skipped_lines, "ignored malformed catalog line(s)");
        }
        catalog.loaded = catalog.records.len();
        catalog
    }

    fn push(&mut self, record: EpisodeRecord) {
        if let Some(short_id) = record.short_id.as_ref() {
            self.short_to_full.insert(short_id.clone(), record.id.clone());
            self.full_to_short.insert(record.id.clone(), short_id.clone());
        }
        // Last record for an id wins the lookup; earlier duplicates stay in load order.
        self.by_id.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&EpisodeRecord> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Natural load-order position of a full identifier. Records added after
    /// load have no position.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied().filter(|&idx| idx < self.loaded)
    }

    /// Whether `id` came from the loaded catalog rather than a later placeholder.
    pub fn is_catalogued(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn full_id(&self, short_id: &str) -> Option<&str> {
        self.short_to_full.get(short_id).map(String::as_str)
    }

    pub fn short_id(&self, id: &str) -> Option<&str> {
        self.full_to_short.get(id).map(String::as_str)
    }

    /// Full identifier for a short alias, or the input unchanged.
    pub fn resolve(&self, id: &str) -> String {
        self.full_id(id).unwrap_or(id).to_string()
    }

    /// Display name for either identifier form.
    pub fn name_of(&self, id: &str) -> &str {
        let full = self.full_id(id).unwrap_or(id);
        self.get(full)
            .map(|record| record.name.as_str())
            .unwrap_or(UNKNOWN_EPISODE)
    }

    /// Display name, falling back to the raw identifier for ids the catalog never saw.
    pub fn label_of(&self, id: &str) -> String {
        match self.get(id) {
            Some(record) => record.name.clone(),
            None => id.to_string(),
        }
    }

    pub fn ensure_placeholder(&mut self, id: &str) -> bool {
        if id.is_empty() || self.contains(id) {
            return false;
        }
        debug!(id, "adding placeholder record for unknown identifier");
        self.push(EpisodeRecord {
            short_id: None,
            id: id.to_string(),
            name: UNKNOWN_EPISODE.to_string(),
        });
        true
    }

    /// Records a name seen in imported data. Only placeholders are upgraded.
    pub fn record_name(&mut self, id: &str, name: &str) {
        match self.by_id.get(id) {
            Some(&idx) => {
                let record = &mut self.records[idx];
                if record.is_placeholder() {
                    record.name = name.to_string();
                }
            }
            None => self.push(EpisodeRecord {
                short_id: None,
                id: id.to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EpisodeRecord> {
        let target = name.to_lowercase();
        self.records
            .iter()
            .find(|record| record.name.to_lowercase() == target)
    }

    pub fn highest_episode_number(&self) -> u32 {
        self.records
            .iter()
            .filter_map(|record| EPISODE_NUMBER_RE.captures(&record.name))
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0)
    }

    pub fn search_hint(&self) -> String {
        match self.highest_episode_number() {
            0 => "Search for episodes or paste an episode link".to_string(),
            max => format!("Search for episodes (up to #{max}) or paste an episode link"),
        }
    }
}

pub fn parse_catalog_line(line: &str, layout: CatalogLayout) -> Option<EpisodeRecord> {
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    match (layout, tokens.len()) {
        (CatalogLayout::Auto, n) if n >= 3 => Some(EpisodeRecord {
            short_id: Some(tokens[0].to_string()),
            id: tokens[1].to_string(),
            name: tokens[2..].join(" "),
        }),
        (CatalogLayout::Auto, 2) => Some(EpisodeRecord {
            short_id: None,
            id: tokens[0].to_string(),
            name: tokens[1].to_string(),
        }),
        (CatalogLayout::Legacy, n) if n >= 2 => Some(EpisodeRecord {
            short_id: None,
            id: tokens[0].to_string(),
            name: tokens[1..].join(" "),
        }),
        _ => None,
    }
}

#[cfg(test)]
pub fn sample_catalog() -> Catalog {
    Catalog::parse(
        "00\ta3A000001\t#1: Whit's Visitor\n\
         01\ta3A000002\t#2: The Ep Adventure\n\
         02\ta3A000003\t#3: A Big Ep\n\
         03\ta3A000004\t#10: Gone Fishin'\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_full_identifiers() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.full_id("01"), Some("a3A000002"));
        assert_eq!(catalog.short_id("a3A000002"), Some("01"));
        assert_eq!(catalog.name_of("01"), "#2: The Ep Adventure");
        assert_eq!(catalog.name_of("a3A000002"), "#2: The Ep Adventure");
    }

    #[test]
    fn joins_multi_word_names_with_single_spaces() {
        let catalog = Catalog::parse("0a  a3X   Name   with   gaps\n");
        assert_eq!(catalog.get("a3X").map(|r| r.name.as_str()), Some("Name with gaps"));
    }

    #[test]
    fn one_token_lines_are_dropped_without_error() {
        let catalog = Catalog::parse("lonely\n\n00 a3A Real Name\n   \n");
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains("lonely"));
    }

    #[test]
    fn two_token_lines_use_legacy_shape() {
        let catalog = Catalog::parse("a3Legacy Title\n");
        let record = catalog.get("a3Legacy").expect("legacy record");
        assert_eq!(record.short_id, None);
        assert_eq!(record.name, "Title");
    }

    #[test]
    fn legacy_layout_treats_first_token_as_full_id() {
        let catalog =
            Catalog::parse_with_layout("a3A000001 #1: Whit's Visitor\n", CatalogLayout::Legacy);
        let record = catalog.get("a3A000001").expect("legacy record");
        assert_eq!(record.name, "#1: Whit's Visitor");
        assert_eq!(catalog.full_id("a3A000001"), None);
    }

    #[test]
    fn unknown_ids_resolve_to_placeholder_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.name_of("nope"), UNKNOWN_EPISODE);
        assert_eq!(catalog.resolve("nope"), "nope");
        assert_eq!(catalog.resolve("00"), "a3A000001");
    }

    #[test]
    fn placeholder_is_created_only_once() {
        let mut catalog = sample_catalog();
        assert!(catalog.ensure_placeholder("a3Unknown"));
        assert!(!catalog.ensure_placeholder("a3Unknown"));
        assert_eq!(
            catalog
                .records()
                .iter()
                .filter(|record| record.id == "a3Unknown")
                .count(),
            1
        );
        assert_eq!(catalog.name_of("a3Unknown"), UNKNOWN_EPISODE);
    }

    #[test]
    fn records_added_after_load_have_no_position() {
        let mut catalog = sample_catalog();
        assert_eq!(catalog.position("a3A000003"), Some(2));
        catalog.ensure_placeholder("a3Unknown");
        catalog.record_name("a3Pasted", "Pasted Name");
        assert_eq!(catalog.position("a3Unknown"), None);
        assert_eq!(catalog.position("a3Pasted"), None);
        assert!(catalog.contains("a3Pasted"));
        assert!(!catalog.is_catalogued("a3Pasted"));
    }

    #[test]
    fn repeated_full_id_keeps_last_line_in_every_lookup() {
        let catalog = Catalog::parse("00 a3Dup First Name
01 a3Dup Second Name
");
        assert_eq!(catalog.full_id("00"), Some("a3Dup"));
        assert_eq!(catalog.full_id("01"), Some("a3Dup"));
        assert_eq!(catalog.short_id("a3Dup"), Some("01"));
        assert_eq!(catalog.name_of("a3Dup"), "Second Name");
        assert_eq!(catalog.position("a3Dup"), Some(1));
    }

    #[test]
    fn record_name_upgrades_placeholders_only() {
        let mut catalog = sample_catalog();
        catalog.ensure_placeholder("a3New");
        catalog.record_name("a3New", "Found Name");
        catalog.record_name("a3A000001", "Should Not Replace");
        assert_eq!(catalog.name_of("a3New"), "Found Name");
        assert_eq!(catalog.name_of("a3A000001"), "#1: Whit's Visitor");
    }

    #[test]
    fn highest_episode_number_scans_all_names() {
        assert_eq!(sample_catalog().highest_episode_number(), 10);
        assert_eq!(Catalog::default().highest_episode_number(), 0);
        assert_eq!(
            sample_catalog().search_hint(),
            "Search for episodes (up to #10) or paste an episode link"
        );
    }

    #[test]
    fn find_by_name_is_case_insensitive_and_exact() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.find_by_name("#3: a big ep").map(|r| r.id.as_str()),
            Some("a3A000003")
        );
        assert!(catalog.find_by_name("a big ep").is_none());
    }
}
