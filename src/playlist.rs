use url::Url;

use crate::catalog::Catalog;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];

/// An ordered list of episode identifiers plus its display metadata.
///
/// Order is the play order. Duplicates and identifiers unknown to the catalog
/// are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub image_url: String,
    pub episodes: Vec<String>,
}

/// Copy of a playlist taken before an imported change, restored by undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub image_url: String,
    pub episodes: Vec<String>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>, episodes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            episodes,
        }
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.episodes.iter().any(|episode| episode == id)
    }

    pub fn append(&mut self, id: impl Into<String>) {
        self.episodes.push(id.into());
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.episodes.len()).then(|| self.episodes.remove(index))
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.episodes.len() {
            return false;
        }
        self.episodes.swap(index - 1, index);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.episodes.len() {
            return false;
        }
        self.episodes.swap(index, index + 1);
        true
    }

    /// Takes the episode at `from` out and reinserts it at `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.episodes.len() {
            return false;
        }
        let item = self.episodes.remove(from);
        let target = to.min(self.episodes.len());
        self.episodes.insert(target, item);
        true
    }

    pub fn replace_all(
        &mut self,
        name: impl Into<String>,
        image_url: impl Into<String>,
        episodes: Vec<String>,
    ) {
        self.name = name.into();
        self.image_url = image_url.into();
        self.episodes = episodes;
    }

    /// Stable sort by catalog load order. Identifiers the catalog does not
    /// know always trail, whichever direction is requested.
    pub fn sort_by_catalog_order(&mut self, catalog: &Catalog, ascending: bool) {
        self.episodes.sort_by(|left, right| {
            match (catalog.position(left), catalog.position(right)) {
                (Some(a), Some(b)) if ascending => a.cmp(&b),
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            image_url: self.image_url.clone(),
            episodes: self.episodes.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.replace_all(snapshot.name, snapshot.image_url, snapshot.episodes);
    }
}

/// Whether the club is likely to render `raw` as a playlist cover: an
/// http(s) URL whose path ends in a common image extension.
pub fn image_url_plausible(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    url.path()
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn boundary_moves_are_noops() {
        let mut playlist = Playlist::new("", "", ids(&["a", "b", "c"]));
        assert!(!playlist.move_up(0));
        assert!(!playlist.move_down(2));
        assert!(!playlist.move_down(7));
        assert_eq!(playlist.episodes, ids(&["a", "b", "c"]));
    }

    #[test]
    fn moves_swap_neighbours() {
        let mut playlist = Playlist::new("", "", ids(&["a", "b", "c"]));
        assert!(playlist.move_up(2));
        assert_eq!(playlist.episodes, ids(&["a", "c", "b"]));
        assert!(playlist.move_down(0));
        assert_eq!(playlist.episodes, ids(&["c", "a", "b"]));
    }

    #[test]
    fn move_to_repositions_in_both_directions() {
        let mut playlist = Playlist::new("", "", ids(&["a", "b", "c", "d"]));
        assert!(playlist.move_to(0, 2));
        assert_eq!(playlist.episodes, ids(&["b", "c", "a", "d"]));
        assert!(playlist.move_to(3, 0));
        assert_eq!(playlist.episodes, ids(&["d", "b", "c", "a"]));
        assert!(!playlist.move_to(9, 0));
        assert!(!playlist.move_to(1, 1));
    }

    #[test]
    fn remove_at_ignores_out_of_range() {
        let mut playlist = Playlist::new("", "", ids(&["a", "a"]));
        assert_eq!(playlist.remove_at(5), None);
        assert_eq!(playlist.remove_at(1).as_deref(), Some("a"));
        assert_eq!(playlist.episodes, ids(&["a"]));
    }

    #[test]
    fn sort_keeps_unknown_ids_trailing_in_both_directions() {
        let catalog = sample_catalog();
        let (a, b, c) = ("a3A000001", "a3A000002", "a3A000003");
        let mut playlist = Playlist::new("", "", ids(&[b, "U1", c, a]));

        playlist.sort_by_catalog_order(&catalog, true);
        assert_eq!(playlist.episodes, ids(&[a, b, c, "U1"]));

        playlist.sort_by_catalog_order(&catalog, false);
        assert_eq!(playlist.episodes, ids(&[c, b, a, "U1"]));
    }

    #[test]
    fn sort_is_stable_for_unknown_ids() {
        let catalog = sample_catalog();
        let mut playlist = Playlist::new("", "", ids(&["U2", "a3A000002", "U1", "a3A000001"]));
        playlist.sort_by_catalog_order(&catalog, false);
        assert_eq!(playlist.episodes, ids(&["a3A000002", "a3A000001", "U2", "U1"]));
    }

    #[test]
    fn restore_brings_back_all_fields() {
        let mut playlist = Playlist::new("Mine", "https://img", ids(&["a"]));
        let snapshot = playlist.snapshot();
        playlist.replace_all("Other", "", ids(&["b", "c"]));
        playlist.restore(snapshot);
        assert_eq!(playlist, Playlist::new("Mine", "https://img", ids(&["a"])));
    }

    #[test]
    fn image_url_check_wants_http_and_image_extension() {
        assert!(image_url_plausible("https://example.com/covers/road-trip.PNG"));
        assert!(image_url_plausible(" http://example.com/a.jpg?size=large "));
        assert!(!image_url_plausible("https://example.com/gallery"));
        assert!(!image_url_plausible("ftp://example.com/a.png"));
        assert!(!image_url_plausible("not a url"));
    }
}
