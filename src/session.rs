use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::codec::{
    CodecError, PasteKind, check_drop_extension, decode_aiopl, decode_file_contents, sniff_paste,
};
use crate::playlist::{Playlist, Snapshot};

/// Everything the builder mutates: the catalog (placeholders get appended),
/// the playlist being assembled and the undo history.
#[derive(Debug, Default)]
pub struct Session {
    pub catalog: Catalog,
    pub playlist: Playlist,
    undo: Vec<Snapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { id: String, confirmed: bool },
    Remove(usize),
    MoveUp(usize),
    MoveDown(usize),
    MoveTo { from: usize, to: usize },
    Sort { ascending: bool },
    SetName(String),
    SetImageUrl(String),
    /// Wholesale replacement without an undo snapshot (startup URL state).
    Replace(Playlist),
    /// Externally sourced replacement; undoable.
    Import(Playlist),
    Paste(String),
    Undo,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(Option<String>),
    Unchanged,
    /// The id is already in the playlist; resend with `confirmed: true` to add anyway.
    NeedsConfirmation { id: String },
}

impl Outcome {
    fn message(msg: impl Into<String>) -> Self {
        Self::Changed(Some(msg.into()))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Changed(Some(msg)) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            playlist: Playlist::default(),
            undo: Vec::new(),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Add { id, confirmed } => self.add(id, confirmed),
            Command::Remove(index) => match self.playlist.remove_at(index) {
                Some(_) => Outcome::Changed(None),
                None => Outcome::Unchanged,
            },
            Command::MoveUp(index) => changed_if(self.playlist.move_up(index)),
            Command::MoveDown(index) => changed_if(self.playlist.move_down(index)),
            Command::MoveTo { from, to } => changed_if(self.playlist.move_to(from, to)),
            Command::Sort { ascending } => {
                self.playlist.sort_by_catalog_order(&self.catalog, ascending);
                Outcome::Changed(None)
            }
            Command::SetName(name) => {
                self.playlist.name = name;
                Outcome::Changed(None)
            }
            Command::SetImageUrl(image_url) => {
                self.playlist.image_url = image_url;
                Outcome::Changed(None)
            }
            Command::Replace(playlist) => {
                self.replace(playlist);
                Outcome::Changed(None)
            }
            Command::Import(playlist) => {
                self.push_undo();
                self.replace(playlist);
                Outcome::message("Playlist imported successfully!")
            }
            Command::Paste(raw) => self.paste(&raw),
            Command::Undo => match self.undo.pop() {
                Some(snapshot) => {
                    self.playlist.restore(snapshot);
                    Outcome::message("Undo successful!")
                }
                None => Outcome::Unchanged,
            },
            Command::Clear => {
                self.playlist = Playlist::default();
                Outcome::Changed(None)
            }
        }
    }

    fn add(&mut self, id: String, confirmed: bool) -> Outcome {
        if id.is_empty() {
            return Outcome::Unchanged;
        }
        if !confirmed && self.playlist.contains(&id) {
            return Outcome::NeedsConfirmation { id };
        }
        self.catalog.ensure_placeholder(&id);
        let name = self.catalog.label_of(&id);
        self.playlist.append(id);
        Outcome::message(format!("Added {name}"))
    }

    fn replace(&mut self, playlist: Playlist) {
        for id in &playlist.episodes {
            self.catalog.ensure_placeholder(id);
        }
        self.playlist = playlist;
    }

    fn push_undo(&mut self) {
        self.undo.push(self.playlist.snapshot());
        debug!(depth = self.undo.len(), "pushed undo snapshot");
    }

    fn paste(&mut self, raw: &str) -> Outcome {
        self.push_undo();
        match sniff_paste(raw, &self.catalog) {
            Some(PasteKind::Playlist(playlist)) => {
                info!(episodes = playlist.len(), "imported playlist from pasted text");
                self.replace(playlist);
                Outcome::message("Playlist imported from clipboard!")
            }
            Some(PasteKind::Links(links)) => {
                let count = links.len();
                for link in links {
                    if !self.playlist.contains(&link.id) {
                        self.playlist.append(link.id.clone());
                    }
                    self.catalog.record_name(&link.id, &link.name);
                }
                Outcome::message(format!("Added {count} episodes from hyperlinks!"))
            }
            Some(PasteKind::Names(ids)) => {
                let mut added = 0;
                for id in ids {
                    if !self.playlist.contains(&id) {
                        self.playlist.append(id);
                        added += 1;
                    }
                }
                if added > 0 {
                    Outcome::message(format!("Added {added} episodes from names!"))
                } else {
                    Outcome::Unchanged
                }
            }
            None => Outcome::Unchanged,
        }
    }

    /// Imports a chosen `.aiopl` file. Only the JSON container is accepted.
    pub fn import_aiopl(&mut self, raw: &str) -> Result<Outcome, CodecError> {
        let playlist = decode_aiopl(raw)?;
        Ok(self.apply(Command::Import(playlist)))
    }

    /// Imports a dropped file: extension gate, then JSON with a clipboard-text fallback.
    pub fn import_path(&mut self, path: &Path) -> Result<Outcome, CodecError> {
        check_drop_extension(path)?;
        let raw = fs::read_to_string(path).map_err(|err| CodecError::Read(err.to_string()))?;
        let playlist = decode_file_contents(&raw)?;
        info!(path = %path.display(), episodes = playlist.len(), "imported playlist file");
        self.apply(Command::Import(playlist));
        Ok(Outcome::message("Playlist imported successfully from file!"))
    }
}

fn changed_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Changed(None)
    } else {
        Outcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{UNKNOWN_EPISODE, sample_catalog};

    fn session() -> Session {
        Session::new(sample_catalog())
    }

    fn add(session: &mut Session, id: &str) -> Outcome {
        session.apply(Command::Add {
            id: id.to_string(),
            confirmed: false,
        })
    }

    #[test]
    fn duplicate_add_asks_for_confirmation() {
        let mut session = session();
        add(&mut session, "a3A000001");
        assert_eq!(
            add(&mut session, "a3A000001"),
            Outcome::NeedsConfirmation {
                id: "a3A000001".to_string()
            }
        );
        assert_eq!(session.playlist.len(), 1);

        session.apply(Command::Add {
            id: "a3A000001".to_string(),
            confirmed: true,
        });
        assert_eq!(session.playlist.episodes, vec!["a3A000001", "a3A000001"]);
    }

    #[test]
    fn unknown_id_gets_single_placeholder() {
        let mut session = session();
        let before = session.catalog.len();
        add(&mut session, "a3Mystery");
        session.apply(Command::Add {
            id: "a3Mystery".to_string(),
            confirmed: true,
        });
        assert_eq!(session.catalog.len(), before + 1);
        assert_eq!(session.catalog.name_of("a3Mystery"), UNKNOWN_EPISODE);
    }

    #[test]
    fn sort_command_keeps_added_unknown_ids_last() {
        let mut session = session();
        for id in ["a3A000001", "a3A000002", "U1", "a3A000003"] {
            add(&mut session, id);
        }

        session.apply(Command::Sort { ascending: false });
        assert_eq!(
            session.playlist.episodes,
            vec!["a3A000003", "a3A000002", "a3A000001", "U1"]
        );
        session.apply(Command::Sort { ascending: true });
        assert_eq!(
            session.playlist.episodes,
            vec!["a3A000001", "a3A000002", "a3A000003", "U1"]
        );
    }

    #[test]
    fn sort_treats_pasted_link_names_as_unknown() {
        let mut session = session();
        add(&mut session, "a3A000002");
        session.apply(Command::Paste(
            "[Fresh](https://app.adventuresinodyssey.com/content/a3Fresh)".to_string(),
        ));
        add(&mut session, "a3A000001");

        session.apply(Command::Sort { ascending: false });
        assert_eq!(
            session.playlist.episodes,
            vec!["a3A000002", "a3A000001", "a3Fresh"]
        );
    }

    #[test]
    fn undo_restores_state_before_import() {
        let mut session = session();
        session.apply(Command::SetName("Before".to_string()));
        session.apply(Command::SetImageUrl("https://before".to_string()));
        add(&mut session, "a3A000002");
        let before = session.playlist.clone();

        session.apply(Command::Import(Playlist::new(
            "After",
            "",
            vec!["a3A000003".to_string()],
        )));
        assert_eq!(session.playlist.name, "After");

        assert_eq!(session.apply(Command::Undo).text(), Some("Undo successful!"));
        assert_eq!(session.playlist, before);
        assert_eq!(session.apply(Command::Undo), Outcome::Unchanged);
    }

    #[test]
    fn undo_stack_grows_with_every_paste() {
        let mut session = session();
        for _ in 0..250 {
            session.apply(Command::Paste("nothing recognisable".to_string()));
        }
        assert_eq!(session.undo_depth(), 250);
        for _ in 0..250 {
            session.apply(Command::Undo);
        }
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn pasted_links_skip_present_ids_and_upgrade_placeholders() {
        let mut session = session();
        add(&mut session, "a3New");
        let raw = "[Fresh Name](https://app.adventuresinodyssey.com/content/a3New)\n\
                   [Second](https://app.adventuresinodyssey.com/content/a3Other)";
        let outcome = session.apply(Command::Paste(raw.to_string()));

        assert_eq!(outcome.text(), Some("Added 2 episodes from hyperlinks!"));
        assert_eq!(session.playlist.episodes, vec!["a3New", "a3Other"]);
        assert_eq!(session.catalog.name_of("a3New"), "Fresh Name");
        assert_eq!(session.catalog.name_of("a3Other"), "Second");
    }

    #[test]
    fn pasted_clipboard_text_replaces_playlist() {
        let mut session = session();
        add(&mut session, "a3A000001");
        let raw = "name: \"Pasted\"\nimageURL: \"https://p\"\nhttps://app.adventuresinodyssey.com/content/a3Q";
        session.apply(Command::Paste(raw.to_string()));
        assert_eq!(
            session.playlist,
            Playlist::new("Pasted", "https://p", vec!["a3Q".to_string()])
        );
        assert!(session.catalog.contains("a3Q"));

        session.apply(Command::Undo);
        assert_eq!(session.playlist.episodes, vec!["a3A000001"]);
    }

    #[test]
    fn pasted_names_only_add_new_matches() {
        let mut session = session();
        add(&mut session, "a3A000001");
        let outcome = session.apply(Command::Paste("#1: Whit's Visitor".to_string()));
        assert_eq!(outcome, Outcome::Unchanged);
        let outcome = session.apply(Command::Paste("#1: Whit's Visitor\n#3: A Big Ep".to_string()));
        assert_eq!(outcome.text(), Some("Added 1 episodes from names!"));
        assert_eq!(session.playlist.episodes, vec!["a3A000001", "a3A000003"]);
    }

    #[test]
    fn dropped_file_with_wrong_extension_is_not_read() {
        let mut session = session();
        let err = session
            .import_path(Path::new("/definitely/not/here/cover.png"))
            .expect_err("extension gate");
        assert!(matches!(err, CodecError::UnsupportedExtension));
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn dropped_file_imports_and_is_undoable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("list.aiopl");
        fs::write(
            &path,
            r#"{"contentGroupings":[{"name":"Dropped","imageURL":"","contentList":[{"id":"a3A000004"}]}]}"#,
        )
        .expect("write file");

        let mut session = session();
        let outcome = session.import_path(&path).expect("import");
        assert_eq!(outcome.text(), Some("Playlist imported successfully from file!"));
        assert_eq!(session.playlist.name, "Dropped");
        session.apply(Command::Undo);
        assert!(session.playlist.is_empty());
    }

    #[test]
    fn dropped_json_with_wrong_shape_reports_playlist_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("other.json");
        fs::write(&path, r#"{"playlists": []}"#).expect("write file");

        let mut session = session();
        let err = session.import_path(&path).expect_err("wrong shape");
        assert_eq!(err.to_string(), "Invalid playlist format in file.");
        assert_eq!(session.undo_depth(), 0);
    }

    #[test]
    fn invalid_aiopl_leaves_playlist_untouched() {
        let mut session = session();
        add(&mut session, "a3A000001");
        let err = session
            .import_aiopl(r#"{"contentGroupings": []}"#)
            .expect_err("invalid");
        assert_eq!(err.to_string(), "Invalid file format.");
        assert_eq!(session.playlist.episodes, vec!["a3A000001"]);
        assert_eq!(session.undo_depth(), 0);
    }
}
