mod actions;
mod render;
mod session;

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::codec::{CodecError, ExportKind, decode_query, encode_query, encode_text, export};
use crate::config::Config;
use crate::playlist::image_url_plausible;
use crate::search::{direct_link, search};
use crate::session::{Command, Outcome, Session};

use self::actions::{copy_with_status, save_aiopl, select_clamped, status_error, status_info};
use self::render::draw_tui;
use self::session::TuiSession;

pub(crate) use self::actions::{pasted_file, selection_after};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Search,
    Playlist,
}

impl Focus {
    pub(crate) fn toggle(self) -> Self {
        match self {
            Self::Search => Self::Playlist,
            Self::Playlist => Self::Search,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Playlist => "PLAYLIST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditField {
    Name,
    ImageUrl,
    OpenPath,
}

impl EditField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Name => "Playlist Name",
            Self::ImageUrl => "Image URL",
            Self::OpenPath => "Open .aiopl File",
        }
    }
}

/// Keys that work regardless of which pane has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlobalAction {
    Quit,
    Undo,
    ShareUrl,
    CopyFullUrl,
    SaveFile,
    CopyText,
    Edit(EditField),
    Clear,
    Export(ExportKind),
}

pub(crate) fn global_action(key: &KeyEvent) -> Option<GlobalAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        return match c.to_ascii_lowercase() {
            'c' => Some(GlobalAction::Quit),
            'z' => Some(GlobalAction::Undo),
            's' => Some(GlobalAction::ShareUrl),
            'f' => Some(GlobalAction::CopyFullUrl),
            'd' => Some(GlobalAction::SaveFile),
            'y' => Some(GlobalAction::CopyText),
            'n' => Some(GlobalAction::Edit(EditField::Name)),
            'e' => Some(GlobalAction::Edit(EditField::ImageUrl)),
            'o' => Some(GlobalAction::Edit(EditField::OpenPath)),
            'l' => Some(GlobalAction::Clear),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(GlobalAction::Quit),
        KeyCode::F(2) => Some(GlobalAction::Export(ExportKind::Names)),
        KeyCode::F(3) => Some(GlobalAction::Export(ExportKind::InlineLinks)),
        KeyCode::F(4) => Some(GlobalAction::Export(ExportKind::Urls)),
        KeyCode::F(5) => Some(GlobalAction::Export(ExportKind::Ids)),
        _ => None,
    }
}

/// Playlist pane keys; `selected` is the highlighted row.
pub(crate) fn playlist_command(code: KeyCode, selected: usize) -> Option<Command> {
    match code {
        KeyCode::Char('u') | KeyCode::Char('K') => Some(Command::MoveUp(selected)),
        KeyCode::Char('d') | KeyCode::Char('J') => Some(Command::MoveDown(selected)),
        KeyCode::Char('x') | KeyCode::Delete => Some(Command::Remove(selected)),
        KeyCode::Home => Some(Command::MoveTo {
            from: selected,
            to: 0,
        }),
        KeyCode::End => Some(Command::MoveTo {
            from: selected,
            to: usize::MAX,
        }),
        KeyCode::Char('a') => Some(Command::Sort { ascending: true }),
        KeyCode::Char('z') => Some(Command::Sort { ascending: false }),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub(super) enum PendingConfirm {
    Duplicate { id: String, name: String },
    Image { url: String },
    Clear,
}

#[derive(Debug, Clone)]
pub(super) struct PendingNotice {
    pub(super) title: &'static str,
    pub(super) message: String,
}

#[derive(Debug, Clone)]
pub(super) struct PendingEdit {
    pub(super) field: EditField,
    pub(super) buffer: String,
}

struct Builder<'a> {
    session: Session,
    config: &'a Config,
    query: String,
    focus: Focus,
    results: TableState,
    playlist_rows: TableState,
    status: String,
    pending_confirm: Option<PendingConfirm>,
    pending_notice: Option<PendingNotice>,
    pending_edit: Option<PendingEdit>,
}

pub(crate) fn run_tui(
    catalog: Catalog,
    config: &Config,
    open: Option<&Path>,
    url: Option<&str>,
) -> Result<()> {
    let mut builder = Builder::new(catalog, config);
    if let Some(url) = url {
        builder.load_url(url);
    }
    if let Some(path) = open {
        builder.import_file(path);
    }

    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    loop {
        let matches = builder.matches();
        terminal.draw(|frame| {
            draw_tui(
                frame,
                &builder.session,
                &builder.query,
                &matches,
                builder.focus,
                &mut builder.results,
                &mut builder.playlist_rows,
                &builder.status,
                builder.pending_confirm.as_ref(),
                builder.pending_notice.as_ref(),
                builder.pending_edit.as_ref(),
            )
        })?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        match event::read()? {
            Event::Paste(text) => builder.paste(&text),
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if builder.handle_key(key) {
                    break;
                }
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}

impl<'a> Builder<'a> {
    fn new(catalog: Catalog, config: &'a Config) -> Self {
        let status = if catalog.is_empty() {
            status_error("Episode list unavailable. Paste links or open a file to continue.")
        } else {
            status_info(&catalog.search_hint())
        };
        Self {
            session: Session::new(catalog),
            config,
            query: String::new(),
            focus: Focus::Search,
            results: TableState::default(),
            playlist_rows: TableState::default(),
            status,
            pending_confirm: None,
            pending_notice: None,
            pending_edit: None,
        }
    }

    fn matches(&self) -> Vec<(String, String)> {
        search(&self.query, &self.session.catalog)
            .into_iter()
            .map(|record| (record.id.clone(), record.name.clone()))
            .collect()
    }

    fn load_url(&mut self, url: &str) {
        match decode_query(url, &self.session.catalog) {
            Some(playlist) => {
                info!(episodes = playlist.len(), "loaded playlist from share link");
                self.session.apply(Command::Replace(playlist));
                select_clamped(&mut self.playlist_rows, self.session.playlist.len());
                self.status = status_info("Playlist loaded from link.");
            }
            None => self.status = status_error("No episodes found in link."),
        }
    }

    fn import_file(&mut self, path: &Path) {
        match self.session.import_path(path) {
            Ok(outcome) => {
                select_clamped(&mut self.playlist_rows, self.session.playlist.len());
                self.report(&outcome);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "file import failed");
                self.pending_notice = Some(PendingNotice {
                    title: "Import Failed",
                    message: format!("{err}\n\nPress any key to continue."),
                });
            }
        }
    }

    /// Chosen-file import: only the `.aiopl` JSON container is accepted.
    fn open_aiopl(&mut self, path: &Path) {
        let imported = fs::read_to_string(path)
            .map_err(|err| CodecError::Read(err.to_string()))
            .and_then(|raw| self.session.import_aiopl(&raw));
        match imported {
            Ok(outcome) => {
                info!(path = %path.display(), "opened playlist file");
                select_clamped(&mut self.playlist_rows, self.session.playlist.len());
                self.report(&outcome);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "open failed");
                self.pending_notice = Some(PendingNotice {
                    title: "Import Failed",
                    message: format!("{err}\n\nPress any key to continue."),
                });
            }
        }
    }

    fn paste(&mut self, text: &str) {
        if let Some(edit) = self.pending_edit.as_mut() {
            edit.buffer.push_str(text.trim_end_matches(['\r', '\n']));
            return;
        }
        if self.pending_confirm.is_some() || self.pending_notice.is_some() {
            return;
        }
        if let Some(path) = pasted_file(text) {
            self.import_file(&path);
            return;
        }
        if self.focus == Focus::Search && !text.contains('\n') && direct_link(text).is_some() {
            self.query = text.trim().to_string();
            return;
        }
        self.run(Command::Paste(text.to_string()));
    }

    /// Applies a command and refreshes selection and status. Returns the outcome.
    fn run(&mut self, command: Command) -> Outcome {
        let selected = self.playlist_rows.selected();
        let outcome = self.session.apply(command.clone());
        match &outcome {
            Outcome::Changed(_) => {
                let next = selection_after(&command, selected, self.session.playlist.len());
                self.playlist_rows.select(next);
            }
            Outcome::NeedsConfirmation { id } => {
                self.pending_confirm = Some(PendingConfirm::Duplicate {
                    id: id.clone(),
                    name: self.session.catalog.label_of(id),
                });
                self.status = status_info("Already in playlist: y/Enter to add again, n/Esc to cancel.");
            }
            Outcome::Unchanged => {}
        }
        self.report(&outcome);
        outcome
    }

    fn report(&mut self, outcome: &Outcome) {
        if let Some(text) = outcome.text() {
            self.status = status_info(text);
        }
    }

    /// Returns true when the builder should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.pending_notice.is_some() {
            self.pending_notice = None;
            return false;
        }
        if let Some(confirm) = self.pending_confirm.take() {
            self.answer_confirm(confirm, key.code);
            return false;
        }
        if self.pending_edit.is_some() {
            self.edit_key(key.code);
            return false;
        }

        if let Some(action) = global_action(&key) {
            return self.global(action);
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggle();
                select_clamped(&mut self.playlist_rows, self.session.playlist.len());
            }
            _ => match self.focus {
                Focus::Search => self.search_key(key.code),
                Focus::Playlist => self.playlist_key(key.code),
            },
        }
        false
    }

    fn answer_confirm(&mut self, confirm: PendingConfirm, code: KeyCode) {
        let accepted = match code {
            KeyCode::Char('y') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Esc => false,
            _ => {
                self.pending_confirm = Some(confirm);
                return;
            }
        };
        match (confirm, accepted) {
            (PendingConfirm::Duplicate { id, .. }, true) => {
                self.run(Command::Add {
                    id,
                    confirmed: true,
                });
            }
            (PendingConfirm::Duplicate { .. }, false) => {
                self.status = status_info("Add canceled.");
            }
            (PendingConfirm::Image { .. }, true) => {
                self.status = status_info("Image URL kept.");
            }
            (PendingConfirm::Image { url }, false) => {
                self.run(Command::SetImageUrl(String::new()));
                self.status = status_info(&format!("Image URL cleared: {url}"));
            }
            (PendingConfirm::Clear, true) => {
                self.run(Command::Clear);
                self.status = status_info("Playlist cleared.");
            }
            (PendingConfirm::Clear, false) => {
                self.status = status_info("Clear canceled.");
            }
        }
    }

    fn edit_key(&mut self, code: KeyCode) {
        let Some(edit) = self.pending_edit.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) => edit.buffer.push(c),
            KeyCode::Backspace => {
                edit.buffer.pop();
            }
            KeyCode::Esc => {
                self.pending_edit = None;
                self.status = status_info("Edit canceled.");
            }
            KeyCode::Enter => {
                let Some(PendingEdit { field, buffer }) = self.pending_edit.take() else {
                    return;
                };
                let value = buffer.trim().to_string();
                match field {
                    EditField::Name => {
                        self.run(Command::SetName(value));
                        self.status = status_info("Playlist name updated.");
                    }
                    EditField::ImageUrl => {
                        self.run(Command::SetImageUrl(value.clone()));
                        self.status = status_info("Image URL updated.");
                        if !value.is_empty() && !image_url_plausible(&value) {
                            self.pending_confirm = Some(PendingConfirm::Image { url: value });
                        }
                    }
                    EditField::OpenPath => self.open_aiopl(Path::new(&value)),
                }
            }
            _ => {}
        }
    }

    fn global(&mut self, action: GlobalAction) -> bool {
        let playlist = &self.session.playlist;
        let catalog = &self.session.catalog;
        match action {
            GlobalAction::Quit => return true,
            GlobalAction::Undo => {
                if self.run(Command::Undo) == Outcome::Unchanged {
                    self.status = status_info("Nothing to undo.");
                }
            }
            GlobalAction::ShareUrl => {
                let url = self.share_url(self.config.use_short_ids);
                self.status = copy_with_status(&url, "Share link copied!");
                self.pending_notice = Some(PendingNotice {
                    title: "Share Link",
                    message: format!("{url}\n\nPress any key to continue."),
                });
            }
            GlobalAction::CopyFullUrl => {
                let url = self.share_url(false);
                self.status = copy_with_status(&url, "Full-ID link copied!");
            }
            GlobalAction::SaveFile => {
                let saved = env::current_dir()
                    .context("failed to resolve current directory")
                    .and_then(|dir| save_aiopl(playlist, &dir));
                self.status = match saved {
                    Ok(path) => {
                        info!(path = %path.display(), "saved playlist file");
                        status_info(&format!("Saved {}", path.display()))
                    }
                    Err(err) => status_error(&format!("Save failed: {err:#}")),
                };
            }
            GlobalAction::CopyText => {
                let text = encode_text(playlist);
                self.status = copy_with_status(&text, "Playlist copied to clipboard!");
            }
            GlobalAction::Edit(field) => {
                let buffer = match field {
                    EditField::Name => playlist.name.clone(),
                    EditField::ImageUrl => playlist.image_url.clone(),
                    EditField::OpenPath => String::new(),
                };
                self.pending_edit = Some(PendingEdit { field, buffer });
                self.status = status_info("Enter to save, Esc to cancel.");
            }
            GlobalAction::Clear => {
                self.pending_confirm = Some(PendingConfirm::Clear);
            }
            GlobalAction::Export(kind) => {
                self.status = match export(kind, playlist, catalog) {
                    Ok(text) => copy_with_status(&text, &format!("{} copied!", kind.label())),
                    Err(err) => status_error(&err.to_string()),
                };
            }
        }
        false
    }

    fn share_url(&self, use_short_ids: bool) -> String {
        let query = encode_query(&self.session.playlist, &self.session.catalog, use_short_ids);
        format!("{}{query}", self.config.creator_url)
    }

    fn search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.query.push(c);
                self.results.select(Some(0));
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.results.select(Some(0));
            }
            KeyCode::Up => {
                if let Some(selected) = self.results.selected() {
                    self.results.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                let len = self.matches().len();
                if let Some(selected) = self.results.selected()
                    && len > 0
                {
                    self.results.select(Some((selected + 1).min(len - 1)));
                }
            }
            KeyCode::Enter => self.add_selected(),
            _ => {}
        }
    }

    fn add_selected(&mut self) {
        if let Some(id) = direct_link(&self.query) {
            self.query.clear();
            self.run(Command::Add {
                id,
                confirmed: false,
            });
            return;
        }
        let matches = self.matches();
        let picked = self
            .results
            .selected()
            .and_then(|idx| matches.get(idx))
            .map(|(id, _)| id.clone());
        match picked {
            Some(id) => {
                self.run(Command::Add {
                    id,
                    confirmed: false,
                });
            }
            None if self.query.trim().is_empty() => {}
            None => self.status = status_info("No matching episode found."),
        }
    }

    fn playlist_key(&mut self, code: KeyCode) {
        let len = self.session.playlist.len();
        match code {
            KeyCode::Up => {
                if let Some(selected) = self.playlist_rows.selected() {
                    self.playlist_rows.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.playlist_rows.selected()
                    && len > 0
                {
                    self.playlist_rows.select(Some((selected + 1).min(len - 1)));
                }
            }
            _ => {
                let Some(selected) = self.playlist_rows.selected() else {
                    return;
                };
                if let Some(command) = playlist_command(code, selected) {
                    self.run(command);
                }
            }
        }
    }
}
