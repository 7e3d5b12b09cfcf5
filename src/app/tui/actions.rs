use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arboard::Clipboard;
use ratatui::widgets::TableState;
use tracing::{debug, warn};

use crate::codec::{download_file_name, encode_aiopl};
use crate::playlist::Playlist;
use crate::session::Command;

pub(super) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(super) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(super) fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_owned()))?;
    debug!(bytes = text.len(), "copied to clipboard");
    Ok(())
}

/// Copies and reports the result as a status line.
pub(super) fn copy_with_status(text: &str, success: &str) -> String {
    copy_status(copy_to_clipboard(text), success)
}

pub(super) fn copy_status(result: Result<(), arboard::Error>, success: &str) -> String {
    match result {
        Ok(()) => status_info(success),
        Err(err) => {
            warn!(error = %err, "clipboard write failed");
            status_error("Failed to copy!")
        }
    }
}

pub(super) fn save_aiopl(playlist: &Playlist, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(download_file_name(&playlist.name));
    fs::write(&path, encode_aiopl(playlist))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Interprets pasted text as a dropped file when it is a single path to an
/// existing file. Terminals quote or escape dropped paths in different ways.
pub(crate) fn pasted_file(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let unquoted = ['\'', '"']
        .iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(trimmed);
    let unescaped = unquoted
        .strip_prefix("file://")
        .unwrap_or(unquoted)
        .replace("\\ ", " ");
    let path = PathBuf::from(unescaped);
    path.is_file().then_some(path)
}

/// Selection to show after `command` changed a playlist that now has `len` entries.
pub(crate) fn selection_after(command: &Command, selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let next = match (command, selected) {
        (Command::MoveUp(index), _) => index.saturating_sub(1),
        (Command::MoveDown(index), _) => index + 1,
        (Command::MoveTo { to, .. }, _) => *to,
        (Command::Add { .. }, _) => last,
        (_, Some(selected)) => selected,
        (_, None) => 0,
    };
    Some(next.min(last))
}

pub(super) fn select_clamped(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    match state.selected() {
        Some(selected) => state.select(Some(selected.min(len - 1))),
        None => state.select(Some(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_failure_is_reported_as_error_status() {
        assert_eq!(
            copy_status(Err(arboard::Error::ClipboardNotSupported), "Share link copied!"),
            "ERROR: Failed to copy!"
        );
        assert_eq!(
            copy_status(Ok(()), "Share link copied!"),
            "INFO: Share link copied!"
        );
    }
}
