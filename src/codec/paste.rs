use std::path::Path;

use crate::catalog::Catalog;
use crate::playlist::Playlist;

use super::text::has_text_markers;
use super::{CodecError, LinkedEpisode, decode_aiopl, decode_links, decode_query, decode_text};

const ALLOWED_DROP_EXTENSIONS: [&str; 3] = ["aiopl", "json", "txt"];

/// What a block of pasted text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteKind {
    /// Full clipboard export; replaces the playlist.
    Playlist(Playlist),
    /// Inline hyperlinks; appended, names recorded in the catalog.
    Links(Vec<LinkedEpisode>),
    /// Lines that exactly matched catalog names, as full ids.
    Names(Vec<String>),
}

type PasteAttempt = fn(&str, &Catalog) -> Option<PasteKind>;

const PASTE_ATTEMPTS: [PasteAttempt; 3] = [paste_as_text, paste_as_links, paste_as_names];

/// Tries each paste format in priority order and stops at the first match.
/// Unrecognized text yields `None` and is ignored by the caller.
pub fn sniff_paste(raw: &str, catalog: &Catalog) -> Option<PasteKind> {
    PASTE_ATTEMPTS.iter().find_map(|attempt| attempt(raw, catalog))
}

fn paste_as_text(raw: &str, _catalog: &Catalog) -> Option<PasteKind> {
    if !has_text_markers(raw) {
        return None;
    }
    decode_text(raw).map(PasteKind::Playlist)
}

fn paste_as_links(raw: &str, _catalog: &Catalog) -> Option<PasteKind> {
    let links = decode_links(raw);
    (!links.is_empty()).then_some(PasteKind::Links(links))
}

fn paste_as_names(raw: &str, catalog: &Catalog) -> Option<PasteKind> {
    let ids = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| catalog.find_by_name(line))
        .map(|record| record.id.clone())
        .collect::<Vec<_>>();
    (!ids.is_empty()).then_some(PasteKind::Names(ids))
}

/// Contents of an imported file: `.aiopl` JSON, or clipboard text when the
/// file is not JSON at all.
pub fn decode_file_contents(raw: &str) -> Result<Playlist, CodecError> {
    match decode_aiopl(raw) {
        Ok(playlist) => Ok(playlist),
        Err(CodecError::Read(detail)) => decode_text(raw).ok_or(CodecError::Read(detail)),
        Err(CodecError::InvalidFormat) => Err(CodecError::InvalidFileContents),
        Err(err) => Err(err),
    }
}

pub fn check_drop_extension(path: &Path) -> Result<(), CodecError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if ALLOWED_DROP_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(CodecError::UnsupportedExtension)
    }
}

/// Best-effort read of any supported representation into a standalone playlist.
pub fn read_playlist(raw: &str, catalog: &Catalog) -> Result<Playlist, CodecError> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') {
        return decode_aiopl(raw);
    }
    if has_text_markers(raw)
        && let Some(playlist) = decode_text(raw)
    {
        return Ok(playlist);
    }
    if trimmed.contains("e=")
        && !trimmed.contains(char::is_whitespace)
        && let Some(playlist) = decode_query(trimmed, catalog)
    {
        return Ok(playlist);
    }
    match sniff_paste(raw, catalog) {
        Some(PasteKind::Playlist(playlist)) => Ok(playlist),
        Some(PasteKind::Links(links)) => Ok(Playlist::new(
            "",
            "",
            links.into_iter().map(|link| link.id).collect(),
        )),
        Some(PasteKind::Names(ids)) => Ok(Playlist::new("", "", ids)),
        None => Err(CodecError::Unrecognized),
    }
}
