use crate::catalog::Catalog;
use crate::playlist::Playlist;

use super::{CodecError, content_url, encode_links};

/// One-way copy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Names,
    InlineLinks,
    Urls,
    Ids,
}

impl ExportKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Names => "Episode names",
            Self::InlineLinks => "Inline links",
            Self::Urls => "Episode URLs",
            Self::Ids => "Episode IDs",
        }
    }
}

pub fn export(kind: ExportKind, playlist: &Playlist, catalog: &Catalog) -> Result<String, CodecError> {
    if playlist.is_empty() {
        return Err(CodecError::EmptyPlaylist);
    }
    let joined = |items: Vec<String>| items.join("\n\n");
    let out = match kind {
        ExportKind::Names => joined(
            playlist
                .episodes
                .iter()
                .map(|id| catalog.label_of(id))
                .collect(),
        ),
        ExportKind::InlineLinks => encode_links(playlist, catalog),
        ExportKind::Urls => joined(playlist.episodes.iter().map(|id| content_url(id)).collect()),
        ExportKind::Ids => joined(playlist.episodes.clone()),
    };
    Ok(out)
}
