//! Playlist serialization formats.
//!
//! Every codec preserves episode order. Identifiers are written as full ids
//! except in the URL query form, which may substitute short aliases.

mod aiopl;
mod export;
mod links;
mod paste;
mod query;
mod text;

use thiserror::Error;

pub use aiopl::{decode_aiopl, download_file_name, encode_aiopl, encode_aiopl_compact};
pub use export::{export, ExportKind};
pub use links::{decode_links, encode_links, LinkedEpisode};
pub use paste::{
    check_drop_extension, decode_file_contents, read_playlist, sniff_paste, PasteKind,
};
pub use query::{decode_query, encode_query};
pub use text::{decode_text, encode_text};

pub const CONTENT_URL_PREFIX: &str = "https://app.adventuresinodyssey.com/content/";

/// Identifier prefix the remote catalog uses for full ids.
pub const FULL_ID_PREFIX: &str = "a3";

pub fn content_url(id: &str) -> String {
    format!("{CONTENT_URL_PREFIX}{id}")
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid file format.")]
    InvalidFormat,

    #[error("Invalid playlist format in file.")]
    InvalidFileContents,

    #[error("Error reading file: {0}")]
    Read(String),

    #[error("File type not supported. Please drop a .aiopl, .json, or .txt file.")]
    UnsupportedExtension,

    #[error("No episodes to copy!")]
    EmptyPlaylist,

    #[error("No playlist found in input.")]
    Unrecognized,
}
