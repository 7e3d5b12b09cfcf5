use serde::Serialize;
use serde_json::{Map, Value};

use crate::playlist::Playlist;

use super::CodecError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AioplDocument<'a> {
    metadata: Map<String, Value>,
    errors: Vec<Value>,
    content_groupings: Vec<ContentGrouping<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentGrouping<'a> {
    name: &'a str,
    #[serde(rename = "imageURL")]
    image_url: &'a str,
    content_list: Vec<ContentItem<'a>>,
}

#[derive(Debug, Serialize)]
struct ContentItem<'a> {
    id: &'a str,
}

fn document(playlist: &Playlist) -> AioplDocument<'_> {
    AioplDocument {
        metadata: Map::new(),
        errors: Vec::new(),
        content_groupings: vec![ContentGrouping {
            name: &playlist.name,
            image_url: &playlist.image_url,
            content_list: playlist
                .episodes
                .iter()
                .map(|id| ContentItem { id })
                .collect(),
        }],
    }
}

/// Pretty-printed `.aiopl` document, as written by the download action.
pub fn encode_aiopl(playlist: &Playlist) -> String {
    serde_json::to_string_pretty(&document(playlist)).unwrap_or_default()
}

pub fn encode_aiopl_compact(playlist: &Playlist) -> String {
    serde_json::to_string(&document(playlist)).unwrap_or_default()
}

/// Reads the first content grouping. Nothing is returned unless the whole
/// document has the expected shape.
pub fn decode_aiopl(raw: &str) -> Result<Playlist, CodecError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| CodecError::Read(err.to_string()))?;
    let grouping = value
        .pointer("/contentGroupings/0")
        .filter(|grouping| !grouping.is_null())
        .ok_or(CodecError::InvalidFormat)?;

    let text_field = |key: &str| {
        grouping
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let episodes = grouping
        .get("contentList")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id")?.as_str())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Playlist::new(text_field("name"), text_field("imageURL"), episodes))
}

/// `My Playlist` -> `My_Playlist.aiopl`; unnamed playlists get `playlist.aiopl`.
pub fn download_file_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "playlist.aiopl".to_string();
    }
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{joined}.aiopl")
}
