use crate::config::DisplayField;

use super::model::{Song, TagType};

/// Build a one-line description of `song` according to `fields` and `sep`.
///
/// Missing or blank tags are skipped; when nothing could be produced the
/// file name (or the whole uri) is used instead.
pub fn display_from_fields(song: &Song, fields: &[DisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let push_tag = |parts: &mut Vec<String>, tag: TagType| {
        if let Some(v) = song.tag.get(tag).map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(v.to_string());
        }
    };

    for f in fields {
        match f {
            DisplayField::Artist => push_tag(&mut parts, TagType::Artist),
            DisplayField::Title => push_tag(&mut parts, TagType::Title),
            DisplayField::Album => push_tag(&mut parts, TagType::Album),
            DisplayField::Filename => {
                if let Some(name) = file_name(&song.uri) {
                    parts.push(name.to_string());
                }
            }
            DisplayField::Uri => parts.push(song.uri.clone()),
        }
    }

    if parts.is_empty() {
        file_name(&song.uri).unwrap_or(&song.uri).to_string()
    } else {
        parts.join(sep)
    }
}

fn file_name(uri: &str) -> Option<&str> {
    uri.rsplit('/').next().filter(|s| !s.trim().is_empty())
}
