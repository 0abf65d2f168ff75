use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Tag kinds a song snapshot can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    Artist,
    AlbumArtist,
    Album,
    Title,
    Track,
    Name,
    Genre,
    Date,
    Composer,
    Performer,
    Disc,
}

impl TagType {
    pub const ALL: [TagType; 11] = [
        TagType::Artist,
        TagType::AlbumArtist,
        TagType::Album,
        TagType::Title,
        TagType::Track,
        TagType::Name,
        TagType::Genre,
        TagType::Date,
        TagType::Composer,
        TagType::Performer,
        TagType::Disc,
    ];

    /// Name used on the wire, e.g. `AlbumArtist`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::AlbumArtist => "AlbumArtist",
            Self::Album => "Album",
            Self::Title => "Title",
            Self::Track => "Track",
            Self::Name => "Name",
            Self::Genre => "Genre",
            Self::Date => "Date",
            Self::Composer => "Composer",
            Self::Performer => "Performer",
            Self::Disc => "Disc",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagType {
    type Err = String;

    /// Tag names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tag type \"{s}\""))
    }
}

/// Metadata attached to a song.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tag {
    pub duration: Option<Duration>,
    pub items: Vec<(TagType, String)>,
}

impl Tag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that appends one item.
    #[must_use]
    pub fn with(mut self, tag: TagType, value: impl Into<String>) -> Self {
        self.add(tag, value);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn add(&mut self, tag: TagType, value: impl Into<String>) {
        self.items.push((tag, value.into()));
    }

    /// First value of the given tag type.
    #[must_use]
    pub fn get(&self, tag: TagType) -> Option<&str> {
        self.items
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// All values of the given tag type, in insertion order.
    pub fn values(&self, tag: TagType) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }
}

/// A queue entry's own copy of a catalog song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    /// Catalog-relative path or remote URL.
    pub uri: String,
    /// Modification time of the underlying file, in seconds since the epoch.
    pub mtime: Option<i64>,
    pub tag: Tag,
}

impl Song {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mtime: None,
            tag: Tag::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    #[must_use]
    pub fn with_mtime(mut self, mtime: i64) -> Self {
        self.mtime = Some(mtime);
        self
    }

    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.tag.duration
    }

    /// Songs with a scheme (`http://...`) are not backed by the catalog.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.uri
            .split_once("://")
            .is_some_and(|(scheme, _)| !scheme.is_empty() && !scheme.contains('/'))
    }

    /// Does any value of `tag` equal `needle` exactly?
    #[must_use]
    pub fn tag_equals(&self, tag: TagType, needle: &str) -> bool {
        self.tag.values(tag).any(|v| v == needle)
    }

    /// Does any value of `tag` contain `needle_lower`, ignoring case?
    ///
    /// `needle_lower` must already be lowercase.
    #[must_use]
    pub fn tag_contains(&self, tag: TagType, needle_lower: &str) -> bool {
        self.tag
            .values(tag)
            .any(|v| v.to_lowercase().contains(needle_lower))
    }
}
