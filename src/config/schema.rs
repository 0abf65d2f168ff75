use serde::Deserialize;

/// Top-level daemon settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/ostinato/config.toml` or `~/.config/ostinato/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `OSTINATO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub queue: QueueSettings,
    pub playback: PlaybackSettings,
    pub display: DisplaySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// Maximum number of songs in the queue.
    pub max_length: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self { max_length: 16384 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub random: bool,
    pub repeat: bool,
    pub single: bool,
    pub consume: bool,

    /// How long a song without a known duration plays (seconds).
    /// Set to 0 to let such songs play until skipped.
    pub default_song_seconds: u64,

    /// Player tick interval (milliseconds).
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            random: false,
            repeat: false,
            single: false,
            consume: false,
            default_song_seconds: 0,
            tick_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Which song fields make up the one-line "now playing" text, and in
    /// what order.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub fields: Vec<DisplayField>,
    /// Separator used to join `fields`.
    pub separator: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fields: vec![DisplayField::Artist, DisplayField::Title],
            separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayField {
    Artist,
    Title,
    Album,
    #[serde(alias = "file_name", alias = "file-name", alias = "file")]
    Filename,
    #[serde(alias = "path")]
    Uri,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log filter (`error`, `warn`, `info`, `debug`, `trace` or any
    /// `env_logger` filter string). Overrides `-q`/`-v` when set.
    pub level: Option<String>,
}
