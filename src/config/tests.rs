use super::load::{MAX_QUEUE_LENGTH, default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_ostinato_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("OSTINATO_CONFIG_PATH", "/tmp/ostinato-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/ostinato-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("ostinato")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("ostinato")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert_eq!(s.queue.max_length, 16384);
    assert_eq!(s.playback.tick_ms, 200);
    assert!(!s.playback.random);
    assert_eq!(s.display.fields, vec![DisplayField::Artist, DisplayField::Title]);
    assert!(s.log.level.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_impossible_values() {
    let mut s = Settings::default();
    s.queue.max_length = 0;
    assert!(s.validate().unwrap_err().contains("max_length"));

    s.queue.max_length = MAX_QUEUE_LENGTH + 1;
    assert_eq!(s.validate().unwrap_err(), "queue.max_length is too large");
    s.queue.max_length = MAX_QUEUE_LENGTH;
    assert!(s.validate().is_ok());

    let mut s = Settings::default();
    s.playback.tick_ms = 0;
    assert!(s.validate().unwrap_err().contains("tick_ms"));
}

#[test]
fn settings_load_from_config_file_and_parse_field_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[queue]
max_length = 500

[playback]
random = true
repeat = true
consume = true
default_song_seconds = 30
tick_ms = 50

[display]
fields = ["file_name", "path", "album"]
separator = " | "

[log]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("OSTINATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("OSTINATO__QUEUE__MAX_LENGTH");

    let s = Settings::load().unwrap();
    assert_eq!(s.queue.max_length, 500);
    assert!(s.playback.random);
    assert!(s.playback.repeat);
    assert!(!s.playback.single);
    assert!(s.playback.consume);
    assert_eq!(s.playback.default_song_seconds, 30);
    assert_eq!(s.playback.tick_ms, 50);
    assert_eq!(
        s.display.fields,
        vec![DisplayField::Filename, DisplayField::Uri, DisplayField::Album]
    );
    assert_eq!(s.display.separator, " | ");
    assert_eq!(s.log.level.as_deref(), Some("debug"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[queue]
max_length = 500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("OSTINATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("OSTINATO__QUEUE__MAX_LENGTH", "64");

    let s = Settings::load().unwrap();
    assert_eq!(s.queue.max_length, 64);
}

#[test]
fn load_from_missing_file_uses_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("OSTINATO__QUEUE__MAX_LENGTH");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(dir.path().join("nope.toml").as_path())).unwrap();
    assert_eq!(s.queue.max_length, 16384);
}
