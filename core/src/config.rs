use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime settings. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub save_path: PathBuf,
    pub port: u16,
    pub server_ip: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            save_path: PathBuf::from(SAVE_FILE),
            port: NET_PORT,
            server_ip: "127.0.0.1".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width as f32, self.screen_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.port, 25565);
        assert_eq!(cfg.save_path, PathBuf::from("level.dat"));
    }

    #[test]
    fn partial_override() {
        let cfg = GameConfig::from_toml("server_ip = \"192.168.1.20\"\nscreen_width = 800\n").unwrap();
        assert_eq!(cfg.server_ip, "192.168.1.20");
        assert_eq!(cfg.screen_width, 800);
        assert_eq!(cfg.screen_height, 720);
    }

    #[test]
    fn bad_type_is_parse_error() {
        assert!(matches!(GameConfig::from_toml("port = \"x\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000").unwrap();
        let cfg = GameConfig::load(file.path()).unwrap();
        assert_eq!(cfg.port, 4000);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
