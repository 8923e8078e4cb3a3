use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to listen on
    pub host: String,
    /// Port to listen on; 0 picks a free port
    pub port: u16,
    /// Directory holding the .txt log files
    pub log_dir: PathBuf,
    /// Log level when RUST_LOG and --debug are not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 19007,
            log_dir: PathBuf::from("."),
            log_level: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not
    /// exist (the viewer is useful with no config at all).
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 19007);
        assert_eq!(config.log_dir, PathBuf::from("."));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();
        file.flush().unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/.batchview.toml").unwrap();
        assert_eq!(config.port, 19007);
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config {
            port: 9000,
            log_dir: PathBuf::from("/var/logs"),
            ..Config::default()
        };
        config.save(path).unwrap();

        let loaded = Config::from_file(path).unwrap();
        assert_eq!(loaded.port, 9000);
        assert_eq!(loaded.log_dir, PathBuf::from("/var/logs"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        file.flush().unwrap();

        assert!(Config::from_file(file.path().to_str().unwrap()).is_err());
    }
}
