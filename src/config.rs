use anyhow::{ Context, Result };
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub webserver: WebserverConfig,
    pub relay: RelayConfig,
    pub media: MediaConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebserverConfig {
    pub host: String,
    pub port: u16,
    /// Allow cross-origin requests from any origin (browser clients)
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Per-connection bounded outbound queue capacity.
    /// A full queue drops the message for that recipient instead of
    /// blocking the sender's read loop.
    pub outbound_queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub enabled: bool,
    pub api_base: String,
    pub api_key: String,
    pub transcription_model: String,
    pub image_model: String,
    pub chat_model: String,
    pub timeout_secs: u64,
    pub max_requests_per_minute: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryConfig {
    /// Override for the transcripts directory; empty means the default
    /// location under the data directory.
    #[serde(default)]
    pub transcripts_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webserver: WebserverConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_permissive: true,
            },
            relay: RelayConfig {
                outbound_queue_capacity: 64,
            },
            media: MediaConfig {
                enabled: true,
                api_base: "https://api.openai.com/v1".to_string(),
                api_key: String::new(),
                transcription_model: "whisper-1".to_string(),
                image_model: "dall-e-3".to_string(),
                chat_model: "gpt-4o-mini".to_string(),
                timeout_secs: 60,
                max_requests_per_minute: 30,
            },
            memory: MemoryConfig {
                transcripts_dir: String::new(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json
            ::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        // Validate required fields
        if config.relay.outbound_queue_capacity == 0 {
            return Err(anyhow::anyhow!("relay.outbound_queue_capacity must be at least 1"));
        }

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json
            ::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    pub fn reload(&mut self, path: &str) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let config = Config::load(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.webserver.port, 8080);
        assert_eq!(config.relay.outbound_queue_capacity, 64);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let mut config = Config::default();
        config.webserver.port = 9001;
        config.media.chat_model = "gpt-4o".to_string();
        config.save(path_str).unwrap();

        let mut loaded = Config::default();
        loaded.reload(path_str).unwrap();
        assert_eq!(loaded.webserver.port, 9001);
        assert_eq!(loaded.media.chat_model, "gpt-4o");
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let mut config = Config::default();
        config.relay.outbound_queue_capacity = 0;
        config.save(path_str).unwrap();

        assert!(Config::load(path_str).is_err());
    }
}
