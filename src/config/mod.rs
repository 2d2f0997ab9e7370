use crate::errors::{AppError, AppResult};
use crate::models::Sentiment;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Durable, app-owned video storage.
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    /// Ephemeral camera cache.
    #[serde(default = "default_capture_dir")]
    pub capture_dir: String,
    /// Root of the shared media gallery.
    #[serde(default = "default_gallery_dir")]
    pub gallery_dir: String,
    #[serde(default = "default_album")]
    pub album: String,
    #[serde(default = "default_sentiment")]
    pub default_sentiment: u8,
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_media_dir() -> String {
    Config::config_dir()
        .join("media")
        .to_string_lossy()
        .to_string()
}
fn default_capture_dir() -> String {
    env::temp_dir()
        .join("esmlogger-capture")
        .to_string_lossy()
        .to_string()
}
fn default_gallery_dir() -> String {
    home_dir().join("Videos").to_string_lossy().to_string()
}
fn default_album() -> String {
    "ExperienceSampling".to_string()
}
fn default_sentiment() -> u8 {
    Sentiment::NEUTRAL.value()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            media_dir: default_media_dir(),
            capture_dir: default_capture_dir(),
            gallery_dir: default_gallery_dir(),
            album: default_album(),
            default_sentiment: default_sentiment(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("esmlogger")
        } else {
            home_dir().join(".esmlogger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("esmlogger.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("esm_data.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn media_path(&self) -> PathBuf {
        expand_tilde(&self.media_dir)
    }

    pub fn capture_path(&self) -> PathBuf {
        expand_tilde(&self.capture_dir)
    }

    pub fn gallery_path(&self) -> PathBuf {
        expand_tilde(&self.gallery_dir)
    }

    pub fn initial_sentiment(&self) -> Sentiment {
        Sentiment::clamped(self.default_sentiment as i64)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let mut config = Self::load()?;

        // DB name: user provided or default
        if let Some(name) = custom_db {
            let p = std::path::Path::new(&name);
            config.database = if p.is_absolute() {
                p.to_string_lossy().to_string()
            } else {
                dir.join(p).to_string_lossy().to_string()
            };
        }

        // Write config file
        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        fs::create_dir_all(config.media_path())?;

        Ok(config)
    }
}
