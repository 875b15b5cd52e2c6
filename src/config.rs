use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Client configuration, stored as JSON in the user's config directory:
/// - Linux: ~/.config/wardrobe/config.json
/// - macOS: ~/Library/Application Support/wardrobe/config.json
/// - Windows: %APPDATA%\wardrobe\config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the wardrobe backend
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to the local backend default.
    ///
    /// A missing file is written out with the defaults so the user has
    /// something to edit; an unparseable one is left alone.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if let Ok(config) = serde_json::from_str(&content) {
                        return config;
                    }
                }
                log::warn!("could not parse {}, using defaults", path.display());
                return Self::default();
            }
        }

        let config = Self::default();
        if let Err(e) = config.save() {
            log::warn!("could not write default config: {e}");
        }
        config
    }

    /// Write the configuration back to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wardrobe").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_the_local_backend() {
        assert_eq!(Config::default().api_base_url, "http://127.0.0.1:8000");
    }
}
