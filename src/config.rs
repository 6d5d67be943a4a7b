//! Persisted configuration and token resolution.
//!
//! The configuration file lives at `$HOME/.config/nexp.yaml`:
//!
//! ```yaml
//! token: secret_abc
//! images:
//!   savepath: images
//!   ignoreimages: false
//!   overwriteexisting: false
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::ImageSaveOptions;

/// Environment variable holding a Notion integration token.
pub const TOKEN_ENV_VAR: &str = "NOTION_TOKEN";

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE: &str = "nexp.yaml";

/// Contents of the configuration file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NexpConfig {
    /// Notion integration token
    #[serde(default)]
    pub token: String,

    /// Image handling defaults
    #[serde(default)]
    pub images: ImageConfig,
}

/// Image section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default, rename = "savepath")]
    pub save_path: String,

    #[serde(default, rename = "ignoreimages")]
    pub ignore_images: bool,

    #[serde(default, rename = "overwriteexisting")]
    pub overwrite_existing: bool,
}

impl ImageConfig {
    /// Image options described by this section.
    pub fn to_save_options(&self) -> ImageSaveOptions {
        ImageSaveOptions {
            save_dir: PathBuf::from(&self.save_path),
            ignore_images: self.ignore_images,
            overwrite_existing: self.overwrite_existing,
        }
    }
}

impl NexpConfig {
    /// Location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the configuration from its default location.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load the configuration from `path`. An empty file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load the configuration, or defaults when the file does not exist.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the configuration to its default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        restrict_permissions(path)?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

impl fmt::Debug for NexpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("NexpConfig")
            .field("token", &token)
            .field("images", &self.images)
            .finish()
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Find a Notion token.
///
/// Precedence is `explicit`, then [`TOKEN_ENV_VAR`], then the token in the
/// configuration file. Empty values count as absent.
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    let from_env = env::var(TOKEN_ENV_VAR).ok();
    let config_path = NexpConfig::default_path().ok();
    resolve_token_with(explicit, from_env, config_path.as_deref())
}

/// [`resolve_token`] with the environment value and config path supplied.
pub fn resolve_token_with(
    explicit: Option<&str>,
    from_env: Option<String>,
    config_path: Option<&Path>,
) -> Result<String> {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        debug!("Using token passed explicitly");
        return Ok(token.to_string());
    }

    if let Some(token) = from_env.filter(|t| !t.is_empty()) {
        debug!("Using token from {}", TOKEN_ENV_VAR);
        return Ok(token);
    }

    if let Some(path) = config_path.filter(|p| p.exists()) {
        let config = NexpConfig::load_from(path)?;
        if !config.token.is_empty() {
            debug!("Using token from {}", path.display());
            return Ok(config.token);
        }
    }

    Err(Error::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("nexp.yaml");
        let config = NexpConfig {
            token: "secret".to_string(),
            images: ImageConfig {
                save_path: "pics".to_string(),
                ignore_images: true,
                overwrite_existing: false,
            },
        };
        config.save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("savepath: pics"));
        assert!(raw.contains("ignoreimages: true"));
        assert_eq!(NexpConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexp.yaml");

        fs::write(&path, "token: abc\n").unwrap();
        let config = NexpConfig::load_from(&path).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.images, ImageConfig::default());

        fs::write(&path, "").unwrap();
        assert_eq!(NexpConfig::load_from(&path).unwrap(), NexpConfig::default());
    }

    #[test]
    fn test_token_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nexp.yaml");
        fs::write(&path, "token: from-file\n").unwrap();

        let env = Some("from-env".to_string());
        assert_eq!(
            resolve_token_with(Some("explicit"), env.clone(), Some(path.as_path())).unwrap(),
            "explicit"
        );
        assert_eq!(
            resolve_token_with(None, env, Some(path.as_path())).unwrap(),
            "from-env"
        );
        assert_eq!(
            resolve_token_with(Some(""), Some(String::new()), Some(path.as_path())).unwrap(),
            "from-file"
        );
    }

    #[test]
    fn test_missing_token() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.yaml");
        assert!(matches!(
            resolve_token_with(None, None, Some(missing.as_path())),
            Err(Error::MissingToken)
        ));

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "images:\n  savepath: x\n").unwrap();
        assert!(matches!(
            resolve_token_with(None, None, Some(empty.as_path())),
            Err(Error::MissingToken)
        ));
        assert!(matches!(
            resolve_token_with(None, None, None),
            Err(Error::MissingToken)
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = NexpConfig {
            token: "secret_value".to_string(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret_value"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_image_section_to_options() {
        let images = ImageConfig {
            save_path: String::new(),
            ignore_images: false,
            overwrite_existing: true,
        };
        let options = images.to_save_options();
        assert_eq!(options.save_dir(), Path::new("images"));
        assert!(options.overwrite_existing);
    }
}
