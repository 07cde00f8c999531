//! Client configuration loaded from a TOML file.
//!
//! All fields have defaults so the engine works without a config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub types: TypesConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }
}

/// General browsing preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Initial sort field identifier (see `SortField::from_id`).
    #[serde(default = "default_sort")]
    pub default_sort: String,
    /// Whether delete carries a confirmation prompt.
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            confirm_delete: true,
        }
    }
}

/// Names of the server applications the client builds links against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// The browser application (navigation hrefs).
    #[serde(default = "default_files_app")]
    pub files_app: String,
    /// The listing/action service endpoint.
    #[serde(default = "default_service_app")]
    pub service_app: String,
    /// The app that serves (and runs) files.
    #[serde(default = "default_serve_app")]
    pub serve_app: String,
    /// The app that streams downloads and archives.
    #[serde(default = "default_download_app")]
    pub download_app: String,
    /// Repository namespace that submittable work must live under.
    /// `None` disables submission entirely.
    #[serde(default)]
    pub submission_base: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            files_app: default_files_app(),
            service_app: default_service_app(),
            serve_app: default_serve_app(),
            download_app: default_download_app(),
            submission_base: None,
        }
    }
}

/// Composite-home layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    /// Per-subject personal workspace directory name.
    #[serde(default = "default_personal_dir")]
    pub personal_dir: String,
    /// Catch-all workspace name outside any subject.
    #[serde(default = "default_stuff_dir")]
    pub stuff_dir: String,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            personal_dir: default_personal_dir(),
            stuff_dir: default_stuff_dir(),
        }
    }
}

/// MIME type sets that change action eligibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypesConfig {
    /// Types the serve app can interpret; gates the run action.
    #[serde(default = "default_executable")]
    pub executable: Vec<String>,
}

impl Default for TypesConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

impl TypesConfig {
    /// Whether the given MIME type is in the executable set.
    pub fn is_executable(&self, mime_type: &str) -> bool {
        self.executable.iter().any(|t| t == mime_type)
    }
}

fn default_true() -> bool {
    true
}

fn default_sort() -> String {
    "filename".to_string()
}

fn default_files_app() -> String {
    "files".to_string()
}

fn default_service_app() -> String {
    "fileservice".to_string()
}

fn default_serve_app() -> String {
    "serve".to_string()
}

fn default_download_app() -> String {
    "download".to_string()
}

fn default_personal_dir() -> String {
    "mywork".to_string()
}

fn default_stuff_dir() -> String {
    "stuff".to_string()
}

fn default_executable() -> Vec<String> {
    vec!["text/x-python".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.default_sort, "filename");
        assert!(config.general.confirm_delete);
        assert_eq!(config.service.service_app, "fileservice");
        assert_eq!(config.service.download_app, "download");
        assert_eq!(config.service.submission_base, None);
        assert_eq!(config.home.personal_dir, "mywork");
        assert_eq!(config.home.stuff_dir, "stuff");
        assert_eq!(config.types.executable, vec!["text/x-python"]);
    }

    #[test]
    fn is_executable_checks_the_set() {
        let types = TypesConfig::default();
        assert!(types.is_executable("text/x-python"));
        assert!(!types.is_executable("text/plain"));
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
default_sort = "modified"
confirm_delete = false

[service]
files_app = "browse"
submission_base = "svn://repo/submissions"

[home]
personal_dir = "own"
stuff_dir = "misc"

[types]
executable = ["text/x-python", "application/x-shellscript"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.default_sort, "modified");
        assert!(!config.general.confirm_delete);
        assert_eq!(config.service.files_app, "browse");
        assert_eq!(
            config.service.submission_base.as_deref(),
            Some("svn://repo/submissions")
        );
        // Unlisted service fields keep their defaults.
        assert_eq!(config.service.serve_app, "serve");
        assert_eq!(config.home.personal_dir, "own");
        assert_eq!(config.home.stuff_dir, "misc");
        assert!(config.types.is_executable("application/x-shellscript"));
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.default_sort, "filename");
        assert_eq!(config.service.service_app, "fileservice");
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid [[[toml").unwrap();
        let result = Config::load(&path);
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }
}
