//! Project configuration listing the schema sources of a project.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! schemas:
//!   - user.json
//!   - user-extra.yaml
//! defaults: user-defaults.json
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default file name of a project config.
pub const CONFIG_FILE_NAME: &str = ".shape-schema.yml";

/// Schema sources of a project, typically read from `.shape-schema.yml`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use shape_schema_loader::ProjectConfig;
///
/// let config: ProjectConfig = serde_yaml::from_str(
///     "version: '1.0'\nschemas: [user.json, /abs/extra.yaml]\n",
/// )
/// .unwrap();
/// assert_eq!(
///     config.schema_paths(Path::new("conf")),
///     vec![PathBuf::from("conf/user.json"), PathBuf::from("/abs/extra.yaml")]
/// );
/// assert!(config.defaults_path(Path::new("conf")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Schema fragments, merged in order; the first is the base.
    pub schemas: Vec<PathBuf>,
    /// Optional file holding a bare defaults mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn new(schemas: Vec<PathBuf>) -> Self {
        Self {
            version: "1.0".into(),
            schemas,
            defaults: None,
        }
    }

    pub fn with_defaults(mut self, defaults: impl Into<PathBuf>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoaderError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::LoaderError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Schema paths with relative entries resolved against `base`.
    pub fn schema_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.schemas.iter().map(|path| base.join(path)).collect()
    }

    /// Defaults path resolved against `base`.
    pub fn defaults_path(&self, base: &Path) -> Option<PathBuf> {
        self.defaults.as_ref().map(|path| base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
schemas:
  - user.json
  - nested/user-extra.yaml
defaults: user-defaults.json
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ProjectConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.schemas,
            vec![PathBuf::from("user.json"), PathBuf::from("nested/user-extra.yaml")]
        );
        assert_eq!(config.defaults, Some(PathBuf::from("user-defaults.json")));
    }

    #[test]
    fn test_deserialize_without_defaults() {
        let config: ProjectConfig =
            serde_yaml::from_str("version: '1.0'\nschemas: [user.json]\n").unwrap();
        assert!(config.defaults.is_none());
    }

    #[test]
    fn test_paths_resolve_against_base() {
        let config: ProjectConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let base = Path::new("/project");
        assert_eq!(
            config.schema_paths(base),
            vec![
                PathBuf::from("/project/user.json"),
                PathBuf::from("/project/nested/user-extra.yaml")
            ]
        );
        assert_eq!(
            config.defaults_path(base),
            Some(PathBuf::from("/project/user-defaults.json"))
        );
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let original = ProjectConfig::new(vec!["a.json".into(), "b.yaml".into()])
            .with_defaults("defaults.json");
        original.save(&path).unwrap();

        assert_eq!(ProjectConfig::load(&path).unwrap(), original);
    }
}
