use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::boilerplate::Boilerplate;
use crate::error::{Result, ToolsError};
use crate::util::{expand_tilde, resolve};

/// Config file looked up under the project root when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "ProjectSetup/hvtools.json";

/// Toolkit settings. Every field has a default matching the engine's
/// repository layout, so a missing or partial file is fine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    pub source_dir: String,
    pub setup_dir: String,
    pub build_list: String,
    pub template_store: String,
    pub launcher: String,
    pub protocol: String,
    pub project_name: String,
    pub license_header: String,
    pub namespace: String,
    pub cmake_version: String,
    pub min_python_version: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            source_dir: "Source".into(),
            setup_dir: "ProjectSetup".into(),
            build_list: "Source/CMakeLists.txt".into(),
            template_store: "Source/FileTemplates.json".into(),
            launcher: "Bin/EditorDevelopment/EditorDevelopment.exe".into(),
            protocol: "Havtorn".into(),
            project_name: "Havtorn".into(),
            license_header: "Copyright 2025 Team Havtorn. All Rights Reserved.".into(),
            namespace: "Havtorn".into(),
            cmake_version: "3.31.4".into(),
            min_python_version: "3.10".into(),
        }
    }
}

/// A project root together with the config resolved against it.
#[derive(Clone, Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: ToolsConfig,
}

impl Project {
    /// Loads the config from `explicit`, else from the default location under
    /// `root`, else falls back to defaults.
    pub fn open(root: &str, explicit: Option<&Path>) -> Result<Self> {
        let root = PathBuf::from(expand_tilde(root));
        let config = match explicit {
            Some(path) => load_config(path)?,
            None => {
                let path = root.join(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    load_config(&path)?
                } else {
                    tracing::debug!("no config at {}, using defaults", path.display());
                    ToolsConfig::default()
                }
            }
        };
        Ok(Self { root, config })
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ToolsConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn source_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.source_dir)
    }

    pub fn setup_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.setup_dir)
    }

    pub fn build_list(&self) -> PathBuf {
        resolve(&self.root, &self.config.build_list)
    }

    pub fn template_store(&self) -> PathBuf {
        resolve(&self.root, &self.config.template_store)
    }

    pub fn launcher(&self) -> PathBuf {
        resolve(&self.root, &self.config.launcher)
    }

    /// Batch script in the setup directory.
    pub fn setup_script(&self, name: &str) -> PathBuf {
        self.setup_dir().join(name)
    }

    pub fn boilerplate(&self) -> Boilerplate {
        Boilerplate {
            license: self.config.license_header.clone(),
            namespace: self.config.namespace.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<ToolsConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ToolsError::Custom(format!("Cannot read config {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_config(path: &Path, config: &ToolsConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Writes the default config, refusing to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ToolsError::Custom(format!(
            "{} already exists",
            path.display()
        )));
    }
    save_config(path, &ToolsConfig::default())?;
    tracing::info!("wrote default config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ToolsConfig =
            serde_json::from_str(r#"{ "protocol": "MyEngine", "cmakeVersion": "3.30.0" }"#).unwrap();
        assert_eq!(config.protocol, "MyEngine");
        assert_eq!(config.cmake_version, "3.30.0");
        assert_eq!(config.source_dir, "Source");
        assert_eq!(config.namespace, "Havtorn");
    }

    #[test]
    fn test_open_uses_default_location() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();

        let project = Project::open(&root, None).unwrap();
        assert_eq!(project.config, ToolsConfig::default());
        assert_eq!(project.build_list(), dir.path().join("Source/CMakeLists.txt"));

        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let custom = ToolsConfig {
            source_dir: "Code".into(),
            ..ToolsConfig::default()
        };
        save_config(&path, &custom).unwrap();
        let project = Project::open(&root, None).unwrap();
        assert_eq!(project.source_dir(), dir.path().join("Code"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("hvtools.json");
        init_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), ToolsConfig::default());
        assert!(init_config(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let missing = dir.path().join("missing.json");
        assert!(Project::open(&root, Some(&missing)).is_err());
    }
}
