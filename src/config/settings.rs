//! settings.json loading with hierarchical merging.
//!
//! Loads settings from (lowest to highest priority):
//! 1. User settings: ~/.deepseek/settings.json
//! 2. Project settings: .deepseek/settings.json
//! 3. Local settings: .deepseek/settings.local.json (not committed)
//!
//! `DEEPSEEK_PERMISSION_MODE` overrides the merged mode.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::provider::{ConfigProvider, ConfigProviderExt};
use super::{ConfigError, ConfigResult, EnvConfigProvider};
use crate::permissions::{PermissionManager, PermissionMode, PermissionRule};

pub const SETTINGS_DIR: &str = ".deepseek";
const MODE_KEY: &str = "permission.mode";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSource {
    /// Nothing loaded yet.
    #[default]
    Builtin,
    User,
    Project,
    Local,
    Env,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip)]
    pub source: SettingsSource,

    #[serde(default)]
    pub permissions: PermissionSettings,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Settings {
    pub fn with_source(mut self, source: SettingsSource) -> Self {
        self.source = source;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSettings {
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default, rename = "defaultMode", skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
}

impl PermissionSettings {
    pub fn mode(&self) -> ConfigResult<PermissionMode> {
        match &self.default_mode {
            Some(raw) => raw
                .parse::<PermissionMode>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "permissions.defaultMode".to_string(),
                    message,
                }),
            None => Ok(PermissionMode::default()),
        }
    }

    /// Build a session manager from these settings.
    ///
    /// Fails on an unknown mode or a malformed rule; nothing is partially applied.
    pub fn to_manager(&self) -> ConfigResult<PermissionManager> {
        let mode = self.mode()?;
        let deny = parse_rules(&self.deny)?;
        let allow = parse_rules(&self.allow)?;

        let manager = PermissionManager::new(mode);
        for rule in deny {
            manager.deny_rule(rule);
        }
        for rule in allow {
            manager.allow_rule(rule);
        }
        Ok(manager)
    }

    pub fn is_empty(&self) -> bool {
        self.deny.is_empty() && self.allow.is_empty() && self.default_mode.is_none()
    }
}

fn parse_rules(rules: &[String]) -> ConfigResult<Vec<PermissionRule>> {
    rules
        .iter()
        .map(|r| PermissionRule::parse(r).map_err(ConfigError::from))
        .collect()
}

/// Settings loader that merges from multiple sources.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    settings: Settings,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load user, project and local settings, then apply environment overrides.
    pub async fn load(&mut self, project_dir: &Path) -> ConfigResult<&Settings> {
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        self.load_files(home.as_deref(), project_dir).await?;
        self.apply_overrides(&EnvConfigProvider::deepseek()).await?;
        Ok(&self.settings)
    }

    /// Merge the settings files only. `home` of `None` skips user settings.
    pub async fn load_files(&mut self, home: Option<&Path>, project_dir: &Path) -> ConfigResult<()> {
        let mut sources: Vec<(PathBuf, SettingsSource)> = Vec::new();
        if let Some(home) = home {
            sources.push((
                home.join(SETTINGS_DIR).join("settings.json"),
                SettingsSource::User,
            ));
        }
        sources.push((
            project_dir.join(SETTINGS_DIR).join("settings.json"),
            SettingsSource::Project,
        ));
        sources.push((
            project_dir.join(SETTINGS_DIR).join("settings.local.json"),
            SettingsSource::Local,
        ));

        for (path, source) in sources {
            if path.exists() {
                self.merge_file(&path, source).await?;
            }
        }
        Ok(())
    }

    /// Apply the `permission.mode` override from a provider.
    pub async fn apply_overrides(&mut self, provider: &dyn ConfigProvider) -> ConfigResult<()> {
        if let Some(mode) = provider.get_parsed::<PermissionMode>(MODE_KEY).await? {
            tracing::debug!(provider = provider.name(), %mode, "Permission mode overridden");
            self.settings.permissions.default_mode = Some(mode.to_string());
            self.settings.source = SettingsSource::Env;
        }
        Ok(())
    }

    async fn merge_file(&mut self, path: &Path, source: SettingsSource) -> ConfigResult<()> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable settings file");
                return Ok(());
            }
        };
        let file_settings: Settings = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?source, "Loaded settings");
        self.merge_settings(file_settings.with_source(source));
        Ok(())
    }

    fn merge_settings(&mut self, other: Settings) {
        let permissions = &mut self.settings.permissions;
        permissions.deny.extend(other.permissions.deny);
        permissions.allow.extend(other.permissions.allow);
        if other.permissions.default_mode.is_some() {
            permissions.default_mode = other.permissions.default_mode;
        }
        self.settings.extra.extend(other.extra);
        self.settings.source = other.source;
    }

    pub async fn load_merged(project_dir: &Path) -> ConfigResult<Settings> {
        let mut loader = Self::new();
        loader.load(project_dir).await?;
        Ok(loader.settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigProvider;
    use serde_json::json;
    use tempfile::tempdir;

    async fn write_settings(dir: &Path, name: &str, value: serde_json::Value) {
        let settings_dir = dir.join(SETTINGS_DIR);
        tokio::fs::create_dir_all(&settings_dir).await.unwrap();
        tokio::fs::write(settings_dir.join(name), value.to_string())
            .await
            .unwrap();
    }

    #[test]
    fn test_parse_settings_json() {
        let settings: Settings = serde_json::from_value(json!({
            "permissions": {
                "allow": ["bash(git:*)"],
                "deny": ["bash(rm:*)"],
                "defaultMode": "trust"
            },
            "theme": "dark"
        }))
        .unwrap();

        assert_eq!(settings.permissions.allow, vec!["bash(git:*)"]);
        assert_eq!(settings.permissions.mode().unwrap(), PermissionMode::Trust);
        assert_eq!(settings.extra["theme"], "dark");
    }

    #[test]
    fn test_permission_settings_to_manager() {
        let settings = PermissionSettings {
            deny: vec!["bash(rm:*)".to_string()],
            allow: vec!["bash(git:*)".to_string()],
            default_mode: Some("accept-edits".to_string()),
        };

        let manager = settings.to_manager().unwrap();
        assert_eq!(manager.mode(), PermissionMode::Trust);
        assert_eq!(manager.allowlist(), vec!["bash(git:*)"]);
        assert_eq!(manager.denylist(), vec!["bash(rm:*)"]);
    }

    #[test]
    fn test_to_manager_rejects_bad_input() {
        let bad_mode = PermissionSettings {
            default_mode: Some("plan".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_mode.to_manager(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let bad_rule = PermissionSettings {
            allow: vec!["bash(ls:*".to_string()],
            ..Default::default()
        };
        assert!(matches!(bad_rule.to_manager(), Err(ConfigError::Rule(_))));
    }

    #[test]
    fn test_permission_settings_is_empty() {
        assert!(PermissionSettings::default().is_empty());
        let with_deny = PermissionSettings {
            deny: vec!["bash".to_string()],
            ..Default::default()
        };
        assert!(!with_deny.is_empty());
    }

    #[tokio::test]
    async fn test_layered_merge() {
        let home = tempdir().unwrap();
        let project = tempdir().unwrap();
        write_settings(
            home.path(),
            "settings.json",
            json!({"permissions": {"allow": ["glob"], "defaultMode": "yolo"}}),
        )
        .await;
        write_settings(
            project.path(),
            "settings.json",
            json!({"permissions": {"deny": ["bash(rm:*)"], "defaultMode": "default"}}),
        )
        .await;
        write_settings(
            project.path(),
            "settings.local.json",
            json!({"permissions": {"allow": ["bash(cargo:*)"]}}),
        )
        .await;

        let mut loader = SettingsLoader::new();
        loader
            .load_files(Some(home.path()), project.path())
            .await
            .unwrap();
        let settings = loader.settings();

        assert_eq!(settings.permissions.allow, vec!["glob", "bash(cargo:*)"]);
        assert_eq!(settings.permissions.deny, vec!["bash(rm:*)"]);
        assert_eq!(settings.permissions.default_mode.as_deref(), Some("default"));
        assert_eq!(settings.source, SettingsSource::Local);
    }

    #[tokio::test]
    async fn test_missing_files_are_skipped() {
        let project = tempdir().unwrap();
        let mut loader = SettingsLoader::new();
        loader.load_files(None, project.path()).await.unwrap();
        assert!(loader.settings().permissions.is_empty());
        assert_eq!(loader.settings().source, SettingsSource::Builtin);
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let project = tempdir().unwrap();
        let dir = project.path().join(SETTINGS_DIR);
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("settings.json"), "{not json")
            .await
            .unwrap();

        let mut loader = SettingsLoader::new();
        let err = loader.load_files(None, project.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_mode_override() {
        let mut loader = SettingsLoader::new();
        let provider = MemoryConfigProvider::new().value(MODE_KEY, "Yolo");
        loader.apply_overrides(&provider).await.unwrap();

        assert_eq!(
            loader.settings().permissions.mode().unwrap(),
            PermissionMode::Yolo
        );
        assert_eq!(loader.settings().source, SettingsSource::Env);

        let bad = MemoryConfigProvider::new().value(MODE_KEY, "everything");
        assert!(loader.apply_overrides(&bad).await.is_err());
    }
}
