//! In-Memory Configuration Provider
//!
//! Useful for tests and code-defined overrides.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::ConfigResult;
use super::provider::ConfigProvider;

#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: HashMap<String, String>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Add a value during construction.
    pub fn value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.get_mut().insert(key.into(), value.into());
        self
    }

    pub async fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().await.insert(key.into(), value.into());
    }
}

#[async_trait::async_trait]
impl ConfigProvider for MemoryConfigProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn list_keys(&self, prefix: &str) -> ConfigResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigProviderExt;
    use crate::permissions::PermissionMode;

    #[tokio::test]
    async fn test_memory_provider() {
        let provider = MemoryConfigProvider::new().value("permission.mode", "trust");
        provider.insert("permission.extra", "1").await;

        let mode: Option<PermissionMode> = provider.get_parsed("permission.mode").await.unwrap();
        assert_eq!(mode, Some(PermissionMode::Trust));
        assert_eq!(
            provider.list_keys("permission.").await.unwrap(),
            vec!["permission.extra", "permission.mode"]
        );
        assert_eq!(provider.get_raw("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_parse_failure_names_key() {
        let provider = MemoryConfigProvider::new().value("permission.mode", "plan");
        let err = provider
            .get_parsed::<PermissionMode>("permission.mode")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permission.mode"));
    }

    #[tokio::test]
    async fn test_get_json() {
        let provider = MemoryConfigProvider::new().value("rules", r#"["bash(ls:*)"]"#);
        let rules: Option<Vec<String>> = provider.get_json("rules").await.unwrap();
        assert_eq!(rules, Some(vec!["bash(ls:*)".to_string()]));
    }
}
