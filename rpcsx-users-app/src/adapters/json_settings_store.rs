//! Settings store backed by a flat JSON object file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;

use rpcsx_users_core::error::{CoreError, CoreResult};
use rpcsx_users_core::traits::SettingsStore;

/// JSON file settings store
///
/// The file holds a single object (`{"active_user": "00000001", ...}`).
/// Keys this store does not understand are preserved on write.
pub struct JsonSettingsStore {
    path: PathBuf,
    /// 内存缓存, `None` until first access
    cache: Mutex<Option<Map<String, Value>>>,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从文件加载; a missing file is an empty object
    async fn load_from_file(&self) -> CoreResult<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(CoreError::SettingsError(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?
        {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::SerializationError(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    /// 保存到文件
    async fn save_to_file(&self, values: &Map<String, Value>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::SettingsError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| CoreError::SettingsError(e.to_string()))
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load_from_file().await?);
        }

        Ok(cache
            .as_ref()
            .and_then(|values| values.get(key))
            .and_then(Value::as_str)
            .map(String::from))
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut cache = self.cache.lock().await;
        let mut values = match cache.take() {
            Some(values) => values,
            None => self.load_from_file().await?,
        };

        let previous = values.insert(key.to_string(), Value::String(value.to_string()));
        let saved = self.save_to_file(&values).await;
        if saved.is_err() {
            // Keep memory in sync with disk; an unreadable file keeps the old cache
            match self.load_from_file().await {
                Ok(on_disk) => values = on_disk,
                Err(e) => {
                    log::warn!("Failed to reload {}: {e}", self.path.display());
                    match previous {
                        Some(old) => values.insert(key.to_string(), old),
                        None => values.remove(key),
                    };
                }
            }
        }
        *cache = Some(values);

        saved
    }
}
