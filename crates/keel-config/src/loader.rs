//! Layered JSON5 config loading.
//!
//! Two implicit layers, user config dir then cwd, merged later-wins on top
//! of defaults. An explicit path bypasses layering entirely.

use crate::{ConfigError, KeelConfig};
use directories::ProjectDirs;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config filename looked up in each layer.
const DEFAULT_CONFIG_FILE: &str = "keel.json5";

impl KeelConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value)
    }

    /// Load the layered config stack: user config dir, then cwd (later wins).
    ///
    /// Missing layers are skipped; no layer at all yields the defaults.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut merged = Value::Object(serde_json::Map::new());
        let mut layer_count = 0usize;
        for path in [user_config_path(), Some(cwd.as_ref().join(DEFAULT_CONFIG_FILE))]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                debug!("skipping missing config layer (path={})", path.display());
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            let value: Value = json5::from_str(&contents)?;
            merge_json_values(&mut merged, &value);
            debug!("merged config layer (path={})", path.display());
            layer_count += 1;
        }
        info!("layered config loaded (layers={layer_count})");
        config_from_value(merged)
    }
}

/// Default user-level config file path.
fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "keel").map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}

/// Decode and validate a merged config value.
fn config_from_value(value: Value) -> Result<KeelConfig, ConfigError> {
    let config: KeelConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Deep-merge `overlay` into `base`; objects merge per key, everything else
/// replaces.
fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_json_values(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use crate::KeelConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn load_from_str_accepts_json5() {
        let config = KeelConfig::load_from_str(
            r#"{
                // comments are fine
                gateway: { model: "gpt-4o", locale: "en", },
            }"#,
        )
        .expect("config");
        assert_eq!(config.gateway.model, "gpt-4o");
        assert_eq!(config.gateway.locale, "en");
        // Unset fields keep their defaults.
        assert_eq!(config.gateway.timeout_secs, 45);
    }

    #[test]
    fn load_from_str_rejects_invalid_values() {
        let result = KeelConfig::load_from_str(r#"{ gateway: { timeout_secs: 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn merge_is_deep_and_later_wins() {
        let mut base = json!({
            "gateway": { "model": "a", "locale": "ko" },
            "storage": { "path": "/old" }
        });
        let overlay = json!({
            "gateway": { "model": "b" }
        });
        merge_json_values(&mut base, &overlay);
        assert_eq!(base["gateway"]["model"], json!("b"));
        assert_eq!(base["gateway"]["locale"], json!("ko"));
        assert_eq!(base["storage"]["path"], json!("/old"));
    }

    #[test]
    fn load_from_path_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("keel.json5");
        std::fs::write(&path, r#"{ storage: { path: "/data/keel" } }"#).expect("write");
        let config = KeelConfig::load_from_path(&path).expect("config");
        assert_eq!(config.storage.path.as_deref(), Some("/data/keel"));
    }
}
