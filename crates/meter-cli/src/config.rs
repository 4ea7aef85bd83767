//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::Dict;
use figment::{Figment, Provider};
use meter_core::MeterConfig;
use serde::Serialize;
use serde_json::Value;

/// Loads configuration, optionally from a specific file.
///
/// Layers, later wins: defaults, `config.toml` in the config directory, the
/// given file, then `METER_*` environment variables (`__` separates nested
/// keys, e.g. `METER_MODE__IDLE_THRESHOLD`).
///
/// Loading never fails. Each top-level key of a layer is applied on its own;
/// a key whose value does not fit is skipped with a warning, and a source
/// that cannot be parsed at all is skipped entirely.
pub fn load_from(config_path: Option<&Path>) -> MeterConfig {
    let mut config = MeterConfig::default();

    // Load from default config location
    if let Some(config_dir) = dirs_config_path() {
        config = apply_layer(config, Toml::file(config_dir.join("config.toml")));
    }

    // Load from specified config file
    if let Some(path) = config_path {
        config = apply_layer(config, Toml::file(path));
    }

    // Load from environment variables (METER_*)
    apply_layer(config, Env::prefixed("METER_").split("__"))
}

/// Applies an inline JSON override on top of `config`.
///
/// A value that is not a JSON object is ignored entirely. Otherwise keys are
/// applied one by one as in [`load_from`].
pub fn apply_overrides(config: MeterConfig, raw: &str) -> MeterConfig {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .fold(config, |config, (key, value)| merge_key(config, "override", &key, &value)),
        Ok(_) => {
            tracing::warn!("ignoring configuration override that is not a JSON object");
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed configuration override");
            config
        }
    }
}

fn apply_layer<P: Provider>(config: MeterConfig, provider: P) -> MeterConfig {
    let source = provider.metadata().name.into_owned();
    match Figment::from(provider).extract::<Dict>() {
        Ok(values) => values
            .iter()
            .fold(config, |config, (key, value)| merge_key(config, &source, key, value)),
        Err(e) => {
            tracing::warn!(%source, error = %e, "ignoring unreadable configuration source");
            config
        }
    }
}

/// Sets one top-level key, keeping `config` unchanged if the result does not
/// deserialize.
fn merge_key<V: Serialize>(config: MeterConfig, source: &str, key: &str, value: &V) -> MeterConfig {
    let merged = Figment::from(Serialized::defaults(&config))
        .merge(Serialized::default(key, value))
        .extract::<MeterConfig>();
    match merged {
        Ok(updated) => updated,
        Err(e) => {
            tracing::warn!(source, key, error = %e, "ignoring configuration value");
            config
        }
    }
}

/// Returns the platform-specific config directory for meter.
///
/// On Linux: `~/.config/meter`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("meter"))
}
