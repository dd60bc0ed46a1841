//! Configuration vault – reads/writes `~/.lumen/config.toml`.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use lumen_types::{ColorConfig, DeviceConfig, HttpMethod, TemperatureConfig};

/// Persisted configuration stored in `~/.lumen/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub device: DeviceConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig {
                name: "Light".to_string(),
                http_method: HttpMethod::Get,
                username: String::new(),
                password: String::new(),
                color: Some(ColorConfig {
                    status_url: "http://light.local/color".to_string(),
                    set_url: Some("http://light.local/color/set/%s".to_string()),
                    http_method: None,
                    delimiter: ",".to_string(),
                    cache_time_ms: 500,
                    set_limiter_time_ms: 50,
                }),
                temperature: None,
            },
        }
    }
}

/// Return the path to `~/.lumen/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".lumen").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<CliConfig>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<CliConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: CliConfig = toml::from_str(&raw)
        .map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `LUMEN_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `LUMEN_STATUS_URL` | `device.color.status_url` (creates the color section if absent) |
/// | `LUMEN_SET_URL` | `device.color.set_url` |
/// | `LUMEN_USERNAME` | `device.username` |
/// | `LUMEN_PASSWORD` | `device.password` |
pub fn apply_env_overrides(cfg: &mut CliConfig) {
    if let Ok(v) = std::env::var("LUMEN_STATUS_URL") {
        match &mut cfg.device.color {
            Some(color) => color.status_url = v,
            None => {
                cfg.device.color = Some(ColorConfig {
                    status_url: v,
                    set_url: None,
                    http_method: None,
                    delimiter: ",".to_string(),
                    cache_time_ms: 500,
                    set_limiter_time_ms: 50,
                });
            }
        }
    }
    if let Ok(v) = std::env::var("LUMEN_SET_URL")
        && let Some(color) = &mut cfg.device.color {
            color.set_url = Some(v);
        }
    if let Ok(v) = std::env::var("LUMEN_USERNAME") {
        cfg.device.username = v;
    }
    if let Ok(v) = std::env::var("LUMEN_PASSWORD") {
        cfg.device.password = v;
    }
}

/// Save the config to disk, creating `~/.lumen/` if necessary.
pub fn save(cfg: &CliConfig) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &CliConfig, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // The file may hold device credentials: owner-only on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = CliConfig::default();
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.device.name, "Light");
        let color = loaded.device.color.expect("color section");
        assert_eq!(color.status_url, "http://light.local/color");
        assert_eq!(color.cache_time_ms, 500);
        assert_eq!(color.set_limiter_time_ms, 50);
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn config_path_points_to_lumen_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".lumen"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&CliConfig::default(), &path).expect("save");

        let file_meta = std::fs::metadata(&path).expect("file metadata");
        assert_eq!(file_meta.permissions().mode() & 0o777, 0o600);

        let dir_meta = std::fs::metadata(path.parent().unwrap()).expect("dir metadata");
        assert_eq!(dir_meta.permissions().mode() & 0o777, 0o700);
    }

    #[test]
    fn apply_env_overrides_changes_status_url() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("LUMEN_STATUS_URL", "http://bulb.lan/state") };
        let mut cfg = CliConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.device.color.as_ref().unwrap().status_url, "http://bulb.lan/state");
        unsafe { std::env::remove_var("LUMEN_STATUS_URL") };
    }

    #[test]
    fn apply_env_overrides_creates_missing_color_section() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("LUMEN_STATUS_URL", "http://bulb.lan/state") };
        let mut cfg = CliConfig::default();
        cfg.device.color = None;
        apply_env_overrides(&mut cfg);
        let color = cfg.device.color.expect("color section created");
        assert_eq!(color.status_url, "http://bulb.lan/state");
        assert_eq!(color.cache_time_ms, 500);
        unsafe { std::env::remove_var("LUMEN_STATUS_URL") };
    }

    #[test]
    fn apply_env_overrides_changes_credentials() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("LUMEN_USERNAME", "admin") };
        unsafe { std::env::set_var("LUMEN_PASSWORD", "pw") };
        let mut cfg = CliConfig::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.device.username, "admin");
        assert_eq!(cfg.device.password, "pw");
        unsafe { std::env::remove_var("LUMEN_USERNAME") };
        unsafe { std::env::remove_var("LUMEN_PASSWORD") };
    }
}
