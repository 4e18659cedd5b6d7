//! Configuration file management for pathcraft.
//!
//! Provides a TOML-based config file at `~/.config/pathcraft/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use pathcraft_core::check::CheckerConfig;
use pathcraft_core::llm::http::LlmConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub llm: LlmSection,
    #[serde(default)]
    pub validation: ValidationSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LlmSection {
    /// OpenAI-compatible API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    /// Optional here; the env var takes precedence either way.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSection {
    /// Retries after the first liveness attempt.
    pub retries: u32,
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
    /// Keep resources whose checks failed only at the transport layer.
    pub lenient: bool,
}

impl Default for ValidationSection {
    fn default() -> Self {
        let defaults = CheckerConfig::default();
        Self {
            retries: defaults.retries,
            timeout_secs: 10,
            lenient: defaults.lenient_on_transport_error,
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the pathcraft config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/pathcraft` or
/// `~/.config/pathcraft`, regardless of platform convention.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("pathcraft");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pathcraft")
}

/// Return the path to the pathcraft config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix (it may hold an API key).
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct PathcraftConfig {
    pub llm: LlmConfig,
    pub checker: CheckerConfig,
    pub probe_timeout: Duration,
}

impl PathcraftConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - API key: `cli_api_key` > `PATHCRAFT_API_KEY` env >
    ///   `config_file.llm.api_key` > error (the pipeline cannot run
    ///   without one).
    /// - Base URL / model: CLI-less; `PATHCRAFT_BASE_URL` /
    ///   `PATHCRAFT_MODEL` env > config file > built-in default.
    /// - Validation tunables come from the config file or defaults.
    pub fn resolve(cli_api_key: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let api_key = if let Some(key) = cli_api_key {
            key.to_string()
        } else if let Ok(key) = std::env::var("PATHCRAFT_API_KEY") {
            key
        } else if let Some(key) = file_config.as_ref().and_then(|c| c.llm.api_key.clone()) {
            key
        } else {
            bail!(
                "API key not found; set PATHCRAFT_API_KEY or run `pathcraft init --api-key <key>`"
            );
        };

        let base_url = std::env::var("PATHCRAFT_BASE_URL")
            .ok()
            .or_else(|| file_config.as_ref().map(|c| c.llm.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("PATHCRAFT_MODEL")
            .ok()
            .or_else(|| file_config.as_ref().map(|c| c.llm.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let validation = file_config
            .map(|c| c.validation)
            .unwrap_or_default();

        Ok(Self {
            llm: LlmConfig {
                base_url,
                api_key,
                model,
            },
            checker: CheckerConfig {
                retries: validation.retries,
                lenient_on_transport_error: validation.lenient,
                ..CheckerConfig::default()
            },
            probe_timeout: Duration::from_secs(validation.timeout_secs),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that read or mutate process env vars serialize on this lock.
    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _lock = lock_env();
        let path = config_path();
        assert!(
            path.ends_with("pathcraft/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }

    #[test]
    fn config_file_roundtrip() {
        let original = ConfigFile {
            llm: LlmSection {
                base_url: "https://gateway.example.com/v1".to_string(),
                model: "test-model".to_string(),
                api_key: Some("sk-test".to_string()),
            },
            validation: ValidationSection {
                retries: 1,
                timeout_secs: 5,
                lenient: false,
            },
        };

        let contents = toml::to_string_pretty(&original).unwrap();
        let loaded: ConfigFile = toml::from_str(&contents).unwrap();

        assert_eq!(loaded.llm.base_url, original.llm.base_url);
        assert_eq!(loaded.llm.model, original.llm.model);
        assert_eq!(loaded.llm.api_key, original.llm.api_key);
        assert_eq!(loaded.validation.retries, 1);
        assert_eq!(loaded.validation.timeout_secs, 5);
        assert!(!loaded.validation.lenient);
    }

    #[test]
    fn validation_section_is_optional_in_file() {
        let contents = r#"
[llm]
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
"#;
        let loaded: ConfigFile = toml::from_str(contents).unwrap();
        assert_eq!(loaded.validation.retries, 2);
        assert_eq!(loaded.validation.timeout_secs, 10);
        assert!(loaded.validation.lenient);
        assert!(loaded.llm.api_key.is_none());
    }

    #[test]
    fn partial_validation_section_fills_defaults() {
        let contents = r#"
[llm]
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"

[validation]
lenient = false
"#;
        let loaded: ConfigFile = toml::from_str(contents).unwrap();
        assert!(!loaded.validation.lenient);
        assert_eq!(loaded.validation.retries, 2);
    }

    #[test]
    fn resolve_prefers_cli_api_key() {
        let _lock = lock_env();

        // Even if the env var is set, the CLI flag wins.
        unsafe { std::env::set_var("PATHCRAFT_API_KEY", "sk-from-env") };
        let config = PathcraftConfig::resolve(Some("sk-from-cli")).unwrap();
        assert_eq!(config.llm.api_key, "sk-from-cli");

        unsafe { std::env::remove_var("PATHCRAFT_API_KEY") };
    }

    #[test]
    fn resolve_falls_back_to_env_api_key() {
        let _lock = lock_env();

        unsafe { std::env::set_var("PATHCRAFT_API_KEY", "sk-from-env") };
        let config = PathcraftConfig::resolve(None).unwrap();
        assert_eq!(config.llm.api_key, "sk-from-env");

        unsafe { std::env::remove_var("PATHCRAFT_API_KEY") };
    }

    #[test]
    fn resolve_errors_when_no_api_key_anywhere() {
        let _lock = lock_env();

        // Point XDG_CONFIG_HOME at an empty temp dir so load_config()
        // cannot find a real config file.
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        let orig_key = std::env::var("PATHCRAFT_API_KEY").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var("PATHCRAFT_API_KEY") };

        let result = PathcraftConfig::resolve(None);

        // Restore env before asserting, to avoid poisoning the mutex on
        // failure.
        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }
        if let Some(k) = orig_key {
            unsafe { std::env::set_var("PATHCRAFT_API_KEY", k) };
        }

        assert!(result.is_err(), "should error without an API key");
    }

    #[test]
    fn save_and_load_config_roundtrip_on_disk() {
        let _lock = lock_env();

        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let original = ConfigFile {
            llm: LlmSection {
                base_url: "https://gateway.example.com/v1".to_string(),
                model: "disk-model".to_string(),
                api_key: Some("sk-disk".to_string()),
            },
            validation: ValidationSection::default(),
        };
        let save_result = save_config(&original);
        let load_result = load_config();

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        save_result.unwrap();
        let loaded = load_result.unwrap();
        assert_eq!(loaded.llm.model, "disk-model");
        assert_eq!(loaded.llm.api_key.as_deref(), Some("sk-disk"));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();

        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let cfg = ConfigFile {
            llm: LlmSection {
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_key: Some("sk-secret".to_string()),
            },
            validation: ValidationSection::default(),
        };
        let save_result = save_config(&cfg);
        let perms = std::fs::metadata(config_path()).map(|m| m.permissions().mode() & 0o777);

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        save_result.unwrap();
        assert_eq!(perms.unwrap(), 0o600);
    }

    #[test]
    fn defaults_point_at_openai() {
        assert_eq!(DEFAULT_BASE_URL, "https://api.openai.com/v1");
        let section = ValidationSection::default();
        assert_eq!(section.retries, 2);
        assert_eq!(section.timeout_secs, 10);
        assert!(section.lenient);
    }
}
