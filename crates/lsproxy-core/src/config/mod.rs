//! Configuration types and loading.
//!
//! The proxy is configured from a TOML file: where to listen, where the
//! cache root lives, which project to clone into session caches, and
//! the language server command to wrap.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Address to accept editor connections on.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Root directory under which per-session caches are created.
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,

    /// Project directory cloned into each session's cache.
    #[serde(default = "default_project_root")]
    pub project_root: PathBuf,

    /// Globs selecting which project files to clone (empty = all).
    #[serde(default)]
    pub sync_globs: Vec<String>,

    /// The language server to wrap.
    pub server: ServerCommand,
}

/// Command line of the wrapped language server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerCommand {
    /// Executable to spawn.
    pub command: String,

    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_listen() -> String {
    "127.0.0.1:4389".to_string()
}

fn default_cache_root() -> PathBuf {
    std::env::temp_dir().join("lsproxy")
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

impl ProxyConfig {
    /// Load configuration from the default search path.
    ///
    /// Paths checked in order:
    /// 1. `$LSPROXY_CONFIG` environment variable
    /// 2. `./lsproxy.toml` (current directory)
    /// 3. `~/.config/lsproxy/lsproxy.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration file is found or parsing
    /// fails; unlike purely optional settings, the wrapped server
    /// command has no sensible default.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("LSPROXY_CONFIG") {
            return Self::load_from(Path::new(&path));
        }

        let local_config = PathBuf::from("lsproxy.toml");
        if local_config.exists() {
            return Self::load_from(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("lsproxy").join("lsproxy.toml");
            if user_config.exists() {
                return Self::load_from(&user_config);
            }
        }

        Err(Error::Config(
            "no configuration file found; pass --config or create lsproxy.toml".to_string(),
        ))
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, parsing fails, or
    /// validation fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.server.command.is_empty() {
            return Err(Error::InvalidConfig(
                "server.command cannot be empty".to_string(),
            ));
        }
        if self.listen.is_empty() {
            return Err(Error::InvalidConfig("listen cannot be empty".to_string()));
        }
        if self.cache_root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "cache_root cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_from_minimal_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsproxy.toml");
        fs::write(&path, "[server]\ncommand = \"rust-analyzer\"\n").unwrap();

        let config = ProxyConfig::load_from(&path).unwrap();
        assert_eq!(config.server.command, "rust-analyzer");
        assert!(config.server.args.is_empty());
        assert_eq!(config.listen, "127.0.0.1:4389");
        assert_eq!(config.project_root, PathBuf::from("."));
        assert!(config.sync_globs.is_empty());
    }

    #[test]
    fn test_load_from_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsproxy.toml");
        fs::write(
            &path,
            r#"
listen = "0.0.0.0:9000"
cache_root = "/var/cache/lsproxy"
project_root = "/srv/project"
sync_globs = ["**/*.go", "go.mod"]

[server]
command = "gopls"
args = ["serve"]
"#,
        )
        .unwrap();

        let config = ProxyConfig::load_from(&path).unwrap();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.cache_root, PathBuf::from("/var/cache/lsproxy"));
        assert_eq!(config.sync_globs, vec!["**/*.go", "go.mod"]);
        assert_eq!(config.server.args, vec!["serve"]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = ProxyConfig::load_from(Path::new("/nonexistent/lsproxy.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsproxy.toml");
        fs::write(&path, "[server\ncommand =").unwrap();

        let result = ProxyConfig::load_from(&path);
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsproxy.toml");
        fs::write(
            &path,
            "mystery = true\n[server]\ncommand = \"rust-analyzer\"\n",
        )
        .unwrap();

        let result = ProxyConfig::load_from(&path);
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_empty_command_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lsproxy.toml");
        fs::write(&path, "[server]\ncommand = \"\"\n").unwrap();

        let result = ProxyConfig::load_from(&path);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
