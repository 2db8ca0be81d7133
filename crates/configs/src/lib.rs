use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// In-memory store options.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Insert the sample resource at startup and log its id.
    #[serde(default = "default_seed_sample")]
    pub seed_sample: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { seed_sample: default_seed_sample() }
    }
}

fn default_seed_sample() -> bool { true }

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LogConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Prefer `config.toml` (or `CONFIG_PATH`); fall back to environment variables
    /// only when that file does not exist.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_or_env(&path, |key| std::env::var(key).ok())
    }

    /// A file that exists but fails to parse is an error, never a silent fallback.
    pub fn load_from_or_env<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env_with(lookup),
            Err(e) => return Err(e.context(format!("cannot load config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `SEED_SAMPLE` and `LOG_FORMAT`, using defaults for anything absent or unparsable.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Some(seed) = lookup("SEED_SAMPLE").and_then(|v| parse_bool(&v)) {
            cfg.store.seed_sample = seed;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.log.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.log.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LogConfig {
    fn validate(&self) -> Result<()> {
        match self.format.trim().to_ascii_lowercase().as_str() {
            "" | "compact" | "text" | "json" => Ok(()),
            other => Err(anyhow!("log.format must be `compact` or `json`, got `{other}`")),
        }
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<std::io::Error>(),
        Some(io) if io.kind() == std::io::ErrorKind::NotFound
    )
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_tmp(content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).expect("write tmp config");
        path
    }

    #[test]
    fn defaults_listen_on_8080() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
        assert!(cfg.store.seed_sample);
        assert_eq!(cfg.log.format, "compact");
    }

    #[test]
    fn load_from_file_reads_all_sections() -> Result<()> {
        let path = write_tmp(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            worker_threads = 2

            [store]
            seed_sample = false

            [log]
            format = "json"
            "#,
        );
        let cfg = load_from_file(path.to_str().unwrap())?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert!(!cfg.store.seed_sample);
        assert_eq!(cfg.log.format, "json");
        let _ = std::fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() -> Result<()> {
        let path = write_tmp("[server]\nhost = \"localhost\"\nport = 8000\n");
        let mut cfg = load_from_file(path.to_str().unwrap())?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.store, StoreConfig::default());
        assert_eq!(cfg.log, LogConfig::default());
        let _ = std::fs::remove_file(path);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_from_file("/nonexistent/config-for-tests.toml").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_env() -> Result<()> {
        let cfg = AppConfig::load_from_or_env("/nonexistent/config-for-tests.toml", |k| match k {
            "SERVER_PORT" => Some("7001".into()),
            "SEED_SAMPLE" => Some("false".into()),
            _ => None,
        })?;
        assert_eq!(cfg.server.port, 7001);
        assert!(!cfg.store.seed_sample);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let path = write_tmp("[server]\nport = \"nine\"\n[store]\nseed_sample = false\n");
        let res = AppConfig::load_from_or_env(path.to_str().unwrap(), |k| match k {
            "SERVER_PORT" => Some("7002".into()),
            _ => None,
        });
        let _ = std::fs::remove_file(&path);
        let err = res.expect_err("bad port type must be rejected");
        assert!(err.to_string().contains("cannot load config file"));
    }

    #[test]
    fn normalize_fixes_blank_host_and_zero_workers() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn validate_rejects_port_zero_and_unknown_log_format() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.log.format = "xml".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn from_env_with_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("SERVER_HOST", "10.0.0.1"),
            ("SERVER_PORT", "7000"),
            ("TOKIO_WORKER_THREADS", "8"),
            ("SEED_SAMPLE", "off"),
            ("LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();
        let cfg = AppConfig::from_env_with(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.server.bind_addr(), "10.0.0.1:7000");
        assert_eq!(cfg.server.worker_threads, Some(8));
        assert!(!cfg.store.seed_sample);
        assert_eq!(cfg.log.format, "json");
    }

    #[test]
    fn from_env_with_ignores_garbage() {
        let cfg = AppConfig::from_env_with(|k| match k {
            "SERVER_PORT" => Some("not-a-port".into()),
            "SEED_SAMPLE" => Some("maybe".into()),
            _ => None,
        });
        assert_eq!(cfg, AppConfig::default());
    }
}
