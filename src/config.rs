use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub school: SchoolConfig,

    /// File the configuration was read from; `None` when running on defaults.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/school_health.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub bind_address: String,

    /// Empty list allows any origin (the bundled front-end is served from a
    /// desktop shell on an arbitrary local port).
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret used to sign session tokens.
    pub session_secret: String,

    /// Lifetime of an issued session token, in hours.
    pub session_hours: u32,

    /// Failed logins after which an account refuses authentication.
    pub lockout_threshold: i32,

    /// Requests without a session token run as the built-in administrator.
    pub single_user_mode: bool,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_secret: "super-secret-key-school-health".to_string(),
            session_hours: 8,
            lockout_threshold: 5,
            single_user_mode: true,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    /// Shown on the dashboard until a school name is saved in settings.
    pub placeholder_name: String,

    /// Grade given to imported students whose roster row has none.
    pub unspecified_grade: String,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            placeholder_name: "المدرسة".to_string(),
            unspecified_grade: "غير محدد".to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    ///
    /// Logs nothing; the caller reports [`Config::loaded_from`] once tracing
    /// is installed.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                let mut config = Self::load_from_path(&path)?;
                config.loaded_from = Some(path);
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// `DB_PATH` is a plain file path, `JWT_SECRET` the signing secret and
    /// `PORT` the listening port.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("DB_PATH").filter(|p| !p.trim().is_empty()) {
            self.general.database_path = format!("sqlite:{}", path.trim());
        }

        if let Some(secret) = var("JWT_SECRET") {
            self.security.session_secret = secret;
        }

        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("clinicdesk").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".clinicdesk").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.session_secret.trim().is_empty() {
            anyhow::bail!("Session secret cannot be empty");
        }

        if self.security.session_hours == 0 {
            anyhow::bail!("Session lifetime must be at least one hour");
        }

        if self.security.lockout_threshold <= 0 {
            anyhow::bail!("Lockout threshold must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.session_hours, 8);
        assert_eq!(config.security.lockout_threshold, 5);
        assert!(config.security.single_user_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[school]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            single_user_mode = false
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert!(!config.security.single_user_mode);
        assert_eq!(config.security.lockout_threshold, 5);
        assert_eq!(config.school.unspecified_grade, "غير محدد");
    }

    #[test]
    fn source_path_is_not_persisted() {
        let path = std::env::temp_dir().join(format!("clinicdesk_cfg_{}.toml", uuid::Uuid::new_v4()));
        let config = Config {
            loaded_from: Some(PathBuf::from("/etc/clinicdesk/config.toml")),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("loaded_from"));

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.loaded_from, None);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| match key {
                "DB_PATH" => Some("/tmp/clinic.db".to_string()),
                "JWT_SECRET" => Some("rotated".to_string()),
                "PORT" => Some("8080".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.general.database_path, "sqlite:/tmp/clinic.db");
        assert_eq!(config.security.session_secret, "rotated");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| (key == "PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let mut config = Config::default();
        config.security.session_secret = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.security.lockout_threshold = 0;
        assert!(config.validate().is_err());
    }
}
