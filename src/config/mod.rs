use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    pub course: CourseConfig,
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub file_path: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_duration_hours: i64,
    /// Argon2 PHC string issued by `lectern-admin issue-passcode`.
    pub professor_passcode_hash: Option<String>,
    pub class_rep_passcode_hash: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Resend,
    Smtp,
    #[default]
    Log,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,
    pub from: String,
    pub resend_api_key: Option<String>,
    pub resend_base_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CourseConfig {
    pub name: String,
    pub site_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
    pub max_file_size: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.backend", "sqlite")?
            .set_default("database.url", "sqlite://lectern.db?mode=rwc")?
            .set_default("database.file_path", "lectern-data.json")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("email.provider", "log")?
            .set_default("email.from", "STAT102 Course <noreply@resend.dev>")?
            .set_default("course.name", "STAT102 - Applied Statistics")?
            .set_default("course.site_url", "http://localhost:8080")?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.max_file_size", 25 * 1024 * 1024)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with LECTERN__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("LECTERN").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Log,
            from: "STAT102 Course <noreply@resend.dev>".to_string(),
            resend_api_key: None,
            resend_base_url: None,
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                backend: StoreBackend::Sqlite,
                url: "sqlite://lectern.db?mode=rwc".to_string(),
                file_path: "lectern-data.json".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_secret: "change-me-in-production".to_string(),
                session_duration_hours: 24,
                professor_passcode_hash: None,
                class_rep_passcode_hash: None,
            },
            email: EmailConfig::default(),
            course: CourseConfig {
                name: "STAT102 - Applied Statistics".to_string(),
                site_url: "http://localhost:8080".to_string(),
            },
            uploads: UploadsConfig {
                dir: "uploads".to_string(),
                max_file_size: 25 * 1024 * 1024,
            },
        }
    }
}
