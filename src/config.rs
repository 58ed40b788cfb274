use std::{env, str::FromStr};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Staging,
    Production,
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "staging" | "stage" => Ok(AppEnv::Staging),
            "production" | "prod" => Ok(AppEnv::Production),
            _ => Ok(AppEnv::Development), // default if unknown
        }
    }
}

/// Outbound SMTP relay settings. Absent entirely when `SMTP_HOST` is unset.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// `true` for implicit TLS (usually 465), `false` for STARTTLS (usually 587).
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub env: AppEnv,
    /// Postgres connection string, or `memory` for the in-process store.
    pub database_url: String,
    pub http_port: u16,

    /// Shared secret expected in `x-admin-token`. `None` locks the admin API.
    pub admin_token: Option<String>,
    /// Inbox that receives new-lead notifications.
    pub admin_email: Option<String>,

    pub smtp: Option<SmtpConfig>,
    /// Sender address for outgoing mail.
    pub mail_from: Option<String>,
    pub brand_name: String,

    /// Origins allowed to call the API from a browser.
    pub client_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("env", &self.env)
            .field("http_port", &self.http_port)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "***"))
            .field("admin_email", &self.admin_email)
            .field("smtp", &self.smtp)
            .field("mail_from", &self.mail_from)
            .field("brand_name", &self.brand_name)
            .field("client_origins", &self.client_origins)
            .finish()
    }
}

/// Entry point to load configuration
pub fn load() -> Result<Config> {
    load_dotenv()?;
    Config::from_env()
}

/// Load .env base, then .env.{APP_ENV}
fn load_dotenv() -> Result<()> {
    // 1. Load base .env (if it exists)
    let _ = dotenvy::dotenv();

    // 2. Read APP_ENV from env (may come from .env)
    let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    // 3. Try to load .env.{APP_ENV}, e.g. .env.development
    let filename = format!(".env.{}", env_name);
    let _ = dotenvy::from_filename(&filename);

    Ok(())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let env_str = get("APP_ENV").unwrap_or_else(|| "development".to_string());
        let env = AppEnv::from_str(&env_str).unwrap_or(AppEnv::Development);

        let database_url = get("DATABASE_URL").ok_or("DATABASE_URL env var is required")?;

        let http_port: u16 = get("PORT")
            .or_else(|| get("HTTP_PORT"))
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| "PORT must be a valid u16")?;

        let smtp_user = get("SMTP_USER");
        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: get("SMTP_PORT")
                    .unwrap_or_else(|| "465".to_string())
                    .parse()
                    .map_err(|_| "SMTP_PORT must be a valid u16")?,
                secure: get("SMTP_SECURE").as_deref() == Some("true"),
                user: smtp_user.clone(),
                password: get("SMTP_PASS"),
            }),
            None => None,
        };

        let mail_from = get("MAIL_FROM").or_else(|| smtp_user.clone());
        let admin_email = get("ADMIN_EMAIL").or(smtp_user);

        let client_origins = match get("CLIENT_ORIGIN") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => vec![DEFAULT_CLIENT_ORIGIN.to_string()],
        };

        Ok(Self {
            env,
            database_url,
            http_port,
            admin_token: get("ADMIN_TOKEN"),
            admin_email,
            smtp,
            mail_from,
            brand_name: get("BRAND_NAME").unwrap_or_else(|| "Senevon".to_string()),
            client_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn database_url_is_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let cfg = config_from(&[("DATABASE_URL", "memory")]).unwrap();
        assert_eq!(cfg.env, AppEnv::Development);
        assert_eq!(cfg.http_port, 5000);
        assert!(cfg.admin_token.is_none());
        assert!(cfg.admin_email.is_none());
        assert!(cfg.smtp.is_none());
        assert!(cfg.mail_from.is_none());
        assert_eq!(cfg.brand_name, "Senevon");
        assert_eq!(cfg.client_origins, vec!["http://localhost:5173".to_string()]);
    }

    #[test]
    fn smtp_user_backs_sender_and_admin_inbox() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://localhost/contact"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_SECURE", "true"),
            ("SMTP_USER", "team@example.com"),
            ("SMTP_PASS", "secret"),
        ])
        .unwrap();

        let smtp = cfg.smtp.as_ref().unwrap();
        assert_eq!(smtp.port, 465);
        assert!(smtp.secure);
        assert_eq!(cfg.mail_from.as_deref(), Some("team@example.com"));
        assert_eq!(cfg.admin_email.as_deref(), Some("team@example.com"));
    }

    #[test]
    fn explicit_values_win() {
        let cfg = config_from(&[
            ("APP_ENV", "prod"),
            ("DATABASE_URL", "memory"),
            ("PORT", "8080"),
            ("HTTP_PORT", "9090"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("SMTP_USER", "team@example.com"),
            ("MAIL_FROM", "hello@example.com"),
            ("ADMIN_EMAIL", "leads@example.com"),
            ("CLIENT_ORIGIN", "https://a.example, ,https://b.example"),
        ])
        .unwrap();

        assert_eq!(cfg.env, AppEnv::Production);
        assert_eq!(cfg.http_port, 8080);
        assert!(!cfg.smtp.as_ref().unwrap().secure);
        assert_eq!(cfg.smtp.as_ref().unwrap().port, 587);
        assert_eq!(cfg.mail_from.as_deref(), Some("hello@example.com"));
        assert_eq!(cfg.admin_email.as_deref(), Some("leads@example.com"));
        assert_eq!(
            cfg.client_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(config_from(&[("DATABASE_URL", "memory"), ("PORT", "http")]).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = config_from(&[
            ("DATABASE_URL", "postgres://user:pw@localhost/db"),
            ("ADMIN_TOKEN", "top-secret-token"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PASS", "smtp-password"),
        ])
        .unwrap();

        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("top-secret-token"));
        assert!(!rendered.contains("smtp-password"));
        assert!(!rendered.contains("pw@"));
    }
}
