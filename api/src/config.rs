use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::domain::rules::DEFAULT_MAX_RECEIPT_BYTES;

/// Credentials for the admin account created at startup
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory receipts are written to and served from
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i64,
    /// Mark the session cookie `Secure` (enable behind HTTPS)
    pub cookie_secure: bool,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// Rate-limit login attempts per client IP
    pub login_rate_limit: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_USERNAME"),
            lookup("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => {
                return Err(anyhow!(
                    "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together"
                ))
            }
        };

        let session_ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 168)?;
        if session_ttl_hours <= 0 {
            return Err(anyhow!("SESSION_TTL_HOURS must be positive"));
        }

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", 8080)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_RECEIPT_BYTES)?,
            session_ttl_hours,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            cors_origin: lookup("CORS_ORIGIN").filter(|o| !o.is_empty()),
            login_rate_limit: parse_or(&lookup, "LOGIN_RATE_LIMIT", true)?,
            bootstrap_admin,
        })
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/bizdesk")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.session_ttl_hours, 168);
        assert!(!config.cookie_secure);
        assert!(config.login_rate_limit);
        assert!(config.cors_origin.is_none());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn database_url_is_required() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn unparsable_numbers_are_errors() {
        let result = config_from(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("PORT"));
    }

    #[test]
    fn bootstrap_admin_needs_both_values() {
        assert!(config_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("BOOTSTRAP_ADMIN_USERNAME", "admin"),
        ])
        .is_err());

        let config = config_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("BOOTSTRAP_ADMIN_USERNAME", "admin"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "hunter22"),
        ])
        .unwrap();
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert!(!format!("{:?}", admin).contains("hunter22"));
    }
}
