//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub mail_queue_capacity: usize,

    /// Send a notification mail when a reply is added to an existing ticket.
    pub notify_by_email: bool,
    /// Show agents' real names to customers. When false, replies by anyone other
    /// than the ticket starter are labelled with `username_support`.
    pub show_username_support: bool,
    pub username_support: String,
    /// Default support mailbox, used as sender when the ticket category has no receiver.
    pub support_email: String,
    /// Which user column is shown as the author name (`username` or `email`).
    pub user_display_field: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable config value");
            default
        }),
        Err(_) => default,
    }
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!(key, value = %raw, "Ignoring unrecognised boolean config value");
                default
            }
        },
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every value has a default so that tools and tests can run without a `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "helpdesk"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: flag_or("LOG_TO_STDOUT", false),
            database_path: var_or("DATABASE_PATH", "data/helpdesk.db"),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            smtp_host: var_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: parsed_or("SMTP_PORT", 587),
            smtp_username: var_or("SMTP_USERNAME", ""),
            smtp_password: var_or("SMTP_PASSWORD", ""),
            email_from_name: var_or("EMAIL_FROM_NAME", "Support"),
            mail_queue_capacity: parsed_or("MAIL_QUEUE_CAPACITY", 256),
            notify_by_email: flag_or("NOTIFY_BY_EMAIL", true),
            show_username_support: flag_or("SHOW_USERNAME_SUPPORT", false),
            username_support: var_or("USERNAME_SUPPORT", "Support"),
            support_email: var_or("SUPPORT_EMAIL", "support@localhost"),
            user_display_field: var_or("USER_DISPLAY_FIELD", "username"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_mail_queue_capacity(value: usize) {
        AppConfig::set_field(|cfg| cfg.mail_queue_capacity = value);
    }

    pub fn set_notify_by_email(value: bool) {
        AppConfig::set_field(|cfg| cfg.notify_by_email = value);
    }

    pub fn set_show_username_support(value: bool) {
        AppConfig::set_field(|cfg| cfg.show_username_support = value);
    }

    pub fn set_username_support(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.username_support = value.into());
    }

    pub fn set_support_email(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.support_email = value.into());
    }

    pub fn set_user_display_field(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.user_display_field = value.into());
    }
}

// --- Free accessors, so call sites read `config::port()` ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn mail_queue_capacity() -> usize {
    AppConfig::global().mail_queue_capacity
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_loaded_values() {
        AppConfig::set_notify_by_email(false);
        AppConfig::set_username_support("Helpdesk");
        AppConfig::set_user_display_field("email");

        let cfg = AppConfig::global().clone();
        assert!(!cfg.notify_by_email);
        assert_eq!(cfg.username_support, "Helpdesk");
        assert_eq!(cfg.user_display_field, "email");

        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn flags_accept_common_truthy_spellings() {
        unsafe {
            env::set_var("HELPDESK_TEST_FLAG", "Yes");
        }
        assert!(flag_or("HELPDESK_TEST_FLAG", false));
        unsafe {
            env::set_var("HELPDESK_TEST_FLAG", "0");
        }
        assert!(!flag_or("HELPDESK_TEST_FLAG", true));
        unsafe {
            env::remove_var("HELPDESK_TEST_FLAG");
        }
        assert!(flag_or("HELPDESK_TEST_FLAG", true));
    }

    #[test]
    #[serial]
    fn misspelled_flags_keep_the_default() {
        unsafe {
            env::set_var("HELPDESK_TEST_FLAG", "ture");
        }
        assert!(flag_or("HELPDESK_TEST_FLAG", true));
        assert!(!flag_or("HELPDESK_TEST_FLAG", false));
        unsafe {
            env::remove_var("HELPDESK_TEST_FLAG");
        }
    }

    #[test]
    #[serial]
    fn unparsable_numbers_fall_back_to_default() {
        unsafe {
            env::set_var("HELPDESK_TEST_PORT", "not-a-port");
        }
        assert_eq!(parsed_or::<u16>("HELPDESK_TEST_PORT", 3000), 3000);
        unsafe {
            env::remove_var("HELPDESK_TEST_PORT");
        }
    }
}
