use util::config::AppConfig;

/// Support desk options consulted when messages are displayed or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportSettings {
    pub notify_by_email: bool,
    pub show_username_support: bool,
    pub username_support: String,
    pub support_email: String,
    pub user_display_field: String,
}

impl SupportSettings {
    pub fn from_config() -> Self {
        let cfg = AppConfig::global();
        Self {
            notify_by_email: cfg.notify_by_email,
            show_username_support: cfg.show_username_support,
            username_support: cfg.username_support.clone(),
            support_email: cfg.support_email.clone(),
            user_display_field: cfg.user_display_field.clone(),
        }
    }
}

impl Default for SupportSettings {
    fn default() -> Self {
        Self {
            notify_by_email: true,
            show_username_support: false,
            username_support: "Support".into(),
            support_email: "support@localhost".into(),
            user_display_field: "username".into(),
        }
    }
}
