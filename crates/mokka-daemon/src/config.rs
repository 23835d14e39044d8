//! Daemon configuration from environment variables.

/// Process configuration.
///
/// | Variable | Default |
/// |----------|---------|
/// | `MOKKA_BIND` | `0.0.0.0:3000` |
/// | `MOKKA_SETTINGS_PATH` | `coffee_machine_settings.json` |
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Path of the settings record file.
    pub settings_path: String,
}

impl DaemonConfig {
    /// Read the configuration from the environment, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("MOKKA_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            settings_path: std::env::var("MOKKA_SETTINGS_PATH")
                .unwrap_or_else(|_| "coffee_machine_settings.json".to_string()),
        }
    }
}
