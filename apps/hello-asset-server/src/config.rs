use std::path::Path;

use anyhow::{Context, Result};
use assetkit_utils::SecretString;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use hello_asset::{PlatformConfig, ProbeConfig};
use serde::{Deserialize, Serialize};

/// Effective process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub probe: ProbeConfig,
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_owned(),
            port: 9000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values taken from the command line after everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub verbose: u8,
}

impl AppConfig {
    /// Layered load: defaults, then the YAML file (if any), then `APP__*`
    /// variables, then the platform variables of this process.
    ///
    /// # Errors
    /// Returns an error if a layer cannot be parsed or `PORT` is not a port.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment = figment.merge(Env::prefixed("APP__").split("__"));

        let mut config: Self = figment
            .extract()
            .context("failed to load configuration")?;
        config.apply_platform_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay the variables the platform injects into the container.
    ///
    /// # Errors
    /// Returns an error if `PORT` is non-blank but is not a valid port number.
    pub fn apply_platform_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A blank PORT counts as unset
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value: {port:?}"))?;
        }
        if let Some(v) = lookup("SERVICE_NAME") {
            self.probe.service_name = v;
        }
        if let Some(v) = lookup("SERVICE_PLAN") {
            self.probe.service_plan = v;
        }
        if let Some(v) = lookup("CLIENT") {
            self.probe.client_id = v;
        }
        if let Some(v) = lookup("SECRET") {
            self.probe.client_secret = SecretString::new(v);
        }
        if let Some(v) = lookup("SUPERSECRET") {
            self.probe.admin_client_secret = SecretString::new(v);
        }
        if let Some(v) = lookup("VCAP_SERVICES") {
            self.platform.vcap_services = Some(v);
        }
        if let Some(v) = lookup("VCAP_APPLICATION") {
            self.platform.vcap_application = Some(v);
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        let level = match overrides.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };
        if let Some(level) = level {
            level.clone_into(&mut self.logging.level);
        }
    }

    /// Render as YAML. Secrets come out redacted.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration")
    }
}
