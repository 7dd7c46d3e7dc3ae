use crate::domain::widget::{FailurePolicy, WidgetKind};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub slideshow: SlideshowSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    /// Base URL of the reporting host the proxy relay forwards to.
    #[serde(default = "default_reports_base")]
    pub reports_base: String,
    /// Disables TLS certificate validation for upstream requests. Off by
    /// default; turning it on is an explicit, logged decision.
    #[serde(default)]
    pub insecure_no_verify: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            reports_base: default_reports_base(),
            insecure_no_verify: false,
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlideshowSettings {
    #[serde(default = "default_slide_count")]
    pub slides: usize,
    #[serde(default = "default_rotate_secs")]
    pub period_secs: u64,
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            slides: default_slide_count(),
            period_secs: default_rotate_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetsConfig {
    /// Refresh cadence for widgets without their own `interval_secs`.
    #[serde(default = "default_refresh_secs")]
    pub default_interval_secs: u64,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub id: String,
    pub kind: WidgetKind,
    /// Absolute URL, or `sample:<name>` for the built-in sample payloads.
    pub endpoint: String,
    /// Extra endpoint for the source-revenue widget's online-sales legs.
    #[serde(default)]
    pub online_sales_endpoint: Option<String>,
    #[serde(default)]
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub on_error: FailurePolicy,
    #[serde(default)]
    pub loading_placeholder: bool,
}

impl WidgetConfig {
    pub fn interval(&self, default_secs: u64) -> Duration {
        Duration::from_secs(self.interval_secs.unwrap_or(default_secs))
    }
}

fn default_port() -> u16 {
    3006
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_reports_base() -> String {
    "https://prod.wmsgmpl.com:3010".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_slide_count() -> usize {
    11
}

fn default_rotate_secs() -> u64 {
    8
}

fn default_refresh_secs() -> u64 {
    30
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .build()?;

    let mut cfg: ServerConfig = settings.try_deserialize()?;

    // The PORT environment variable wins over the file.
    if let Ok(port) = std::env::var("PORT") {
        cfg.server.port = port
            .parse()
            .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
    }

    Ok(cfg)
}

pub fn load_widgets_config() -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
