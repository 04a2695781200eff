// Configuration loading - Dashboard layout and server settings
use crate::domain::widget::{DatasetWidget, GroupWidget};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to parse dashboard TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Complete dashboard declaration. Borrowed by a `Dashboard` for its whole life.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    pub title: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GroupConfig {
    pub title: Option<String>,
    #[serde(default)]
    pub widget: GroupWidget,
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    pub title: Option<String>,
    pub units: String,
    /// Dotted path into the telemetry snapshot, e.g. `temperature.k`
    pub telemetry_key: Option<String>,
    /// 1-based index shown by the viewer
    pub index: u8,
    pub widget: DatasetWidget,
    pub widget_min: f32,
    pub widget_max: f32,
    pub plot_min: f32,
    pub plot_max: f32,
    pub alarm_low: f32,
    pub alarm_high: f32,
    pub alarm_enabled: bool,
    pub graph: bool,
    pub log: bool,
    pub led: bool,
    pub led_high: u8,
    pub overview_display: bool,
    pub fft: bool,
    pub fft_samples: u16,
    pub fft_sampling_rate: u16,
    pub x_axis: i8,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            title: None,
            units: String::new(),
            telemetry_key: None,
            index: 0,
            widget: DatasetWidget::None,
            widget_min: 0.0,
            widget_max: 0.0,
            plot_min: 0.0,
            plot_max: 0.0,
            alarm_low: 0.0,
            alarm_high: 0.0,
            alarm_enabled: false,
            graph: false,
            log: false,
            led: false,
            led_high: 0,
            overview_display: false,
            fft: false,
            fft_samples: 256,
            fft_sampling_rate: 100,
            x_axis: -1,
        }
    }
}

/// A command button that transmits `tx_data` followed by `eol`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ActionConfig {
    pub title: Option<String>,
    pub tx_data: Option<String>,
    pub icon: Option<String>,
    pub eol: Option<String>,
}

impl DashboardConfig {
    /// Parse a dashboard declared inline, e.g. via `include_str!`.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_interval_ms")]
    pub stream_interval_ms: u64,
    #[serde(default)]
    pub pretty: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_interval_ms() -> u64 {
    500
}

pub fn load_dashboard_config() -> Result<DashboardConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_server_config() -> Result<ServerConfig, ConfigError> {
    let settings = config::Config::builder()
        .set_default("server.bind", default_bind())?
        .set_default("server.stream_interval_ms", default_interval_ms())?
        .set_default("server.pretty", false)?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("SERIAL_DASH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_defaults() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [[groups]]
            title = "Cryo"
            widget = "multiplot"

            [[groups.datasets]]
            title = "Temp K"
            telemetry_key = "temperature.k"
            widget = "gauge"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.title, None);
        assert_eq!(cfg.groups.len(), 1);
        assert_eq!(cfg.groups[0].widget, GroupWidget::Multiplot);

        let ds = &cfg.groups[0].datasets[0];
        assert_eq!(ds.widget, DatasetWidget::Gauge);
        assert_eq!(ds.units, "");
        assert_eq!(ds.fft_samples, 256);
        assert_eq!(ds.fft_sampling_rate, 100);
        assert_eq!(ds.x_axis, -1);
        assert!(!ds.graph);
    }

    #[test]
    fn test_actions_parse() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            title = "Bench"

            [[actions]]
            title = "Go"
            tx_data = "go"
            icon = "Play"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.title.as_deref(), Some("Bench"));
        assert_eq!(cfg.actions[0].tx_data.as_deref(), Some("go"));
        assert_eq!(cfg.actions[0].eol, None);
    }

    #[test]
    fn test_unknown_widget_names_parse_as_none() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [[groups]]
            widget = "compass"

            [[groups.datasets]]
            widget = "dial"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.groups[0].widget, GroupWidget::None);
        assert_eq!(cfg.groups[0].datasets[0].widget, DatasetWidget::None);
    }

    #[test]
    fn test_load_shipped_dashboard_config() {
        let cfg = load_dashboard_config().unwrap();

        assert_eq!(cfg.title.as_deref(), Some("Cryostat"));
        assert_eq!(cfg.groups[0].datasets[0].widget, DatasetWidget::Gauge);
        assert_eq!(cfg.actions.len(), 2);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = DashboardConfig::from_toml_str("groups = 3");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
