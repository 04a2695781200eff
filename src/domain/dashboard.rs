// Dashboard document model, serialized in the field order the viewer expects
use serde::Serialize;

/// Value every dataset carries until its first successful update.
pub const INITIAL_VALUE: &str = "0";

/// The full dashboard document. Strings are borrowed from the configuration;
/// only each dataset's `value` is owned and mutable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<'a> {
    pub title: &'a str,
    pub actions: Vec<ActionEntry<'a>>,
    pub checksum: &'static str,
    pub decoder: u8,
    pub hexadecimal_delimiters: bool,
    pub dashboard_layout: DashboardLayout,
    pub groups: Vec<GroupEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry<'a> {
    pub auto_execute_on_connect: bool,
    pub binary: bool,
    pub eol: &'a str,
    pub icon: &'a str,
    pub timer_interval_ms: u32,
    pub timer_mode: u8,
    pub title: &'a str,
    pub tx_data: &'a str,
}

/// Fixed layout block; the viewer arranges windows itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub auto_layout: bool,
    pub window_order: [u8; 0],
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            auto_layout: true,
            window_order: [],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry<'a> {
    pub title: &'a str,
    pub widget: &'static str,
    pub datasets: Vec<DatasetEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry<'a> {
    pub alarm_enabled: bool,
    pub alarm_high: f32,
    pub alarm_low: f32,
    pub fft: bool,
    pub fft_max: u8,
    pub fft_min: u8,
    pub fft_samples: u16,
    pub fft_sampling_rate: u16,
    pub graph: bool,
    pub index: u8,
    pub led: bool,
    pub led_high: u8,
    pub log: bool,
    pub overview_display: bool,
    pub plot_max: f32,
    pub plot_min: f32,
    pub title: &'a str,
    pub units: &'a str,
    pub value: String,
    pub widget: &'static str,
    pub widget_max: f32,
    pub widget_min: f32,
    pub x_axis: i8,
}

impl Document<'_> {
    /// Mutable access to a dataset's value leaf, if the position exists.
    pub fn value_mut(&mut self, group: usize, dataset: usize) -> Option<&mut String> {
        self.groups
            .get_mut(group)?
            .datasets
            .get_mut(dataset)
            .map(|d| &mut d.value)
    }

    pub fn value(&self, group: usize, dataset: usize) -> Option<&str> {
        self.groups
            .get(group)?
            .datasets
            .get(dataset)
            .map(|d| d.value.as_str())
    }
}
