// Widget kinds and their viewer-facing names
use serde::Deserialize;

/// Display widget attached to a single dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetWidget {
    Gauge,
    Bar,
    Led,
    #[default]
    #[serde(other)]
    None,
}

impl DatasetWidget {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetWidget::None => "",
            DatasetWidget::Gauge => "gauge",
            DatasetWidget::Bar => "bar",
            DatasetWidget::Led => "led",
        }
    }
}

/// Layout widget shared by all datasets of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupWidget {
    Multiplot,
    Datagrid,
    Accelerometer,
    #[default]
    #[serde(other)]
    None,
}

impl GroupWidget {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupWidget::None => "",
            GroupWidget::Multiplot => "multiplot",
            GroupWidget::Datagrid => "datagrid",
            GroupWidget::Accelerometer => "accelerometer",
        }
    }
}
