// Document builder - Walks the configuration once and binds telemetry keys
use crate::domain::dashboard::{
    ActionEntry, DashboardLayout, DatasetEntry, Document, GroupEntry, INITIAL_VALUE,
};
use crate::domain::slot::{SlotTable, ValueSlot, MAX_SLOTS};
use crate::infrastructure::config::{ActionConfig, DashboardConfig, DatasetConfig, GroupConfig};
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Dashboard";
pub const DEFAULT_EOL: &str = "\n";
pub const ACTION_TIMER_INTERVAL_MS: u32 = 100;

/// What to do with keyed datasets beyond the slot capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Build the dataset but never patch its value
    #[default]
    Truncate,
    /// Refuse to build
    Strict,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("too many groups: {count} (max 256)")]
    TooManyGroups { count: usize },

    #[error("group {group} has too many datasets: {count} (max 256)")]
    TooManyDatasets { group: usize, count: usize },

    #[error("{required} datasets are bound to telemetry keys but only {capacity} slots exist")]
    SlotCapacityExceeded { required: usize, capacity: usize },
}

/// Build the document and its slot table in one pass.
///
/// Either both are returned fully populated or nothing is.
pub fn build_document<'a>(
    config: &'a DashboardConfig,
    policy: SlotPolicy,
) -> Result<(Document<'a>, SlotTable<'a>), BuildError> {
    validate_shape(config)?;

    let mut slots = SlotTable::new();
    let groups = config
        .groups
        .iter()
        .enumerate()
        .map(|(gi, group)| build_group(gi as u8, group, &mut slots))
        .collect();

    if slots.excluded() > 0 {
        let required = slots.len() + slots.excluded();
        match policy {
            SlotPolicy::Strict => {
                return Err(BuildError::SlotCapacityExceeded {
                    required,
                    capacity: MAX_SLOTS,
                });
            }
            SlotPolicy::Truncate => {
                tracing::warn!(
                    "{} of {} keyed datasets exceed the slot capacity and will not be updated",
                    slots.excluded(),
                    required
                );
            }
        }
    }

    let document = Document {
        title: config.title.as_deref().unwrap_or(DEFAULT_TITLE),
        actions: config.actions.iter().map(build_action).collect(),
        checksum: "",
        decoder: 0,
        hexadecimal_delimiters: false,
        dashboard_layout: DashboardLayout::default(),
        groups,
    };

    tracing::info!(
        "Built dashboard '{}': {} groups, {} actions, {} value slots",
        document.title,
        document.groups.len(),
        document.actions.len(),
        slots.len()
    );

    Ok((document, slots))
}

/// Slot indices are `u8`; reject anything they cannot address.
fn validate_shape(config: &DashboardConfig) -> Result<(), BuildError> {
    if config.groups.len() > u8::MAX as usize + 1 {
        return Err(BuildError::TooManyGroups {
            count: config.groups.len(),
        });
    }

    for (group, cfg) in config.groups.iter().enumerate() {
        if cfg.datasets.len() > u8::MAX as usize + 1 {
            return Err(BuildError::TooManyDatasets {
                group,
                count: cfg.datasets.len(),
            });
        }
    }

    Ok(())
}

fn build_action(action: &ActionConfig) -> ActionEntry<'_> {
    ActionEntry {
        auto_execute_on_connect: false,
        binary: false,
        eol: action.eol.as_deref().unwrap_or(DEFAULT_EOL),
        icon: action.icon.as_deref().unwrap_or(""),
        timer_interval_ms: ACTION_TIMER_INTERVAL_MS,
        timer_mode: 0,
        title: action.title.as_deref().unwrap_or(""),
        tx_data: action.tx_data.as_deref().unwrap_or(""),
    }
}

fn build_group<'a>(gi: u8, group: &'a GroupConfig, slots: &mut SlotTable<'a>) -> GroupEntry<'a> {
    let datasets = group
        .datasets
        .iter()
        .enumerate()
        .map(|(di, dataset)| {
            if let Some(key) = dataset.telemetry_key.as_deref().filter(|k| !k.is_empty()) {
                slots.register(ValueSlot {
                    telemetry_key: key,
                    group: gi,
                    dataset: di as u8,
                });
            }
            build_dataset(dataset)
        })
        .collect();

    GroupEntry {
        title: group.title.as_deref().unwrap_or(""),
        widget: group.widget.as_str(),
        datasets,
    }
}

fn build_dataset(ds: &DatasetConfig) -> DatasetEntry<'_> {
    DatasetEntry {
        alarm_enabled: ds.alarm_enabled,
        alarm_high: ds.alarm_high,
        alarm_low: ds.alarm_low,
        fft: ds.fft,
        fft_max: 0,
        fft_min: 0,
        fft_samples: ds.fft_samples,
        fft_sampling_rate: ds.fft_sampling_rate,
        graph: ds.graph,
        index: ds.index,
        led: ds.led,
        led_high: ds.led_high,
        log: ds.log,
        overview_display: ds.overview_display,
        plot_max: ds.plot_max,
        plot_min: ds.plot_min,
        title: ds.title.as_deref().unwrap_or(""),
        units: &ds.units,
        value: INITIAL_VALUE.to_string(),
        widget: ds.widget.as_str(),
        widget_max: ds.widget_max,
        widget_min: ds.widget_min,
        x_axis: ds.x_axis,
    }
}
