// Dashboard service - Owns the document and keeps it in step with telemetry
use crate::application::document_builder::{build_document, BuildError, SlotPolicy};
use crate::domain::dashboard::Document;
use crate::domain::slot::SlotTable;
use crate::domain::telemetry::{resolve_key, Scratch};
use crate::infrastructure::config::DashboardConfig;
use crate::infrastructure::frame::{encode_frame, measure_frame, FrameError, FrameMode};
use serde_json::Value;

/// A built dashboard document and the slot table that patches it.
///
/// Not internally synchronized: callers that update and serialize from
/// different tasks must hold a lock around both.
#[derive(Debug)]
pub struct Dashboard<'a> {
    document: Document<'a>,
    slots: SlotTable<'a>,
}

impl<'a> Dashboard<'a> {
    /// Build with the default [`SlotPolicy::Truncate`].
    pub fn new(config: &'a DashboardConfig) -> Result<Self, BuildError> {
        Self::with_policy(config, SlotPolicy::default())
    }

    pub fn with_policy(config: &'a DashboardConfig, policy: SlotPolicy) -> Result<Self, BuildError> {
        let (document, slots) = build_document(config, policy)?;
        Ok(Self { document, slots })
    }

    pub fn document(&self) -> &Document<'a> {
        &self.document
    }

    pub fn slots(&self) -> &SlotTable<'a> {
        &self.slots
    }

    /// Patch every bound dataset value from `telemetry`.
    ///
    /// Keys missing from the snapshot keep their previous value.
    pub fn update(&mut self, telemetry: &Value) {
        let mut scratch = Scratch::new();
        let mut stale = 0usize;

        for slot in self.slots.iter() {
            let Some(value) = resolve_key(telemetry, slot.telemetry_key, &mut scratch) else {
                stale += 1;
                continue;
            };

            if let Some(leaf) = self
                .document
                .value_mut(slot.group as usize, slot.dataset as usize)
            {
                leaf.clear();
                leaf.push_str(value);
            }
        }

        tracing::trace!(
            "Dashboard update: {} slots patched, {} stale",
            self.slots.len() - stale,
            stale
        );
    }

    /// Write the framed document into `buffer`.
    ///
    /// Returns the frame length excluding the trailing terminator byte.
    pub fn serialize(&self, buffer: &mut [u8], mode: FrameMode) -> Result<usize, FrameError> {
        encode_frame(&self.document, buffer, mode)
    }

    /// Buffer size that is always enough for a compact [`Dashboard::serialize`].
    ///
    /// Pretty output is several times larger; use [`Dashboard::measure`] for it.
    pub fn estimate_size(&self) -> usize {
        self.measure(FrameMode::Compact)
    }

    /// Exact buffer size for `mode`, terminator included.
    pub fn measure(&self, mode: FrameMode) -> usize {
        // Counting cannot run out of room, and the document types always encode.
        measure_frame(&self.document, mode).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slot::MAX_SLOTS;
    use crate::domain::widget::{DatasetWidget, GroupWidget};
    use crate::infrastructure::config::{ActionConfig, DatasetConfig, GroupConfig};
    use crate::infrastructure::frame::frame_body;
    use proptest::prelude::*;
    use serde_json::json;

    fn test_config() -> DashboardConfig {
        DashboardConfig {
            title: Some("Test Dashboard".to_string()),
            groups: vec![GroupConfig {
                title: Some("Test Group".to_string()),
                widget: GroupWidget::Multiplot,
                datasets: vec![
                    DatasetConfig {
                        title: Some("Temp K".to_string()),
                        units: "K".to_string(),
                        telemetry_key: Some("temperature.k".to_string()),
                        index: 4,
                        widget: DatasetWidget::Gauge,
                        widget_min: 60.0,
                        widget_max: 300.0,
                        plot_min: 60.0,
                        plot_max: 310.0,
                        alarm_low: 60.0,
                        alarm_high: 300.0,
                        graph: true,
                        log: true,
                        overview_display: true,
                        ..Default::default()
                    },
                    DatasetConfig {
                        title: Some("State".to_string()),
                        telemetry_key: Some("state.name".to_string()),
                        index: 2,
                        ..Default::default()
                    },
                ],
            }],
            actions: vec![ActionConfig {
                title: Some("Go".to_string()),
                tx_data: Some("go".to_string()),
                icon: Some("Play".to_string()),
                eol: Some("\n".to_string()),
            }],
        }
    }

    fn render(dash: &Dashboard<'_>, mode: FrameMode) -> String {
        let mut buffer = vec![0u8; dash.measure(mode)];
        let len = dash.serialize(&mut buffer, mode).unwrap();
        String::from_utf8(buffer[..len].to_vec()).unwrap()
    }

    fn body(frame: &str) -> Value {
        serde_json::from_slice(frame_body(frame.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_serialize_has_delimiters() {
        let config = test_config();
        let dash = Dashboard::new(&config).unwrap();

        let compact = render(&dash, FrameMode::Compact);
        assert!(compact.starts_with("/*{"));
        assert!(compact.ends_with("}*/\r\n\r\n"));

        let pretty = render(&dash, FrameMode::Pretty);
        assert!(pretty.starts_with("/*{"));
        assert!(pretty.ends_with("}\n*/\r\n\r\n"));
        assert!(pretty.len() > compact.len());
    }

    #[test]
    fn test_serialize_contains_configuration() {
        let config = test_config();
        let dash = Dashboard::new(&config).unwrap();
        let frame = render(&dash, FrameMode::Compact);

        for needle in [
            "\"Test Dashboard\"",
            "\"Test Group\"",
            "\"Temp K\"",
            "\"gauge\"",
            "\"multiplot\"",
            "\"Go\"",
            "\"go\"",
            "\"Play\"",
        ] {
            assert!(frame.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_initial_values_are_zero() {
        let config = test_config();
        let dash = Dashboard::new(&config).unwrap();
        let doc = body(&render(&dash, FrameMode::Compact));

        assert_eq!(doc["groups"][0]["datasets"][0]["value"], "0");
        assert_eq!(doc["groups"][0]["datasets"][1]["value"], "0");
        assert_eq!(doc["checksum"], "");
        assert_eq!(doc["decoder"], 0);
        assert_eq!(doc["dashboardLayout"]["windowOrder"], json!([]));
        assert_eq!(doc["groups"][0]["datasets"][1]["xAxis"], -1);
        assert_eq!(doc["groups"][0]["datasets"][1]["fftSamples"], 256);
    }

    #[test]
    fn test_update_patches_values() {
        let config = test_config();
        let mut dash = Dashboard::new(&config).unwrap();

        dash.update(&json!({
            "temperature": { "k": 78.45 },
            "state": { "name": "CoarseCooldown" },
        }));

        let doc = body(&render(&dash, FrameMode::Compact));
        assert_eq!(doc["groups"][0]["datasets"][0]["value"], "78.45");
        assert_eq!(doc["groups"][0]["datasets"][1]["value"], "CoarseCooldown");
    }

    #[test]
    fn test_update_preserves_structure() {
        let config = test_config();
        let mut dash = Dashboard::new(&config).unwrap();

        dash.update(&json!({ "temperature": { "k": 200.0 }, "state": { "name": "Off" } }));
        dash.update(&json!({ "temperature": { "k": 78.0 }, "state": { "name": "Operating" } }));

        let frame = render(&dash, FrameMode::Compact);
        assert!(frame.contains("Operating"));
        assert!(!frame.contains("\"Off\""));
        assert!(frame.contains("\"Test Group\""));
        assert!(frame.contains("\"multiplot\""));
        assert_eq!(dash.document().value(0, 0), Some("78"));
    }

    #[test]
    fn test_missing_key_keeps_last_value() {
        let config = test_config();
        let mut dash = Dashboard::new(&config).unwrap();

        dash.update(&json!({ "temperature": { "k": 81.5 } }));
        dash.update(&json!({ "state": { "name": "Idle" } }));
        dash.update(&json!({}));

        assert_eq!(dash.document().value(0, 0), Some("81.5"));
        assert_eq!(dash.document().value(0, 1), Some("Idle"));
    }

    #[test]
    fn test_never_seen_key_stays_zero() {
        let config = test_config();
        let mut dash = Dashboard::new(&config).unwrap();

        dash.update(&json!({ "state": { "name": "Idle" } }));
        assert_eq!(dash.document().value(0, 0), Some("0"));
    }

    #[test]
    fn test_datasets_past_slot_capacity_are_never_patched() {
        let datasets = (0..MAX_SLOTS + 2)
            .map(|i| DatasetConfig {
                telemetry_key: Some(format!("k{i}")),
                ..Default::default()
            })
            .collect();
        let config = DashboardConfig {
            title: None,
            groups: vec![GroupConfig {
                datasets,
                ..Default::default()
            }],
            actions: Vec::new(),
        };
        let mut dash = Dashboard::new(&config).unwrap();

        let snapshot: serde_json::Map<String, Value> = (0..MAX_SLOTS + 2)
            .map(|i| (format!("k{i}"), json!(i + 1)))
            .collect();
        dash.update(&Value::Object(snapshot));

        let doc = dash.document();
        assert_eq!(doc.value(0, 0), Some("1"));
        assert_eq!(doc.value(0, MAX_SLOTS - 1), Some("48"));
        assert_eq!(doc.value(0, MAX_SLOTS), Some("0"));
        assert_eq!(doc.value(0, MAX_SLOTS + 1), Some("0"));
    }

    #[test]
    fn test_buffer_too_small() {
        let config = test_config();
        let dash = Dashboard::new(&config).unwrap();

        let mut tiny = [0u8; 4];
        assert!(matches!(
            dash.serialize(&mut tiny, FrameMode::Compact),
            Err(FrameError::BufferTooSmall)
        ));

        let mut short = vec![0u8; dash.estimate_size() - 1];
        assert!(matches!(
            dash.serialize(&mut short, FrameMode::Compact),
            Err(FrameError::BufferTooSmall)
        ));
    }

    #[test]
    fn test_estimate_is_a_compact_bound_only() {
        let config = test_config();
        let dash = Dashboard::new(&config).unwrap();

        let mut buffer = vec![0u8; dash.estimate_size()];
        let len = dash.serialize(&mut buffer, FrameMode::Compact).unwrap();
        assert!(len < dash.estimate_size());

        assert!(matches!(
            dash.serialize(&mut buffer, FrameMode::Pretty),
            Err(FrameError::BufferTooSmall)
        ));
    }

    fn arb_config() -> impl Strategy<Value = DashboardConfig> {
        let dataset = (any::<bool>(), "[a-z]{0,8}").prop_map(|(bound, key)| {
            DatasetConfig {
                telemetry_key: bound.then_some(key),
                ..Default::default()
            }
        });
        let group = prop::collection::vec(dataset, 0..12).prop_map(|datasets| GroupConfig {
            datasets,
            ..Default::default()
        });
        prop::collection::vec(group, 0..8).prop_map(|groups| DashboardConfig {
            groups,
            ..Default::default()
        })
    }

    proptest! {
        #[test]
        fn prop_structure_matches_config(config in arb_config()) {
            let dash = Dashboard::new(&config).unwrap();
            let doc = dash.document();

            prop_assert_eq!(doc.groups.len(), config.groups.len());
            for (entry, group) in doc.groups.iter().zip(&config.groups) {
                prop_assert_eq!(entry.datasets.len(), group.datasets.len());
            }

            let keyed = config
                .groups
                .iter()
                .flat_map(|g| &g.datasets)
                .filter(|d| d.telemetry_key.as_deref().is_some_and(|k| !k.is_empty()))
                .count();
            prop_assert_eq!(dash.slots().len(), keyed.min(crate::domain::slot::MAX_SLOTS));
        }

        #[test]
        fn prop_estimate_bounds_compact_output(config in arb_config(), reading in any::<f64>()) {
            let mut dash = Dashboard::new(&config).unwrap();
            let keys: Vec<&str> = dash.slots().iter().map(|s| s.telemetry_key).collect();

            let mut snapshot = serde_json::Map::new();
            for key in keys {
                snapshot.insert(key.to_string(), json!(reading));
            }
            dash.update(&Value::Object(snapshot));

            let estimate = dash.estimate_size();
            let mut buffer = vec![0u8; estimate];
            let len = dash.serialize(&mut buffer, FrameMode::Compact).unwrap();
            prop_assert!(len < estimate);
        }
    }
}
