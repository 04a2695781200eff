// Precomputed bindings from telemetry keys to document positions
use heapless::Vec;

/// Maximum number of dataset-to-telemetry bindings
pub const MAX_SLOTS: usize = 48;

/// One binding: the key is borrowed from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSlot<'a> {
    pub telemetry_key: &'a str,
    pub group: u8,
    pub dataset: u8,
}

/// Fixed-capacity slot table filled once at build time.
#[derive(Debug, Clone, Default)]
pub struct SlotTable<'a> {
    slots: Vec<ValueSlot<'a>, MAX_SLOTS>,
    excluded: usize,
}

impl<'a> SlotTable<'a> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            excluded: 0,
        }
    }

    /// Register a binding. Returns `false` once the table is full; the
    /// rejected binding is counted in [`SlotTable::excluded`].
    pub fn register(&mut self, slot: ValueSlot<'a>) -> bool {
        match self.slots.push(slot) {
            Ok(()) => true,
            Err(_) => {
                self.excluded += 1;
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keyed datasets that did not fit in the table
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueSlot<'a>> {
        self.slots.iter()
    }
}
