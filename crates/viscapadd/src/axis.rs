//! Latest-value store for continuous axes.
//!
//! The device thread writes samples as fast as they arrive, the
//! dispatcher reads at its own pace. Only the newest value per axis
//! matters, so intermediate samples are coalesced away.

use std::sync::Mutex;

use crate::event::AxisCode;

#[derive(Debug, Default)]
struct Slot {
    value: i32,
    dirty: bool,
}

/// One slot per cached axis, each behind its own lock.
#[derive(Debug, Default)]
pub struct AxisCache {
    slots: [Mutex<Slot>; AxisCode::CACHED.len()],
}

impl AxisCache {
    /// Records the newest value for an axis.
    ///
    /// Marks the slot dirty only when the value actually changed, so
    /// a reader never sees a wakeup without movement.
    pub fn set(&self, axis: AxisCode, value: i32) {
        let Some(index) = axis.cache_slot() else {
            return;
        };
        if let Ok(mut slot) = self.slots[index].lock() {
            if slot.value != value {
                slot.value = value;
                slot.dirty = true;
            }
        }
    }

    /// Takes the pending value for an axis, clearing the dirty mark.
    ///
    /// Returns `None` when nothing changed since the last take.
    pub fn take_if_changed(&self, axis: AxisCode) -> Option<i32> {
        let index = axis.cache_slot()?;
        let mut slot = self.slots[index].lock().ok()?;
        if slot.dirty {
            slot.dirty = false;
            Some(slot.value)
        } else {
            None
        }
    }
}
