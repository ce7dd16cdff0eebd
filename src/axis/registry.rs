// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-capacity axis table.
//!
//! The registry owns every `AxisState` for the lifetime of the firmware. The sampler and the
//! command engine only ever hold shared references to it.

use super::{AxisId, AxisState};
use crate::config::{BROADCAST, MAX_AXES};

/// What a raw axis selector from the wire refers to.
pub enum Lookup<'a, D> {
    /// Selector 0: every configured axis.
    Broadcast,
    Axis(&'a AxisState<D>),
    /// Out of range, or a slot with no axis wired to it.
    Absent,
}

/// Table of axes indexed by id. Slot 0 is always empty.
pub struct AxisRegistry<D> {
    slots: [Option<AxisState<D>>; MAX_AXES],
}

impl<D> AxisRegistry<D> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Add (or replace) the axis `id`, with an optional direction output line.
    pub fn with_axis(mut self, id: AxisId, direction: Option<D>) -> Self {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = Some(AxisState::new(id, direction));
        }
        self
    }

    pub fn get(&self, id: AxisId) -> Option<&AxisState<D>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Resolve a raw selector, as it appears in a command byte.
    pub fn lookup(&self, selector: u8) -> Lookup<'_, D> {
        if selector == BROADCAST {
            return Lookup::Broadcast;
        }
        match AxisId::new(selector).and_then(|id| self.get(id)) {
            Some(axis) => Lookup::Axis(axis),
            None => Lookup::Absent,
        }
    }

    /// Configured axes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AxisState<D>> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D> Default for AxisRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AxisRegistry<()> {
        AxisRegistry::new()
            .with_axis(AxisId::Z, None)
            .with_axis(AxisId::X, None)
    }

    #[test]
    fn lookup_resolves_broadcast_axes_and_gaps() {
        let axes = registry();

        assert!(matches!(axes.lookup(0), Lookup::Broadcast));
        assert!(matches!(axes.lookup(1), Lookup::Axis(a) if a.id() == AxisId::X));
        assert!(matches!(axes.lookup(2), Lookup::Absent));
        assert!(matches!(axes.lookup(3), Lookup::Axis(a) if a.id() == AxisId::Z));
        assert!(matches!(axes.lookup(8), Lookup::Absent));
        assert!(matches!(axes.lookup(0x0F), Lookup::Absent));
    }

    #[test]
    fn iter_walks_axes_in_id_order() {
        let axes = registry();
        let mut ids = axes.iter().map(|a| a.id().get());
        assert_eq!(ids.next(), Some(1));
        assert_eq!(ids.next(), Some(3));
        assert_eq!(ids.next(), None);
        assert_eq!(axes.len(), 2);
    }

    #[test]
    fn empty_registry_has_no_axes() {
        let axes: AxisRegistry<()> = AxisRegistry::default();
        assert!(axes.is_empty());
        assert!(axes.get(AxisId::X).is_none());
    }
}
