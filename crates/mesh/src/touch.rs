//! Multi-touch tracking.
//!
//! Each slot binds to the mesh node nearest the finger at touch-down and
//! keeps that anchor until released, even as the finger moves away.

use glam::{Vec2, Vec3};

use crate::constants::MAX_TOUCHES;

/// One finger.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchSlot {
    /// Last known position, normalized to `[0, 1]`.
    pub point: Vec2,
    pub active: bool,
    /// Grid column of the anchor node.
    pub anchor_x: usize,
    /// Grid row of the anchor node.
    pub anchor_y: usize,
}

/// Fixed set of touch slots indexed by touch identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchTracker {
    slots: [TouchSlot; MAX_TOUCHES],
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch-down or move for `slot`.
    ///
    /// A slot that was inactive becomes active and is anchored to the node
    /// nearest `point` among the current `positions` (a `width`-wide,
    /// row-major lattice). Returns true if the slot was newly activated.
    ///
    /// Out-of-range slots are a caller bug: they assert in debug builds and
    /// are ignored otherwise.
    pub fn touch_move(&mut self, slot: usize, point: Vec2, positions: &[Vec3], width: usize) -> bool {
        debug_assert!(slot < MAX_TOUCHES, "touch slot {} out of range", slot);
        let Some(touch) = self.slots.get_mut(slot) else {
            log::warn!("Ignoring touch for slot {} (max {})", slot, MAX_TOUCHES);
            return false;
        };

        touch.point = point;
        if touch.active {
            return false;
        }

        touch.active = true;
        if let Some((x, y)) = nearest_node(point, positions, width) {
            touch.anchor_x = x;
            touch.anchor_y = y;
            log::debug!("Touch {} anchored to node ({}, {})", slot, x, y);
        }
        true
    }

    pub fn touch_end(&mut self, slot: usize) {
        debug_assert!(slot < MAX_TOUCHES, "touch slot {} out of range", slot);
        match self.slots.get_mut(slot) {
            Some(touch) => touch.active = false,
            None => log::warn!("Ignoring release for slot {} (max {})", slot, MAX_TOUCHES),
        }
    }

    pub fn touch_end_all(&mut self) {
        for touch in &mut self.slots {
            touch.active = false;
        }
    }

    pub fn slot(&self, slot: usize) -> Option<&TouchSlot> {
        self.slots.get(slot)
    }

    pub fn slots(&self) -> &[TouchSlot; MAX_TOUCHES] {
        &self.slots
    }

    /// Active slots in slot order.
    pub fn active(&self) -> impl Iterator<Item = &TouchSlot> {
        self.slots.iter().filter(|t| t.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

/// Grid coordinate of the node whose xy position is closest to `point`.
///
/// Scans rows outer, columns inner; the first minimum found wins ties.
/// Returns `None` for an empty lattice.
pub fn nearest_node(point: Vec2, positions: &[Vec3], width: usize) -> Option<(usize, usize)> {
    if width == 0 {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, pos) in positions.iter().enumerate() {
        let d = point.distance(pos.truncate());
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((index, d));
        }
    }

    best.map(|(index, _)| (index % width, index / width))
}
