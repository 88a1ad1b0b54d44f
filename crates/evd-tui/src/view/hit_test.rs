// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ratatui::layout::Rect;
use tracing::trace;

use crate::view_model::relation_picker::{PickerMouseAction, PointerRegion};

/// An interactive zone on screen associated with a semantic action.
#[derive(Debug, Clone)]
pub struct HitZone<A> {
    pub rect: Rect,
    pub action: A,
}

/// Result of a hit-test lookup containing the matched action and its screen bounds.
#[derive(Debug, Clone)]
pub struct HitMatch<A> {
    pub rect: Rect,
    pub action: A,
}

/// Collector that accumulates hit-test zones during rendering and resolves them on demand.
#[derive(Debug)]
pub struct HitTestRegistry<A> {
    zones: Vec<HitZone<A>>,
}

impl<A> Default for HitTestRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> HitTestRegistry<A> {
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Remove all registered zones so the collector can be reused for the next frame.
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Register a new interactive zone together with its semantic action.
    pub fn register(&mut self, rect: Rect, action: A) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.zones.push(HitZone { rect, action });
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl<A: Clone> HitTestRegistry<A> {
    /// Hit test at the provided terminal coordinates, returning the top-most action.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitMatch<A>> {
        self.zones.iter().rev().find_map(|zone| {
            rect_contains(zone.rect, column, row).then(|| HitMatch {
                rect: zone.rect,
                action: zone.action.clone(),
            })
        })
    }

    /// Zones registered for an action, in registration order
    pub fn zones_for(&self, action: &A) -> Vec<Rect>
    where
        A: PartialEq,
    {
        self.zones.iter().filter(|zone| zone.action == *action).map(|zone| zone.rect).collect()
    }
}

impl PointerRegion for HitTestRegistry<PickerMouseAction> {
    fn hit(&self, column: u16, row: u16) -> Option<PickerMouseAction> {
        let hit = self.hit_test(column, row).map(|hit| hit.action);
        trace!(column, row, ?hit, "Picker hit test");
        hit
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && row >= rect.y
        && column < rect.x.saturating_add(rect.width)
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_latest_registered_zone_first() {
        let mut registry = HitTestRegistry::new();
        registry.register(Rect::new(0, 0, 20, 10), PickerMouseAction::Panel);
        registry.register(Rect::new(1, 2, 18, 1), PickerMouseAction::Candidate(0));

        let result = registry.hit_test(5, 2).expect("should hit candidate row");
        assert_eq!(result.action, PickerMouseAction::Candidate(0));
        assert_eq!(registry.hit(5, 4), Some(PickerMouseAction::Panel));
    }

    #[test]
    fn outside_every_zone_is_none() {
        let mut registry = HitTestRegistry::new();
        registry.register(Rect::new(0, 0, 2, 2), PickerMouseAction::Input);
        assert!(registry.hit(10, 10).is_none());
        assert!(registry.hit(2, 0).is_none());
    }

    #[test]
    fn empty_rects_are_skipped() {
        let mut registry = HitTestRegistry::new();
        registry.register(Rect::new(3, 3, 0, 1), PickerMouseAction::Input);
        assert!(registry.is_empty());
    }
}
