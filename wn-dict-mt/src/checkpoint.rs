//! Boundary marker bookkeeping
//!
//! The external translator gives no completion signal of its own. The only
//! observable is that a boundary marker between two lines was mutated, which
//! happens after the translator has moved past it. A unit is therefore only
//! considered stable once *both* of its markers have been observed.
//!
//! Unit `L` is bounded by markers `L` and `L + 1`; `n` markers bound `n - 1`
//! units.

use tracing::{debug, warn};

/// Receives units as they become stable
pub trait StabilizationHandler {
    fn on_unit_stable(&mut self, unit: usize);
}

impl<F: FnMut(usize)> StabilizationHandler for F {
    fn on_unit_stable(&mut self, unit: usize) {
        self(unit)
    }
}

/// What a single marker observation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// First observation of this marker, with the units it stabilised
    Recorded { stabilized: Vec<usize> },
    /// Marker already observed; nothing happened
    Duplicate,
    /// No such marker
    OutOfRange,
}

#[derive(Debug, Clone)]
pub struct CheckpointTracker {
    checkpoints: Vec<bool>,
    processed: Vec<bool>,
}

impl CheckpointTracker {
    pub fn new(marker_count: usize) -> Self {
        CheckpointTracker {
            checkpoints: vec![false; marker_count],
            processed: vec![false; marker_count.saturating_sub(1)],
        }
    }

    pub fn marker_count(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn unit_count(&self) -> usize {
        self.processed.len()
    }

    /// Record that `marker` was mutated.
    ///
    /// Each marker is recorded at most once. The two units that touch the
    /// marker are checked and handed to `handler` if both of their markers
    /// are now observed and they were not handed over before.
    pub fn observe(
        &mut self,
        marker: usize,
        handler: &mut impl StabilizationHandler,
    ) -> ObserveOutcome {
        let Some(seen) = self.checkpoints.get_mut(marker) else {
            warn!(marker, markers = self.checkpoints.len(), "marker out of range");
            return ObserveOutcome::OutOfRange;
        };
        if *seen {
            debug!(marker, "duplicate marker notification");
            return ObserveOutcome::Duplicate;
        }
        *seen = true;

        let mut stabilized = Vec::new();
        // The unit ending at this marker, then the one starting at it
        let candidates = [marker.checked_sub(1), Some(marker)];
        for unit in candidates.into_iter().flatten() {
            if unit >= self.processed.len() || self.processed[unit] {
                continue;
            }
            if self.checkpoints[unit] && self.checkpoints[unit + 1] {
                self.processed[unit] = true;
                debug!(unit, marker, "unit stabilised");
                handler.on_unit_stable(unit);
                stabilized.push(unit);
            }
        }
        ObserveOutcome::Recorded { stabilized }
    }

    pub fn is_observed(&self, marker: usize) -> bool {
        self.checkpoints.get(marker).copied().unwrap_or(false)
    }

    pub fn is_processed(&self, unit: usize) -> bool {
        self.processed.get(unit).copied().unwrap_or(false)
    }

    /// Units not yet handed to a handler, in order
    pub fn pending_units(&self) -> Vec<usize> {
        self.processed
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(unit, _)| unit)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.processed.iter().all(|done| *done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(tracker: &mut CheckpointTracker, markers: &[usize]) -> Vec<usize> {
        let mut resolved = Vec::new();
        for &marker in markers {
            tracker.observe(marker, &mut |unit: usize| resolved.push(unit));
        }
        resolved
    }

    #[test]
    fn test_unit_needs_both_markers() {
        let mut tracker = CheckpointTracker::new(3);
        let mut resolved = Vec::new();
        assert_eq!(
            tracker.observe(0, &mut |unit: usize| resolved.push(unit)),
            ObserveOutcome::Recorded { stabilized: vec![] }
        );
        assert!(resolved.is_empty());
        assert_eq!(
            tracker.observe(1, &mut |unit: usize| resolved.push(unit)),
            ObserveOutcome::Recorded { stabilized: vec![0] }
        );
        assert_eq!(resolved, vec![0]);
        assert_eq!(tracker.pending_units(), vec![1]);
    }

    #[test]
    fn test_order_independence() {
        let mut forward = CheckpointTracker::new(2);
        assert_eq!(observe_all(&mut forward, &[0, 1]), vec![0]);

        let mut reverse = CheckpointTracker::new(2);
        assert_eq!(observe_all(&mut reverse, &[1, 0]), vec![0]);
    }

    #[test]
    fn test_duplicate_observation_is_idempotent() {
        let mut tracker = CheckpointTracker::new(3);
        let resolved = observe_all(&mut tracker, &[0, 1, 1, 0, 2, 2]);
        assert_eq!(resolved, vec![0, 1]);

        let mut count = 0;
        assert_eq!(
            tracker.observe(1, &mut |_: usize| count += 1),
            ObserveOutcome::Duplicate
        );
        assert_eq!(count, 0);
    }

    #[test]
    fn test_middle_marker_completes_both_neighbours() {
        let mut tracker = CheckpointTracker::new(3);
        observe_all(&mut tracker, &[0, 2]);
        let mut resolved = Vec::new();
        let outcome = tracker.observe(1, &mut |unit: usize| resolved.push(unit));
        assert_eq!(outcome, ObserveOutcome::Recorded { stabilized: vec![0, 1] });
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_every_permutation_resolves_each_unit_once() {
        let orders: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [3, 2, 1, 0],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
            [1, 2, 0, 3],
            [3, 0, 2, 1],
        ];
        for order in orders {
            let mut tracker = CheckpointTracker::new(4);
            let mut resolved = observe_all(&mut tracker, &order);
            resolved.sort();
            assert_eq!(resolved, vec![0, 1, 2], "order {:?}", order);
        }
    }

    #[test]
    fn test_skipped_marker_leaves_units_pending() {
        let mut tracker = CheckpointTracker::new(4);
        let resolved = observe_all(&mut tracker, &[0, 1, 3]);
        assert_eq!(resolved, vec![0]);
        assert_eq!(tracker.pending_units(), vec![1, 2]);
        assert!(!tracker.is_observed(2));
        assert!(!tracker.is_complete());
    }

    #[test]
    fn test_out_of_range() {
        let mut tracker = CheckpointTracker::new(2);
        assert_eq!(observe_all(&mut tracker, &[]), Vec::<usize>::new());
        assert_eq!(
            tracker.observe(5, &mut |_: usize| {}),
            ObserveOutcome::OutOfRange
        );
        assert!(!tracker.is_observed(5));
        assert!(!tracker.is_processed(5));
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut empty = CheckpointTracker::new(0);
        assert_eq!(empty.unit_count(), 0);
        assert_eq!(empty.observe(0, &mut |_: usize| {}), ObserveOutcome::OutOfRange);

        let mut single = CheckpointTracker::new(1);
        assert_eq!(single.unit_count(), 0);
        assert_eq!(
            single.observe(0, &mut |_: usize| {}),
            ObserveOutcome::Recorded { stabilized: vec![] }
        );
        assert!(single.is_complete());
    }

    struct Recorder(Vec<usize>);

    impl StabilizationHandler for Recorder {
        fn on_unit_stable(&mut self, unit: usize) {
            self.0.push(unit);
        }
    }

    #[test]
    fn test_struct_handler() {
        let mut tracker = CheckpointTracker::new(3);
        let mut recorder = Recorder(Vec::new());
        for marker in [2, 1, 0] {
            tracker.observe(marker, &mut recorder);
        }
        assert_eq!(recorder.0, vec![1, 0]);
    }
}
