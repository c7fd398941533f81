//! The editable path and its distance bookkeeping
//!
//! A [`PathLedger`] owns its nodes by value in one `Vec`. The cursor and the
//! drag reference are plain indices into that `Vec`, never references to
//! nodes, so splicing the sequence can't leave a dangling selection.
//!
//! Distances are maintained incrementally:
//! - Every mutation re-measures only the `distance_from_previous` values whose
//!   adjacency actually changed (the touched node and its successor).
//! - A single forward pass then propagates `cumulative_distance` from the
//!   first touched index to the end, since each cumulative total only depends
//!   on its immediate predecessor.

use crate::{DistanceModel, GeoPoint, LedgerSnapshot, PathNode, utils};

/// Ordered, mutable sequence of path nodes with a cursor and a drag reference
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathLedger {
    nodes: Vec<PathNode>,
    /// Reference node for the next insert/remove, `None` only when empty
    cursor: Option<usize>,
    /// Node being dragged, set by `begin_drag` and cleared by `end_drag`
    dragging: Option<usize>,
    model: DistanceModel,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PathLedger {
    /// Create an empty ledger measuring distances with `model`
    pub fn new(model: DistanceModel) -> Self {
        Self {
            nodes: Vec::new(),
            cursor: None,
            dragging: None,
            model,
        }
    }

    /// Build a ledger by inserting every point in order
    ///
    /// This goes through [`PathLedger::insert`], so the distances are exactly
    /// the ones an interactive session placing the same points would get.
    pub fn from_points<I>(points: I, model: DistanceModel) -> Self
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut ledger = Self::new(model);
        for point in points {
            ledger.insert(point);
        }
        ledger
    }

    #[inline]
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&PathNode> {
        self.nodes.get(index)
    }

    /// Iterate over the points in path order
    pub fn points(&self) -> impl ExactSizeIterator<Item = GeoPoint> + '_ {
        self.nodes.iter().map(|node| node.point)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[inline]
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    #[inline]
    pub fn distance_model(&self) -> DistanceModel {
        self.model
    }

    /// Switch the distance model and re-measure the whole path
    pub fn set_distance_model(&mut self, model: DistanceModel) {
        if self.model == model {
            return;
        }
        self.model = model;
        self.remeasure_all();
    }

    /// Insert `point` right after the cursor (or at the head when there is no
    /// cursor) and select it
    ///
    /// Returns the index of the new node.
    pub fn insert(&mut self, point: GeoPoint) -> usize {
        debug_assert!(point.is_finite(), "inserted a non-finite point {point:?}");

        let index = self.cursor.map_or(0, |cursor| cursor + 1);

        let mut node = PathNode::detached(point);
        if index > 0 {
            let previous = self.nodes[index - 1];
            node.distance_from_previous = self.model.distance(previous.point, point);
            node.cumulative_distance = previous.cumulative_distance + node.distance_from_previous;
        }
        self.nodes.insert(index, node);

        // The node that used to follow the insertion point now follows the
        // new node
        if index + 1 < self.nodes.len() {
            self.remeasure(index + 1);
        }

        if let Some(dragging) = self.dragging
            && dragging >= index
        {
            self.dragging = Some(dragging + 1);
        }
        self.cursor = Some(index);
        self.accumulate_from(index);

        index
    }

    /// Remove the node at the cursor
    ///
    /// The cursor moves to the node before the removed one. Removing the head
    /// keeps the cursor on the new head, or clears it when the path becomes
    /// empty. Does nothing (and returns `None`) without a cursor.
    pub fn remove_at_cursor(&mut self) -> Option<PathNode> {
        let cursor = self.cursor?;
        let removed = self.nodes.remove(cursor);

        match self.dragging {
            Some(dragging) if dragging == cursor => self.dragging = None,
            Some(dragging) if dragging > cursor => self.dragging = Some(dragging - 1),
            _ => {}
        }

        if cursor > 0 {
            if cursor < self.nodes.len() {
                self.remeasure(cursor);
            }
            self.cursor = Some(cursor - 1);
            self.accumulate_from(cursor - 1);
        } else if self.nodes.is_empty() {
            self.cursor = None;
        } else {
            // The new head has no predecessor, so the whole list is re-summed
            self.accumulate_from(0);
        }

        Some(removed)
    }

    /// Start dragging the node at `index`, which also becomes the cursor
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        if index >= self.nodes.len() {
            debug_assert!(
                false,
                "begin_drag({index}) on a path of {} nodes",
                self.nodes.len()
            );
            tracing::warn!(
                "Ignoring drag of node {} on a path of {} nodes",
                index,
                self.nodes.len()
            );
            return false;
        }
        self.dragging = Some(index);
        self.cursor = Some(index);
        true
    }

    /// Relocate the dragged node to `point`
    ///
    /// Only the dragged node and its successor are re-measured; everything
    /// downstream just has its cumulative distance shifted.
    pub fn move_to(&mut self, point: GeoPoint) {
        debug_assert!(point.is_finite(), "moved to a non-finite point {point:?}");

        let Some(index) = self.dragging else {
            debug_assert!(false, "move_to called while not dragging");
            tracing::warn!("Ignoring move to {:?}: no node is being dragged", point);
            return;
        };

        self.nodes[index].point = point;
        self.remeasure(index);
        if index + 1 < self.nodes.len() {
            self.remeasure(index + 1);
        }
        self.accumulate_from(index);
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Reverse the path, keeping the same node selected
    pub fn reverse(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let last = self.nodes.len() - 1;

        self.nodes.reverse();
        self.cursor = self.cursor.map(|cursor| last - cursor);
        self.dragging = self.dragging.map(|dragging| last - dragging);

        // Every adjacency changed
        self.remeasure_all();
    }

    /// Select an existing node, e.g. one the user clicked on
    ///
    /// Returns `false` (leaving the cursor alone) if `index` is out of range.
    pub fn select_nearest(&mut self, index: usize) -> bool {
        if index >= self.nodes.len() {
            tracing::warn!(
                "Ignoring selection of node {} on a path of {} nodes",
                index,
                self.nodes.len()
            );
            return false;
        }
        self.cursor = Some(index);
        true
    }

    /// Index of the node closest to `point`, if any
    pub fn nearest_index(&self, point: GeoPoint) -> Option<usize> {
        self.nodes
            .iter()
            .map(|node| self.model.distance(node.point, point))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.cursor = None;
        self.dragging = None;
    }

    /// Total path length in meters
    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.nodes
            .last()
            .map_or(0.0, |node| node.cumulative_distance)
    }

    #[inline]
    pub fn total_distance_kilometers(&self) -> f64 {
        utils::meters_to_kilometers(self.total_distance())
    }

    #[inline]
    pub fn total_distance_miles(&self) -> f64 {
        utils::meters_to_miles(self.total_distance())
    }

    /// Read-only copy of the path for display
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            nodes: self.nodes.clone(),
            total_distance: self.total_distance(),
            cursor: self.cursor,
        }
    }

    /// Recompute `distance_from_previous` of the node at `index` against its
    /// current predecessor
    #[inline]
    fn remeasure(&mut self, index: usize) {
        self.nodes[index].distance_from_previous = if index == 0 {
            0.0
        } else {
            self.model
                .distance(self.nodes[index - 1].point, self.nodes[index].point)
        };
    }

    fn remeasure_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.remeasure(index);
        }
        self.accumulate_from(0);
    }

    /// Forward pass fixing `cumulative_distance` from `start` to the end
    ///
    /// Starting at 0 also resets the head, which covers the case where a
    /// removal or reversal promoted a different node to the head.
    fn accumulate_from(&mut self, start: usize) {
        if start == 0
            && let Some(head) = self.nodes.first_mut()
        {
            head.distance_from_previous = 0.0;
            head.cumulative_distance = 0.0;
        }
        for index in start.max(1)..self.nodes.len() {
            self.nodes[index].cumulative_distance =
                self.nodes[index - 1].cumulative_distance + self.nodes[index].distance_from_previous;
        }
    }
}
