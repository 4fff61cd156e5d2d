//! Array-backed binary tree over slot priorities.
//!
//! Leaves live at `[leaves, 2 * leaves)`, the root at index 1 and node `i`
//! has children `2i` and `2i + 1`. Every internal node stores both the sum
//! and the minimum of its subtree, so a weighted draw, a point update, the
//! total and the smallest priority all cost at most O(log capacity).

#[derive(Debug, Clone)]
pub(crate) struct SumTree {
    capacity: usize,
    leaves: usize,
    sums: Vec<f64>,
    mins: Vec<f64>,
}

impl SumTree {
    pub(crate) fn new(capacity: usize) -> Self {
        let leaves = capacity.max(1).next_power_of_two();
        Self {
            capacity,
            leaves,
            sums: vec![0.0; 2 * leaves],
            mins: vec![f64::INFINITY; 2 * leaves],
        }
    }

    /// Sets the priority of `slot` and refreshes its ancestors.
    pub(crate) fn set(&mut self, slot: usize, priority: f64) {
        debug_assert!(slot < self.capacity);
        debug_assert!(priority >= 0.0);
        let mut node = slot + self.leaves;
        self.sums[node] = priority;
        self.mins[node] = priority;
        while node > 1 {
            node /= 2;
            let (left, right) = (2 * node, 2 * node + 1);
            self.sums[node] = self.sums[left] + self.sums[right];
            self.mins[node] = self.mins[left].min(self.mins[right]);
        }
    }

    pub(crate) fn get(&self, slot: usize) -> f64 {
        self.sums[slot + self.leaves]
    }

    pub(crate) fn total(&self) -> f64 {
        self.sums[1]
    }

    /// Smallest priority that has been set, infinite if none has.
    pub(crate) fn min(&self) -> f64 {
        self.mins[1]
    }

    /// Slot whose cumulative priority range contains `mass`.
    ///
    /// `mass` is expected in `[0, total)`. Values past the end, e.g. from
    /// rounding, land on the last slot with a positive priority; the walk
    /// never enters an empty subtree while the total is positive.
    pub(crate) fn find(&self, mut mass: f64) -> usize {
        let mut node = 1;
        while node < self.leaves {
            let (left, right) = (2 * node, 2 * node + 1);
            if mass < self.sums[left] || self.sums[right] <= 0.0 {
                node = left;
            } else {
                mass -= self.sums[left];
                node = right;
            }
        }
        node - self.leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_nodes_track_children() {
        let mut tree = SumTree::new(5);
        for (slot, p) in [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
            tree.set(slot, p);
        }
        assert_eq!(tree.total(), 15.0);
        assert_eq!(tree.min(), 1.0);

        tree.set(0, 10.0);
        assert_eq!(tree.total(), 24.0);
        assert_eq!(tree.min(), 2.0);
        assert_eq!(tree.get(0), 10.0);

        for node in 1..tree.leaves {
            assert_eq!(tree.sums[node], tree.sums[2 * node] + tree.sums[2 * node + 1]);
        }
    }

    #[test]
    fn find_walks_cumulative_ranges() {
        let mut tree = SumTree::new(4);
        tree.set(0, 1.0);
        tree.set(1, 2.0);
        tree.set(2, 3.0);
        tree.set(3, 4.0);

        assert_eq!(tree.find(0.0), 0);
        assert_eq!(tree.find(0.999), 0);
        assert_eq!(tree.find(1.0), 1);
        assert_eq!(tree.find(2.999), 1);
        assert_eq!(tree.find(3.0), 2);
        assert_eq!(tree.find(6.0), 3);
        assert_eq!(tree.find(9.999), 3);
    }

    #[test]
    fn find_skips_empty_tail() {
        let mut tree = SumTree::new(7);
        tree.set(0, 1.0);
        tree.set(1, 1.0);
        tree.set(2, 1.0);
        assert_eq!(tree.find(2.5), 2);
        assert_eq!(tree.find(3.0), 2);
        assert_eq!(tree.find(100.0), 2);
    }

    #[test]
    fn empty_tree() {
        let tree = SumTree::new(3);
        assert_eq!(tree.total(), 0.0);
        assert_eq!(tree.min(), f64::INFINITY);
    }
}
