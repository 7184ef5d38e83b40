//! HeightIndex - O(log n) prefix sums over row heights via a Fenwick tree
//!
//! Answers "where does row i start" and "which row covers offset y" for the
//! host list without walking every row.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: amortized O(log n)
//! - `remove`: O(n log n) (rebuild)

/// Cumulative row heights in pixels.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree storage, always at least `heights.len()` long.
    tree: Vec<i64>,
    /// Plain heights, kept for point reads and rebuilds.
    heights: Vec<u32>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use notiview::list::HeightIndex;
    /// let index = HeightIndex::new(16);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index over `heights`.
    pub fn from_heights(heights: impl IntoIterator<Item = u32>) -> Self {
        let heights: Vec<u32> = heights.into_iter().collect();
        let mut index = Self {
            tree: Vec::new(),
            heights,
        };
        index.rebuild(index.heights.len());
        index
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity.max(self.heights.len()), 0);
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, i64::from(height));
        }
    }

    /// Sets the height of row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: u32) {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let delta = i64::from(height) - i64::from(self.heights[index]);
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of row `index`.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.heights.get(index).copied()
    }

    /// Cumulative height up to and including row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use notiview::list::HeightIndex;
    /// let index = HeightIndex::from_heights([42, 84, 42]);
    /// assert_eq!(index.prefix_sum(0), 42);
    /// assert_eq!(index.prefix_sum(1), 126);
    /// assert_eq!(index.prefix_sum(2), 168);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> u32 {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        u32::try_from(sum.max(0)).unwrap_or(u32::MAX)
    }

    /// Top offset of row `index`, i.e. the sum of all rows before it.
    pub fn offset_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// First row whose range `[offset_of(i), prefix_sum(i))` covers `value`.
    ///
    /// Zero-height rows never cover an offset.
    ///
    /// # Examples
    ///
    /// ```
    /// # use notiview::list::HeightIndex;
    /// let index = HeightIndex::from_heights([42, 0, 84]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(41), Some(0));
    /// assert_eq!(index.lower_bound(42), Some(2));
    /// assert_eq!(index.lower_bound(126), None);
    /// ```
    pub fn lower_bound(&self, value: u32) -> Option<usize> {
        let mut left = 0;
        let mut right = self.heights.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.heights.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> u32 {
        match self.heights.len() {
            0 => 0,
            len => self.prefix_sum(len - 1),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, height: u32) {
        if self.heights.len() >= self.tree.len() {
            // Growing a Fenwick array in place breaks the parent sums.
            self.heights.push(height);
            self.rebuild(self.tree.len().max(1) * 2);
            return;
        }

        let index = self.heights.len();
        self.heights.push(height);
        fenwick::array::update(&mut self.tree, index, i64::from(height));
    }

    /// Removes row `index`, shifting later rows up.
    pub fn remove(&mut self, index: usize) -> u32 {
        let height = self.heights.remove(index);
        self.rebuild(self.tree.len());
        height
    }

    /// Removes every row, keeping capacity.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.tree.iter_mut().for_each(|node| *node = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(4);
        assert!(index.is_empty());
        assert_eq!(index.total(), 0);
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    fn test_push_past_capacity_keeps_sums() {
        let mut index = HeightIndex::new(1);
        for height in [42, 84, 42, 106, 42] {
            index.push(height);
        }
        assert_eq!(index.prefix_sum(1), 126);
        assert_eq!(index.prefix_sum(3), 274);
        assert_eq!(index.total(), 316);
    }

    #[test]
    fn test_set_updates_later_offsets() {
        let mut index = HeightIndex::from_heights([42, 42, 42]);
        index.set(1, 84);
        assert_eq!(index.offset_of(2), 126);
        assert_eq!(index.get(1), Some(84));
        assert_eq!(index.total(), 168);
    }

    #[test]
    fn test_remove_shifts_rows() {
        let mut index = HeightIndex::from_heights([10, 20, 30]);
        assert_eq!(index.remove(1), 20);
        assert_eq!(index.len(), 2);
        assert_eq!(index.prefix_sum(1), 40);
    }

    #[test]
    fn test_lower_bound_boundaries() {
        let index = HeightIndex::from_heights([5, 5, 5]);
        assert_eq!(index.lower_bound(4), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(15), None);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::from_heights([5, 3]);
        index.clear();
        index.push(10);
        assert_eq!(index.total(), 10);
    }

    proptest! {
        #[test]
        fn prop_prefix_sum_matches_naive(
            heights in prop::collection::vec(0u32..500, 1..64),
            edits in prop::collection::vec((0usize..64, 0u32..500), 0..16),
        ) {
            let mut index = HeightIndex::new(2);
            let mut naive = Vec::new();
            for &height in &heights {
                index.push(height);
                naive.push(height);
            }
            for (at, height) in edits {
                let at = at % naive.len();
                index.set(at, height);
                naive[at] = height;
            }
            for i in 0..naive.len() {
                let expected: u32 = naive[..=i].iter().sum();
                prop_assert_eq!(index.prefix_sum(i), expected);
            }
        }
    }
}
