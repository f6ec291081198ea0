/// Lexicographic k-combinations of `0..n`.
///
/// `IndexCombinations::new(4, 2)` yields [0,1], [0,2], [0,3], [1,2], [1,3], [2,3].
/// A size of zero or larger than `n` yields nothing.
pub struct IndexCombinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
    done: bool,
}

impl IndexCombinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            first: true,
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for IndexCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }

        let k = self.indices.len();
        // Rightmost index that can still move right
        let pivot = (0..k).rev().find(|&i| self.indices[i] != i + self.n - k);
        match pivot {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                Some(self.indices.clone())
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Number of non-empty subsets of `m` candidates, `None` if it overflows
pub fn non_empty_subset_count(m: usize) -> Option<u64> {
    let m = u32::try_from(m).ok()?;
    1u64.checked_shl(m).map(|total| total - 1)
}
