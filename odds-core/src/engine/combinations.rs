/// Iterates over every `K`-element subset of `0..n` as sorted index arrays,
/// in lexicographic order.
///
/// ```
/// # use odds_core::prelude::Combinations;
/// let subsets: Vec<[usize; 2]> = Combinations::new(3).collect();
/// assert_eq!(subsets, vec![[0, 1], [0, 2], [1, 2]]);
/// ```
#[derive(Clone, Debug)]
pub struct Combinations<const K: usize> {
    n: usize,
    indices: [usize; K],
    done: bool,
}

impl<const K: usize> Combinations<K> {
    pub fn new(n: usize) -> Self {
        let mut indices = [0; K];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = i;
        }
        Self {
            n,
            indices,
            done: K > n,
        }
    }

    /// Bump the rightmost index that still has room, then reset everything
    /// to its right to the smallest increasing run.
    fn advance(&mut self) {
        let Some(pivot) = (0..K).rev().find(|&i| self.indices[i] < self.n - K + i) else {
            self.done = true;
            return;
        };

        self.indices[pivot] += 1;
        for i in pivot + 1..K {
            self.indices[i] = self.indices[i - 1] + 1;
        }
    }
}

impl<const K: usize> Iterator for Combinations<K> {
    type Item = [usize; K];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices;
        self.advance();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn binomial(n: usize, k: usize) -> usize {
        if k > n {
            return 0;
        }
        (0..k.min(n - k)).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn counts_match_binomial_test() {
        for n in 0..=8 {
            assert_eq!(Combinations::<5>::new(n).count(), binomial(n, 5));
        }
        assert_eq!(Combinations::<5>::new(7).count(), 21);
    }

    #[test]
    fn subsets_are_sorted_and_unique_test() {
        let subsets: Vec<_> = Combinations::<3>::new(6).collect();
        let unique: HashSet<_> = subsets.iter().copied().collect();
        assert_eq!(unique.len(), subsets.len());
        for subset in &subsets {
            assert!(subset.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(subset.iter().all(|&i| i < 6));
        }
        assert!(subsets.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn exact_set_test() {
        let subsets: Vec<_> = Combinations::<5>::new(5).collect();
        assert_eq!(subsets, vec![[0, 1, 2, 3, 4]]);
    }

    #[test]
    fn too_few_elements_test() {
        assert_eq!(Combinations::<5>::new(4).next(), None);
    }

    #[test]
    fn empty_subset_test() {
        let subsets: Vec<[usize; 0]> = Combinations::new(3).collect();
        assert_eq!(subsets, vec![[]]);
    }
}
