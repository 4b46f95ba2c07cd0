/// Square boolean matrix with bit-packed rows.
///
/// Row `i` occupies `words_per_row` consecutive `u64` words; bit `j % 64` of
/// word `j / 64` holds cell `(i, j)`. Padding bits past column `n` are always
/// zero, so population counts can run over whole words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    n: usize,
    words_per_row: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    /// All-false `n x n` matrix.
    pub fn new(n: usize) -> Self {
        let words_per_row = n.div_ceil(64);
        Self {
            n,
            words_per_row,
            words: vec![0; n * words_per_row],
        }
    }

    /// Build a matrix by evaluating `f(i, j)` for every cell.
    pub fn from_fn(n: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(n);
        for i in 0..n {
            let row = &mut matrix.words[i * matrix.words_per_row..(i + 1) * matrix.words_per_row];
            for j in 0..n {
                if f(i, j) {
                    row[j / 64] |= 1u64 << (j % 64);
                }
            }
        }
        matrix
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        debug_assert!(i < self.n && j < self.n);
        (self.words[i * self.words_per_row + j / 64] >> (j % 64)) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        debug_assert!(i < self.n && j < self.n);
        let word = &mut self.words[i * self.words_per_row + j / 64];
        if value {
            *word |= 1u64 << (j % 64);
        } else {
            *word &= !(1u64 << (j % 64));
        }
    }

    /// Elementwise AND.
    pub fn and(&self, other: &BitMatrix) -> BitMatrix {
        let mut out = self.clone();
        out.and_assign(other);
        out
    }

    pub fn and_assign(&mut self, other: &BitMatrix) {
        assert_eq!(self.n, other.n, "Matrix sizes differ");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
    }

    /// Elementwise OR.
    pub fn or(&self, other: &BitMatrix) -> BitMatrix {
        assert_eq!(self.n, other.n, "Matrix sizes differ");
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a | b)
            .collect();
        BitMatrix {
            n: self.n,
            words_per_row: self.words_per_row,
            words,
        }
    }

    pub fn transpose(&self) -> BitMatrix {
        let mut out = BitMatrix::new(self.n);
        for i in 0..self.n {
            let row = &self.words[i * self.words_per_row..(i + 1) * self.words_per_row];
            for (w, &word) in row.iter().enumerate() {
                let mut bits = word;
                while bits != 0 {
                    let j = w * 64 + bits.trailing_zeros() as usize;
                    out.words[j * out.words_per_row + i / 64] |= 1u64 << (i % 64);
                    bits &= bits - 1;
                }
            }
        }
        out
    }

    /// Number of true cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of true cells of `self AND other`, without materializing it.
    pub fn and_count(&self, other: &BitMatrix) -> usize {
        assert_eq!(self.n, other.n, "Matrix sizes differ");
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Sorted indices that appear as a row or a column of at least one true cell.
    pub fn participating_indices(&self) -> Vec<usize> {
        let mut columns = vec![0u64; self.words_per_row];
        let mut in_row = vec![false; self.n];
        for (i, flag) in in_row.iter_mut().enumerate() {
            let row = &self.words[i * self.words_per_row..(i + 1) * self.words_per_row];
            for (acc, &word) in columns.iter_mut().zip(row) {
                *acc |= word;
                *flag |= word != 0;
            }
        }
        (0..self.n)
            .filter(|&i| in_row[i] || (columns[i / 64] >> (i % 64)) & 1 == 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_triangle(n: usize) -> BitMatrix {
        BitMatrix::from_fn(n, |i, j| i < j)
    }

    #[test]
    fn test_set_get_across_word_boundary() {
        let mut m = BitMatrix::new(130);
        m.set(0, 63, true);
        m.set(0, 64, true);
        m.set(129, 129, true);
        assert!(m.get(0, 63));
        assert!(m.get(0, 64));
        assert!(!m.get(0, 65));
        assert!(m.get(129, 129));
        assert_eq!(m.count_ones(), 3);
        m.set(0, 64, false);
        assert_eq!(m.count_ones(), 2);
    }

    #[test]
    fn test_transpose_moves_cells() {
        for n in [1, 5, 64, 70] {
            let m = upper_triangle(n);
            let t = m.transpose();
            for i in 0..n {
                for j in 0..n {
                    assert_eq!(m.get(i, j), t.get(j, i), "n={n} cell ({i},{j})");
                }
            }
            assert_eq!(t.transpose(), m);
        }
    }

    #[test]
    fn test_and_or_counts() {
        let n = 70;
        let upper = upper_triangle(n);
        let lower = upper.transpose();
        assert_eq!(upper.count_ones(), n * (n - 1) / 2);
        assert_eq!(upper.and(&lower).count_ones(), 0);
        assert_eq!(upper.and_count(&lower), 0);
        assert_eq!(upper.or(&lower).count_ones(), n * (n - 1));
        assert_eq!(upper.and_count(&upper), upper.count_ones());
    }

    #[test]
    fn test_participating_indices() {
        let mut m = BitMatrix::new(6);
        assert!(!m.any());
        assert!(m.participating_indices().is_empty());
        m.set(1, 4, true);
        m.set(2, 1, true);
        assert!(m.any());
        assert_eq!(m.participating_indices(), vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_matrix() {
        let m = BitMatrix::new(0);
        assert_eq!(m.size(), 0);
        assert_eq!(m.count_ones(), 0);
        assert_eq!(m.transpose(), m);
    }
}
