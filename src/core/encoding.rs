use crate::core::bit_matrix::BitMatrix;
use crate::core::dataset::Dataset;
use crate::core::pattern::{GradualItem, GradualPattern};
use crate::core::sampler::ValidationMode;

/// Number of unordered record pairs, `n * (n - 1) / 2`.
#[inline]
pub fn pair_count(n: usize) -> f64 {
    n as f64 * (n as f64 - 1.0) / 2.0
}

/// Dominance matrices of one attribute.
#[derive(Debug, Clone)]
pub struct EncodedAttribute {
    /// `pos[i][j]` is true iff record `i` is above record `j`.
    pub pos: BitMatrix,
    /// Transpose of `pos`.
    pub neg: BitMatrix,
    /// Population count of `pos` over the number of record pairs.
    pub support: f64,
}

/// Encode one numeric column into its two dominance matrices.
///
/// With `equal_mode`, ties set both directions (the diagonal stays false).
/// Fewer than 2 values give a support of 0.
pub fn encode_attribute(values: &[f64], equal_mode: bool) -> EncodedAttribute {
    let n = values.len();
    let pos = BitMatrix::from_fn(n, |i, j| {
        values[i] > values[j] || (equal_mode && i != j && values[i] == values[j])
    });
    let neg = pos.transpose();
    let pairs = pair_count(n);
    let support = if pairs > 0.0 {
        pos.count_ones() as f64 / pairs
    } else {
        0.0
    };
    EncodedAttribute { pos, neg, support }
}

/// A valid single-item relation: the item, its matrix and its support.
#[derive(Debug, Clone)]
pub struct ItemBin {
    pub item: GradualItem,
    pub matrix: BitMatrix,
    pub support: f64,
}

/// All valid item bins of a dataset at a given support threshold.
///
/// Attributes below the threshold are discarded at encoding time and never
/// offered to any search strategy.
#[derive(Debug, Clone)]
pub struct GradualEncoding {
    n_rows: usize,
    min_support: f64,
    attributes: Vec<usize>,
    bins: Vec<ItemBin>,
    invalid: Vec<GradualItem>,
}

impl GradualEncoding {
    /// Encode every attribute column of `dataset`.
    pub fn encode(dataset: &Dataset, min_support: f64, equal_mode: bool) -> Self {
        let attributes = dataset.attribute_columns().to_vec();

        #[cfg(feature = "parallel")]
        let encoded: Vec<(usize, EncodedAttribute)> = {
            use rayon::prelude::*;
            attributes
                .par_iter()
                .map(|&col| (col, encode_attribute(dataset.column(col), equal_mode)))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let encoded: Vec<(usize, EncodedAttribute)> = attributes
            .iter()
            .map(|&col| (col, encode_attribute(dataset.column(col), equal_mode)))
            .collect();

        let mut bins = Vec::with_capacity(encoded.len() * 2);
        let mut invalid = Vec::new();
        for (col, attr) in encoded {
            let inc = GradualItem::increasing(col);
            let dec = GradualItem::decreasing(col);
            if attr.support < min_support {
                invalid.push(inc);
                invalid.push(dec);
                continue;
            }
            bins.push(ItemBin {
                item: inc,
                matrix: attr.pos,
                support: attr.support,
            });
            bins.push(ItemBin {
                item: dec,
                matrix: attr.neg,
                support: attr.support,
            });
        }

        tracing::debug!(
            rows = dataset.n_rows(),
            valid = bins.len(),
            invalid = invalid.len(),
            "encoded gradual items"
        );

        Self {
            n_rows: dataset.n_rows(),
            min_support,
            attributes,
            bins,
            invalid,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Every minable column, valid or not.
    pub fn attributes(&self) -> &[usize] {
        &self.attributes
    }

    /// Valid item bins, two per surviving attribute (`+` then `-`).
    pub fn bins(&self) -> &[ItemBin] {
        &self.bins
    }

    /// Items dropped by the support pre-filter.
    pub fn invalid_items(&self) -> &[GradualItem] {
        &self.invalid
    }

    /// True when no attribute survived the pre-filter.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bin(&self, item: GradualItem) -> Option<&ItemBin> {
        self.bins.iter().find(|b| b.item == item)
    }

    /// Support for a population count of `count` true cells.
    pub fn support_of(&self, count: usize) -> f64 {
        let pairs = pair_count(self.n_rows);
        if pairs > 0.0 {
            count as f64 / pairs
        } else {
            0.0
        }
    }

    /// AND of the matrices of `items`. `None` if empty or any item is invalid.
    pub fn joint_matrix(&self, items: &[GradualItem]) -> Option<BitMatrix> {
        let (first, rest) = items.split_first()?;
        let mut matrix = self.bin(*first)?.matrix.clone();
        for item in rest {
            matrix.and_assign(&self.bin(*item)?.matrix);
        }
        Some(matrix)
    }

    /// Population count of the joint matrix, 0 when it does not exist.
    pub fn joint_count(&self, items: &[GradualItem]) -> usize {
        self.joint_matrix(items).map_or(0, |m| m.count_ones())
    }

    pub fn joint_support(&self, items: &[GradualItem]) -> f64 {
        self.support_of(self.joint_count(items))
    }

    /// Validate a sampled candidate against the encoded matrices.
    ///
    /// Items are ANDed in non-decreasing order of their own support. In
    /// [`ValidationMode::Relax`] an item that would drop the running support
    /// below the threshold is left out; in [`ValidationMode::Abort`] the whole
    /// candidate fails. A result with fewer than two items is returned as the
    /// original candidate with support 0.
    pub fn validate(&self, candidate: &GradualPattern, mode: ValidationMode) -> GradualPattern {
        let rejected = || candidate.clone().with_support(0.0);

        let mut bins: Vec<&ItemBin> = Vec::with_capacity(candidate.len());
        for item in candidate.items() {
            match self.bin(*item) {
                Some(bin) => bins.push(bin),
                None if mode == ValidationMode::Abort => return rejected(),
                None => {}
            }
        }
        bins.sort_by(|a, b| a.support.total_cmp(&b.support));

        let mut kept = GradualPattern::new();
        let mut running: Option<BitMatrix> = None;
        for bin in bins {
            match running.as_mut() {
                None => {
                    running = Some(bin.matrix.clone());
                    kept.add_item(bin.item);
                }
                Some(matrix) => {
                    let support = self.support_of(matrix.and_count(&bin.matrix));
                    if support >= self.min_support {
                        matrix.and_assign(&bin.matrix);
                        kept.add_item(bin.item);
                        kept.set_support(support);
                    } else if mode == ValidationMode::Abort {
                        return rejected();
                    }
                }
            }
        }

        if kept.len() <= 1 {
            rejected()
        } else {
            kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[Vec<f64>]) -> Dataset {
        Dataset::from_rows(vec![], rows, &[]).unwrap()
    }

    #[test]
    fn test_matrix_duality() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let enc = encode_attribute(&values, false);
        assert_eq!(enc.pos, enc.neg.transpose());
        let both = enc.pos.and(&enc.neg);
        for i in 0..values.len() {
            for j in 0..values.len() {
                if i != j {
                    assert!(!both.get(i, j), "pos AND neg set at ({i},{j})");
                }
            }
        }
    }

    #[test]
    fn test_strict_support_counts_ties_as_missing() {
        // One tied pair out of 6
        let enc = encode_attribute(&[1.0, 2.0, 2.0, 3.0], false);
        assert!((enc.support - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_equal_mode_sets_both_directions() {
        let enc = encode_attribute(&[1.0, 2.0, 2.0], true);
        assert!(enc.pos.get(1, 2) && enc.pos.get(2, 1));
        assert!(enc.neg.get(1, 2) && enc.neg.get(2, 1));
        assert!(!enc.pos.get(1, 1));
        assert_eq!(enc.pos, enc.neg.transpose());
    }

    #[test]
    fn test_constant_column_is_invalid() {
        let ds = dataset(&[vec![1.0, 7.0], vec![2.0, 7.0], vec![3.0, 7.0]]);
        let enc = GradualEncoding::encode(&ds, 0.5, false);
        assert_eq!(enc.bins().len(), 2);
        assert_eq!(
            enc.invalid_items(),
            &[GradualItem::increasing(1), GradualItem::decreasing(1)]
        );
        assert!(enc.bin(GradualItem::increasing(1)).is_none());
    }

    #[test]
    fn test_joint_support_of_perfect_anticorrelation() {
        let ds = dataset(&[
            vec![1.0, 5.0],
            vec![2.0, 4.0],
            vec![3.0, 3.0],
            vec![4.0, 2.0],
            vec![5.0, 1.0],
        ]);
        let enc = GradualEncoding::encode(&ds, 0.5, false);
        let items = [GradualItem::increasing(0), GradualItem::decreasing(1)];
        assert!((enc.joint_support(&items) - 1.0).abs() < 1e-12);
        let items = [GradualItem::increasing(0), GradualItem::increasing(1)];
        assert_eq!(enc.joint_support(&items), 0.0);
    }

    #[test]
    fn test_validate_relaxes_offending_item() {
        let ds = dataset(&[
            vec![1.0, 5.0, 2.0],
            vec![2.0, 4.0, 5.0],
            vec![3.0, 3.0, 1.0],
            vec![4.0, 2.0, 4.0],
            vec![5.0, 1.0, 3.0],
        ]);
        let enc = GradualEncoding::encode(&ds, 0.8, false);
        let candidate = GradualPattern::from_items([
            GradualItem::increasing(0),
            GradualItem::increasing(2),
            GradualItem::decreasing(1),
        ]);
        let relaxed = enc.validate(&candidate, ValidationMode::Relax);
        assert_eq!(relaxed.len(), 2);
        assert!(!relaxed.contains_attribute(2));
        assert!((relaxed.support() - 1.0).abs() < 1e-12);

        let aborted = enc.validate(&candidate, ValidationMode::Abort);
        assert_eq!(aborted.len(), 3);
        assert_eq!(aborted.support(), 0.0);
    }

    #[test]
    fn test_validate_single_survivor_is_rejected() {
        let ds = dataset(&[vec![1.0, 1.0], vec![2.0, 3.0], vec![3.0, 2.0], vec![4.0, 4.0]]);
        let enc = GradualEncoding::encode(&ds, 0.9, false);
        let candidate =
            GradualPattern::from_items([GradualItem::increasing(0), GradualItem::decreasing(1)]);
        let out = enc.validate(&candidate, ValidationMode::Relax);
        assert_eq!(out.support(), 0.0);
        assert_eq!(out.len(), 2);
    }
}
