use std::collections::HashSet;

use crate::core::bit_matrix::BitMatrix;
use crate::core::encoding::GradualEncoding;
use crate::core::pattern::{GradualItem, GradualPattern};

/// A frontier entry: canonical items plus the matrices of both orientations.
#[derive(Debug, Clone)]
struct Relation {
    items: Vec<GradualItem>,
    matrix: BitMatrix,
    inverse_matrix: BitMatrix,
}

/// Exact closure search over every valid item of `encoding`.
///
/// Returns the maximal supported patterns, one per inverse pair, in
/// canonical orientation (items sorted by attribute, first item increasing).
///
/// # Examples
///
/// ```
/// use gradual_rs::algorithms::graank::graank;
/// use gradual_rs::{Dataset, GradualEncoding};
///
/// let rows = vec![
///     vec![1.0, 5.0],
///     vec![2.0, 4.0],
///     vec![3.0, 3.0],
///     vec![4.0, 2.0],
///     vec![5.0, 1.0],
/// ];
/// let ds = Dataset::from_rows(vec![], &rows, &[]).unwrap();
/// let patterns = graank(&GradualEncoding::encode(&ds, 0.5, false));
/// assert_eq!(patterns.len(), 1);
/// assert_eq!(patterns[0].to_string(), r#"["0+","1-"]"#);
/// ```
pub fn graank(encoding: &GradualEncoding) -> Vec<GradualPattern> {
    graank_with(encoding, |_, _| Some(()))
        .into_iter()
        .map(|(pattern, ())| pattern)
        .collect()
}

/// [`graank`] with a per-pattern hook.
///
/// `accept` runs on every candidate that passes the support filter, with the
/// candidate's joint matrix. Returning `None` keeps the candidate in the
/// frontier (its supersets may still qualify) but leaves it out of the
/// result. The temporal driver uses this to attach time lags.
pub fn graank_with<T, F>(encoding: &GradualEncoding, mut accept: F) -> Vec<(GradualPattern, T)>
where
    F: FnMut(&GradualPattern, &BitMatrix) -> Option<T>,
{
    let min_support = encoding.min_support();
    let mut frontier: Vec<Relation> = encoding
        .bins()
        .chunks(2)
        .filter_map(|pair| match pair {
            [inc, dec] => Some(Relation {
                items: vec![inc.item],
                matrix: inc.matrix.clone(),
                inverse_matrix: dec.matrix.clone(),
            }),
            _ => None,
        })
        .collect();

    let mut seen: HashSet<Vec<GradualItem>> = HashSet::new();
    let mut results: Vec<(GradualPattern, T)> = Vec::new();
    let mut level = 1;

    while frontier.len() > 1 {
        let keys: HashSet<&[GradualItem]> = frontier.iter().map(|r| r.items.as_slice()).collect();
        let mut next: Vec<Relation> = Vec::new();

        for (i, left) in frontier.iter().enumerate() {
            for right in &frontier[i + 1..] {
                for flip in [false, true] {
                    let Some(items) = join_items(&left.items, &right.items, flip, level) else {
                        continue;
                    };
                    let pattern = GradualPattern::from_items(items.iter().copied());
                    let key = pattern.canonical_items();
                    if !seen.insert(key.clone()) || !closed_under_subsets(&key, &keys) {
                        continue;
                    }

                    let (right_matrix, right_inverse) = if flip {
                        (&right.inverse_matrix, &right.matrix)
                    } else {
                        (&right.matrix, &right.inverse_matrix)
                    };
                    let count = left.matrix.and_count(right_matrix);
                    let support = encoding.support_of(count);
                    if support <= min_support {
                        continue;
                    }

                    let matrix = left.matrix.and(right_matrix);
                    let inverse_matrix = left.inverse_matrix.and(right_inverse);
                    let pattern = pattern.with_support(support);
                    // The canonical key may flip the pattern relative to `matrix`.
                    let (canon_matrix, canon_inverse) = if key == sorted(&items) {
                        (matrix, inverse_matrix)
                    } else {
                        (inverse_matrix, matrix)
                    };
                    let pattern = pattern.canonical();

                    if let Some(extra) = accept(&pattern, &canon_matrix) {
                        results.retain(|(old, _)| !old.is_subset_of(&pattern));
                        results.push((pattern, extra));
                    }
                    next.push(Relation {
                        items: key,
                        matrix: canon_matrix,
                        inverse_matrix: canon_inverse,
                    });
                }
            }
        }
        drop(keys);

        level += 1;
        tracing::debug!(
            level,
            frontier = next.len(),
            reported = results.len(),
            "closure level done"
        );
        frontier = next;
    }

    tracing::info!(patterns = results.len(), levels = level, "closure search finished");
    results
}

/// Union of `left` and `right` (flipped when asked), if it has exactly
/// `level + 1` items on distinct attributes.
fn join_items(
    left: &[GradualItem],
    right: &[GradualItem],
    flip: bool,
    level: usize,
) -> Option<Vec<GradualItem>> {
    let mut items: Vec<GradualItem> = left.to_vec();
    for &gi in right {
        let gi = if flip { gi.inverse() } else { gi };
        if items.contains(&gi) {
            continue;
        }
        if items.iter().any(|x| x.attribute == gi.attribute) {
            return None;
        }
        items.push(gi);
    }
    (items.len() == level + 1).then_some(items)
}

/// Every pattern obtained by dropping one item is in the frontier.
fn closed_under_subsets(key: &[GradualItem], frontier: &HashSet<&[GradualItem]>) -> bool {
    (0..key.len()).all(|skip| {
        let sub: Vec<GradualItem> = key
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != skip)
            .map(|(_, gi)| *gi)
            .collect();
        let sub = GradualPattern::from_items(sub).canonical_items();
        frontier.contains(sub.as_slice())
    })
}

fn sorted(items: &[GradualItem]) -> Vec<GradualItem> {
    let mut items = items.to_vec();
    items.sort();
    items
}
