use crate::error::{GradualError, GradualResult};

/// An immutable numeric table, stored column-major.
///
/// Time columns hold epoch seconds. They are never mined; the temporal
/// transform reads them to build time differences.
#[derive(Debug, Clone)]
pub struct Dataset {
    titles: Vec<String>,
    columns: Vec<Vec<f64>>,
    time_cols: Vec<usize>,
    attr_cols: Vec<usize>,
}

/// Time elapsed between record `index` and its step-shifted partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDiff {
    pub seconds: f64,
    /// Record position in the transformed table.
    pub index: usize,
}

/// One step of the temporal transform.
#[derive(Debug, Clone)]
pub struct TemporalStep {
    pub step: usize,
    /// Transformed table with `n - step` records.
    pub data: Dataset,
    /// One entry per transformed record, aligned by `index`.
    pub time_diffs: Vec<TimeDiff>,
}

impl Dataset {
    /// Build from row-major records.
    ///
    /// `titles` may be empty, in which case columns are titled by index.
    pub fn from_rows(
        titles: Vec<String>,
        rows: &[Vec<f64>],
        time_cols: &[usize],
    ) -> GradualResult<Self> {
        let width = rows.first().map_or(titles.len(), |r| r.len());
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GradualError::RaggedRecord {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col, &value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }
        Self::from_columns(titles, columns, time_cols)
    }

    /// Build from column-major values.
    pub fn from_columns(
        titles: Vec<String>,
        columns: Vec<Vec<f64>>,
        time_cols: &[usize],
    ) -> GradualResult<Self> {
        let n_rows = columns.first().map_or(0, |c| c.len());
        if n_rows < 2 {
            return Err(GradualError::TooFewRecords { rows: n_rows });
        }
        if let Some((idx, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != n_rows) {
            return Err(GradualError::ColumnLengthMismatch {
                column: idx,
                expected: n_rows,
                found: col.len(),
            });
        }
        let titles = if titles.is_empty() {
            (0..columns.len()).map(|i| i.to_string()).collect()
        } else if titles.len() != columns.len() {
            return Err(GradualError::TitleMismatch {
                titles: titles.len(),
                columns: columns.len(),
            });
        } else {
            titles
        };

        let mut time_cols = time_cols.to_vec();
        time_cols.sort_unstable();
        time_cols.dedup();
        if let Some(&bad) = time_cols.iter().find(|&&c| c >= columns.len()) {
            return Err(GradualError::ColumnOutOfRange {
                column: bad,
                columns: columns.len(),
            });
        }
        let attr_cols = (0..columns.len())
            .filter(|c| time_cols.binary_search(c).is_err())
            .collect();

        Ok(Self {
            titles,
            columns,
            time_cols,
            attr_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.columns[0].len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn column(&self, col: usize) -> &[f64] {
        &self.columns[col]
    }

    /// Minable (non-time) column indices.
    pub fn attribute_columns(&self) -> &[usize] {
        &self.attr_cols
    }

    pub fn time_columns(&self) -> &[usize] {
        &self.time_cols
    }

    /// Largest row shift that still keeps `min_representativity` of the records.
    pub fn max_step(&self, min_representativity: f64) -> usize {
        let n = self.n_rows();
        let kept = (min_representativity * n as f64).floor() as usize;
        n.saturating_sub(kept)
    }

    /// Shift the table by `step` rows relative to `reference_col`.
    ///
    /// The reference column keeps rows `[0, n - step)`; every other column
    /// keeps rows `[step, n)`. Time differences come from the first time
    /// column: `t[i + step] - t[i]` for each transformed record `i`.
    pub fn transform(&self, step: usize, reference_col: usize) -> GradualResult<TemporalStep> {
        let time_col = *self
            .time_cols
            .first()
            .ok_or(GradualError::MissingTimeColumn)?;
        self.check_reference(reference_col)?;

        let n = self.n_rows();
        let kept = n.saturating_sub(step);
        if kept < 2 {
            return Err(GradualError::TooFewRecords { rows: kept });
        }

        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, values)| {
                if c == reference_col {
                    values[..kept].to_vec()
                } else {
                    values[step..].to_vec()
                }
            })
            .collect();

        let times = &self.columns[time_col];
        let time_diffs = (0..kept)
            .map(|i| TimeDiff {
                seconds: times[i + step] - times[i],
                index: i,
            })
            .collect();

        let data = Self {
            titles: self.titles.clone(),
            columns,
            time_cols: self.time_cols.clone(),
            attr_cols: self.attr_cols.clone(),
        };
        Ok(TemporalStep {
            step,
            data,
            time_diffs,
        })
    }

    pub(crate) fn check_reference(&self, reference_col: usize) -> GradualResult<()> {
        if reference_col >= self.n_cols() {
            return Err(GradualError::ColumnOutOfRange {
                column: reference_col,
                columns: self.n_cols(),
            });
        }
        if self.time_cols.contains(&reference_col) {
            return Err(GradualError::ReferenceIsTimeColumn(reference_col));
        }
        Ok(())
    }
}
