use super::prelude::*;

#[inline]
/// Scale value from `[min, max]` to `[0, 1]`.
///
/// Return 0.5 when `min == max`.
pub fn min_max<F: Float>(value: F, min: F, max: F) -> F {
    if min == max {
        return F::HALF;
    }

    (value - min) / (max - min)
}

#[inline]
/// Scale value from `[0, 1]` back to `[min, max]`.
///
/// Return `min` when `min == max`.
pub fn inverse_min_max<F: Float>(value: F, min: F, max: F) -> F {
    if min == max {
        return min;
    }

    value * (max - min) + min
}

#[derive(Debug, Clone, PartialEq)]
/// Per-column min-max scaler.
///
/// Bounds are calculated once from the dataset given to `fit`
/// and then reused to scale any other table with the same
/// amount of columns. Single-column tables are kept as is.
///
/// ```
/// use perceptlib::prelude::*;
///
/// let norm = Normalization::fit(&[
///     vec![0.0, 10.0],
///     vec![4.0, 20.0]
/// ]).unwrap();
///
/// assert_eq!(norm.normalized(), &[vec![0.0, 0.0], vec![1.0, 1.0]]);
/// assert_eq!(norm.normalize(&[vec![2.0, 15.0]]).unwrap(), [vec![0.5, 0.5]]);
/// assert_eq!(norm.denormalize(&[vec![0.25, 0.5]]).unwrap(), [vec![1.0, 15.0]]);
/// ```
pub struct Normalization<F: Float> {
    bounds: Vec<(F, F)>,
    normalized: Vec<Vec<F>>
}

impl<F: Float> Default for Normalization<F> {
    #[inline]
    fn default() -> Self {
        Self {
            bounds: Vec::new(),
            normalized: Vec::new()
        }
    }
}

/// Check that all the rows have the same width and return it.
pub fn table_width<F: Float>(data: &[Vec<F>]) -> anyhow::Result<usize> {
    let width = data.first().map(Vec::len).unwrap_or_default();

    for (i, row) in data.iter().enumerate() {
        anyhow::ensure!(
            row.len() == width,
            "row {i} has {} values while row 0 has {width}",
            row.len()
        );
    }

    Ok(width)
}

impl<F: Float> Normalization<F> {
    /// Calculate bounds of each column of the table
    /// and store its normalized copy.
    pub fn fit(data: &[Vec<F>]) -> anyhow::Result<Self> {
        let width = table_width(data)?;

        let mut bounds = vec![(F::MAX, F::MIN); width];

        for row in data {
            for ((min, max), value) in bounds.iter_mut().zip(row) {
                *min = min.min(*value);
                *max = max.max(*value);
            }
        }

        if width > 1 {
            for (i, (min, max)) in bounds.iter().enumerate() {
                if min == max {
                    log::warn!("Column {i} has constant value {min}, it will be normalized to 0.5");
                }
            }
        }

        let mut normalization = Self {
            bounds,
            normalized: Vec::new()
        };

        normalization.normalized = normalization.scale(data, min_max);

        log::debug!("Fitted normalization for {} rows of {width} columns", data.len());

        Ok(normalization)
    }

    fn scale(&self, data: &[Vec<F>], scaler: fn(F, F, F) -> F) -> Vec<Vec<F>> {
        if self.width() == 1 {
            return data.to_vec();
        }

        data.iter()
            .map(|row| {
                row.iter()
                    .zip(&self.bounds)
                    .map(|(value, (min, max))| scaler(*value, *min, *max))
                    .collect()
            })
            .collect()
    }

    fn check_width(&self, data: &[Vec<F>]) -> anyhow::Result<()> {
        let width = table_width(data)?;

        anyhow::ensure!(
            data.is_empty() || width == self.width(),
            "table has {width} columns but normalization was fitted for {}",
            self.width()
        );

        Ok(())
    }

    /// Normalize another table using stored bounds.
    pub fn normalize(&self, data: &[Vec<F>]) -> anyhow::Result<Vec<Vec<F>>> {
        self.check_width(data)?;

        Ok(self.scale(data, min_max))
    }

    /// Convert normalized table back to original bounds.
    pub fn denormalize(&self, data: &[Vec<F>]) -> anyhow::Result<Vec<Vec<F>>> {
        self.check_width(data)?;

        Ok(self.scale(data, inverse_min_max))
    }

    #[inline]
    /// Normalized copy of the fitted table.
    pub fn normalized(&self) -> &[Vec<F>] {
        &self.normalized
    }

    #[inline]
    /// Fitted table restored from its normalized copy.
    pub fn original(&self) -> Vec<Vec<F>> {
        self.scale(&self.normalized, inverse_min_max)
    }

    #[inline]
    /// `(min, max)` pair of each column.
    pub fn bounds(&self) -> &[(F, F)] {
        &self.bounds
    }

    #[inline]
    /// Amount of columns.
    pub fn width(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    /// Amount of rows in the fitted table.
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn table() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, -3.0, 0.25],
            vec![5.0, 7.0, 0.5],
            vec![2.0, 2.0, 0.125]
        ]
    }

    #[test]
    fn test_fit() -> anyhow::Result<()> {
        let norm = Normalization::fit(&table())?;

        assert_eq!(norm.width(), 3);
        assert_eq!(norm.len(), 3);
        assert_eq!(norm.bounds(), &[(1.0, 5.0), (-3.0, 7.0), (0.125, 0.5)]);

        for row in norm.normalized() {
            assert!(row.iter().all(|value| (0.0..=1.0).contains(value)));
        }

        assert_eq!(norm.normalized()[1], [1.0, 1.0, 1.0]);

        Ok(())
    }

    #[test]
    fn test_round_trip() -> anyhow::Result<()> {
        let table = table();
        let norm = Normalization::fit(&table)?;

        let external = vec![
            vec![3.3, 0.1, 0.4],
            vec![-10.0, 100.0, 0.0]
        ];

        let restored = norm.denormalize(&norm.normalize(&external)?)?;

        for (restored, external) in restored.iter().zip(&external) {
            for (a, b) in restored.iter().zip(external) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            }
        }

        for (restored, original) in norm.original().iter().zip(&table) {
            for (a, b) in restored.iter().zip(original) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-9);
            }
        }

        Ok(())
    }

    #[test]
    /// Constant column normalizes to 0.5 and restores the constant.
    fn test_degenerate_column() -> anyhow::Result<()> {
        let norm = Normalization::fit(&[
            vec![1.0, 4.0],
            vec![3.0, 4.0]
        ])?;

        assert_eq!(norm.normalized()[0][1], 0.5);
        assert_eq!(norm.normalized()[1][1], 0.5);

        assert_eq!(norm.denormalize(&[vec![0.5, 0.5], vec![0.0, 0.9]])?, [vec![2.0, 4.0], vec![1.0, 4.0]]);

        Ok(())
    }

    #[test]
    fn test_single_column() -> anyhow::Result<()> {
        let data = vec![vec![10.0], vec![-2.0], vec![3.0]];

        let norm = Normalization::fit(&data)?;

        assert_eq!(norm.normalized(), data.as_slice());
        assert_eq!(norm.normalize(&[vec![100.0]])?, [vec![100.0]]);
        assert_eq!(norm.denormalize(&[vec![0.5]])?, [vec![0.5]]);

        Ok(())
    }

    #[test]
    fn test_invalid_tables() -> anyhow::Result<()> {
        assert!(Normalization::fit(&[vec![1.0, 2.0], vec![3.0]]).is_err());

        let norm = Normalization::fit(&table())?;

        assert!(norm.normalize(&[vec![1.0, 2.0]]).is_err());
        assert!(norm.denormalize(&[vec![1.0, 2.0, 3.0, 4.0]]).is_err());

        assert!(norm.normalize(&[]).unwrap().is_empty());

        Ok(())
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(3.0, 1.0, 5.0), 0.5);
        assert_eq!(min_max(7.0, 7.0, 7.0), 0.5);
        assert_eq!(inverse_min_max(0.5, 1.0, 5.0), 3.0);
        assert_eq!(inverse_min_max(0.1, 7.0, 7.0), 7.0);
    }
}
