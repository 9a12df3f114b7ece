use derive_builder::Builder;
use num_traits::Zero;

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq, Default, Builder)]
#[builder(default, build_fn(name = "pre_build", validate = "Self::validate"))]
pub struct Mat<T: Default> {
    #[builder(setter(custom))]
    rows: usize,
    #[builder(setter(custom))]
    cols: usize,

    values: Vec<T>,
}

impl<T> MatBuilder<T>
where
    T: Default + Clone,
{
    pub fn build(&self) -> Result<Mat<T>, MatBuilderError>
    where
        T: Zero,
    {
        let mut mat = self.pre_build()?;
        if self.values.is_none() {
            mat.values = vec![T::zero(); mat.rows * mat.cols];
        }
        Ok(mat)
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(values) = &self.values {
            let (rows, cols) = (self.rows.unwrap_or(0), self.cols.unwrap_or(0));
            if values.len() != rows * cols {
                return Err(format!(
                    "values length ({}) must be rows * cols ({} * {} = {})",
                    values.len(),
                    rows,
                    cols,
                    rows * cols
                ));
            }
        }
        Ok(())
    }
}

impl<T> Mat<T>
where
    T: Default + Copy,
{
    pub fn new(rows: usize, cols: usize) -> MatBuilder<T> {
        MatBuilder {
            rows: Some(rows),
            cols: Some(cols),
            ..Default::default()
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self
    where
        T: Zero,
    {
        Self {
            rows,
            cols,
            values: vec![T::zero(); rows * cols],
        }
    }

    /// Builds a matrix with element `(i, j)` set to `f(i, j)`.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(f(i, j));
            }
        }
        Self { rows, cols, values }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Vec<T> {
        &self.values
    }

    #[inline]
    fn ix(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows);
        assert!(col < self.cols);
        self.values[self.ix(row, col)]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        assert!(row < self.rows);
        assert!(col < self.cols);
        let i = self.ix(row, col);
        &mut self.values[i]
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows);
        &self.values[self.ix(row, 0)..self.ix(row, 0) + self.cols]
    }

    pub fn map<U: Default + Copy>(&self, f: impl Fn(T) -> U) -> Mat<U> {
        Mat {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut values = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            values.extend(self.row(r).iter());
        }
        Self {
            rows: rows.len(),
            cols: self.cols,
            values,
        }
    }

    pub fn select_cols(&self, cols: &[usize]) -> Self {
        let mut values = Vec::with_capacity(self.rows * cols.len());
        for r in 0..self.rows {
            for &c in cols {
                values.push(self.get(r, c));
            }
        }
        Self {
            rows: self.rows,
            cols: cols.len(),
            values,
        }
    }

    /// Indexes of the rows holding at least one nonzero element.
    pub fn nonzero_rows(&self) -> Vec<usize>
    where
        T: Zero,
    {
        (0..self.rows)
            .filter(|&r| self.row(r).iter().any(|v| !v.is_zero()))
            .collect()
    }

    /// Drops every all-zero row together with the column of the same
    /// index. Only meaningful for square matrices.
    pub fn reduced(&self) -> Self
    where
        T: Zero,
    {
        assert_eq!(self.rows, self.cols);
        let keep = self.nonzero_rows();
        self.select_rows(&keep).select_cols(&keep)
    }

    pub fn is_symmetric(&self) -> bool
    where
        T: PartialEq,
    {
        self.rows == self.cols
            && (0..self.rows).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Rows of the lower triangle, including the diagonal.
    pub fn lower_triangle(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |r| &self.row(r)[..=r.min(self.cols.saturating_sub(1))])
    }

    pub fn row_sums(&self) -> Vec<T>
    where
        T: Zero,
    {
        (0..self.rows)
            .map(|r| self.row(r).iter().fold(T::zero(), |acc, &v| acc + v))
            .collect()
    }
}
