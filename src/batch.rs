use ndarray::ArrayView2;

use crate::error::{FactorError, Result};

/// A transient batch of observed interactions: parallel `users`, `items`,
/// and target ratings of equal length.
///
/// Borrowed, not owned: the model never holds training data. Construction
/// validates the parallel-slice invariant once so downstream calls don't
/// have to.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    users: &'a [usize],
    items: &'a [usize],
    targets: &'a [f32],
}

impl<'a> Batch<'a> {
    /// Creates a batch over parallel slices.
    ///
    /// # Errors
    /// - `ShapeMismatch` when the slices disagree in length.
    /// - `InvalidInput` when the batch is empty.
    pub fn new(users: &'a [usize], items: &'a [usize], targets: &'a [f32]) -> Result<Self> {
        if items.len() != users.len() {
            return Err(FactorError::ShapeMismatch {
                what: "items",
                got: items.len(),
                expected: users.len(),
            });
        }
        if targets.len() != users.len() {
            return Err(FactorError::ShapeMismatch {
                what: "targets",
                got: targets.len(),
                expected: users.len(),
            });
        }
        if users.is_empty() {
            return Err(FactorError::InvalidInput("batch must be non-empty"));
        }
        Ok(Self {
            users,
            items,
            targets,
        })
    }

    /// Creates a batch whose targets arrive as a `(B, 1)` column, the shape
    /// rating frames commonly carry; the column is flattened to match the
    /// 1-D prediction shape.
    ///
    /// # Errors
    /// - `ShapeMismatch` when the column has more than one column or the
    ///   wrong number of rows.
    /// - `InvalidInput` when the column is not contiguous in memory.
    pub fn from_column(
        users: &'a [usize],
        items: &'a [usize],
        targets: ArrayView2<'a, f32>,
    ) -> Result<Self> {
        if targets.ncols() != 1 {
            return Err(FactorError::ShapeMismatch {
                what: "target columns",
                got: targets.ncols(),
                expected: 1,
            });
        }
        let flat = targets
            .to_slice()
            .ok_or(FactorError::InvalidInput("target column must be contiguous"))?;
        Self::new(users, items, flat)
    }

    #[inline]
    pub fn users(&self) -> &'a [usize] {
        self.users
    }

    #[inline]
    pub fn items(&self) -> &'a [usize] {
        self.items
    }

    #[inline]
    pub fn targets(&self) -> &'a [f32] {
        self.targets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
