//! Bivariate analysis

pub mod correlation;

use crate::stats::float::Float;

/// Bivariate `(X, Y)` data
///
/// Invariants:
///
/// - Both columns have the same length
/// - No `NaN`s in the data
pub struct Data<'a, X, Y>(&'a [X], &'a [Y]);

impl<'a, X, Y> Copy for Data<'a, X, Y> {}

#[allow(clippy::expl_impl_clone_on_copy)]
impl<'a, X, Y> Clone for Data<'a, X, Y> {
    fn clone(&self) -> Data<'a, X, Y> {
        *self
    }
}

impl<'a, X, Y> Data<'a, X, Y> {
    /// Returns the length of the data set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the data set has no pairs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the data set
    pub fn iter(&self) -> Pairs<'a, X, Y> {
        Pairs {
            data: *self,
            state: 0,
        }
    }
}

impl<'a, X, Y> Data<'a, X, Y>
where
    X: Float,
    Y: Float,
{
    /// Creates a new data set from two existing slices
    ///
    /// Returns `None` if the lengths differ or if there is any `NaN`
    pub fn new(xs: &'a [X], ys: &'a [Y]) -> Option<Data<'a, X, Y>> {
        if xs.len() == ys.len()
            && xs.iter().all(|x| !x.is_nan())
            && ys.iter().all(|y| !y.is_nan())
        {
            Some(Data(xs, ys))
        } else {
            None
        }
    }

    /// Returns a view into the `X` data
    pub fn x(&self) -> &'a [X] {
        self.0
    }

    /// Returns a view into the `Y` data
    pub fn y(&self) -> &'a [Y] {
        self.1
    }

    /// Swaps the role of the two columns
    pub fn transpose(&self) -> Data<'a, Y, X> {
        Data(self.1, self.0)
    }
}

/// Iterator over `Data`
pub struct Pairs<'a, X: 'a, Y: 'a> {
    data: Data<'a, X, Y>,
    state: usize,
}

impl<'a, X, Y> Iterator for Pairs<'a, X, Y> {
    type Item = (&'a X, &'a Y);

    fn next(&mut self) -> Option<(&'a X, &'a Y)> {
        if self.state < self.data.len() {
            let i = self.state;
            self.state += 1;

            // This is safe because i will always be < self.data.{0,1}.len()
            debug_assert!(i < self.data.0.len());
            debug_assert!(i < self.data.1.len());
            unsafe { Some((self.data.0.get_unchecked(i), self.data.1.get_unchecked(i))) }
        } else {
            None
        }
    }
}
