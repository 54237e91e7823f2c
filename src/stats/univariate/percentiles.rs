use crate::stats::float::Float;
use cast::usize;

/// A "view" into the percentiles of a sample
///
/// Percentiles are computed with linear interpolation between the two closest ranks, i.e. the
/// `p`-th percentile of `n` sorted points sits at rank `p / 100 * (n - 1)`.
pub struct Percentiles<A>(Box<[A]>)
where
    A: Float;

impl<A> Percentiles<A>
where
    A: Float,
    usize: cast::From<A, Output = Result<usize, cast::Error>>,
{
    pub(crate) fn from_sorted(sorted: Box<[A]>) -> Percentiles<A> {
        debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

        Percentiles(sorted)
    }

    /// Returns the percentile at `p`%
    ///
    /// Safety:
    ///
    /// - Make sure that `p` is in the range `[0, 100]`
    /// - Make sure that the view is not empty
    unsafe fn at_unchecked(&self, p: A) -> A {
        let _100 = A::cast(100);
        debug_assert!(p >= A::cast(0) && p <= _100);
        debug_assert!(!self.0.is_empty());
        let len = self.0.len() - 1;

        if p == _100 || len == 0 {
            self.0[len]
        } else {
            let rank = (p / _100) * A::cast(len);
            let integer = rank.floor();
            let fraction = rank - integer;
            let n = usize(integer).unwrap();
            let &floor = self.0.get_unchecked(n);
            let &ceiling = self.0.get_unchecked(n + 1);

            floor + (ceiling - floor) * fraction
        }
    }

    /// Returns the percentile at `p`%, or `NaN` if the sample is empty
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the closed `[0, 100]` range
    pub fn at(&self, p: A) -> A {
        let _0 = A::cast(0);
        let _100 = A::cast(100);

        assert!(p >= _0 && p <= _100);

        if self.0.is_empty() {
            return A::nan();
        }

        unsafe { self.at_unchecked(p) }
    }

    /// Returns the 25th, 50th and 75th percentiles
    pub fn quartiles(&self) -> (A, A, A) {
        (
            self.at(A::cast(25)),
            self.at(A::cast(50)),
            self.at(A::cast(75)),
        )
    }

    /// Returns the smallest and biggest elements
    pub fn extremes(&self) -> (A, A) {
        match (self.0.first(), self.0.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => (A::nan(), A::nan()),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use crate::stats::univariate::Sample;

    #[test]
    fn linear_interpolation_quartiles() {
        let v = [10.0_f64, 12.0, 14.0, 15.0, 18.0, 20.0, 21.0, 100.0];
        let sample = Sample::new(&v).unwrap();
        let (q1, median, q3) = sample.percentiles().quartiles();

        assert_relative_eq!(q1, 13.5);
        assert_relative_eq!(median, 16.5);
        assert_relative_eq!(q3, 20.25);
    }

    #[test]
    fn order_does_not_matter() {
        let sorted = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let shuffled = [4.0_f64, 1.0, 5.0, 3.0, 2.0];

        let a = Sample::new(&sorted).unwrap().percentiles();
        let b = Sample::new(&shuffled).unwrap().percentiles();

        assert_eq!(a.quartiles(), b.quartiles());
        assert_eq!(a.quartiles(), (2.0, 3.0, 4.0));
    }

    #[test]
    fn single_point() {
        let v = [7.5_f64];
        let p = Sample::new(&v).unwrap().percentiles();

        assert_eq!(p.quartiles(), (7.5, 7.5, 7.5));
        assert_eq!(p.at(0.0), 7.5);
        assert_eq!(p.at(100.0), 7.5);
    }

    #[test]
    fn extremes() {
        let v = [3.0_f64, -1.0, 8.0];
        let p = Sample::new(&v).unwrap().percentiles();

        assert_eq!(p.extremes(), (-1.0, 8.0));
        assert_eq!(p.at(0.0), -1.0);
        assert_eq!(p.at(100.0), 8.0);
    }

    #[test]
    #[should_panic]
    fn out_of_range() {
        let v = [1.0_f64, 2.0];
        Sample::new(&v).unwrap().percentiles().at(101.0);
    }
}
