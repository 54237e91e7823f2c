#[cfg(feature = "plotters")]
mod plotters_backend;

#[cfg(feature = "plotters")]
pub(crate) use plotters_backend::PlottersBackend;

use crate::error::Result;
use crate::group::{GroupedStats, Ranking};
use std::path::Path;

/// Number of bins of the score histograms
pub(crate) const HISTOGRAM_BINS: usize = 30;

/// Values of one category, for the stacked histograms
pub(crate) struct Stack<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

/// Labelled points of a scatter plot
pub(crate) struct Scatter<'a> {
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<String>,
}

pub(crate) trait Plotter {
    fn histogram(&mut self, path: &Path, title: &str, x_desc: &str, values: &[f64]) -> Result<()>;

    fn stacked_histogram(
        &mut self,
        path: &Path,
        title: &str,
        x_desc: &str,
        stacks: &[Stack<'_>],
    ) -> Result<()>;

    fn counts(&mut self, path: &Path, title: &str, grouped: &GroupedStats) -> Result<()>;

    fn ranking(&mut self, path: &Path, title: &str, ranking: &Ranking) -> Result<()>;

    fn scatter(&mut self, path: &Path, title: &str, scatter: &Scatter<'_>) -> Result<()>;
}

/// Equal width bins over `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bins {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Bins {
    /// Bins spanning every one of `values`; `None` if there are none
    pub fn spanning<'a, I>(values: I, count: usize) -> Option<Bins>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let (min, max) = values.into_iter().fold(None, |acc, &x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
        })?;

        // A single distinct value still gets a bin of unit width
        let max = if max > min { max } else { min + 1.0 };

        Some(Bins { min, max, count })
    }

    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.count as f64
    }

    /// Lower edge of the `i`-th bin
    pub fn edge(&self, i: usize) -> f64 {
        self.min + self.width() * i as f64
    }

    /// Index of the bin `x` falls in; the last bin is closed
    pub fn index(&self, x: f64) -> Option<usize> {
        if !(x >= self.min && x <= self.max) {
            return None;
        }

        let i = ((x - self.min) / self.width()) as usize;
        Some(i.min(self.count - 1))
    }

    pub fn histogram(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; self.count];
        for &x in values {
            if let Some(i) = self.index(x) {
                counts[i] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod test {
    use super::{Bins, HISTOGRAM_BINS};

    #[test]
    fn every_value_lands_in_a_bin() {
        let values = [300.0, 412.5, 500.0, 610.25, 700.0];
        let bins = Bins::spanning(&values, HISTOGRAM_BINS).unwrap();
        let counts = bins.histogram(&values);

        assert_eq!(counts.len(), HISTOGRAM_BINS);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
        assert_eq!(counts[0], 1);
        assert_eq!(counts[HISTOGRAM_BINS - 1], 1);
    }

    #[test]
    fn constant_values() {
        let bins = Bins::spanning(&[5.0, 5.0], 10).unwrap();

        assert_eq!(bins.histogram(&[5.0, 5.0])[0], 2);
        assert_eq!(bins.edge(10), 6.0);
    }

    #[test]
    fn no_values_no_bins() {
        assert_eq!(Bins::spanning(&[], 10), None);
    }
}
