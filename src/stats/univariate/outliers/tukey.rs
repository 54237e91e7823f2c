//! Tukey's method
//!
//! The original method uses two "fences" to classify the data. All the observations "inside" the
//! fences are considered "normal", and the rest are considered outliers.
//!
//! The fences are computed from the quartiles of the sample, according to the following formula:
//!
//! ``` ignore
//! // q1, q3 are the first and third quartiles
//! let iqr = q3 - q1;  // The interquartile range
//! let (f1, f2) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);  // the "fences"
//!
//! let is_normal = |x| x >= f1 && x <= f2;
//! ```
//!
//! The fences are inclusive: a score sitting exactly on a fence is kept.
//!
//! The classifier provided here adds two extra outer fences:
//!
//! ``` ignore
//! let (f3, f4) = (q1 - 3 * iqr, q3 + 3 * iqr);  // the outer "fences"
//! ```
//!
//! The outer fences only add a sense of "severity" to the console report. Filtering always uses
//! the inner fences.
//!
//! ``` ignore
//!          LOW-ish                NORMAL-ish                 HIGH-ish
//!         x   |       +    |  o o  o    o   o o  o  |        +   |   x
//!             f3           f1                       f2           f4
//!
//! Legend:
//! o: "normal" data (not an outlier)
//! +: "mild" outlier
//! x: "severe" outlier
//! ```
//!
//! When the interquartile range is zero all four fences collapse onto `q1 == q3` and every point
//! different from it is an outlier. This is applied literally, never special-cased.

use std::ops::Deref;
use std::slice;

use serde_derive::{Deserialize, Serialize};

use crate::stats::float::Float;
use crate::stats::univariate::Sample;

use self::Label::*;

/// The quartiles of a sample and the fences derived from them
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fences<A> {
    /// 25th percentile
    pub q1: A,
    /// 75th percentile
    pub q3: A,
    /// `q3 - q1`
    pub iqr: A,
    /// `q1 - 3 * iqr`
    pub low_severe: A,
    /// `q1 - 1.5 * iqr`
    pub lower: A,
    /// `q3 + 1.5 * iqr`
    pub upper: A,
    /// `q3 + 3 * iqr`
    pub high_severe: A,
}

impl<A> Fences<A>
where
    A: Float,
{
    /// Builds the fences from the first and third quartiles
    pub fn from_quartiles(q1: A, q3: A) -> Fences<A> {
        let iqr = q3 - q1;

        // Mild
        let k_m = A::cast(1.5_f32);
        // Severe
        let k_s = A::cast(3);

        Fences {
            q1,
            q3,
            iqr,
            low_severe: q1 - k_s * iqr,
            lower: q1 - k_m * iqr,
            upper: q3 + k_m * iqr,
            high_severe: q3 + k_s * iqr,
        }
    }

    /// Fences of an empty sample; nothing lies inside them
    pub fn undefined() -> Fences<A> {
        Fences::from_quartiles(A::nan(), A::nan())
    }

    /// Checks if `x` lies inside the closed `[lower, upper]` interval
    pub fn contains(&self, x: A) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Checks if the interquartile range is zero, i.e. the fences collapsed onto a single value
    pub fn is_degenerate(&self) -> bool {
        self.iqr == A::cast(0)
    }

    fn label(&self, x: A) -> Label {
        if x < self.low_severe {
            LowSevere
        } else if x > self.high_severe {
            HighSevere
        } else if x < self.lower {
            LowMild
        } else if x > self.upper {
            HighMild
        } else {
            NotAnOutlier
        }
    }
}

/// A classified/labeled sample.
///
/// The order of the data points is retained.
#[derive(Clone, Copy)]
pub struct LabeledSample<'a, A>
where
    A: Float,
{
    fences: Fences<A>,
    sample: &'a Sample<A>,
}

/// Number of data points per label
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    /// Below the outer low fence
    pub low_severe: usize,
    /// Between the low fences
    pub low_mild: usize,
    /// Within the inner fences
    pub normal: usize,
    /// Between the high fences
    pub high_mild: usize,
    /// Above the outer high fence
    pub high_severe: usize,
}

impl LabelCounts {
    /// Total number of outliers, mild or severe
    pub fn outliers(&self) -> usize {
        self.low_severe + self.low_mild + self.high_mild + self.high_severe
    }

    /// Total number of classified data points
    pub fn total(&self) -> usize {
        self.outliers() + self.normal
    }
}

impl<'a, A> LabeledSample<'a, A>
where
    A: Float,
{
    /// Returns the number of data points per label
    ///
    /// - Time: `O(length)`
    pub fn count(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();

        for (_, label) in self {
            match label {
                LowSevere => counts.low_severe += 1,
                LowMild => counts.low_mild += 1,
                NotAnOutlier => counts.normal += 1,
                HighMild => counts.high_mild += 1,
                HighSevere => counts.high_severe += 1,
            }
        }

        counts
    }

    /// Returns the fences used to classify the outliers
    pub fn fences(&self) -> Fences<A> {
        self.fences
    }

    /// Returns an iterator over the labeled data
    pub fn iter(&self) -> Iter<'a, A> {
        Iter {
            fences: self.fences,
            iter: self.sample.iter(),
        }
    }
}

impl<'a, A> Deref for LabeledSample<'a, A>
where
    A: Float,
{
    type Target = Sample<A>;

    fn deref(&self) -> &Sample<A> {
        self.sample
    }
}

impl<'a, A> IntoIterator for &LabeledSample<'a, A>
where
    A: Float,
{
    type Item = (A, Label);
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Iter<'a, A> {
        self.iter()
    }
}

/// Iterator over the labeled data
pub struct Iter<'a, A>
where
    A: Float,
{
    fences: Fences<A>,
    iter: slice::Iter<'a, A>,
}

impl<'a, A> Iterator for Iter<'a, A>
where
    A: Float,
{
    type Item = (A, Label);

    fn next(&mut self) -> Option<(A, Label)> {
        let fences = self.fences;

        self.iter.next().map(|&x| (x, fences.label(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Labels used to classify outliers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Label {
    /// A "mild" outlier in the "high" spectrum
    HighMild,
    /// A "severe" outlier in the "high" spectrum
    HighSevere,
    /// A "mild" outlier in the "low" spectrum
    LowMild,
    /// A "severe" outlier in the "low" spectrum
    LowSevere,
    /// A normal data point
    NotAnOutlier,
}

impl Label {
    /// Checks if the data point is labeled as an outlier
    pub fn is_outlier(&self) -> bool {
        !matches!(*self, NotAnOutlier)
    }
}

/// Classifies the sample, and returns a labeled sample.
///
/// - Time: `O(N log N) where N = length`
pub fn classify<A>(sample: &Sample<A>) -> LabeledSample<'_, A>
where
    A: Float,
    usize: cast::From<A, Output = Result<usize, cast::Error>>,
{
    let (q1, _, q3) = sample.percentiles().quartiles();

    LabeledSample {
        fences: Fences::from_quartiles(q1, q3),
        sample,
    }
}
