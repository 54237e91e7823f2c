//! Correlation coefficients

use std::cmp::Ordering;

use crate::stats::bivariate::Data;
use crate::stats::float::Float;
use crate::stats::students_t_p_value;

/// A correlation coefficient together with its two-sided significance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficient<A> {
    /// The coefficient, in `[-1, 1]`, or `NaN` if undefined
    pub r: A,
    /// Two-sided p-value of the null hypothesis `r == 0`, in `[0, 1]`, or `NaN` if undefined
    pub p_value: A,
    /// Number of pairs the coefficient was computed over
    pub n: usize,
}

impl<A> Coefficient<A>
where
    A: Float,
{
    fn undefined(n: usize) -> Coefficient<A> {
        Coefficient {
            r: A::nan(),
            p_value: A::nan(),
            n,
        }
    }
}

/// Pearson's product-moment correlation coefficient
///
/// The coefficient is undefined (`NaN`) when there are fewer than two pairs or when either
/// column is constant. The p-value comes from the Student's t distribution with `n - 2` degrees
/// of freedom; two pairs always yield a perfect correlation with a p-value of 1.
///
/// - Time: `O(length)`
pub fn pearson<A>(data: Data<'_, A, A>) -> Coefficient<A>
where
    A: Float,
{
    let n = data.len();
    if n < 2 || is_constant(data.x()) || is_constant(data.y()) {
        return Coefficient::undefined(n);
    }

    let _0 = A::cast(0);
    let _1 = A::cast(1);
    let len = A::cast(n);

    let x_bar = crate::stats::sum(data.x()) / len;
    let y_bar = crate::stats::sum(data.y()) / len;

    let (mut sxx, mut syy, mut sxy) = (_0, _0, _0);
    for (&x, &y) in data.iter() {
        let (dx, dy) = (x - x_bar, y - y_bar);
        sxx = sxx + dx * dx;
        syy = syy + dy * dy;
        sxy = sxy + dx * dy;
    }

    let r = (sxy / (sxx * syy).sqrt()).max(-_1).min(_1);

    Coefficient {
        r,
        p_value: p_value(r, n),
        n,
    }
}

/// Spearman's rank correlation coefficient
///
/// Pearson's coefficient over the ranks of each column, tied values sharing the average of the
/// ranks they span.
///
/// - Time: `O(N log N) where N = length`
pub fn spearman<A>(data: Data<'_, A, A>) -> Coefficient<A>
where
    A: Float,
{
    let x_ranks = ranks(data.x());
    let y_ranks = ranks(data.y());

    match Data::new(&x_ranks, &y_ranks) {
        Some(ranked) => pearson(ranked),
        None => Coefficient::undefined(data.len()),
    }
}

/// Returns the 1-based ranks of `xs`, averaging the ranks of tied values
///
/// - Time: `O(N log N) where N = length`
pub fn ranks<A>(xs: &[A]) -> Vec<A>
where
    A: Float,
{
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&a, &b| xs[a].partial_cmp(&xs[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![A::cast(0); xs.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && xs[order[end]] == xs[order[start]] {
            end += 1;
        }

        // Positions `start..end` hold the same value, they share ranks `start + 1..=end`
        let rank = A::cast(start + 1 + end) / A::cast(2);
        for &i in &order[start..end] {
            ranks[i] = rank;
        }

        start = end;
    }

    ranks
}

// The accumulated deviations of a constant column are rarely exactly zero
fn is_constant<A>(xs: &[A]) -> bool
where
    A: Float,
{
    xs.iter().all(|&x| x == xs[0])
}

fn p_value<A>(r: A, n: usize) -> A
where
    A: Float,
{
    let _0 = A::cast(0);
    let _1 = A::cast(1);

    if n < 3 {
        return _1;
    }

    let df = A::cast(n - 2);
    let one_minus_r2 = _1 - r * r;
    if one_minus_r2 <= _0 {
        return _0;
    }

    let t = r * (df / one_minus_r2).sqrt();

    students_t_p_value(t, df)
}
