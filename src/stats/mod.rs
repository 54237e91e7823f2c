//! The numeric core of the exploratory analyses.
//!
//! Everything in here works on plain slices of floats: no tables, no column names. The table
//! layer (`crate::table`, `crate::outlier`, `crate::group`, `crate::correlation`) extracts the
//! values, drops missing cells and hands the complete slices down to this module.


pub mod bivariate;
pub mod univariate;

mod float;
mod special;

pub use self::float::Float;

/// Returns the two-sided probability of observing a Student's t statistic at least as extreme
/// as `t` with `df` degrees of freedom.
///
/// Returns `NaN` if `t` is `NaN` or `df` is not positive.
pub fn students_t_p_value<A>(t: A, df: A) -> A
where
    A: Float,
{
    let _0 = A::cast(0);
    let _1 = A::cast(1);
    let _2 = A::cast(2);

    if t.is_nan() || !(df > _0) {
        return A::nan();
    }
    if t.is_infinite() {
        return _0;
    }

    // P(|T| >= |t|) = I_{df / (df + t^2)}(df / 2, 1 / 2)
    let x = df / (df + t * t);
    let p = special::regularized_incomplete_beta(df / _2, _1 / _2, x);

    p.max(_0).min(_1)
}

fn sum<A>(xs: &[A]) -> A
where
    A: Float,
{
    use std::ops::Add;

    xs.iter().cloned().fold(A::cast(0), Add::add)
}
