//! Float trait

use cast::From;
use num_traits::float;

/// `num_traits::float::Float` plus the lossless casts from `usize`/`f32` used to build constants
/// (`A::cast(100)`, `A::cast(1.5_f32)`), and `Sync + Send` so percentile views can be sorted on
/// the rayon pool.
pub trait Float:
    float::Float + From<usize, Output = Self> + From<f32, Output = Self> + Sync + Send
{
}

impl Float for f32 {}
impl Float for f64 {}
