//! Classification of outliers
//!
//! WARNING: There's no formal/mathematical definition of what an outlier actually is. Therefore,
//! all outlier classifiers are *subjective*. The exam analyses use Tukey's fences, the
//! classical choice for score distributions.

pub mod tukey;
