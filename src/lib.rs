//! Exploratory analysis of ENEM exam microdata.
//!
//! Every analysis follows the same linear pipeline:
//!
//! 1. load a semicolon-separated Latin-1 file with every cell read as text ([`Table::load`]),
//! 2. coerce the configured columns to numbers, malformed cells becoming missing
//!    ([`Table::coerce_numeric`]),
//! 3. drop every record with a missing cell ([`Table::drop_missing`]),
//! 4. recode categorical codes into labels ([`Table::recode`], [`Table::bucket`],
//!    [`Table::ordinal`]),
//! 5. drop score outliers outside Tukey's fences ([`outlier::filter`]),
//! 6. describe the score per category ([`group::group_by`]) and correlate columns
//!    ([`correlation::correlate`]).
//!
//! [`Analysis`] bundles the configuration of one such pipeline and [`Explorer`] runs a set of
//! analyses, printing and exporting their reports.
//!
//! ```no_run
//! use enem_eda::{builtin, Explorer};
//!
//! let explorer = Explorer::default().output_directory("target/enem-eda");
//! explorer.run_all("dados.csv", &builtin::analyses()).unwrap();
//! ```

#![warn(missing_docs)]
#![allow(clippy::just_underscores_and_digits)] // Used in the stats code
#![allow(clippy::manual_range_contains)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

// Needs to be declared before other modules
// in order to be usable there.
#[macro_use]
mod macros_private;

mod csv_report;
mod format;
mod fs;
mod html;
mod plot;
mod report;

#[doc(hidden)]
pub mod cli;

pub mod analysis;
pub mod builtin;
pub mod codes;
pub mod correlation;
pub mod error;
pub mod explorer;
pub mod group;
pub mod outlier;
pub mod recode;
pub mod stats;
pub mod table;

pub use crate::analysis::{Analysis, AnalysisReport};
pub use crate::correlation::{Correlation, Method};
pub use crate::error::{Error, Result};
pub use crate::explorer::Explorer;
pub use crate::group::{GroupStats, GroupedStats, Summary};
pub use crate::recode::{CodeMap, OrdinalScale, UNKNOWN};
pub use crate::table::{Column, LoadOptions, Table};

lazy_static! {
    static ref DEBUG_ENABLED: bool = std::env::var_os("ENEM_EDA_DEBUG").is_some();
}

fn debug_enabled() -> bool {
    *DEBUG_ENABLED
}
