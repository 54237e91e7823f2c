//! The crate error type

use csv::Error as CsvError;
use serde_json::Error as SerdeError;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while loading, cleaning and reporting on a data set
///
/// Malformed numeric cells and unmapped category codes are *not* errors: they become missing
/// values and the unknown sentinel respectively.
#[allow(clippy::enum_variant_names)]
#[derive(Debug)]
pub enum Error {
    /// The input file, or an output file, could not be opened, read or written.
    AccessError {
        /// The file
        path: PathBuf,
        /// What the OS reported
        inner: io::Error,
    },
    /// The delimited text could not be parsed into records.
    CsvError {
        /// The file
        path: PathBuf,
        /// What the parser reported
        inner: CsvError,
    },
    /// A record holds more fields than the header names.
    MalformedRecord {
        /// The file
        path: PathBuf,
        /// 1-based line of the record
        line: u64,
        /// Number of columns in the header
        expected: usize,
        /// Number of fields in the record
        found: usize,
    },
    /// A configured column is not present in the table.
    MissingColumn {
        /// The column looked up
        column: String,
        /// The columns of the table
        available: Vec<String>,
    },
    /// A column was used as numeric while holding text, or the other way around.
    ColumnType {
        /// The column looked up
        column: String,
        /// `"numeric"` or `"text"`
        expected: &'static str,
    },
    /// A report could not be serialized.
    SerdeError {
        /// The report file
        path: PathBuf,
        /// What the serializer reported
        inner: SerdeError,
    },
    /// The HTML report template failed to render.
    TemplateError(tinytemplate::error::Error),
    /// A chart could not be drawn.
    PlotError(String),
    /// The run configuration is not usable.
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AccessError { path, inner } => {
                write!(f, "Failed to access file {:?}: {}", path, inner)
            }
            Error::CsvError { path, inner } => {
                write!(f, "Failed to read delimited data from {:?}: {}", path, inner)
            }
            Error::MalformedRecord {
                path,
                line,
                expected,
                found,
            } => write!(
                f,
                "Record on line {} of {:?} has {} fields, the header names {}",
                line, path, found, expected
            ),
            Error::MissingColumn { column, available } => write!(
                f,
                "Column {:?} is not present in the data set (available columns: {})",
                column,
                available.join(", ")
            ),
            Error::ColumnType { column, expected } => {
                write!(f, "Column {:?} is not a {} column", column, expected)
            }
            Error::SerdeError { path, inner } => write!(
                f,
                "Failed to write report data to file {:?}: {}",
                path, inner
            ),
            Error::TemplateError(inner) => write!(f, "Failed to render report template: {}", inner),
            Error::PlotError(message) => write!(f, "Failed to draw chart: {}", message),
            Error::InvalidConfig(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::AccessError { inner, .. } => Some(inner),
            Error::CsvError { inner, .. } => Some(inner),
            Error::SerdeError { inner, .. } => Some(inner),
            Error::TemplateError(inner) => Some(inner),
            Error::MalformedRecord { .. }
            | Error::MissingColumn { .. }
            | Error::ColumnType { .. }
            | Error::PlotError(_)
            | Error::InvalidConfig(_) => None,
        }
    }
}

impl From<tinytemplate::error::Error> for Error {
    fn from(e: tinytemplate::error::Error) -> Self {
        Error::TemplateError(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::InvalidConfig(format!("invalid filter: {}", e))
    }
}

/// Result with the crate [`Error`]
pub type Result<T> = ::std::result::Result<T, Error>;

pub(crate) fn log_error(e: &Error) {
    error!("error: {}", e);
}

#[cfg(test)]
mod test {
    use super::Error;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn access_error_names_the_path() {
        let e = Error::AccessError {
            path: PathBuf::from("dados.csv"),
            inner: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        assert!(e.to_string().contains("dados.csv"));
    }

    #[test]
    fn missing_column_names_the_column() {
        let e = Error::MissingColumn {
            column: "NU_NOTA_CH".to_owned(),
            available: vec!["TP_ESCOLA".to_owned(), "Q006".to_owned()],
        };
        let message = e.to_string();

        assert!(message.contains("NU_NOTA_CH"));
        assert!(message.contains("TP_ESCOLA, Q006"));
    }
}
