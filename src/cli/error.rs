use std::fmt;

/// Why the command line did not produce [`Args`](super::Args)
#[derive(Debug)]
pub enum Error {
    /// `--help` was given; carries the help text
    DisplayHelp(String),
    /// `--version` was given; clap already printed it
    DisplayVersion,
    /// Any other clap failure
    Clap(clap::Error),
    /// Unknown `--color` value
    InvalidColor(String),
    /// `--top` is not a positive integer
    InvalidTop(String),
    /// Flags that cannot be combined
    ConflictingFlags(&'static [&'static str]),
}

impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        match e.kind {
            clap::ErrorKind::HelpDisplayed => Self::DisplayHelp(e.message),
            clap::ErrorKind::VersionDisplayed => Self::DisplayVersion,
            _ => Self::Clap(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayHelp(_) => f.write_str("Signals to display help"),
            Self::DisplayVersion => f.write_str("Signals to display version"),
            Self::Clap(err) => write!(f, "Arg-parse error: {}", err.message),
            Self::InvalidColor(s) => write!(f, "Invalid color: {}", s),
            Self::InvalidTop(s) => write!(f, "Invalid ranking size: {}", s),
            Self::ConflictingFlags(flags) => {
                write!(f, "Multiple of conflicting flags: {:?}", flags)
            }
        }
    }
}
