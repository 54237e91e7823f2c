use std::{fmt, str::FromStr};

/// An option value outside its allowed set
#[derive(Debug)]
pub struct TypeParseError(String);

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unexpected value: {}", self.0)
    }
}

impl std::error::Error for TypeParseError {}

/// When to color the console report
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    /// Only when stdout is a terminal
    Auto,
    /// Always
    Always,
    /// Never
    Never,
}

impl Color {
    /// Whether console output gets colored, given whether stdout is a terminal
    pub fn enabled(self, stdout_isatty: bool) -> bool {
        match self {
            Self::Auto => stdout_isatty,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::Auto
    }
}

impl FromStr for Color {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            invalid => Err(TypeParseError(invalid.to_owned())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}
