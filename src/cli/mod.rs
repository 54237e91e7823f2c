//! Command-line parsing for the `enem-eda` binary.

mod error;
#[cfg(test)]
mod tests;
mod types;

pub use error::Error;
pub use types::Color;

use clap::{App, AppSettings, Arg};
use std::{env, ffi::OsString, path::PathBuf};

/// Directory the reports are written to unless `--output-dir` says otherwise
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target/enem-eda";

/// Size of the top/bottom rankings unless `--top` says otherwise
pub const DEFAULT_TOP_K: usize = 10;

/// Parsed command line
#[derive(Debug, PartialEq)]
pub struct Args {
    /// Microdata file; only optional with `--list`
    pub input: Option<PathBuf>,
    /// Regular expression selecting the analyses to run
    pub filter: Option<String>,
    /// Where the reports are written
    pub output_directory: PathBuf,
    /// Size of the top/bottom rankings
    pub top: usize,
    /// Skips the charts and HTML pages
    pub no_plot: bool,
    /// When to color the console report
    pub color: Color,
    /// Prints every group of every grouping
    pub verbose: bool,
    /// Only prints the record counts
    pub quiet: bool,
    /// Lists the analyses instead of running them
    pub list: bool,
}

impl Default for Args {
    fn default() -> Args {
        Args {
            input: None,
            filter: None,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            top: DEFAULT_TOP_K,
            no_plot: false,
            color: Color::default(),
            verbose: false,
            quiet: false,
            list: false,
        }
    }
}

pub fn parse_args() -> Args {
    let args = env::args_os().collect();
    match try_parse_args(args) {
        Ok(args) => args,
        Err(Error::DisplayHelp(help)) => {
            println!("{}", help);
            std::process::exit(0);
        }
        // clap prints the version itself
        Err(Error::DisplayVersion) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error parsing CLI args: {}", e);
            std::process::exit(1);
        }
    }
}

fn app() -> App<'static, 'static> {
    App::new("enem-eda")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Exploratory analysis of ENEM exam microdata")
        .setting(AppSettings::DisableHelpSubcommand)
        .arg(
            Arg::with_name("INPUT")
                .help("Semicolon-separated, Latin-1 encoded microdata file.")
                .required_unless("list")
                .index(1),
        )
        .arg(
            Arg::with_name("FILTER")
                .help("Skip analyses whose id does not match this regular expression.")
                .index(2),
        )
        .arg(
            Arg::with_name("output-dir")
                .short("o")
                .long("output-dir")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory the reports are written to.")
                .default_value(DEFAULT_OUTPUT_DIRECTORY),
        )
        .arg(
            Arg::with_name("top")
                .short("k")
                .long("top")
                .takes_value(true)
                .value_name("K")
                .help("Number of categories in the top and bottom rankings.")
                .default_value("10"),
        )
        .arg(
            Arg::with_name("noplot")
                .short("n")
                .long("noplot")
                .help("Disable plot and HTML generation."),
        )
        .arg(
            Arg::with_name("color")
                .short("c")
                .long("color")
                .alias("colour")
                .takes_value(true)
                .possible_values(&["auto", "always", "never"])
                .default_value("auto")
                .help("Configure coloring of output. always = always colorize output, never = never colorize output, auto = colorize output if output is a tty."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Print the outlier classification and every table."),
        )
        .arg(
            Arg::with_name("quiet")
                .long("quiet")
                .help("Print only record counts and correlations."),
        )
        .arg(
            Arg::with_name("list")
                .long("list")
                .help("List the analyses and exit."),
        )
        .after_help(
            "\
To enable debug output, define the environment variable ENEM_EDA_DEBUG.
The report contexts are then saved alongside the generated HTML pages.",
        )
}

pub(crate) fn try_parse_args(args: Vec<OsString>) -> Result<Args, Error> {
    let matches = app().get_matches_from_safe(args)?;

    let verbose = matches.is_present("verbose");
    let quiet = matches.is_present("quiet");
    if verbose && quiet {
        return Err(Error::ConflictingFlags(&["--verbose", "--quiet"]));
    }

    let color = matches.value_of("color").unwrap_or("auto");
    let color = color
        .parse()
        .map_err(|_| Error::InvalidColor(color.to_owned()))?;

    let top = matches.value_of("top").unwrap_or("10");
    let top = top
        .parse()
        .map_err(|_| Error::InvalidTop(top.to_owned()))?;

    let output_directory = matches
        .value_of_os("output-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));

    Ok(Args {
        input: matches.value_of_os("INPUT").map(PathBuf::from),
        filter: matches.value_of("FILTER").map(String::from),
        output_directory,
        top,
        no_plot: matches.is_present("noplot"),
        color,
        verbose,
        quiet,
        list: matches.is_present("list"),
    })
}
