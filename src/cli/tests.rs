use std::{ffi::OsString, iter, path::PathBuf};

use super::{error::Error, try_parse_args, Args, Color};

fn gen_args(args: &[&str]) -> Vec<OsString> {
    iter::once("<EXE>")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn input_only() {
    let args = try_parse_args(gen_args(&["dados.csv"])).unwrap();
    assert_eq!(
        args,
        Args {
            input: Some(PathBuf::from("dados.csv")),
            ..Args::default()
        }
    );
}

#[test]
fn input_is_required() {
    let err = try_parse_args(gen_args(&[])).unwrap_err();
    assert!(matches!(err, Error::Clap(_)));
}

#[test]
fn list_needs_no_input() {
    let args = try_parse_args(gen_args(&["--list"])).unwrap();
    assert_eq!(
        args,
        Args {
            list: true,
            ..Args::default()
        }
    );
}

#[test]
fn help() {
    let err = try_parse_args(gen_args(&["--help"])).unwrap_err();
    assert!(matches!(err, Error::DisplayHelp(_)));
}

#[test]
fn version() {
    let err = try_parse_args(gen_args(&["--version"])).unwrap_err();
    assert!(matches!(err, Error::DisplayVersion));
}

#[test]
fn filter_and_options() {
    let args = try_parse_args(gen_args(&[
        "dados.csv",
        "^school$",
        "-o",
        "out",
        "--top",
        "5",
        "--noplot",
        "--color",
        "never",
        "-v",
    ]))
    .unwrap();
    assert_eq!(
        args,
        Args {
            input: Some(PathBuf::from("dados.csv")),
            filter: Some("^school$".into()),
            output_directory: PathBuf::from("out"),
            top: 5,
            no_plot: true,
            color: Color::Never,
            verbose: true,
            ..Args::default()
        }
    );
}

#[test]
fn invalid_top() {
    let err = try_parse_args(gen_args(&["dados.csv", "-k", "ten"])).unwrap_err();
    assert!(matches!(err, Error::InvalidTop(ref s) if s == "ten"));
}

#[test]
fn invalid_color() {
    let err = try_parse_args(gen_args(&["dados.csv", "--color", "sometimes"])).unwrap_err();
    assert!(matches!(err, Error::Clap(_)));
}

#[test]
fn verbose_conflicts_with_quiet() {
    let err = try_parse_args(gen_args(&["dados.csv", "--verbose", "--quiet"])).unwrap_err();
    assert!(matches!(err, Error::ConflictingFlags(_)));
}

#[test]
fn color_auto_follows_the_terminal() {
    assert!(Color::Auto.enabled(true));
    assert!(!Color::Auto.enabled(false));
    assert!(Color::Always.enabled(false));
    assert!(!Color::Never.enabled(true));
}
