//! Command-line argument parsing for tabula.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and methods for parsing them.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{EditorError, Result};

const USAGE: &str = "\
tabula - a small terminal text editor

Usage: tabula [OPTIONS] [FILES...]

Options:
  -h, --help           Show this help message
  -t, --tab-stop N     Columns per tab stop
      --soft-tabs      Tab inserts spaces
      --soft-wrap      Wrap long rows on screen
      --hard-wrap      Break rows while typing
  -c, --config PATH    Read settings from PATH instead of ~/.tabularc
      --log PATH       Write a debug log to PATH (or set TABULA_LOG)";

/// Command-line interface configuration.
#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    /// File(s) to open
    pub files: Vec<PathBuf>,

    /// Tab stop override
    pub tab_stop: Option<i64>,

    pub soft_tabs: bool,
    pub soft_wrap: bool,
    pub hard_wrap: bool,

    /// Alternative rc file
    pub config_file: Option<PathBuf>,

    /// Log file
    pub log_file: Option<PathBuf>,

    /// `--help` was given
    pub help: bool,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse() -> Result<Self> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse an argument list (without the program name).
    pub fn parse_from<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cli = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => cli.help = true,
                "--soft-tabs" => cli.soft_tabs = true,
                "--soft-wrap" => cli.soft_wrap = true,
                "--hard-wrap" => cli.hard_wrap = true,
                "-t" | "--tab-stop" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    match value.parse::<i64>() {
                        Ok(n) if n > 0 => cli.tab_stop = Some(n),
                        _ => {
                            return Err(EditorError::InvalidArgument(format!(
                                "{} expects a positive number, got {:?}",
                                arg, value
                            )));
                        }
                    }
                }
                "-c" | "--config" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    cli.config_file = Some(PathBuf::from(value));
                }
                "--log" => {
                    let value = args.next().ok_or_else(|| missing_value(&arg))?;
                    cli.log_file = Some(PathBuf::from(value));
                }
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(EditorError::InvalidArgument(format!(
                        "Unknown flag: {}. Use --help for usage.",
                        flag
                    )));
                }
                _ => {
                    // Positional arguments are files
                    cli.files.push(PathBuf::from(arg));
                }
            }
        }

        Ok(cli)
    }

    pub fn usage() -> &'static str {
        USAGE
    }

    /// Apply CLI overrides to a configuration object.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(tab_stop) = self.tab_stop {
            config.set("tab-stop", tab_stop);
        }
        if self.soft_tabs {
            config.set("soft-tabs", 1i64);
        }
        if self.soft_wrap {
            config.set("soft-wrap", true);
        }
        if self.hard_wrap {
            config.set("hard-wrap", true);
        }
    }
}

fn missing_value(flag: &str) -> EditorError {
    EditorError::InvalidArgument(format!("{} requires a value", flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files_and_flags() {
        let cli = Cli::parse_from(["-t", "4", "--soft-tabs", "a.c", "b.py"]).unwrap();
        assert_eq!(cli.tab_stop, Some(4));
        assert!(cli.soft_tabs);
        assert_eq!(cli.files, vec![PathBuf::from("a.c"), PathBuf::from("b.py")]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Cli::parse_from(["--bogus"]),
            Err(EditorError::InvalidArgument(_))
        ));
        assert!(Cli::parse_from(["--tab-stop"]).is_err());
        assert!(Cli::parse_from(["-t", "0"]).is_err());
    }

    #[test]
    fn test_overrides_win_over_rc_values() {
        let mut config = Config::default();
        config.parse_line("tab-stop = 2");
        let cli = Cli::parse_from(["--tab-stop", "3", "--hard-wrap"]).unwrap();
        cli.apply_to_config(&mut config);
        let settings = config.settings();
        assert_eq!(settings.tab_stop, 3);
        assert!(settings.hard_wrap);
        assert!(!settings.soft_wrap);
    }
}
