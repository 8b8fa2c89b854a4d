//! Command-line argument definition.

use clap::Parser;

use crate::results::Filter;
use crate::sources::{Mode, Source};

/// e-file - find the Gentoo packages that ship a file, using portagefilelist.de
#[derive(Parser, Debug, Clone)]
#[command(name = "e-file")]
#[command(version)]
#[command(
    about = "Find the Gentoo packages that ship a file, using portagefilelist.de",
    long_about = None
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// The query: a filename (default and -U), "cat/pkg-ver", "pkg-ver",
    /// "cat/pkg ver", "pkg ver" or "cat pkg ver" (-l), or "cat/pkg", "pkg" or
    /// "cat pkg" (-L)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Enable debugging mode (debug logging and a dump of the raw response)
    #[arg(short, long)]
    pub debug: bool,

    /// Data source to query
    #[arg(long, value_enum)]
    pub source: Option<Source>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, alias = "loglevel")]
    pub log_level: Option<String>,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not compute local information (install state, file existence, ...)
    #[arg(short, long)]
    pub minimal: bool,

    /// Search for all package versions
    #[arg(short = 'U', long, group = "mode")]
    pub no_unique: bool,

    /// List the files of a package version
    #[arg(short = 'l', long, group = "mode")]
    pub list_files: bool,

    /// List all versions of a package with a record on PFL
    #[arg(short = 'L', long, group = "mode")]
    pub list_versions: bool,

    /// Hide packages that are not available locally
    #[arg(long, help_heading = "Filters")]
    pub available: bool,

    /// Hide packages that are not installed
    #[arg(long, help_heading = "Filters")]
    pub installed: bool,

    /// Set format string KEY to VALUE (repeatable)
    #[arg(long, value_name = "KEY:VALUE", help_heading = "Format strings")]
    pub format: Vec<String>,

    /// Use a named format string set (e.g. full_uniq, raw_cpvtof)
    #[arg(long, value_name = "NAME", help_heading = "Format strings")]
    pub fmtstrset: Option<String>,

    /// Strip colors and other terminal escapes from the output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// What: Query mode selected by the mode flags.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.no_unique {
            Mode::AllVer
        } else if self.list_files {
            Mode::CpvToF
        } else if self.list_versions {
            Mode::CpToV
        } else {
            Mode::Uniq
        }
    }

    /// Filters requested on the command line.
    #[must_use]
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if self.available {
            filters.push(Filter::Available);
        }
        if self.installed {
            filters.push(Filter::Installed);
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Mode flags map to query modes and are mutually exclusive.
    fn mode_flags() {
        let a = Args::try_parse_from(["e-file", "libfoo.so"]).expect("parse");
        assert_eq!(a.mode(), Mode::Uniq);
        let a = Args::try_parse_from(["e-file", "-L", "dev-lang/python"]).expect("parse");
        assert_eq!(a.mode(), Mode::CpToV);
        let a = Args::try_parse_from(["e-file", "-l", "python", "3.12"]).expect("parse");
        assert_eq!(a.mode(), Mode::CpvToF);
        assert_eq!(a.query, ["python", "3.12"]);
        assert!(Args::try_parse_from(["e-file", "-U", "-l", "x"]).is_err());
    }

    #[test]
    /// What: Repeated `--format`, filters and source parse.
    fn formats_filters_and_source() {
        let a = Args::try_parse_from([
            "e-file",
            "--format",
            "lvcp:{cp}",
            "--format=sep:;",
            "--installed",
            "--available",
            "--source",
            "pfl_json",
            "foo",
        ])
        .expect("parse");
        assert_eq!(a.format, ["lvcp:{cp}", "sep:;"]);
        assert_eq!(a.filters(), [Filter::Available, Filter::Installed]);
        assert_eq!(a.source, Some(Source::PflJson));
        assert_eq!(a.query, ["foo"]);
    }

    #[test]
    /// What: A query is required.
    fn query_required() {
        assert!(Args::try_parse_from(["e-file"]).is_err());
    }
}
