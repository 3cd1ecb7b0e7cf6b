use crate::autosearch::QueryTerm;
use crate::types::SearchMode;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meddra-search")]
#[command(about = "Look up MedDRA terms in a local ASCII distribution", long_about = None)]
pub struct Cli {
    /// Directory containing llt.asc, pt.asc and mdhier.asc
    #[arg(short, long, env = "MEDDRA_DATA_DIR", default_value = ".", global = true)]
    pub data_dir: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search LLT names
    Search {
        query: String,
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        include_inactive: bool,
        #[arg(short, long, default_value = "exact")]
        mode: SearchMode,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show a PT with its classification paths, LLTs and related PTs
    Details {
        pt_code: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Search every line of a file in order; `term<TAB>alternate` lines are accepted
    Batch {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Load the vocabulary and print record counts
    Stats,
}

#[derive(Args, Clone, Copy)]
pub struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Data directory with a leading `~` expanded to the home directory.
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.data_dir)
    }
}

/// Expand a leading `~` in `path` to the user's home directory.
///
/// Paths without one, or without a resolvable home directory, are returned unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Parse batch input: one phrase per line, optionally `phrase<TAB>alternate`.
///
/// Blank lines are skipped; repeated phrases are kept.
pub fn parse_batch(text: &str) -> Vec<QueryTerm> {
    text.lines()
        .filter_map(|line| {
            let (display, alternate) = match line.split_once('\t') {
                Some((display, alternate)) => (display.trim(), alternate.trim()),
                None => (line.trim(), ""),
            };
            if display.is_empty() {
                return None;
            }
            let term = QueryTerm::new(display);
            Some(if alternate.is_empty() {
                term
            } else {
                term.with_alternate(alternate)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_arguments() {
        let cli = Cli::parse_from([
            "meddra-search",
            "--data-dir",
            "/data",
            "search",
            "두통",
            "-n",
            "5",
            "--mode",
            "auto",
            "--json",
        ]);
        check!(cli.data_dir() == PathBuf::from("/data"));
        let Commands::Search {
            query,
            limit,
            mode,
            output,
            include_inactive,
        } = cli.command
        else {
            panic!("expected search command");
        };
        check!(query == "두통");
        check!(limit == 5);
        check!(mode == SearchMode::Auto);
        check!(output.json);
        check!(!include_inactive);
    }

    #[rstest]
    #[case("/abs/path", "/abs/path")]
    #[case("relative", "relative")]
    #[case("a/~/b", "a/~/b")]
    fn test_expand_tilde_passthrough(#[case] input: &str, #[case] expected: &str) {
        check!(expand_tilde(Path::new(input)) == PathBuf::from(expected));
    }

    #[test]
    fn test_expand_tilde_home() {
        if let Some(home) = dirs::home_dir() {
            check!(expand_tilde(Path::new("~")) == home);
            check!(expand_tilde(Path::new("~/meddra")) == home.join("meddra"));
        }
    }

    #[test]
    fn test_parse_batch() {
        let terms = parse_batch("두통\theadache\n\n  nausea \n두통\n");
        check!(terms.len() == 3);
        check!(terms[0].alternate.as_deref() == Some("headache"));
        check!(terms[1] == QueryTerm::new("nausea"));
        check!(terms[2].display == "두통");
        check!(terms[2].alternate.is_none());
    }
}
