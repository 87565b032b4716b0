mod patterns;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
pub use patterns::{FilterArgs, PatternArgs};
use std::path::PathBuf;

/// View log files through include, exclude and highlight filters grouped into tabs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Viewer config file (TOML)
    #[arg(short, long, global = true, env = "LOGTAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// When to color the output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Write the output to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// More diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the lines of a log file that pass the filters, in their colors
    View {
        /// Log file to view
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Also print hidden lines, dimmed
        #[arg(long)]
        show_hidden: bool,

        /// Prefix lines with their line number
        #[arg(short = 'n', long, conflicts_with = "no_line_numbers")]
        line_numbers: bool,

        /// Do not prefix lines with their line number
        #[arg(long)]
        no_line_numbers: bool,
    },
    /// Count visible, hidden and styled lines and matches per filter
    Stats {
        /// Log file to analyze
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Build a tab from the command line and write it as a tab document
    Export {
        /// Name of the tab
        #[arg(long)]
        name: String,

        #[command(flatten)]
        patterns: PatternArgs,
    },
    /// Validate tab documents and warn about regexes that never match
    Check {
        /// Tab documents to check
        #[arg(required = true)]
        documents: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Tracing directive implied by `-v` / `-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view_with_filters() {
        let cli = Cli::try_parse_from([
            "logtab", "view", "app.log", "-i", "ERROR", "-e", "debug", "-H", "disk", "--regex",
        ])
        .unwrap();
        match cli.command {
            Commands::View { file, filters, .. } => {
                assert_eq!(file, PathBuf::from("app.log"));
                assert_eq!(filters.patterns.include, vec!["ERROR"]);
                assert_eq!(filters.patterns.exclude, vec!["debug"]);
                assert_eq!(filters.patterns.highlight, vec!["disk"]);
                assert!(filters.patterns.regex);
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_verbosity_maps_to_level() {
        let cli = Cli::try_parse_from(["logtab", "-vv", "check", "a.json"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        let cli = Cli::try_parse_from(["logtab", "-q", "-v", "check", "a.json"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }
}
